//! # Configuração — Arquivo JSON + Variáveis de Ambiente
//!
//! A configuração é carregada em três camadas (a última vence):
//!
//! 1. Valores padrão ([`AppConfig::default`])
//! 2. Arquivo JSON apontado por `RIESGO_CONFIG`, se definido
//! 3. Variáveis de ambiente individuais
//!
//! ## Variáveis de Ambiente
//!
//! | Variável | Campo | Exemplo |
//! |----------|-------|---------|
//! | `RIESGO_CONFIG` | caminho do arquivo | `config/riesgo.json` |
//! | `RIESGO_ADDR` | `addr` | `127.0.0.1:8080` |
//! | `RIESGO_BANDS` | `band_scheme` | `3` ou `4` |
//! | `RIESGO_STEP` | `risk_step` | `0.01` |
//!
//! ## Exemplo de Arquivo
//!
//! ```json
//! {
//!   "addr": "0.0.0.0:10000",
//!   "risk_step": 0.01,
//!   "band_scheme": "four",
//!   "degenerate_fallback": 0.5
//! }
//! ```
//!
//! O campo opcional `engine` substitui a base de regras de referência por
//! uma definição completa (`variables` + `rules`), no mesmo formato JSON
//! de [`FuzzyVariable`] e [`Rule`].

use std::env;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::{FuzzyError, FuzzyVariable};
use crate::inference::{Engine, Rule};
use crate::risk::{self, BandScheme, RiskBand, RiskBands};

/// Porta do serviço original.
const DEFAULT_ADDR: &str = "0.0.0.0:10000";

/// Definição completa de um motor (variáveis + regras).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineDefinition {
    pub variables: Vec<FuzzyVariable>,
    pub rules: Vec<Rule>,
}

/// Configuração da aplicação.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Endereço de bind do servidor HTTP.
    pub addr: String,
    /// Passo do universo de `riesgo` (0.1 ou 0.01 na prática).
    pub risk_step: f64,
    /// Esquema de faixas pré-definido; ignorado se `bands` estiver presente.
    pub band_scheme: BandScheme,
    /// Cortes explícitos de faixa.
    pub bands: Option<Vec<RiskBand>>,
    /// Score usado quando nenhuma regra dispara para um item.
    pub degenerate_fallback: Option<f64>,
    /// Motor customizado. `None` → base de referência.
    pub engine: Option<EngineDefinition>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            risk_step: 0.1,
            band_scheme: BandScheme::Three,
            bands: None,
            degenerate_fallback: None,
            engine: None,
        }
    }
}

impl AppConfig {
    /// Carrega padrão → arquivo (`RIESGO_CONFIG`) → ambiente, e valida.
    pub fn load() -> Result<Self> {
        let mut config = match env::var("RIESGO_CONFIG") {
            Ok(path) => Self::load_from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Falha ao ler {}", path.display()))?;
        Self::load_from_str(&json).with_context(|| format!("Falha ao interpretar {}", path.display()))
    }

    pub fn load_from_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Aplica overrides a partir de uma função de consulta (normalmente `env::var`).
    ///
    /// Valores que não podem ser interpretados são ignorados com um aviso.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(addr) = lookup("RIESGO_ADDR") {
            self.addr = addr;
        }

        if let Some(val) = lookup("RIESGO_BANDS") {
            match val.trim().to_lowercase().as_str() {
                "3" | "three" => self.band_scheme = BandScheme::Three,
                "4" | "four" => self.band_scheme = BandScheme::Four,
                other => tracing::warn!(value = other, "RIESGO_BANDS inválido, ignorando"),
            }
        }

        if let Some(val) = lookup("RIESGO_STEP") {
            match val.trim().parse::<f64>() {
                Ok(step) => self.risk_step = step,
                Err(e) => tracing::warn!(value = %val, error = %e, "RIESGO_STEP inválido, ignorando"),
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.risk_step.is_finite() && self.risk_step > 0.0 && self.risk_step < 1.0) {
            bail!("risk_step deve estar em (0, 1), recebeu {}", self.risk_step);
        }
        if let Some(fallback) = self.degenerate_fallback {
            if !fallback.is_finite() {
                bail!("degenerate_fallback deve ser finito");
            }
        }
        self.risk_bands()?;
        Ok(())
    }

    /// Faixas efetivas: `bands` explícitas ou o esquema pré-definido.
    pub fn risk_bands(&self) -> Result<RiskBands> {
        match &self.bands {
            Some(bands) => RiskBands::new(bands.clone()),
            None => Ok(RiskBands::from_scheme(self.band_scheme)),
        }
    }

    /// Constrói o motor configurado (customizado ou de referência).
    pub fn build_engine(&self) -> Result<Engine, FuzzyError> {
        match &self.engine {
            Some(def) => Engine::build(def.variables.clone(), def.rules.clone()),
            None => risk::reference_engine(self.risk_step),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert_eq!(config.addr, "0.0.0.0:10000");
        assert_eq!(config.risk_bands().unwrap().bands().len(), 3);
        assert_eq!(config.build_engine().unwrap().rules().len(), 8);
    }

    #[test]
    fn parse_partial_file() {
        let config = AppConfig::load_from_str(r#"{ "risk_step": 0.01, "band_scheme": "four" }"#).unwrap();
        assert_eq!(config.risk_step, 0.01);
        assert_eq!(config.band_scheme, BandScheme::Four);
        assert_eq!(config.addr, DEFAULT_ADDR);
        assert_eq!(config.risk_bands().unwrap().classify(0.9), "EXTREMO");
    }

    #[test]
    fn env_overrides_win() {
        let vars = HashMap::from([
            ("RIESGO_ADDR", "127.0.0.1:8080"),
            ("RIESGO_BANDS", "4"),
            ("RIESGO_STEP", "0.01"),
        ]);
        let mut config = AppConfig::default();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.addr, "127.0.0.1:8080");
        assert_eq!(config.band_scheme, BandScheme::Four);
        assert_eq!(config.risk_step, 0.01);
    }

    #[test]
    fn bad_override_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_overrides(|k| (k == "RIESGO_STEP").then(|| "fino".to_string()));
        assert_eq!(config.risk_step, 0.1);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let config = AppConfig::load_from_str(r#"{ "risk_step": 0 }"#).unwrap();
        assert!(config.validate().is_err());

        let config = AppConfig::load_from_str(
            r#"{ "bands": [ { "label": "A", "lower": 0.6 }, { "label": "B", "lower": 0.2 } ] }"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn custom_engine_definition() {
        let json = r#"{
            "engine": {
                "variables": [
                    { "name": "stock", "role": "antecedent",
                      "universe": { "lo": 0, "hi": 100, "step": 1 },
                      "terms": { "poco": { "kind": "sigmoid", "center": 30, "slope": -0.2 } } },
                    { "name": "umbral", "role": "antecedent",
                      "universe": { "lo": 0, "hi": 100, "step": 1 },
                      "terms": { "exigente": { "kind": "gaussian", "mean": 100, "sigma": 25 } } },
                    { "name": "riesgo", "role": "consequent",
                      "universe": { "lo": 0, "hi": 1, "step": 0.01 },
                      "defuzzify": "mean_of_maximum",
                      "terms": {
                          "bajo": { "kind": "triangular", "a": 0, "b": 0, "c": 0.5 },
                          "alto": { "kind": "triangular", "a": 0.5, "b": 1, "c": 1 }
                      } }
                ],
                "rules": [
                    { "antecedent": { "and": [
                        { "term": { "variable": "stock", "term": "poco" } },
                        { "term": { "variable": "umbral", "term": "exigente" } } ] },
                      "consequents": [ { "variable": "riesgo", "term": "alto" } ] },
                    { "antecedent": { "not": { "term": { "variable": "stock", "term": "poco" } } },
                      "consequents": [ { "variable": "riesgo", "term": "bajo" } ] }
                ]
            }
        }"#;
        let config = AppConfig::load_from_str(json).unwrap();
        let engine = config.build_engine().unwrap();
        assert_eq!(engine.rules().len(), 2);

        let inputs = HashMap::from([("stock".to_string(), 0.0), ("umbral".to_string(), 100.0)]);
        let out = engine.evaluate(&inputs).unwrap();
        assert!(out["riesgo"] > 0.5);
    }

    #[test]
    fn custom_engine_with_bad_reference_fails_to_build() {
        let json = r#"{
            "engine": {
                "variables": [
                    { "name": "riesgo", "role": "consequent",
                      "universe": { "lo": 0, "hi": 1, "step": 0.1 },
                      "terms": { "alto": { "kind": "triangular", "a": 0.5, "b": 1, "c": 1 } } }
                ],
                "rules": [
                    { "antecedent": { "term": { "variable": "stock", "term": "bajo" } },
                      "consequents": [ { "variable": "riesgo", "term": "alto" } ] }
                ]
            }
        }"#;
        let config = AppConfig::load_from_str(json).unwrap();
        assert!(matches!(config.build_engine(), Err(FuzzyError::InvalidParameters(_))));
    }
}
