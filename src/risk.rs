//! # Avaliação de Risco — Stock × Umbral
//!
//! Camada de domínio sobre o [`Engine`]: monta a base de regras de
//! referência (`stock`, `umbral` → `riesgo`), converte o risco crisp em uma
//! **faixa qualitativa** e avalia lotes de itens preservando a ordem.
//!
//! ## Base de Referência
//!
//! ```text
//!             umbral
//!           bajo    medio   alto
//! stock ┌────────┬────────┬────────┐
//!  bajo │ medio  │ alto   │ alto   │
//! medio │   —    │ medio  │ alto   │
//!  alto │ bajo   │ medio  │ medio  │
//!       └────────┴────────┴────────┘
//! ```
//!
//! A célula `stock medio × umbral bajo` não tem regra: entradas que caem
//! inteiramente nela produzem `DegenerateOutput`. O [`RiskAssessor`] decide
//! o que fazer (erro no item ou score de fallback configurado).
//!
//! ## Faixas Qualitativas
//!
//! | Esquema | Cortes |
//! |---------|--------|
//! | 3 faixas | `BAJO < 0.4 ≤ MEDIO < 0.7 ≤ ALTO` |
//! | 4 faixas | `BAJO < 0.4 ≤ MEDIO < 0.7 ≤ ALTO < 0.83 ≤ EXTREMO` |

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{bail, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::{FuzzyError, FuzzyVariable, MembershipFunction, Universe};
use crate::inference::{Engine, Rule, RuleExpr};

pub const STOCK: &str = "stock";
pub const UMBRAL: &str = "umbral";
pub const RIESGO: &str = "riesgo";

/// Esquema de faixas pré-definido.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandScheme {
    #[default]
    Three,
    Four,
}

/// Uma faixa: vale para scores `≥ lower` até o corte da próxima.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskBand {
    pub label: String,
    pub lower: f64,
}

/// Cortes ordenados que mapeiam um score crisp para um rótulo.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RiskBands(Vec<RiskBand>);

impl RiskBands {
    /// Valida e cria as faixas. Os cortes precisam ser estritamente crescentes.
    pub fn new(bands: Vec<RiskBand>) -> Result<Self> {
        if bands.is_empty() {
            bail!("é preciso ao menos uma faixa de risco");
        }
        for band in &bands {
            if !band.lower.is_finite() || band.label.trim().is_empty() {
                bail!("faixa inválida: {:?}", band);
            }
        }
        if bands.windows(2).any(|w| w[0].lower >= w[1].lower) {
            bail!("cortes das faixas devem ser estritamente crescentes");
        }
        Ok(Self(bands))
    }

    pub fn from_scheme(scheme: BandScheme) -> Self {
        let mut cuts = vec![("BAJO", 0.0), ("MEDIO", 0.4), ("ALTO", 0.7)];
        if scheme == BandScheme::Four {
            cuts.push(("EXTREMO", 0.83));
        }
        Self(
            cuts.into_iter()
                .map(|(label, lower)| RiskBand {
                    label: label.to_string(),
                    lower,
                })
                .collect(),
        )
    }

    /// Rótulo da faixa que contém `score`. Abaixo do primeiro corte vale a primeira faixa.
    pub fn classify(&self, score: f64) -> &str {
        self.0
            .iter()
            .rev()
            .find(|band| score >= band.lower)
            .unwrap_or(&self.0[0])
            .label
            .as_str()
    }

    pub fn bands(&self) -> &[RiskBand] {
        &self.0
    }
}

/// Três termos simétricos (`bajo`, `medio`, `alto`) sobre `[0, 100]`.
fn level_variable(name: &str) -> Result<FuzzyVariable, FuzzyError> {
    let mut var = FuzzyVariable::antecedent(name, Universe::new(0.0, 100.0, 1.0)?);
    var.add_term("bajo", MembershipFunction::trapezoidal(0.0, 0.0, 10.0, 30.0)?)?
        .add_term("medio", MembershipFunction::triangular(20.0, 50.0, 80.0)?)?
        .add_term("alto", MembershipFunction::trapezoidal(60.0, 80.0, 100.0, 100.0)?)?;
    Ok(var)
}

/// Variáveis da configuração de referência. `risk_step` é a precisão do universo de `riesgo`.
pub fn reference_variables(risk_step: f64) -> Result<Vec<FuzzyVariable>, FuzzyError> {
    let mut riesgo = FuzzyVariable::consequent(RIESGO, Universe::new(0.0, 1.0, risk_step)?);
    riesgo
        .add_term("bajo", MembershipFunction::triangular(0.0, 0.2, 0.4)?)?
        .add_term("medio", MembershipFunction::triangular(0.3, 0.5, 0.7)?)?
        .add_term("alto", MembershipFunction::triangular(0.6, 0.8, 1.0)?)?;

    Ok(vec![level_variable(STOCK)?, level_variable(UMBRAL)?, riesgo])
}

/// As oito regras da tabela do cabeçalho do módulo.
pub fn reference_rules() -> Vec<Rule> {
    let when = |stock: &str, umbral: &str, riesgo: &str| {
        Rule::new(
            RuleExpr::and(RuleExpr::term(STOCK, stock), RuleExpr::term(UMBRAL, umbral)),
            RIESGO,
            riesgo,
        )
    };
    vec![
        when("bajo", "alto", "alto"),
        when("medio", "medio", "medio"),
        when("alto", "bajo", "bajo"),
        when("medio", "alto", "alto"),
        when("bajo", "medio", "alto"),
        when("alto", "alto", "medio"),
        when("alto", "medio", "medio"),
        when("bajo", "bajo", "medio"),
    ]
}

/// Motor de referência pronto para uso.
pub fn reference_engine(risk_step: f64) -> Result<Engine, FuzzyError> {
    Engine::build(reference_variables(risk_step)?, reference_rules())
}

/// Resultado da avaliação de um único par (stock, umbral).
#[derive(Clone, Debug, PartialEq)]
pub struct Assessment {
    /// Valor crisp sem arredondamento.
    pub score: f64,
    /// Faixa qualitativa (ex: `"MEDIO"`).
    pub band: String,
}

impl Assessment {
    /// Score arredondado a 2 casas, como exposto na API.
    pub fn rounded(&self) -> f64 {
        round2(self.score)
    }
}

/// Item de entrada de um lote.
#[derive(Clone, Debug, Deserialize)]
pub struct BatchItem {
    #[serde(default)]
    pub label: Option<String>,
    pub stock: f64,
    pub umbral: f64,
}

/// Item de saída de um lote, na mesma posição do item de entrada.
///
/// Itens que falharam trazem `error` e `risk_score`/`band` nulos.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BatchResult {
    pub label: Option<String>,
    pub risk_score: Option<f64>,
    pub band: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Avaliador de risco: motor compartilhado + faixas + política de fallback.
#[derive(Clone)]
pub struct RiskAssessor {
    engine: Arc<Engine>,
    bands: RiskBands,
    /// Score usado quando nenhuma regra dispara. `None` → o item falha.
    fallback: Option<f64>,
}

impl RiskAssessor {
    pub fn new(engine: Arc<Engine>, bands: RiskBands, fallback: Option<f64>) -> Self {
        Self {
            engine,
            bands,
            fallback,
        }
    }

    /// Avalia um par (stock, umbral).
    ///
    /// # Erros
    ///
    /// - `MissingInput` se o motor configurado exige outras variáveis
    /// - `DegenerateOutput` se nenhuma regra disparou para `riesgo` e não há fallback
    ///
    /// Outras consequentes do motor não entram no cálculo.
    pub fn assess(&self, stock: f64, umbral: f64) -> Result<Assessment, FuzzyError> {
        let inputs = HashMap::from([(STOCK.to_string(), stock), (UMBRAL.to_string(), umbral)]);

        let score = match self.engine.evaluate_variable(&inputs, RIESGO) {
            Ok(score) => score,
            Err(FuzzyError::DegenerateOutput { variable }) => match self.fallback {
                Some(value) => {
                    tracing::warn!(stock, umbral, fallback = value, "Nenhuma regra disparou, usando fallback");
                    value
                }
                None => {
                    tracing::warn!(stock, umbral, "Nenhuma regra disparou");
                    return Err(FuzzyError::DegenerateOutput { variable });
                }
            },
            Err(e) => return Err(e),
        };

        Ok(Assessment {
            score,
            band: self.bands.classify(score).to_string(),
        })
    }

    /// Avalia um lote em paralelo; a saída tem a mesma ordem da entrada.
    pub fn assess_batch(&self, items: &[BatchItem]) -> Vec<BatchResult> {
        items
            .par_iter()
            .map(|item| match self.assess(item.stock, item.umbral) {
                Ok(a) => BatchResult {
                    label: item.label.clone(),
                    risk_score: Some(a.rounded()),
                    band: Some(a.band),
                    error: None,
                },
                Err(e) => BatchResult {
                    label: item.label.clone(),
                    risk_score: None,
                    band: None,
                    error: Some(e.to_string()),
                },
            })
            .collect()
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn bands(&self) -> &RiskBands {
        &self.bands
    }
}

/// Arredonda a 2 casas decimais.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
