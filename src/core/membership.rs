//! # Funções de Pertinência
//!
//! Uma [`MembershipFunction`] mapeia um valor real para um **grau de
//! pertinência** em `[0, 1]`. É a peça mais básica da lógica fuzzy: diz
//! "quanto" um valor pertence a um termo linguístico como `bajo` ou `alto`.
//!
//! ## Famílias Suportadas
//!
//! | Forma | Parâmetros | Invariante |
//! |-------|------------|------------|
//! | Triangular | `a, b, c` | `a ≤ b ≤ c` |
//! | Trapezoidal | `a, b, c, d` | `a ≤ b ≤ c ≤ d` |
//! | Gaussiana | `mean, sigma` | `sigma > 0` |
//! | Sigmoide | `center, slope` | `slope ≠ 0` |
//!
//! ```text
//!  1 ┤    /\          ____           _--_            ___
//!    │   /  \        /    \         /    \         /
//!  0 ┼──/────\──   _/      \_    __/      \__   __/
//!      triangular  trapezoidal    gaussiana     sigmoide
//! ```
//!
//! ## Exemplo
//!
//! ```rust
//! let medio = MembershipFunction::triangular(20.0, 50.0, 80.0)?;
//! assert_eq!(medio.evaluate(50.0), 1.0);
//! assert_eq!(medio.evaluate(35.0), 0.5);
//! ```
//!
//! A avaliação **nunca falha**: valores fora do suporte retornam 0 (ou o
//! limite assintótico da forma) e o resultado é sempre limitado a `[0, 1]`.

use serde::{Deserialize, Serialize};

use super::FuzzyError;

/// Forma parametrizada de uma função de pertinência.
///
/// Serializada com discriminador `kind`, por exemplo:
///
/// ```json
/// { "kind": "trapezoidal", "a": 0, "b": 0, "c": 10, "d": 30 }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MembershipFunction {
    /// Rampa de `a` até o pico em `b`, descida até `c`.
    Triangular { a: f64, b: f64, c: f64 },
    /// Rampa `[a, b]`, platô em 1 sobre `[b, c]`, descida `[c, d]`.
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
    /// `exp(-(x - mean)² / (2·sigma²))`.
    Gaussian { mean: f64, sigma: f64 },
    /// `1 / (1 + exp(-slope·(x - center)))`.
    Sigmoid { center: f64, slope: f64 },
}

impl MembershipFunction {
    /// Cria uma função triangular, validando `a ≤ b ≤ c`.
    pub fn triangular(a: f64, b: f64, c: f64) -> Result<Self, FuzzyError> {
        let mf = MembershipFunction::Triangular { a, b, c };
        mf.validate()?;
        Ok(mf)
    }

    /// Cria uma função trapezoidal, validando `a ≤ b ≤ c ≤ d`.
    pub fn trapezoidal(a: f64, b: f64, c: f64, d: f64) -> Result<Self, FuzzyError> {
        let mf = MembershipFunction::Trapezoidal { a, b, c, d };
        mf.validate()?;
        Ok(mf)
    }

    /// Cria uma gaussiana. `sigma` deve ser estritamente positivo.
    pub fn gaussian(mean: f64, sigma: f64) -> Result<Self, FuzzyError> {
        let mf = MembershipFunction::Gaussian { mean, sigma };
        mf.validate()?;
        Ok(mf)
    }

    /// Cria uma sigmoide. `slope` negativo espelha a curva (decrescente).
    pub fn sigmoid(center: f64, slope: f64) -> Result<Self, FuzzyError> {
        let mf = MembershipFunction::Sigmoid { center, slope };
        mf.validate()?;
        Ok(mf)
    }

    /// Verifica os invariantes da forma.
    ///
    /// Chamado pelos construtores e novamente na construção do
    /// [`Engine`](crate::inference::Engine), já que formas desserializadas
    /// de configuração não passam pelos construtores.
    pub fn validate(&self) -> Result<(), FuzzyError> {
        let params: Vec<f64> = match self {
            MembershipFunction::Triangular { a, b, c } => vec![*a, *b, *c],
            MembershipFunction::Trapezoidal { a, b, c, d } => vec![*a, *b, *c, *d],
            MembershipFunction::Gaussian { mean, sigma } => vec![*mean, *sigma],
            MembershipFunction::Sigmoid { center, slope } => vec![*center, *slope],
        };
        if params.iter().any(|p| !p.is_finite()) {
            return Err(FuzzyError::invalid(format!(
                "{} com parâmetro não finito: {:?}",
                self.shape_name(),
                params
            )));
        }

        match self {
            MembershipFunction::Triangular { a, b, c } => {
                if !(a <= b && b <= c) {
                    return Err(FuzzyError::invalid(format!(
                        "triangular exige a ≤ b ≤ c, recebeu ({}, {}, {})",
                        a, b, c
                    )));
                }
            }
            MembershipFunction::Trapezoidal { a, b, c, d } => {
                if !(a <= b && b <= c && c <= d) {
                    return Err(FuzzyError::invalid(format!(
                        "trapezoidal exige a ≤ b ≤ c ≤ d, recebeu ({}, {}, {}, {})",
                        a, b, c, d
                    )));
                }
            }
            MembershipFunction::Gaussian { sigma, .. } => {
                if *sigma <= 0.0 {
                    return Err(FuzzyError::invalid(format!(
                        "gaussiana exige sigma > 0, recebeu {}",
                        sigma
                    )));
                }
            }
            MembershipFunction::Sigmoid { slope, .. } => {
                if *slope == 0.0 {
                    return Err(FuzzyError::invalid("sigmoide exige slope ≠ 0"));
                }
            }
        }
        Ok(())
    }

    /// Grau de pertinência de `x`, sempre em `[0, 1]`.
    ///
    /// Entradas `NaN` retornam 0 para manter a garantia de nunca propagar `NaN`.
    pub fn evaluate(&self, x: f64) -> f64 {
        if x.is_nan() {
            return 0.0;
        }

        let degree = match *self {
            MembershipFunction::Triangular { a, b, c } => {
                if x < a || x > c {
                    0.0
                } else if x == b {
                    1.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (c - x) / (c - b)
                }
            }
            MembershipFunction::Trapezoidal { a, b, c, d } => {
                if x < a || x > d {
                    0.0
                } else if x >= b && x <= c {
                    1.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (d - x) / (d - c)
                }
            }
            MembershipFunction::Gaussian { mean, sigma } => {
                (-(x - mean).powi(2) / (2.0 * sigma.powi(2))).exp()
            }
            MembershipFunction::Sigmoid { center, slope } => {
                1.0 / (1.0 + (-slope * (x - center)).exp())
            }
        };

        if degree.is_nan() {
            0.0
        } else {
            degree.clamp(0.0, 1.0)
        }
    }

    fn shape_name(&self) -> &'static str {
        match self {
            MembershipFunction::Triangular { .. } => "triangular",
            MembershipFunction::Trapezoidal { .. } => "trapezoidal",
            MembershipFunction::Gaussian { .. } => "gaussiana",
            MembershipFunction::Sigmoid { .. } => "sigmoide",
        }
    }
}
