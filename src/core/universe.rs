//! # Universo de Discurso
//!
//! O [`Universe`] é a grade discreta e uniformemente espaçada sobre a qual
//! as funções de pertinência de uma variável são **amostradas** na agregação
//! e **integradas** na defuzzificação.
//!
//! ```text
//! lo                                      hi
//! ├────┼────┼────┼────┼── ··· ──┼────┼────┤
//! x₀   x₁   x₂   x₃   x₄        xₙ₋₁  xₙ
//!  ←Δ→
//! ```
//!
//! A grade é **fechada**: `[0, 100]` com passo 1 gera 101 amostras.
//! O último ponto é incluído sempre que `hi - lo` for (quase) múltiplo
//! de `Δ`; a tolerância absorve erros de arredondamento como `1.0 / 0.1`.

use serde::{Deserialize, Serialize};

use super::FuzzyError;

/// Tolerância (em número de passos) para decidir se `hi` cai sobre a grade.
const GRID_EPSILON: f64 = 1e-9;

/// Maior número de amostras aceito em um universo.
pub const MAX_SAMPLES: usize = 1_000_000;

/// Limites de um universo, na forma em que aparecem na configuração.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UniverseBounds {
    pub lo: f64,
    pub hi: f64,
    pub step: f64,
}

/// Sequência ordenada e uniformemente espaçada de amostras sobre `[lo, hi]`.
///
/// Invariantes garantidos na construção:
/// - `step > 0`
/// - entre 2 e [`MAX_SAMPLES`] amostras
/// - amostras estritamente crescentes
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UniverseBounds", into = "UniverseBounds")]
pub struct Universe {
    lo: f64,
    hi: f64,
    step: f64,
    samples: Vec<f64>,
}

impl Universe {
    /// Constrói a grade `lo, lo+Δ, …` até `hi` (inclusive quando alinhado).
    pub fn new(lo: f64, hi: f64, step: f64) -> Result<Self, FuzzyError> {
        if !(lo.is_finite() && hi.is_finite() && step.is_finite()) {
            return Err(FuzzyError::invalid(format!(
                "universo com limites não finitos: [{}, {}] passo {}",
                lo, hi, step
            )));
        }
        if step <= 0.0 {
            return Err(FuzzyError::invalid(format!(
                "universo exige passo > 0, recebeu {}",
                step
            )));
        }
        if hi <= lo {
            return Err(FuzzyError::invalid(format!(
                "universo exige lo < hi, recebeu [{}, {}]",
                lo, hi
            )));
        }

        let intervals = ((hi - lo) / step + GRID_EPSILON).floor();
        if intervals < 1.0 {
            return Err(FuzzyError::invalid(format!(
                "universo [{}, {}] com passo {} tem menos de 2 amostras",
                lo, hi, step
            )));
        }
        if intervals >= MAX_SAMPLES as f64 {
            return Err(FuzzyError::invalid(format!(
                "universo [{}, {}] com passo {} excede {} amostras",
                lo, hi, step, MAX_SAMPLES
            )));
        }

        let samples: Vec<f64> = (0..=intervals as usize)
            .map(|i| (lo + i as f64 * step).min(hi))
            .collect();
        if samples.windows(2).any(|w| w[0] >= w[1]) {
            return Err(FuzzyError::invalid(format!(
                "passo {} abaixo da precisão de ponto flutuante em [{}, {}]",
                step, lo, hi
            )));
        }

        Ok(Self {
            lo,
            hi,
            step,
            samples,
        })
    }

    /// Pontos amostrados, em ordem crescente.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Espaçamento `Δ` entre amostras.
    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

}

impl TryFrom<UniverseBounds> for Universe {
    type Error = FuzzyError;

    fn try_from(b: UniverseBounds) -> Result<Self, Self::Error> {
        Universe::new(b.lo, b.hi, b.step)
    }
}

impl From<Universe> for UniverseBounds {
    fn from(u: Universe) -> Self {
        UniverseBounds {
            lo: u.lo,
            hi: u.hi,
            step: u.step,
        }
    }
}
