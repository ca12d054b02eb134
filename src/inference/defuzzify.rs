//! # Defuzzificação
//!
//! Reduz o conjunto agregado de uma variável consequente a **um valor
//! crisp**. O padrão é o **centroide** (centro de área) discretizado:
//!
//! ```text
//!            Σ xᵢ · μᵢ · Δ
//! output = ─────────────────
//!             Σ μᵢ · Δ
//! ```
//!
//! Outros métodos disponíveis (por variável, via configuração):
//!
//! | Método | Resultado |
//! |--------|-----------|
//! | `centroid` | Centro de área |
//! | `bisector` | Primeira amostra onde a área acumulada atinge metade do total |
//! | `mean_of_maximum` | Média das amostras com grau máximo |
//! | `smallest_of_maximum` | Menor amostra com grau máximo |
//! | `largest_of_maximum` | Maior amostra com grau máximo |
//!
//! Todos falham com `DegenerateOutput` quando a área total é zero. O motor
//! nunca inventa um valor padrão — o chamador decide o fallback.

use serde::{Deserialize, Serialize};

use crate::core::{FuzzyError, Universe};

/// Método de defuzzificação de uma variável consequente.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefuzzMethod {
    #[default]
    Centroid,
    Bisector,
    MeanOfMaximum,
    SmallestOfMaximum,
    LargestOfMaximum,
}

impl DefuzzMethod {
    /// Defuzzifica `membership` (um grau por amostra de `universe`).
    pub fn defuzzify(
        self,
        universe: &Universe,
        membership: &[f64],
        variable: &str,
    ) -> Result<f64, FuzzyError> {
        debug_assert_eq!(universe.len(), membership.len());

        let dx = universe.step();
        let area: f64 = membership.iter().map(|mu| mu * dx).sum();
        if area <= 0.0 {
            return Err(FuzzyError::DegenerateOutput {
                variable: variable.to_string(),
            });
        }

        let xs = universe.samples();
        match self {
            DefuzzMethod::Centroid => {
                let moment: f64 = xs
                    .iter()
                    .zip(membership)
                    .map(|(x, mu)| x * mu * dx)
                    .sum();
                Ok(moment / area)
            }
            DefuzzMethod::Bisector => {
                let half = area / 2.0;
                let mut acc = 0.0;
                for (x, mu) in xs.iter().zip(membership) {
                    acc += mu * dx;
                    if acc >= half {
                        return Ok(*x);
                    }
                }
                // Inalcançável com área > 0; arredondamento pode deixar acc levemente abaixo.
                Ok(xs[xs.len() - 1])
            }
            DefuzzMethod::MeanOfMaximum
            | DefuzzMethod::SmallestOfMaximum
            | DefuzzMethod::LargestOfMaximum => {
                let peak = membership.iter().copied().fold(0.0, f64::max);
                let at_peak: Vec<f64> = xs
                    .iter()
                    .zip(membership)
                    .filter(|(_, mu)| **mu == peak)
                    .map(|(x, _)| *x)
                    .collect();
                // área > 0 garante ao menos uma amostra no pico
                let value = match self {
                    DefuzzMethod::MeanOfMaximum => {
                        at_peak.iter().sum::<f64>() / at_peak.len() as f64
                    }
                    DefuzzMethod::SmallestOfMaximum => at_peak[0],
                    _ => at_peak[at_peak.len() - 1],
                };
                Ok(value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Universe {
        Universe::new(0.0, 10.0, 1.0).unwrap()
    }

    #[test]
    fn centroid_of_symmetric_triangle_is_peak() {
        let mut mu = vec![0.0; 11];
        mu[3] = 0.5;
        mu[4] = 1.0;
        mu[5] = 0.5;
        let c = DefuzzMethod::Centroid.defuzzify(&grid(), &mu, "y").unwrap();
        assert!((c - 4.0).abs() < 1e-12);
    }

    #[test]
    fn centroid_of_flat_set_is_midpoint() {
        let mu = vec![0.3; 11];
        let c = DefuzzMethod::Centroid.defuzzify(&grid(), &mu, "y").unwrap();
        assert!((c - 5.0).abs() < 1e-12);
    }

    #[test]
    fn maximum_family() {
        let mut mu = vec![0.0; 11];
        mu[2] = 0.4;
        mu[6] = 0.9;
        mu[7] = 0.9;
        mu[8] = 0.9;
        let u = grid();
        assert_eq!(DefuzzMethod::SmallestOfMaximum.defuzzify(&u, &mu, "y").unwrap(), 6.0);
        assert_eq!(DefuzzMethod::LargestOfMaximum.defuzzify(&u, &mu, "y").unwrap(), 8.0);
        assert_eq!(DefuzzMethod::MeanOfMaximum.defuzzify(&u, &mu, "y").unwrap(), 7.0);
    }

    #[test]
    fn bisector_splits_area() {
        let mu = vec![1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        assert_eq!(DefuzzMethod::Bisector.defuzzify(&grid(), &mu, "y").unwrap(), 1.0);
    }

    #[test]
    fn zero_area_is_degenerate_for_every_method() {
        let mu = vec![0.0; 11];
        for method in [
            DefuzzMethod::Centroid,
            DefuzzMethod::Bisector,
            DefuzzMethod::MeanOfMaximum,
            DefuzzMethod::SmallestOfMaximum,
            DefuzzMethod::LargestOfMaximum,
        ] {
            assert_eq!(
                method.defuzzify(&grid(), &mu, "riesgo"),
                Err(FuzzyError::DegenerateOutput {
                    variable: "riesgo".into()
                })
            );
        }
    }
}
