//! # Módulo Core — Blocos Fundamentais da Lógica Fuzzy
//!
//! Este módulo agrupa os **tipos fundamentais** sobre os quais o motor de
//! inferência é construído:
//!
//! - [`MembershipFunction`] — Grau de pertinência de um valor a um termo
//! - [`Universe`] — Grade discreta onde conjuntos fuzzy são amostrados
//! - [`FuzzyVariable`] — Variável linguística (antecedente ou consequente)
//! - [`FuzzyError`] — Taxonomia de erros do motor
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use crate::core::{FuzzyVariable, MembershipFunction, Universe};
//!
//! let mut umbral = FuzzyVariable::antecedent("umbral", Universe::new(0.0, 100.0, 1.0)?);
//! umbral.add_term("alto", MembershipFunction::trapezoidal(60.0, 80.0, 100.0, 100.0)?)?;
//! ```

/// Sub-módulo com o enum de erros [`FuzzyError`].
pub mod error;

/// Sub-módulo com as funções de pertinência.
pub mod membership;

/// Sub-módulo com o universo de discurso discretizado.
pub mod universe;

/// Sub-módulo com [`FuzzyVariable`] e [`VariableRole`].
pub mod variable;

pub use error::FuzzyError;
pub use membership::MembershipFunction;
pub use universe::{Universe, UniverseBounds};
pub use variable::{FuzzyVariable, VariableRole};
