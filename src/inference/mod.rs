//! # Módulo Inference — Motor de Inferência Fuzzy (Mamdani)
//!
//! Este módulo contém o **motor de inferência** do avaliador de risco:
//! transforma entradas crisp em saídas crisp passando por regras fuzzy.
//!
//! ## Componentes
//!
//! | Tipo | Papel |
//! |------|-------|
//! | [`RuleExpr`] | Árvore AND/OR/NOT sobre termos antecedentes |
//! | [`Rule`] | Antecedente + consequentes |
//! | [`DefuzzMethod`] | Redução do conjunto agregado a um número |
//! | [`Engine`] | Fuzzifica, dispara, agrega e defuzzifica |
//!
//! ## Exemplo
//!
//! ```text
//! SE stock[bajo] AND umbral[alto] ENTÃO riesgo[alto]
//! stock=10, umbral=90 → força 1.0 → riesgo ≈ 0.80
//! ```
//!
//! Veja [`Engine`] para detalhes.

/// Sub-módulo da árvore de expressões de regra.
pub mod expr;

/// Sub-módulo das regras.
pub mod rule;

/// Sub-módulo dos métodos de defuzzificação.
pub mod defuzzify;

/// Sub-módulo do motor de inferência.
pub mod engine;

pub use defuzzify::DefuzzMethod;
pub use engine::Engine;
pub use expr::RuleExpr;
pub use rule::Rule;
