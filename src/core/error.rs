//! # Erros do Motor Fuzzy
//!
//! Taxonomia única de erros do motor de inferência. Cada variante tem um
//! momento bem definido em que pode ocorrer:
//!
//! | Variante | Quando | Efeito |
//! |----------|--------|--------|
//! | `InvalidParameters` | Construção | O motor não é construído |
//! | `MissingInput` | `evaluate()` | Só a chamada atual falha |
//! | `DegenerateOutput` | `evaluate()` | Nenhuma regra disparou para a variável |
//!
//! Nenhum erro deixa o motor em estado inconsistente: a avaliação nunca
//! altera estruturas compartilhadas.

use thiserror::Error;

/// Erro do motor de inferência fuzzy.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FuzzyError {
    /// Parâmetros de forma, universo ou referências de regra inválidos.
    #[error("parâmetros inválidos: {0}")]
    InvalidParameters(String),

    /// Uma variável antecedente referenciada pelas regras não recebeu valor.
    #[error("entrada ausente para a variável '{variable}'")]
    MissingInput { variable: String },

    /// A agregação da variável consequente tem área total zero.
    #[error("saída degenerada para '{variable}': nenhuma regra disparou")]
    DegenerateOutput { variable: String },
}

impl FuzzyError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        FuzzyError::InvalidParameters(msg.into())
    }
}
