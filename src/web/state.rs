//! # Estado da Aplicação Web
//!
//! O motor é construído uma única vez na inicialização e compartilhado
//! entre os handlers via `Arc`. Como o [`Engine`](crate::inference::Engine)
//! é imutável, não há lock nenhum aqui.

use std::sync::Arc;

use crate::risk::RiskAssessor;

/// Estado compartilhado da aplicação Axum.
#[derive(Clone)]
pub struct AppState {
    /// Avaliador de risco (motor + faixas + fallback).
    pub assessor: Arc<RiskAssessor>,
}
