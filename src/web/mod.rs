//! # Módulo Web — Adaptador HTTP do Motor de Risco
//!
//! Camada fina sobre o [`RiskAssessor`](crate::risk::RiskAssessor),
//! construída com **Axum**.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Cliente (JSON)                                          │
//! ├─────────────────────────────────────────────────────────┤
//! │ Axum Router (este módulo) + CORS permissivo             │
//! │  ├── GET  /status        → resumo do motor              │
//! │  ├── POST /evaluar       → {riesgo, riesgo_cualitativo} │
//! │  └── POST /evaluar/lote  → resultados na mesma ordem    │
//! ├─────────────────────────────────────────────────────────┤
//! │ RiskAssessor → Engine (imutável, compartilhado via Arc) │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Submódulos
//!
//! | Módulo | Responsabilidade |
//! |--------|------------------|
//! | [`state`] | Estado compartilhado (`AppState`) |
//! | [`handlers`] | Handlers Axum para cada rota |
//! | [`error`] | Mapeamento de erros para status HTTP |

pub mod error;
pub mod handlers;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use state::AppState;

/// Cria o router Axum com todas as rotas da aplicação.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/status", get(handlers::status))
        .route("/evaluar", post(handlers::evaluate_one))
        .route("/evaluar/lote", post(handlers::evaluate_batch))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
