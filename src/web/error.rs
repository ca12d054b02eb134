//! # Erros HTTP
//!
//! Converte erros do motor em respostas JSON `{ "error": "..." }`:
//!
//! | Erro | Status |
//! |------|--------|
//! | `MissingInput` | 400 |
//! | `DegenerateOutput` | 422 |
//! | `InvalidParameters` / interno | 500 |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::core::FuzzyError;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Erro devolvido pelos handlers.
#[derive(Debug)]
pub enum ApiError {
    Fuzzy(FuzzyError),
    Internal(String),
}

impl From<FuzzyError> for ApiError {
    fn from(e: FuzzyError) -> Self {
        ApiError::Fuzzy(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Fuzzy(e @ FuzzyError::MissingInput { .. }) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::Fuzzy(e @ FuzzyError::DegenerateOutput { .. }) => {
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
            }
            ApiError::Fuzzy(e @ FuzzyError::InvalidParameters(_)) => {
                tracing::error!(error = %e, "Motor mal configurado");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Erro interno");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
