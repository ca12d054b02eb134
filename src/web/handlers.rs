//! # Handlers HTTP — Os Endpoints da Aplicação
//!
//! Cada função pública neste módulo é um handler Axum, mapeado a uma
//! rota em [`super::create_router()`]. Todos falam JSON.
//!
//! | Handler | Método | Rota | Uso |
//! |---------|--------|------|-----|
//! | `status` | GET | `/status` | Resumo do motor carregado |
//! | `evaluate_one` | POST | `/evaluar` | Um par stock/umbral (formato legado) |
//! | `evaluate_batch` | POST | `/evaluar/lote` | Lista de itens (ou `{items}`), ordem preservada |
//!
//! ## Exemplo
//!
//! ```bash
//! curl -X POST localhost:10000/evaluar -H 'content-type: application/json' \
//!      -d '{"stock": 10, "umbral": 90}'
//! # {"riesgo":0.8,"riesgo_cualitativo":"ALTO"}
//! ```

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ApiError;
use super::state::AppState;
use crate::risk::{BatchItem, BatchResult, RiskBand};

/// Resposta do endpoint `/status`.
#[derive(Serialize)]
pub struct StatusResponse {
    pub ready: bool,
    pub antecedents: Vec<String>,
    pub consequents: Vec<String>,
    pub rules: usize,
    pub bands: Vec<RiskBand>,
}

/// Corpo de `/evaluar`.
#[derive(Deserialize)]
pub struct SingleRequest {
    pub stock: f64,
    pub umbral: f64,
}

/// Resposta de `/evaluar`, com os nomes de campo do serviço original.
#[derive(Debug, Serialize, Deserialize)]
pub struct SingleResponse {
    pub riesgo: f64,
    pub riesgo_cualitativo: String,
}

/// Corpo de `/evaluar/lote`: lista simples ou envelope `{items}`.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum BatchRequest {
    Items(Vec<BatchItem>),
    Envelope { items: Vec<BatchItem> },
}

/// Resposta de `/evaluar/lote` para o envelope `{items}`.
#[derive(Serialize)]
pub struct BatchResponse {
    pub batch_id: Uuid,
    pub evaluated_at: DateTime<Utc>,
    pub results: Vec<BatchResult>,
}

/// GET `/status` — variáveis, número de regras e faixas em uso.
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let engine = state.assessor.engine();
    Json(StatusResponse {
        ready: true,
        antecedents: engine.antecedents().map(|v| v.name.clone()).collect(),
        consequents: engine.consequents().map(|v| v.name.clone()).collect(),
        rules: engine.rules().len(),
        bands: state.assessor.bands().bands().to_vec(),
    })
}

/// POST `/evaluar` — avalia um único par e devolve `{riesgo, riesgo_cualitativo}`.
///
/// O score é arredondado a 2 casas. Se nenhuma regra disparar (e não houver
/// fallback configurado) responde 422.
pub async fn evaluate_one(
    State(state): State<AppState>,
    Json(req): Json<SingleRequest>,
) -> Result<Json<SingleResponse>, ApiError> {
    let assessment = state.assessor.assess(req.stock, req.umbral)?;
    tracing::info!(
        stock = req.stock,
        umbral = req.umbral,
        riesgo = assessment.score,
        band = %assessment.band,
        "Risco avaliado"
    );
    Ok(Json(SingleResponse {
        riesgo: assessment.rounded(),
        riesgo_cualitativo: assessment.band,
    }))
}

/// POST `/evaluar/lote` — avalia uma lista de itens.
///
/// Uma lista simples recebe de volta a lista de resultados; o envelope
/// `{items}` recebe `{batch_id, evaluated_at, results}`.
///
/// A avaliação roda em `spawn_blocking` (é CPU pura, paralelizada com rayon)
/// para não travar o runtime tokio. Itens com erro não derrubam o lote:
/// trazem o campo `error` na posição correspondente.
pub async fn evaluate_batch(
    State(state): State<AppState>,
    Json(req): Json<BatchRequest>,
) -> Result<Response, ApiError> {
    let batch_id = Uuid::new_v4();
    let (items, enveloped) = match req {
        BatchRequest::Items(items) => (items, false),
        BatchRequest::Envelope { items } => (items, true),
    };
    let count = items.len();
    let assessor = state.assessor.clone();

    let results = tokio::task::spawn_blocking(move || assessor.assess_batch(&items))
        .await
        .map_err(|e| ApiError::Internal(format!("falha na avaliação do lote: {}", e)))?;

    let failed = results.iter().filter(|r| r.error.is_some()).count();
    tracing::info!(%batch_id, items = count, failed, "Lote avaliado");

    if !enveloped {
        return Ok(Json(results).into_response());
    }
    Ok(Json(BatchResponse {
        batch_id,
        evaluated_at: Utc::now(),
        results,
    })
    .into_response())
}
