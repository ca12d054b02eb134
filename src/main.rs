#![allow(dead_code)]
#![allow(rustdoc::broken_intra_doc_links)]
//! # Evaluador de Riesgo — Motor de Inferência Fuzzy
//!
//! **Ponto de entrada principal** do avaliador de risco de estoque.
//!
//! Dado um nível de `stock` e um `umbral` (limiar), o sistema estima um
//! **risco** em `[0, 1]` com inferência fuzzy Mamdani e o classifica em uma
//! faixa qualitativa (`BAJO`, `MEDIO`, `ALTO`, opcionalmente `EXTREMO`).
//!
//! ## Fluxo de Inicialização
//!
//! ```text
//! main()
//!   ├── Configura tracing/logging
//!   ├── Carrega AppConfig (padrão → RIESGO_CONFIG → ambiente)
//!   ├── Constrói o Engine (uma vez, imutável)
//!   ├── Monta RiskAssessor + AppState + Router
//!   └── Inicia servidor TCP (padrão 0.0.0.0:10000)
//! ```
//!
//! ## Exemplo de Uso
//!
//! ```bash
//! # Executar com logs padrão (info)
//! cargo run
//!
//! # Esquema de 4 faixas, precisão 0.01, logs das regras disparadas
//! RIESGO_BANDS=4 RIESGO_STEP=0.01 RUST_LOG=debug cargo run
//! ```

/// Módulo `config` — configuração via arquivo JSON e ambiente.
mod config;

/// Módulo `core` — funções de pertinência, universo, variáveis, erros.
mod core;

/// Módulo `inference` — expressões, regras, defuzzificação e o motor.
mod inference;

/// Módulo `risk` — base de regras stock/umbral/riesgo e faixas qualitativas.
mod risk;

/// Módulo `web` — servidor axum e handlers JSON.
mod web;

use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::risk::RiskAssessor;
use crate::web::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG controla o nível; padrão info.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Evaluador de Riesgo — Starting...");

    let config = AppConfig::load().context("Configuração inválida")?;
    let engine = config.build_engine().context("Falha ao construir o motor fuzzy")?;
    ensure!(
        engine.consequents().any(|v| v.name == risk::RIESGO),
        "o motor configurado não tem a variável consequente '{}'",
        risk::RIESGO
    );

    let bands = config.risk_bands()?;
    tracing::info!(
        bands = bands.bands().len(),
        risk_step = config.risk_step,
        fallback = ?config.degenerate_fallback,
        "Avaliador configurado"
    );

    let assessor = RiskAssessor::new(Arc::new(engine), bands, config.degenerate_fallback);
    let app = web::create_router(AppState {
        assessor: Arc::new(assessor),
    });

    let listener = tokio::net::TcpListener::bind(&config.addr)
        .await
        .with_context(|| format!("Falha ao fazer bind em {}", config.addr))?;
    tracing::info!(addr = %config.addr, "Server running");

    axum::serve(listener, app).await?;

    Ok(())
}
