mod analysis;
mod assist;
mod config;
mod errors;
mod extraction;
mod llm_client;
mod matching;
mod models;
mod routes;
mod session;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::matching::IndustryCatalog;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration first: a missing API key is fatal
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.log_level,
                &config.log_level
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ATS fit API v{}", env!("CARGO_PKG_VERSION"));

    // Industry keyword taxonomy (immutable for the process lifetime)
    let industries = IndustryCatalog::builtin();
    info!("Loaded {} industry profiles", industries.profiles().len());

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone(), config.llm_timeout)?;
    info!(
        "LLM client initialized (model: {}, timeout: {}s, attempts: {})",
        llm_client::MODEL,
        config.llm_timeout.as_secs(),
        config.retry.max_attempts
    );

    // Build app state
    let state = AppState::new(config.clone(), Arc::new(llm), industries);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
