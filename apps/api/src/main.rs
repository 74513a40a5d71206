mod catalog;
mod config;
mod document;
mod errors;
mod generation;
mod intake;
mod llm_client;
mod routes;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SOW Architect API v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::new(config.clone());
    info!("LLM client initialized (model: {})", state.llm.model());
    if !state.llm.has_default_key() {
        warn!("GEMINI_API_KEY is not set; generate requests must supply api_key");
    }

    if state.catalog.assets_dir().is_dir() {
        info!("Serving diagrams from {}", state.catalog.assets_dir().display());
    } else {
        warn!(
            "Assets directory {} does not exist; diagrams and logos will be omitted",
            state.catalog.assets_dir().display()
        );
    }

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the form front-end has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
