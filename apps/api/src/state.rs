use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::llm_client::{LlmClient, TokioSleeper};
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    /// Read-only use-case reference data rooted at `config.assets_dir`.
    pub catalog: Catalog,
    pub sessions: SessionStore,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let llm = LlmClient::new(
            config.gemini_api_base.clone(),
            config.gemini_model.clone(),
            config.gemini_api_key.clone(),
            Arc::new(TokioSleeper),
        );
        Self {
            llm,
            catalog: Catalog::new(config.assets_dir.clone()),
            sessions: SessionStore::new(config.session_idle_ttl),
            config,
        }
    }
}
