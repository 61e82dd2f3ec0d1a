use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionProvider;
use crate::matching::IndustryCatalog;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Generative-text backend. Production: `LlmClient`; tests swap in stubs.
    pub llm: Arc<dyn CompletionProvider>,
    pub config: Config,
    /// Immutable industry keyword taxonomy, built once at startup.
    pub industries: Arc<IndustryCatalog>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config, llm: Arc<dyn CompletionProvider>, industries: IndustryCatalog) -> Self {
        let sessions = SessionStore::new(config.session_ttl);
        Self {
            llm,
            config,
            industries: Arc::new(industries),
            sessions,
        }
    }
}

/// State with default configuration around the given provider.
#[cfg(test)]
pub fn test_state(llm: Arc<dyn CompletionProvider>) -> AppState {
    let config = Config::from_lookup(|key| {
        (key == "ANTHROPIC_API_KEY").then(|| "sk-test".to_string())
    })
    .expect("test config");
    AppState::new(config, llm, IndustryCatalog::builtin())
}
