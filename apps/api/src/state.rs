use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::history::HistoryStore;
use crate::interview::session::Session;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum
/// extractors.
///
/// The trainer is single-user: one session slot, replaced wholesale by each
/// `start`. LLM awaits happen outside the slot's lock, so a re-entrant
/// start racing an in-flight generation resolves last-write-wins.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// `None` when no API key is configured; the question source then runs
    /// purely from the static bank.
    pub llm: Option<LlmClient>,
    pub history: Arc<HistoryStore>,
    pub session: Arc<RwLock<Option<Session>>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let llm = config
            .anthropic_api_key
            .clone()
            .map(LlmClient::new);
        let history = Arc::new(HistoryStore::open(&config.history_path));
        Self {
            config,
            llm,
            history,
            session: Arc::new(RwLock::new(None)),
        }
    }
}
