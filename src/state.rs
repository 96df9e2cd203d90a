// src/state.rs
use std::sync::Arc;

use crate::config::Config;
use crate::services::chatbot::ChatService;
use crate::services::llm::{LanguageModel, OpenAiClient};
use crate::services::responder::ResponseGenerator;
use crate::services::session_manager::{SessionIdGenerator, UuidSessionIds};
use crate::store::Store;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub chat: ChatService,
    pub admin_api_key: Option<String>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        model: Arc<dyn LanguageModel>,
        session_ids: Arc<dyn SessionIdGenerator>,
        admin_api_key: Option<String>,
    ) -> Self {
        let chat = ChatService::new(
            Arc::clone(&store),
            ResponseGenerator::new(model),
            session_ids,
        );
        Self {
            store,
            chat,
            admin_api_key,
        }
    }

    /// Production wiring: OpenAI client and random session ids.
    pub fn from_config(config: &Config, store: Arc<dyn Store>) -> Self {
        let client = OpenAiClient::new(&config.llm);
        if !client.is_configured() {
            tracing::warn!("OPENAI_API_KEY not set, every chat turn will use keyword fallback");
        }
        Self::new(
            store,
            Arc::new(client),
            Arc::new(UuidSessionIds),
            config.admin_api_key.clone(),
        )
    }
}
