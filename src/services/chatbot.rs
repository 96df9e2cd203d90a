// src/services/chatbot.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, instrument, warn};

use super::responder::ResponseGenerator;
use super::session_manager::{SessionIdGenerator, resolve_session_id};
use crate::error::ValidationError;
use crate::models::{DEFAULT_LANGUAGE, Faq};
use crate::store::Store;

/// Upper bound on FAQs handed to the model as context.
pub const MAX_CONTEXT_FAQS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub response: String,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Most recent FAQs in `language`. Recency only, no relevance ranking.
pub async fn fetch_relevant_faqs(store: &dyn Store, language: &str) -> Vec<Faq> {
    match store.recent_faqs(language, MAX_CONTEXT_FAQS).await {
        Ok(faqs) => faqs,
        Err(e) => {
            warn!(error = %e, language, "could not load FAQs, answering without context");
            Vec::new()
        }
    }
}

/// Runs one chat turn: retrieve FAQs, generate, persist, reply.
#[derive(Clone)]
pub struct ChatService {
    store: Arc<dyn Store>,
    generator: ResponseGenerator,
    session_ids: Arc<dyn SessionIdGenerator>,
}

impl ChatService {
    pub fn new(
        store: Arc<dyn Store>,
        generator: ResponseGenerator,
        session_ids: Arc<dyn SessionIdGenerator>,
    ) -> Self {
        Self {
            store,
            generator,
            session_ids,
        }
    }

    /// Only an empty message is rejected; every other failure still yields an answer.
    #[instrument(skip_all, fields(session_id = tracing::field::Empty))]
    pub async fn handle_message(
        &self,
        message: Option<&str>,
        session_id: Option<&str>,
        language: Option<&str>,
    ) -> Result<ChatReply, ValidationError> {
        // Blank counts as missing, but the text is kept exactly as sent.
        let message = message
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| ValidationError::new("Message is required"))?;

        let session_id = resolve_session_id(session_id, self.session_ids.as_ref());
        tracing::Span::current().record("session_id", session_id.as_str());

        let language = language
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE);

        let faqs = fetch_relevant_faqs(self.store.as_ref(), language).await;
        debug!(language, faq_count = faqs.len(), "retrieved FAQ context");

        let response = self.generator.generate(message, &faqs, language).await;

        if let Err(e) = self
            .store
            .insert_chat_exchange(&session_id, message, &response)
            .await
        {
            error!(error = %e, "failed to store chat history");
        }

        info!(language, "chat turn answered");
        Ok(ChatReply {
            response,
            session_id,
            timestamp: Utc::now(),
        })
    }
}
