// src/store/memory.rs
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::Store;
use crate::error::StoreError;
use crate::models::{ChatExchange, Document, Faq, FaqFilter, FaqUpdate, NewDocument, NewFaq, Setting};

#[derive(Default)]
struct Tables {
    faqs: Vec<Faq>,
    history: Vec<ChatExchange>,
    documents: Vec<Document>,
    settings: BTreeMap<String, String>,
    last_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

/// Volatile [`Store`] used by tests. Rows are kept in insertion order,
/// so "newest first" is simply reverse order.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Tables>>,
}

impl Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore").finish()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn insert_faq(&self, faq: NewFaq) -> Result<Faq, StoreError> {
        let mut guard = self.inner.write().await;
        let faq = Faq {
            id: guard.next_id(),
            question: faq.question,
            answer: faq.answer,
            language: faq.language,
            category: faq.category,
            created_at: Utc::now(),
        };
        guard.faqs.push(faq.clone());
        Ok(faq)
    }

    async fn get_faq(&self, id: i64) -> Result<Faq, StoreError> {
        let guard = self.inner.read().await;
        guard
            .faqs
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("FAQ {id}")))
    }

    async fn list_faqs(&self, filter: FaqFilter) -> Result<Vec<Faq>, StoreError> {
        let guard = self.inner.read().await;
        Ok(guard.faqs.iter().rev().filter(|f| filter.matches(f)).cloned().collect())
    }

    async fn recent_faqs(&self, language: &str, limit: usize) -> Result<Vec<Faq>, StoreError> {
        let guard = self.inner.read().await;
        Ok(guard
            .faqs
            .iter()
            .rev()
            .filter(|f| f.language == language)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn update_faq(&self, id: i64, update: FaqUpdate) -> Result<Faq, StoreError> {
        let mut guard = self.inner.write().await;
        let faq = guard
            .faqs
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("FAQ {id}")))?;
        update.apply(faq);
        Ok(faq.clone())
    }

    async fn delete_faq(&self, id: i64) -> Result<(), StoreError> {
        let mut guard = self.inner.write().await;
        let before = guard.faqs.len();
        guard.faqs.retain(|f| f.id != id);
        if guard.faqs.len() == before {
            return Err(StoreError::NotFound(format!("FAQ {id}")));
        }
        Ok(())
    }

    async fn count_faqs(&self) -> Result<u64, StoreError> {
        Ok(self.inner.read().await.faqs.len() as u64)
    }

    async fn list_categories(&self) -> Result<Vec<String>, StoreError> {
        let guard = self.inner.read().await;
        let categories: BTreeSet<String> =
            guard.faqs.iter().filter_map(|f| f.category.clone()).collect();
        Ok(categories.into_iter().collect())
    }

    async fn insert_chat_exchange(
        &self,
        session_id: &str,
        user_message: &str,
        bot_response: &str,
    ) -> Result<ChatExchange, StoreError> {
        let mut guard = self.inner.write().await;
        let exchange = ChatExchange {
            id: guard.next_id(),
            session_id: session_id.to_string(),
            user_message: user_message.to_string(),
            bot_response: bot_response.to_string(),
            timestamp: Utc::now(),
        };
        guard.history.push(exchange.clone());
        Ok(exchange)
    }

    async fn list_chat_history(&self, session_id: &str) -> Result<Vec<ChatExchange>, StoreError> {
        let guard = self.inner.read().await;
        Ok(guard
            .history
            .iter()
            .rev()
            .filter(|e| e.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn insert_document(&self, document: NewDocument) -> Result<Document, StoreError> {
        let mut guard = self.inner.write().await;
        let document = Document {
            id: guard.next_id(),
            filename: document.filename,
            content: document.content,
            upload_date: Utc::now(),
        };
        guard.documents.push(document.clone());
        Ok(document)
    }

    async fn list_documents(&self) -> Result<Vec<Document>, StoreError> {
        Ok(self.inner.read().await.documents.iter().rev().cloned().collect())
    }

    async fn delete_document(&self, id: i64) -> Result<(), StoreError> {
        let mut guard = self.inner.write().await;
        let before = guard.documents.len();
        guard.documents.retain(|d| d.id != id);
        if guard.documents.len() == before {
            return Err(StoreError::NotFound(format!("Document {id}")));
        }
        Ok(())
    }

    async fn get_setting(&self, key: &str) -> Result<Setting, StoreError> {
        let guard = self.inner.read().await;
        guard
            .settings
            .get(key)
            .map(|value| Setting {
                key: key.to_string(),
                value: value.clone(),
            })
            .ok_or_else(|| StoreError::NotFound(format!("Setting '{key}'")))
    }

    async fn list_settings(&self) -> Result<Vec<Setting>, StoreError> {
        let guard = self.inner.read().await;
        Ok(guard
            .settings
            .iter()
            .map(|(key, value)| Setting {
                key: key.clone(),
                value: value.clone(),
            })
            .collect())
    }

    async fn put_setting(&self, key: &str, value: &str) -> Result<Setting, StoreError> {
        let mut guard = self.inner.write().await;
        guard.settings.insert(key.to_string(), value.to_string());
        Ok(Setting {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}
