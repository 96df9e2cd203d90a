//! Persistent storage for FAQs, chat transcripts, uploaded documents and
//! settings.
//!
//! Every component receives the store as an injected `Arc<dyn Store>`;
//! [`SqliteStore`] backs the running server and [`InMemoryStore`] stands in
//! for it in tests.

pub mod memory;
pub mod migrations;
pub mod seed;
pub mod sqlite;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{ChatExchange, Document, Faq, FaqFilter, FaqUpdate, NewDocument, NewFaq, Setting};

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_faq(&self, faq: NewFaq) -> Result<Faq, StoreError>;

    async fn get_faq(&self, id: i64) -> Result<Faq, StoreError>;

    /// Newest first.
    async fn list_faqs(&self, filter: FaqFilter) -> Result<Vec<Faq>, StoreError>;

    /// The `limit` newest FAQs in `language`, newest first.
    async fn recent_faqs(&self, language: &str, limit: usize) -> Result<Vec<Faq>, StoreError>;

    async fn update_faq(&self, id: i64, update: FaqUpdate) -> Result<Faq, StoreError>;

    async fn delete_faq(&self, id: i64) -> Result<(), StoreError>;

    async fn count_faqs(&self) -> Result<u64, StoreError>;

    /// Distinct non-null categories, sorted.
    async fn list_categories(&self) -> Result<Vec<String>, StoreError>;

    async fn insert_chat_exchange(
        &self,
        session_id: &str,
        user_message: &str,
        bot_response: &str,
    ) -> Result<ChatExchange, StoreError>;

    /// Newest first.
    async fn list_chat_history(&self, session_id: &str) -> Result<Vec<ChatExchange>, StoreError>;

    async fn insert_document(&self, document: NewDocument) -> Result<Document, StoreError>;

    async fn list_documents(&self) -> Result<Vec<Document>, StoreError>;

    async fn delete_document(&self, id: i64) -> Result<(), StoreError>;

    async fn get_setting(&self, key: &str) -> Result<Setting, StoreError>;

    async fn list_settings(&self) -> Result<Vec<Setting>, StoreError>;

    /// Inserts or overwrites.
    async fn put_setting(&self, key: &str, value: &str) -> Result<Setting, StoreError>;
}
