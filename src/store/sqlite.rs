//! SQLite-backed [`Store`].
//!
//! A single rusqlite `Connection` sits behind a mutex; each query runs on
//! the blocking pool so request tasks never stall the runtime.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use tracing::info;

use super::Store;
use super::migrations;
use crate::error::StoreError;
use crate::models::{ChatExchange, Document, Faq, FaqFilter, FaqUpdate, NewDocument, NewFaq, Setting};

const FAQ_COLUMNS: &str = "id, question, answer, language, category, created_at";

#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish()
    }
}

impl SqliteStore {
    /// Open (or create) the database file and apply migrations.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::InvalidData(format!("cannot create {}: {e}", parent.display())))?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        info!(path = %path.display(), "database opened");
        Self::with_connection(conn)
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn run<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|e| StoreError::Lock(e.to_string()))?;
            f(&guard)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn from_millis(idx: usize, ms: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms).ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, ms))
}

fn row_to_faq(row: &Row<'_>) -> rusqlite::Result<Faq> {
    Ok(Faq {
        id: row.get(0)?,
        question: row.get(1)?,
        answer: row.get(2)?,
        language: row.get(3)?,
        category: row.get(4)?,
        created_at: from_millis(5, row.get(5)?)?,
    })
}

fn row_to_exchange(row: &Row<'_>) -> rusqlite::Result<ChatExchange> {
    Ok(ChatExchange {
        id: row.get(0)?,
        session_id: row.get(1)?,
        user_message: row.get(2)?,
        bot_response: row.get(3)?,
        timestamp: from_millis(4, row.get(4)?)?,
    })
}

fn row_to_document(row: &Row<'_>) -> rusqlite::Result<Document> {
    Ok(Document {
        id: row.get(0)?,
        filename: row.get(1)?,
        content: row.get(2)?,
        upload_date: from_millis(3, row.get(3)?)?,
    })
}

fn select_faq(conn: &Connection, id: i64) -> Result<Faq, StoreError> {
    conn.query_row(
        &format!("SELECT {FAQ_COLUMNS} FROM faqs WHERE id = ?1"),
        params![id],
        row_to_faq,
    )
    .optional()?
    .ok_or_else(|| StoreError::NotFound(format!("FAQ {id}")))
}

#[async_trait]
impl Store for SqliteStore {
    async fn insert_faq(&self, faq: NewFaq) -> Result<Faq, StoreError> {
        self.run(move |conn| {
            let created = now_millis();
            conn.execute(
                "INSERT INTO faqs (question, answer, language, category, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![faq.question, faq.answer, faq.language, faq.category, created],
            )?;
            Ok(Faq {
                id: conn.last_insert_rowid(),
                question: faq.question,
                answer: faq.answer,
                language: faq.language,
                category: faq.category,
                created_at: from_millis(0, created)?,
            })
        })
        .await
    }

    async fn get_faq(&self, id: i64) -> Result<Faq, StoreError> {
        self.run(move |conn| select_faq(conn, id)).await
    }

    async fn list_faqs(&self, filter: FaqFilter) -> Result<Vec<Faq>, StoreError> {
        self.run(move |conn| {
            let mut sql = format!("SELECT {FAQ_COLUMNS} FROM faqs WHERE 1=1");
            let mut args: Vec<String> = Vec::new();
            if let Some(category) = filter.category {
                args.push(category);
                sql.push_str(&format!(" AND category = ?{}", args.len()));
            }
            if let Some(language) = filter.language {
                args.push(language);
                sql.push_str(&format!(" AND language = ?{}", args.len()));
            }
            sql.push_str(" ORDER BY created_at DESC, id DESC");

            let mut stmt = conn.prepare(&sql)?;
            let faqs = stmt
                .query_map(params_from_iter(args.iter()), row_to_faq)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(faqs)
        })
        .await
    }

    async fn recent_faqs(&self, language: &str, limit: usize) -> Result<Vec<Faq>, StoreError> {
        let language = language.to_string();
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.run(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {FAQ_COLUMNS} FROM faqs WHERE language = ?1
                 ORDER BY created_at DESC, id DESC LIMIT ?2"
            ))?;
            let faqs = stmt
                .query_map(params![language, limit], row_to_faq)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(faqs)
        })
        .await
    }

    async fn update_faq(&self, id: i64, update: FaqUpdate) -> Result<Faq, StoreError> {
        self.run(move |conn| {
            let mut faq = select_faq(conn, id)?;
            update.apply(&mut faq);
            conn.execute(
                "UPDATE faqs SET question = ?1, answer = ?2, language = ?3, category = ?4 WHERE id = ?5",
                params![faq.question, faq.answer, faq.language, faq.category, id],
            )?;
            Ok(faq)
        })
        .await
    }

    async fn delete_faq(&self, id: i64) -> Result<(), StoreError> {
        self.run(move |conn| {
            match conn.execute("DELETE FROM faqs WHERE id = ?1", params![id])? {
                0 => Err(StoreError::NotFound(format!("FAQ {id}"))),
                _ => Ok(()),
            }
        })
        .await
    }

    async fn count_faqs(&self) -> Result<u64, StoreError> {
        self.run(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM faqs", [], |row| row.get(0))?;
            Ok(count as u64)
        })
        .await
    }

    async fn list_categories(&self) -> Result<Vec<String>, StoreError> {
        self.run(|conn| {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT category FROM faqs WHERE category IS NOT NULL ORDER BY category",
            )?;
            let categories = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            Ok(categories)
        })
        .await
    }

    async fn insert_chat_exchange(
        &self,
        session_id: &str,
        user_message: &str,
        bot_response: &str,
    ) -> Result<ChatExchange, StoreError> {
        let session_id = session_id.to_string();
        let user_message = user_message.to_string();
        let bot_response = bot_response.to_string();
        self.run(move |conn| {
            let ts = now_millis();
            conn.execute(
                "INSERT INTO chat_history (session_id, user_message, bot_response, timestamp)
                 VALUES (?1, ?2, ?3, ?4)",
                params![session_id, user_message, bot_response, ts],
            )?;
            Ok(ChatExchange {
                id: conn.last_insert_rowid(),
                session_id,
                user_message,
                bot_response,
                timestamp: from_millis(0, ts)?,
            })
        })
        .await
    }

    async fn list_chat_history(&self, session_id: &str) -> Result<Vec<ChatExchange>, StoreError> {
        let session_id = session_id.to_string();
        self.run(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, session_id, user_message, bot_response, timestamp
                 FROM chat_history WHERE session_id = ?1
                 ORDER BY timestamp DESC, id DESC",
            )?;
            let rows = stmt
                .query_map(params![session_id], row_to_exchange)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
    }

    async fn insert_document(&self, document: NewDocument) -> Result<Document, StoreError> {
        self.run(move |conn| {
            let uploaded = now_millis();
            conn.execute(
                "INSERT INTO documents (filename, content, upload_date) VALUES (?1, ?2, ?3)",
                params![document.filename, document.content, uploaded],
            )?;
            Ok(Document {
                id: conn.last_insert_rowid(),
                filename: document.filename,
                content: document.content,
                upload_date: from_millis(0, uploaded)?,
            })
        })
        .await
    }

    async fn list_documents(&self) -> Result<Vec<Document>, StoreError> {
        self.run(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, filename, content, upload_date FROM documents
                 ORDER BY upload_date DESC, id DESC",
            )?;
            let docs = stmt
                .query_map([], row_to_document)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(docs)
        })
        .await
    }

    async fn delete_document(&self, id: i64) -> Result<(), StoreError> {
        self.run(move |conn| {
            match conn.execute("DELETE FROM documents WHERE id = ?1", params![id])? {
                0 => Err(StoreError::NotFound(format!("Document {id}"))),
                _ => Ok(()),
            }
        })
        .await
    }

    async fn get_setting(&self, key: &str) -> Result<Setting, StoreError> {
        let key = key.to_string();
        self.run(move |conn| {
            let value: Option<String> = conn
                .query_row("SELECT value FROM settings WHERE key = ?1", params![key], |row| {
                    row.get(0)
                })
                .optional()?;
            match value {
                Some(value) => Ok(Setting { key, value }),
                None => Err(StoreError::NotFound(format!("Setting '{key}'"))),
            }
        })
        .await
    }

    async fn list_settings(&self) -> Result<Vec<Setting>, StoreError> {
        self.run(|conn| {
            let mut stmt = conn.prepare("SELECT key, value FROM settings ORDER BY key")?;
            let settings = stmt
                .query_map([], |row| {
                    Ok(Setting {
                        key: row.get(0)?,
                        value: row.get(1)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(settings)
        })
        .await
    }

    async fn put_setting(&self, key: &str, value: &str) -> Result<Setting, StoreError> {
        let setting = Setting {
            key: key.to_string(),
            value: value.to_string(),
        };
        self.run(move |conn| {
            conn.execute(
                "INSERT INTO settings (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![setting.key, setting.value],
            )?;
            Ok(setting)
        })
        .await
    }
}
