// src/services/session_manager.rs
use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Source of fresh session identifiers.
pub trait SessionIdGenerator: Send + Sync + Debug {
    fn generate(&self) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UuidSessionIds;

impl SessionIdGenerator for UuidSessionIds {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// `{prefix}-1`, `{prefix}-2`, ... for reproducible runs.
#[derive(Debug)]
pub struct SequentialSessionIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialSessionIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl SessionIdGenerator for SequentialSessionIds {
    fn generate(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", self.prefix, n)
    }
}

/// Keep a caller-supplied id unless it is blank.
pub fn resolve_session_id(supplied: Option<&str>, ids: &dyn SessionIdGenerator) -> String {
    match supplied {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => ids.generate(),
    }
}
