// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faq {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub language: String,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewFaq {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl NewFaq {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        category: Option<&str>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            language: language.into(),
            category: category.map(str::to_string),
        }
    }

    /// Question and answer must both carry text.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.question.trim().is_empty() || self.answer.trim().is_empty() {
            return Err(ValidationError::new("Question and answer are required"));
        }
        Ok(())
    }
}

/// Fields left as `None` keep their stored value. `category` is tri-state:
/// absent keeps it, `null` clears it, a string replaces it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FaqUpdate {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub language: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub category: Option<Option<String>>,
}

impl FaqUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let blank = |v: &Option<String>| v.as_deref().is_some_and(|s| s.trim().is_empty());
        if blank(&self.question) || blank(&self.answer) {
            return Err(ValidationError::new("Question and answer cannot be empty"));
        }
        Ok(())
    }

    pub fn apply(&self, faq: &mut Faq) {
        if let Some(q) = &self.question {
            faq.question = q.clone();
        }
        if let Some(a) = &self.answer {
            faq.answer = a.clone();
        }
        if let Some(l) = &self.language {
            faq.language = l.clone();
        }
        if let Some(c) = &self.category {
            faq.category = c.clone();
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FaqFilter {
    pub category: Option<String>,
    pub language: Option<String>,
}

impl FaqFilter {
    /// Treat `?category=` the same as an absent parameter.
    pub fn normalized(self) -> Self {
        let keep = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            category: keep(self.category),
            language: keep(self.language),
        }
    }

    pub fn matches(&self, faq: &Faq) -> bool {
        let category_ok = match &self.category {
            Some(c) => faq.category.as_deref() == Some(c.as_str()),
            None => true,
        };
        let language_ok = match &self.language {
            Some(l) => &faq.language == l,
            None => true,
        };
        category_ok && language_ok
    }
}

/// One persisted chat turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatExchange {
    pub id: i64,
    pub session_id: String,
    pub user_message: String,
    pub bot_response: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub filename: String,
    pub content: Option<String>,
    pub upload_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewDocument {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl NewDocument {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.filename.trim().is_empty() {
            return Err(ValidationError::new("Filename is required"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

// Wraps whatever was sent, `null` included, so it differs from an absent field.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
