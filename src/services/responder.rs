//! Turns one user message plus retrieved FAQs into the text shown to the user.

use std::sync::Arc;

use tracing::warn;

use super::fallback::generate_fallback;
use super::llm::{CompletionRequest, LanguageModel};
use crate::models::Faq;

pub const MAX_OUTPUT_TOKENS: u32 = 500;
pub const TEMPERATURE: f32 = 0.7;

/// FAQs rendered as `Q:/A:/Category:` blocks, blank-line separated, in input order.
pub fn build_context(faqs: &[Faq]) -> String {
    faqs.iter()
        .map(|faq| {
            format!(
                "Q: {}\nA: {}\nCategory: {}",
                faq.question,
                faq.answer,
                faq.category.as_deref().unwrap_or("")
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn build_system_prompt(context: &str, language: &str) -> String {
    format!(
        "You are a helpful UNICEF child protection assistant providing information and support for families in Gaza.
You should provide accurate, compassionate, and practical advice based on available resources and services.

IMPORTANT GUIDELINES:
- Always prioritize child safety and well-being
- Provide specific, actionable information
- Include relevant contact information when available
- Be sensitive to the trauma and stress families may be experiencing
- If you cannot help, direct them to appropriate professional services
- Keep responses concise but comprehensive
- Use {language} for your response

Available resources and FAQs:
{context}"
    )
}

#[derive(Clone)]
pub struct ResponseGenerator {
    model: Arc<dyn LanguageModel>,
}

impl ResponseGenerator {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Never fails: any model error degrades to the keyword fallback.
    pub async fn generate(&self, msg: &str, faqs: &[Faq], language: &str) -> String {
        let request = CompletionRequest {
            system: build_system_prompt(&build_context(faqs), language),
            user: msg.to_string(),
            max_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
        };

        match self.model.complete(request).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "language model unavailable, using keyword fallback");
                generate_fallback(msg, faqs)
            }
        }
    }
}
