// src/services/fallback.rs
use crate::models::Faq;

/// Keyword to FAQ category, checked in this order for every candidate FAQ.
pub const KEYWORD_CATEGORIES: &[(&str, &str)] = &[
    ("emergency", "emergency_services"),
    ("medical", "health_services"),
    ("legal", "legal_support"),
    ("education", "education"),
];

pub const SAFETY_REDIRECT: &str = "I understand you're looking for help. Please contact UNICEF emergency services or your local child protection authorities for immediate assistance. If you have a specific question about child protection services, please try rephrasing it.";

/// Categories whose keyword appears in the message, in table order.
pub fn detect_categories(msg: &str) -> Vec<&'static str> {
    let msg_lower = msg.to_lowercase();
    KEYWORD_CATEGORIES
        .iter()
        .filter(|(keyword, _)| msg_lower.contains(keyword))
        .map(|(_, category)| *category)
        .collect()
}

/// Offline answer used when the language model is unavailable.
///
/// Walks `faqs` in order and returns the answer of the first one whose
/// category was triggered by a keyword in `msg`. Falls back to
/// [`SAFETY_REDIRECT`].
pub fn generate_fallback(msg: &str, faqs: &[Faq]) -> String {
    let wanted = detect_categories(msg);
    if wanted.is_empty() {
        return SAFETY_REDIRECT.to_string();
    }

    faqs.iter()
        .find(|faq| {
            faq.category
                .as_deref()
                .is_some_and(|category| wanted.iter().any(|w| *w == category))
        })
        .map(|faq| faq.answer.clone())
        .unwrap_or_else(|| SAFETY_REDIRECT.to_string())
}
