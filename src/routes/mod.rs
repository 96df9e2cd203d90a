// src/routes/mod.rs
pub mod admin;
pub mod chat;
pub mod extract;
pub mod faqs;

use std::path::Path;

use axum::{
    Router,
    extract::{DefaultBodyLimit, Request, State},
    http::{HeaderValue, header},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::SharedState;

const BODY_LIMIT: usize = 10 * 1024 * 1024;

pub fn create_router(state: SharedState, public_dir: impl AsRef<Path>) -> Router {
    let public_dir = public_dir.as_ref();

    let public_routes = Router::new()
        .route("/api/health", get(admin::health_handler))
        .route("/api/faqs", get(faqs::list_faqs_handler))
        .route("/api/categories", get(faqs::categories_handler))
        .route("/api/chat", post(chat::chat_handler))
        .route("/api/chat/history/{session_id}", get(chat::history_handler))
        .route("/api/documents", get(admin::list_documents_handler))
        .route("/api/settings", get(admin::list_settings_handler))
        .route("/api/settings/{key}", get(admin::get_setting_handler));

    let admin_routes = Router::new()
        .route("/api/faqs", post(faqs::create_faq_handler))
        .route(
            "/api/faqs/{id}",
            put(faqs::update_faq_handler).delete(faqs::delete_faq_handler),
        )
        .route("/api/documents", post(admin::create_document_handler))
        .route("/api/documents/{id}", delete(admin::delete_document_handler))
        .route("/api/settings/{key}", put(admin::put_setting_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), admin_key_middleware));

    public_routes
        .merge(admin_routes)
        .route_service("/", ServeFile::new(public_dir.join("chat.html")))
        .route_service("/admin", ServeFile::new(public_dir.join("admin.html")))
        .fallback_service(ServeDir::new(public_dir))
        .with_state(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
}

// Only enforced when an admin key is configured.
async fn admin_key_middleware(
    State(state): State<SharedState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.admin_api_key.as_deref() else {
        return Ok(next.run(req).await);
    };
    match req.headers().get("x-admin-key") {
        Some(val) if keys_match(val.as_bytes(), expected.as_bytes()) => Ok(next.run(req).await),
        _ => {
            tracing::warn!(path = %req.uri().path(), "rejected admin request without valid key");
            Err(AppError::Unauthorized)
        }
    }
}

/// Compares every byte so the time taken does not depend on where the keys differ.
fn keys_match(given: &[u8], expected: &[u8]) -> bool {
    if given.len() != expected.len() {
        return false;
    }
    given
        .iter()
        .zip(expected)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}
