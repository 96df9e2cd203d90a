use axum::{
    Json,
    extract::{Path, Query, State},
};

use super::extract::ApiJson;
use crate::{
    error::AppError,
    message::MessageResponse,
    models::{Faq, FaqFilter, FaqUpdate, NewFaq},
    state::SharedState,
};

pub async fn list_faqs_handler(
    State(state): State<SharedState>,
    Query(filter): Query<FaqFilter>,
) -> Result<Json<Vec<Faq>>, AppError> {
    Ok(Json(state.store.list_faqs(filter.normalized()).await?))
}

pub async fn create_faq_handler(
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<NewFaq>,
) -> Result<Json<Faq>, AppError> {
    payload.validate()?;
    let faq = state.store.insert_faq(payload).await?;
    tracing::info!(id = faq.id, "FAQ created");
    Ok(Json(faq))
}

pub async fn update_faq_handler(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<FaqUpdate>,
) -> Result<Json<Faq>, AppError> {
    payload.validate()?;
    Ok(Json(state.store.update_faq(id, payload).await?))
}

pub async fn delete_faq_handler(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    state.store.delete_faq(id).await?;
    tracing::info!(id, "FAQ deleted");
    Ok(Json(MessageResponse {
        message: "FAQ deleted successfully".to_string(),
    }))
}

pub async fn categories_handler(
    State(state): State<SharedState>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.store.list_categories().await?))
}
