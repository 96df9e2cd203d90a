use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;

use super::extract::ApiJson;
use crate::{
    error::AppError,
    message::{HealthResponse, MessageResponse, SettingValue},
    models::{Document, NewDocument, Setting},
    state::SharedState,
};

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

pub async fn list_documents_handler(
    State(state): State<SharedState>,
) -> Result<Json<Vec<Document>>, AppError> {
    Ok(Json(state.store.list_documents().await?))
}

pub async fn create_document_handler(
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<NewDocument>,
) -> Result<Json<Document>, AppError> {
    payload.validate()?;
    let document = state.store.insert_document(payload).await?;
    tracing::info!(id = document.id, filename = %document.filename, "document uploaded");
    Ok(Json(document))
}

pub async fn delete_document_handler(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    state.store.delete_document(id).await?;
    Ok(Json(MessageResponse {
        message: "Document deleted successfully".to_string(),
    }))
}

pub async fn list_settings_handler(
    State(state): State<SharedState>,
) -> Result<Json<Vec<Setting>>, AppError> {
    Ok(Json(state.store.list_settings().await?))
}

pub async fn get_setting_handler(
    State(state): State<SharedState>,
    Path(key): Path<String>,
) -> Result<Json<Setting>, AppError> {
    Ok(Json(state.store.get_setting(&key).await?))
}

pub async fn put_setting_handler(
    State(state): State<SharedState>,
    Path(key): Path<String>,
    ApiJson(payload): ApiJson<SettingValue>,
) -> Result<Json<Setting>, AppError> {
    Ok(Json(state.store.put_setting(&key, &payload.value).await?))
}
