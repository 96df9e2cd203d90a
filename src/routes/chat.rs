use axum::{
    Json,
    extract::{Path, State},
};

use super::extract::ApiJson;
use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse},
    models::ChatExchange,
    state::SharedState,
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let reply = state
        .chat
        .handle_message(
            payload.message.as_deref(),
            payload.session_id.as_deref(),
            payload.language.as_deref(),
        )
        .await?;
    Ok(Json(reply.into()))
}

pub async fn history_handler(
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<ChatExchange>>, AppError> {
    Ok(Json(state.store.list_chat_history(&session_id).await?))
}
