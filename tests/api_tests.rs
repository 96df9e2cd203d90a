use faq_chatbot::error::LlmError;
use faq_chatbot::message::ChatResponse;
use faq_chatbot::models::{ChatExchange, Faq};
use faq_chatbot::routes::create_router;
use faq_chatbot::services::fallback::SAFETY_REDIRECT;
use faq_chatbot::services::llm::{CompletionRequest, LanguageModel};
use faq_chatbot::services::session_manager::{SequentialSessionIds, UuidSessionIds};
use faq_chatbot::state::AppState;
use faq_chatbot::store::{SqliteStore, Store, seed};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;

struct OfflineModel;

#[async_trait]
impl LanguageModel for OfflineModel {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, LlmError> {
        Err(LlmError::NotConfigured)
    }
}

struct EchoModel;

#[async_trait]
impl LanguageModel for EchoModel {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        Ok(format!("model: {}", request.user))
    }
}

fn app_with(model: Arc<dyn LanguageModel>, admin_key: Option<&str>) -> Router {
    let store: Arc<dyn Store> = Arc::new(SqliteStore::in_memory().unwrap());
    let state = AppState::new(
        store,
        model,
        Arc::new(UuidSessionIds),
        admin_key.map(str::to_string),
    );
    create_router(Arc::new(state), "public")
}

fn app() -> Router {
    app_with(Arc::new(OfflineModel), None)
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = app().oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    let body: Value = body_json(response).await;
    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_chat_endpoint() {
    let response = app()
        .oneshot(json_request(
            "POST",
            "/api/chat",
            r#"{"message": "hello", "sessionId": null}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let chat: ChatResponse = body_json(response).await;
    assert_eq!(chat.response, SAFETY_REDIRECT);
    assert!(!chat.session_id.is_empty());
    assert!(chrono::DateTime::parse_from_rfc3339(&chat.timestamp).is_ok());
}

#[tokio::test]
async fn test_chat_uses_model_when_available() {
    let app = app_with(Arc::new(EchoModel), None);
    let response = app
        .oneshot(json_request("POST", "/api/chat", r#"{"message": "hi there"}"#))
        .await
        .unwrap();
    let chat: ChatResponse = body_json(response).await;
    assert_eq!(chat.response, "model: hi there");
}

#[tokio::test]
async fn test_chat_rejects_empty_or_missing_message() {
    let app = app();
    for body in [r#"{"message": ""}"#, r#"{"message": "   "}"#, r#"{}"#] {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/chat", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let err: Value = body_json(response).await;
        assert_eq!(err["error"], "Message is required");
    }
}

#[tokio::test]
async fn test_generated_session_ids_differ() {
    let app = app();
    let mut ids = Vec::new();
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/chat", r#"{"message": "hello"}"#))
            .await
            .unwrap();
        let chat: ChatResponse = body_json(response).await;
        ids.push(chat.session_id);
    }
    assert_ne!(ids[0], ids[1]);
}

#[tokio::test]
async fn test_history_after_three_turns() {
    let store: Arc<dyn Store> = Arc::new(SqliteStore::in_memory().unwrap());
    seed::seed_if_empty(store.as_ref()).await.unwrap();
    let state = AppState::new(
        store,
        Arc::new(OfflineModel),
        Arc::new(SequentialSessionIds::new("sess")),
        None,
    );
    let app = create_router(Arc::new(state), "public");

    let messages = ["medical help please", "education for my kids", "thanks"];
    let mut session_id: Option<String> = None;
    let mut replies = Vec::new();
    for msg in messages {
        let body = serde_json::json!({ "message": msg, "sessionId": session_id });
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/chat", &body.to_string()))
            .await
            .unwrap();
        let chat: ChatResponse = body_json(response).await;
        session_id = Some(chat.session_id.clone());
        replies.push(chat.response);
    }
    assert_eq!(session_id.as_deref(), Some("sess-1"));
    assert_ne!(replies[0], SAFETY_REDIRECT);
    assert_ne!(replies[1], SAFETY_REDIRECT);
    assert_eq!(replies[2], SAFETY_REDIRECT);

    let response = app
        .oneshot(get("/api/chat/history/sess-1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let history: Vec<ChatExchange> = body_json(response).await;
    assert_eq!(history.len(), 3);
    // newest first
    for (exchange, (msg, reply)) in history.iter().rev().zip(messages.iter().zip(&replies)) {
        assert_eq!(exchange.session_id, "sess-1");
        assert_eq!(exchange.user_message, *msg);
        assert_eq!(&exchange.bot_response, reply);
    }
}

#[tokio::test]
async fn test_faq_crud_flow() {
    let app = app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/faqs",
            r#"{"question": "Where is school?", "answer": "Ask the coordinator.", "category": "education"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created: Faq = body_json(response).await;
    assert_eq!(created.language, "en");

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/faqs/{}", created.id),
            r#"{"answer": "Visit the community center."}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Faq = body_json(response).await;
    assert_eq!(updated.answer, "Visit the community center.");
    assert_eq!(updated.question, "Where is school?");

    let response = app
        .clone()
        .oneshot(get("/api/faqs?category=education&language=en"))
        .await
        .unwrap();
    let listed: Vec<Faq> = body_json(response).await;
    assert_eq!(listed, vec![updated]);

    let response = app.clone().oneshot(get("/api/categories")).await.unwrap();
    let categories: Vec<String> = body_json(response).await;
    assert_eq!(categories, ["education"]);

    let response = app
        .clone()
        .oneshot(json_request("DELETE", &format!("/api/faqs/{}", created.id), ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = body_json(response).await;
    assert_eq!(body["message"], "FAQ deleted successfully");

    let response = app
        .oneshot(json_request("DELETE", &format!("/api/faqs/{}", created.id), ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_faq_requires_question_and_answer() {
    let response = app()
        .oneshot(json_request("POST", "/api/faqs", r#"{"question": "only a question"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let err: Value = body_json(response).await;
    assert_eq!(err["error"], "Question and answer are required");
}

#[tokio::test]
async fn test_update_missing_faq_is_404() {
    let response = app()
        .oneshot(json_request("PUT", "/api/faqs/99", r#"{"answer": "x"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_documents_and_settings() {
    let app = app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/documents",
            r#"{"filename": "guide.txt", "content": "hello"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/api/documents")).await.unwrap();
    let docs: Vec<Value> = body_json(response).await;
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0]["filename"], "guide.txt");

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/documents", r#"{"content": "x"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/api/settings/welcome", r#"{"value": "Hello"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/api/settings/welcome")).await.unwrap();
    let setting: Value = body_json(response).await;
    assert_eq!(setting["value"], "Hello");

    let response = app.oneshot(get("/api/settings/missing")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_key_guards_mutations_only() {
    let app = app_with(Arc::new(OfflineModel), Some("secret123"));
    let body = r#"{"question": "q", "answer": "a"}"#;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/faqs", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let mut req = json_request("POST", "/api/faqs", body);
    req.headers_mut()
        .insert("x-admin-key", "secret124".parse().unwrap());
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let mut req = json_request("POST", "/api/faqs", body);
    req.headers_mut()
        .insert("x-admin-key", "secret123".parse().unwrap());
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // reads and chat stay open
    let response = app.clone().oneshot(get("/api/faqs")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let response = app
        .oneshot(json_request("POST", "/api/chat", r#"{"message": "hi"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_body_gets_json_error() {
    let app = app();
    for (uri, body) in [
        ("/api/chat", r#"{"message": 5}"#),
        ("/api/chat", r#"{"message": "hi", "sessionId": "a", "session_id": "b"}"#),
        ("/api/chat", r#"{"message": "#),
        ("/api/faqs", r#"["not", "an", "object"]"#),
    ] {
        let response = app
            .clone()
            .oneshot(json_request("POST", uri, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let err: Value = body_json(response).await;
        assert!(
            err["error"].as_str().is_some_and(|e| !e.is_empty()),
            "body: {body}"
        );
    }
}

#[tokio::test]
async fn test_chat_history_keeps_raw_message() {
    let app = app();
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/chat",
            r#"{"message": "  medical help  ", "sessionId": "padded"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/api/chat/history/padded")).await.unwrap();
    let history: Vec<ChatExchange> = body_json(response).await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].user_message, "  medical help  ");
}
