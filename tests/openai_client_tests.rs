use faq_chatbot::config::LlmConfig;
use faq_chatbot::error::LlmError;
use faq_chatbot::services::llm::{CompletionRequest, LanguageModel, OpenAiClient};

use axum::{Json, Router, http::HeaderMap, http::StatusCode, routing::post};
use serde_json::{Value, json};

/// Serve `router` on an ephemeral port and return its base URL.
async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/v1")
}

fn client(base_url: String) -> OpenAiClient {
    OpenAiClient::new(&LlmConfig {
        api_key: Some("sk-test".into()),
        model: "gpt-4".into(),
        base_url,
    })
}

fn request() -> CompletionRequest {
    CompletionRequest {
        system: "be kind".into(),
        user: "where is the clinic?".into(),
        max_tokens: 500,
        temperature: 0.7,
    }
}

#[tokio::test]
async fn test_sends_chat_completion_and_returns_content() {
    async fn handler(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        let authorized = headers
            .get("authorization")
            .is_some_and(|v| v == "Bearer sk-test");
        let well_formed = body["model"] == "gpt-4"
            && body["max_tokens"] == 500
            && (body["temperature"].as_f64().unwrap_or(0.0) - 0.7).abs() < 1e-6
            && body["messages"][0]["role"] == "system"
            && body["messages"][0]["content"] == "be kind"
            && body["messages"][1]["role"] == "user"
            && body["messages"][1]["content"] == "where is the clinic?";
        if !(authorized && well_formed) {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": "unexpected request" })));
        }
        (
            StatusCode::OK,
            Json(json!({
                "choices": [{ "message": { "role": "assistant", "content": "Visit the health center." } }]
            })),
        )
    }

    let base = spawn(Router::new().route("/v1/chat/completions", post(handler))).await;
    let reply = client(base).complete(request()).await.unwrap();
    assert_eq!(reply, "Visit the health center.");
}

#[tokio::test]
async fn test_error_status_is_reported() {
    async fn handler() -> (StatusCode, &'static str) {
        (StatusCode::TOO_MANY_REQUESTS, "quota exceeded")
    }

    let base = spawn(Router::new().route("/v1/chat/completions", post(handler))).await;
    let err = client(base).complete(request()).await.unwrap_err();
    match err {
        LlmError::Status { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body, "quota exceeded");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_empty_choices_are_invalid() {
    async fn handler() -> Json<Value> {
        Json(json!({ "choices": [] }))
    }

    let base = spawn(Router::new().route("/v1/chat/completions", post(handler))).await;
    let err = client(base).complete(request()).await.unwrap_err();
    assert!(matches!(err, LlmError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_request_error() {
    // Bind then drop to get a port nobody listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(format!("http://{addr}/v1"))
        .complete(request())
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::Request(_)));
}
