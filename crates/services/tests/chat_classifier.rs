use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use services::{ChatCompletionClassifier, ClassifierConfig, ClassifierError, VerdictClassifier};

type Captured = Arc<Mutex<Vec<(Option<String>, Value)>>>;

async fn reply_truthful(
    State(captured): State<Captured>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    captured.lock().unwrap().push((auth, body));
    Json(json!({
        "choices": [{ "message": { "role": "assistant", "content": "  Truthful ✅\n" } }]
    }))
}

async fn reply_error() -> (StatusCode, &'static str) {
    (StatusCode::SERVICE_UNAVAILABLE, "overloaded")
}

async fn reply_garbage() -> &'static str {
    "not json"
}

async fn reply_blank() -> Json<Value> {
    Json(json!({ "choices": [{ "message": { "content": "   " } }] }))
}

async fn reply_null() -> Json<Value> {
    Json(json!({ "choices": [{ "message": { "role": "assistant", "content": null } }] }))
}

async fn reply_no_choices() -> Json<Value> {
    Json(json!({ "choices": [] }))
}

async fn reply_slowly() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({ "choices": [] }))
}

async fn spawn_fake(captured: Captured) -> String {
    let app = Router::new()
        .route("/ok/chat/completions", post(reply_truthful))
        .route("/down/chat/completions", post(reply_error))
        .route("/garbage/chat/completions", post(reply_garbage))
        .route("/blank/chat/completions", post(reply_blank))
        .route("/null/chat/completions", post(reply_null))
        .route("/empty/chat/completions", post(reply_no_choices))
        .route("/slow/chat/completions", post(reply_slowly))
        .with_state(captured);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn classifier(base: &str, prefix: &str) -> ChatCompletionClassifier {
    let mut config = ClassifierConfig::new("test-key").with_base_url(format!("{base}/{prefix}/"));
    config.timeout = Duration::from_millis(300);
    ChatCompletionClassifier::new(config).unwrap()
}

#[tokio::test]
async fn sends_prompt_and_returns_trimmed_content() {
    let captured = Captured::default();
    let base = spawn_fake(Arc::clone(&captured)).await;

    let verdict = classifier(&base, "ok")
        .classify("Do you lie?", "Never")
        .await
        .unwrap();
    assert_eq!(verdict, "Truthful ✅");

    let requests = captured.lock().unwrap();
    let (auth, body) = &requests[0];
    assert_eq!(auth.as_deref(), Some("Bearer test-key"));
    assert_eq!(body["model"], "llama3-8b-8192");
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["content"], "Question: Do you lie?\nAnswer: Never");
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let base = spawn_fake(Captured::default()).await;
    let err = classifier(&base, "down").classify("q", "a").await.unwrap_err();
    assert!(matches!(err, ClassifierError::HttpStatus(s) if s == StatusCode::SERVICE_UNAVAILABLE));
}

#[tokio::test]
async fn malformed_body_is_an_error() {
    let base = spawn_fake(Captured::default()).await;
    let err = classifier(&base, "garbage").classify("q", "a").await.unwrap_err();
    assert!(matches!(err, ClassifierError::Http(_)));
}

#[tokio::test]
async fn blank_content_is_passed_through() {
    let base = spawn_fake(Captured::default()).await;
    let verdict = classifier(&base, "blank").classify("q", "a").await.unwrap();
    assert_eq!(verdict, "");
}

#[tokio::test]
async fn missing_content_is_an_error() {
    let base = spawn_fake(Captured::default()).await;
    for prefix in ["null", "empty"] {
        let err = classifier(&base, prefix).classify("q", "a").await.unwrap_err();
        assert!(matches!(err, ClassifierError::EmptyResponse), "{prefix}: {err:?}");
    }
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let base = spawn_fake(Captured::default()).await;
    let err = classifier(&base, "slow").classify("q", "a").await.unwrap_err();
    assert!(matches!(err, ClassifierError::Http(ref e) if e.is_timeout()));
}
