use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use gossip::{
    ChatService, Generation, GenerationRequest, ModelProvider, ProviderError, ProviderFuture,
    ProviderId,
};
use gserver::{AppState, build_router};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

#[derive(Debug, Default)]
struct ScriptedProvider {
    prompts: Mutex<Vec<String>>,
    fail: bool,
}

impl ScriptedProvider {
    fn failing() -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompts lock").clone()
    }
}

impl ModelProvider for ScriptedProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Gemini
    }

    fn generate<'a>(
        &'a self,
        request: GenerationRequest,
    ) -> ProviderFuture<'a, Result<Generation, ProviderError>> {
        Box::pin(async move {
            let count = {
                let mut prompts = self.prompts.lock().expect("prompts lock");
                prompts.push(request.prompt);
                prompts.len()
            };

            if self.fail {
                return Err(ProviderError::from_status(503, "upstream is down"));
            }

            Ok(Generation::new(format!("r{count}")))
        })
    }
}

fn app_with(provider: Arc<ScriptedProvider>) -> Router {
    let chat = ChatService::builder(provider)
        .model("test-model")
        .build()
        .expect("service should build");
    build_router(AppState::new(chat))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router should respond");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    let json = serde_json::from_slice(&bytes).expect("body should be JSON");
    (status, json)
}

fn post_chat(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

fn get_history(session_id: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(format!("/chat/{session_id}/history"))
        .body(Body::empty())
        .expect("request should build")
}

fn delete_chat(session_id: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(format!("/chat/{session_id}"))
        .body(Body::empty())
        .expect("request should build")
}

#[tokio::test]
async fn new_conversation_gets_generated_session_and_two_message_history() {
    let app = app_with(Arc::new(ScriptedProvider::default()));

    let (status, body) = send(&app, post_chat(json!({ "message": "A" }))).await;
    assert_eq!(status, StatusCode::OK);

    let session_id = body["session_id"].as_str().expect("session id").to_string();
    assert!(session_id.starts_with("session_"));
    assert_eq!(body["message"]["role"], "assistant");
    assert_eq!(body["message"]["content"], "r1");
    assert_eq!(body["message"]["id"], format!("{session_id}_1"));
    assert!(body["message"]["timestamp"].is_string());

    let (status, history) = send(&app, get_history(&session_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history["session_id"], session_id.as_str());
    let messages = history["messages"].as_array().expect("messages array");
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[0]["content"], "A");
    assert_eq!(messages[1]["role"], "assistant");
    assert_eq!(messages[1]["content"], "r1");
}

#[tokio::test]
async fn follow_up_turn_sees_prior_history_only() {
    let provider = Arc::new(ScriptedProvider::default());
    let app = app_with(provider.clone());

    let (status, _) = send(&app, post_chat(json!({ "session_id": "s1", "message": "A" }))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, post_chat(json!({ "session_id": "s1", "message": "B" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session_id"], "s1");

    let prompts = provider.prompts();
    assert_eq!(prompts[0], "A");
    assert!(prompts[1].contains("User: A"));
    assert!(prompts[1].contains("Assistant: r1"));
    assert!(!prompts[1].contains("User: B"));
    assert!(prompts[1].ends_with('B'));

    let (_, history) = send(&app, get_history("s1")).await;
    let turns: Vec<(String, String)> = history["messages"]
        .as_array()
        .expect("messages array")
        .iter()
        .map(|message| {
            (
                message["role"].as_str().unwrap_or_default().to_string(),
                message["content"].as_str().unwrap_or_default().to_string(),
            )
        })
        .collect();
    let expected: Vec<(String, String)> = [
        ("user", "A"),
        ("assistant", "r1"),
        ("user", "B"),
        ("assistant", "r2"),
    ]
    .iter()
    .map(|(role, content)| (role.to_string(), content.to_string()))
    .collect();
    assert_eq!(turns, expected);
}

#[tokio::test]
async fn deleting_unknown_session_succeeds_and_history_is_empty() {
    let app = app_with(Arc::new(ScriptedProvider::default()));

    let (status, body) = send(&app, delete_chat("ghost")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, history) = send(&app, get_history("ghost")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history["messages"], json!([]));
}

#[tokio::test]
async fn delete_clears_existing_history() {
    let app = app_with(Arc::new(ScriptedProvider::default()));

    send(&app, post_chat(json!({ "session_id": "gone", "message": "hi" }))).await;
    let (status, _) = send(&app, delete_chat("gone")).await;
    assert_eq!(status, StatusCode::OK);

    let (_, history) = send(&app, get_history("gone")).await;
    assert_eq!(history["messages"], json!([]));
}

#[tokio::test]
async fn provider_failure_is_a_server_error_and_keeps_the_user_message() {
    let app = app_with(Arc::new(ScriptedProvider::failing()));

    let (status, body) = send(&app, post_chat(json!({ "session_id": "f", "message": "hello" }))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "provider_error");
    assert!(body["error"]["message"].is_string());

    let (_, history) = send(&app, get_history("f")).await;
    let messages = history["messages"].as_array().expect("messages array");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[0]["content"], "hello");
}

#[tokio::test]
async fn malformed_requests_are_rejected_without_mutation() {
    let provider = Arc::new(ScriptedProvider::default());
    let app = app_with(provider.clone());

    let bad_json = Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .expect("request should build");
    let (status, body) = send(&app, bad_json).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");

    let (status, _) = send(&app, post_chat(json!({ "session_id": "m" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, post_chat(json!({ "session_id": "m", "message": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");

    assert!(provider.prompts().is_empty());
    let (_, health) = send(
        &app,
        Request::builder()
            .uri("/health")
            .body(Body::empty())
            .expect("request should build"),
    )
    .await;
    assert_eq!(health["sessions"], 0);
}

#[tokio::test]
async fn health_reports_service_and_session_count() {
    let app = app_with(Arc::new(ScriptedProvider::default()));
    send(&app, post_chat(json!({ "message": "one" }))).await;
    send(&app, post_chat(json!({ "message": "two" }))).await;

    let (status, body) = send(
        &app,
        Request::builder()
            .uri("/health")
            .body(Body::empty())
            .expect("request should build"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "gossip");
    assert_eq!(body["sessions"], 2);
}
