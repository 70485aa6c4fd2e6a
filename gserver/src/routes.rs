//! HTTP routes for chat turns, history and session deletion.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use gossip::{ChatMessage, ChatService, ChatTurnRequest, SessionId};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::error::ApiError;

pub const SERVICE_NAME: &str = "gossip";

#[derive(Clone)]
pub struct AppState {
    pub chat: ChatService,
}

impl AppState {
    pub fn new(chat: ChatService) -> Self {
        Self { chat }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequestBody {
    #[serde(default)]
    pub session_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponseBody {
    pub session_id: String,
    pub message: ChatMessage,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponseBody {
    pub session_id: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponseBody {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponseBody {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
    pub sessions: usize,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/chat/{session_id}/history", get(history))
        .route("/chat/{session_id}", delete(delete_session))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponseBody> {
    Json(HealthResponseBody {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        service: SERVICE_NAME,
        sessions: state.chat.store().len(),
    })
}

async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequestBody>, JsonRejection>,
) -> Result<Json<ChatResponseBody>, ApiError> {
    let Json(body) = payload?;

    let mut request = ChatTurnRequest::new(body.message);
    if let Some(session_id) = body.session_id {
        request = request.with_session_id(session_id);
    }

    let result = state.chat.run_turn(request).await?;
    Ok(Json(ChatResponseBody {
        session_id: result.session_id.into_inner(),
        message: result.message,
    }))
}

async fn history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<HistoryResponseBody> {
    let messages = state.chat.history(&SessionId::from(session_id.as_str()));
    Json(HistoryResponseBody {
        session_id,
        messages,
    })
}

async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<DeleteResponseBody> {
    state.chat.delete_session(&SessionId::from(session_id));
    Json(DeleteResponseBody {
        message: "chat history deleted".to_string(),
    })
}
