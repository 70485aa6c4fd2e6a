//! Structured error responses.
//!
//! Every failure is rendered as `{"error": {"code": ..., "message": ...}}`.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gossip::{ChatError, ChatErrorKind};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope<'a> {
    error: ErrorBody<'a>,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: &'a str,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request", message)
    }
}

impl From<ChatError> for ApiError {
    fn from(value: ChatError) -> Self {
        match value.kind {
            ChatErrorKind::InvalidRequest => Self::bad_request(value.message),
            ChatErrorKind::Provider => Self::new(
                StatusCode::BAD_GATEWAY,
                "provider_error",
                "failed to generate a reply",
            ),
            ChatErrorKind::Timeout => Self::new(
                StatusCode::GATEWAY_TIMEOUT,
                "timeout",
                "reply generation timed out",
            ),
            ChatErrorKind::Cancelled => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "cancelled",
                "reply generation was cancelled",
            ),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::bad_request(value.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorEnvelope {
            error: ErrorBody {
                code: self.code,
                message: &self.message,
            },
        };

        (self.status, Json(body)).into_response()
    }
}
