//! Structured `tracing` events for each chat-turn lifecycle step.

use std::time::Duration;

use gchat::{ChatError, ChatErrorKind, ChatTurnHooks};
use gcommon::SessionId;
use gprovider::TokenUsage;

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingChatHooks;

impl ChatTurnHooks for TracingChatHooks {
    fn on_turn_start(&self, session_id: &SessionId) {
        tracing::debug!(session_id = %session_id, "chat turn started");
    }

    fn on_turn_success(&self, session_id: &SessionId, elapsed: Duration, usage: TokenUsage) {
        tracing::info!(
            session_id = %session_id,
            elapsed_ms = elapsed.as_millis() as u64,
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "chat turn completed"
        );
    }

    fn on_turn_failure(&self, session_id: &SessionId, elapsed: Duration, error: &ChatError) {
        let elapsed_ms = elapsed.as_millis() as u64;
        let provider_kind = error.provider_kind.map(|kind| kind.as_str());

        if error.kind == ChatErrorKind::InvalidRequest {
            tracing::info!(
                session_id = %session_id,
                elapsed_ms,
                reason = %error.message,
                "chat turn rejected"
            );
        } else {
            tracing::error!(
                session_id = %session_id,
                elapsed_ms,
                kind = error.kind.as_str(),
                provider_kind,
                error = %error,
                "chat turn failed"
            );
        }
    }

    fn on_session_deleted(&self, session_id: &SessionId, existed: bool) {
        tracing::info!(session_id = %session_id, existed, "chat session deleted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gprovider::ProviderError;

    #[test]
    fn every_callback_emits_without_a_subscriber() {
        let hooks = TracingChatHooks;
        let session_id = SessionId::from("session-1");

        hooks.on_turn_start(&session_id);
        hooks.on_turn_success(&session_id, Duration::from_millis(30), TokenUsage::default());
        hooks.on_turn_failure(
            &session_id,
            Duration::from_millis(30),
            &ChatError::invalid_request("message must not be empty"),
        );
        hooks.on_turn_failure(
            &session_id,
            Duration::from_millis(30),
            &ProviderError::from_status(502, "bad gateway").into(),
        );
        hooks.on_session_deleted(&session_id, false);
    }
}
