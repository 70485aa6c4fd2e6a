//! Turn lifecycle hooks for observability.

use std::time::Duration;

use gcommon::SessionId;
use gprovider::TokenUsage;

use crate::ChatError;

pub trait ChatTurnHooks: Send + Sync {
    fn on_turn_start(&self, _session_id: &SessionId) {}

    fn on_turn_success(&self, _session_id: &SessionId, _elapsed: Duration, _usage: TokenUsage) {}

    fn on_turn_failure(&self, _session_id: &SessionId, _elapsed: Duration, _error: &ChatError) {}

    fn on_session_deleted(&self, _session_id: &SessionId, _existed: bool) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopChatHooks;

impl ChatTurnHooks for NoopChatHooks {}
