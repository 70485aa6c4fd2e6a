//! Delivers each chat-turn event to several hooks, isolating panics.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Duration;

use gchat::{ChatError, ChatTurnHooks};
use gcommon::SessionId;
use gprovider::TokenUsage;

/// Named hooks called in registration order. A hook that panics is reported
/// and skipped for that event; the turn and the remaining hooks carry on.
#[derive(Clone, Default)]
pub struct HookSet {
    hooks: Vec<(&'static str, Arc<dyn ChatTurnHooks>)>,
}

impl HookSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, hooks: Arc<dyn ChatTurnHooks>) -> Self {
        self.hooks.push((name, hooks));
        self
    }

    fn dispatch(&self, event: &'static str, call: impl Fn(&dyn ChatTurnHooks)) {
        for (name, hooks) in &self.hooks {
            if catch_unwind(AssertUnwindSafe(|| call(hooks.as_ref()))).is_err() {
                tracing::warn!(hook = *name, event, "chat hook panicked");
            }
        }
    }
}

impl ChatTurnHooks for HookSet {
    fn on_turn_start(&self, session_id: &SessionId) {
        self.dispatch("turn_start", |hooks| hooks.on_turn_start(session_id));
    }

    fn on_turn_success(&self, session_id: &SessionId, elapsed: Duration, usage: TokenUsage) {
        self.dispatch("turn_success", |hooks| {
            hooks.on_turn_success(session_id, elapsed, usage)
        });
    }

    fn on_turn_failure(&self, session_id: &SessionId, elapsed: Duration, error: &ChatError) {
        self.dispatch("turn_failure", |hooks| {
            hooks.on_turn_failure(session_id, elapsed, error)
        });
    }

    fn on_session_deleted(&self, session_id: &SessionId, existed: bool) {
        self.dispatch("session_deleted", |hooks| {
            hooks.on_session_deleted(session_id, existed)
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Journal {
        lines: Mutex<Vec<String>>,
    }

    impl Journal {
        fn lines(&self) -> Vec<String> {
            self.lines.lock().expect("journal lock").clone()
        }
    }

    impl ChatTurnHooks for Journal {
        fn on_turn_start(&self, session_id: &SessionId) {
            self.lines
                .lock()
                .expect("journal lock")
                .push(format!("start {session_id}"));
        }

        fn on_turn_failure(&self, session_id: &SessionId, _elapsed: Duration, error: &ChatError) {
            self.lines
                .lock()
                .expect("journal lock")
                .push(format!("failure {session_id} {}", error.kind.as_str()));
        }

        fn on_session_deleted(&self, session_id: &SessionId, existed: bool) {
            self.lines
                .lock()
                .expect("journal lock")
                .push(format!("deleted {session_id} {existed}"));
        }
    }

    struct Exploding;

    impl ChatTurnHooks for Exploding {
        fn on_turn_start(&self, _session_id: &SessionId) {
            panic!("hook bug");
        }

        fn on_session_deleted(&self, _session_id: &SessionId, _existed: bool) {
            panic!("hook bug");
        }
    }

    #[test]
    fn every_hook_sees_every_event_in_order() {
        let first = Arc::new(Journal::default());
        let second = Arc::new(Journal::default());
        let set = HookSet::new()
            .with("first", first.clone())
            .with("second", second.clone());
        let id = SessionId::from("s");

        set.on_turn_start(&id);
        set.on_turn_failure(&id, Duration::ZERO, &ChatError::timeout("slow"));

        let expected = vec!["start s".to_string(), "failure s timeout".to_string()];
        assert_eq!(first.lines(), expected);
        assert_eq!(second.lines(), expected);
    }

    #[test]
    fn a_panicking_hook_does_not_starve_the_rest() {
        let journal = Arc::new(Journal::default());
        let set = HookSet::new()
            .with("exploding", Arc::new(Exploding))
            .with("journal", journal.clone());
        let id = SessionId::from("s");

        set.on_turn_start(&id);
        set.on_session_deleted(&id, true);

        assert_eq!(journal.lines(), vec!["start s", "deleted s true"]);
    }

    #[test]
    fn empty_set_is_a_no_op() {
        HookSet::new().on_session_deleted(&SessionId::from("s"), false);
    }
}
