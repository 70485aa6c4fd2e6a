//! Process-wide registry of live sessions.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use gcommon::SessionId;

use crate::Session;

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, Arc<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session for `id`, creating and registering an empty one on first reference.
    ///
    /// Concurrent first references to the same id all observe one session.
    pub fn resolve_or_create(&self, id: &SessionId) -> Arc<Session> {
        if let Some(session) = self.get(id) {
            return session;
        }

        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        // Another caller may have inserted between dropping the read lock and
        // acquiring the write lock; re-check before creating.
        if let Some(session) = sessions.get(id) {
            return Arc::clone(session);
        }

        let session = Arc::new(Session::new(id.clone()));
        sessions.insert(id.clone(), Arc::clone(&session));
        session
    }

    pub fn get(&self, id: &SessionId) -> Option<Arc<Session>> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Removes `id` if present. Returns whether a session was removed.
    pub fn delete(&self, id: &SessionId) -> bool {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChatRole;

    #[test]
    fn resolve_returns_the_same_session_until_deleted() {
        let store = SessionStore::new();
        let id = SessionId::from("alpha");

        let first = store.resolve_or_create(&id);
        first.append(ChatRole::User, "hello");
        let second = store.resolve_or_create(&id);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.history().len(), 1);

        assert!(store.delete(&id));
        assert!(!store.delete(&id));
        assert!(store.get(&id).is_none());

        let fresh = store.resolve_or_create(&id);
        assert!(!Arc::ptr_eq(&first, &fresh));
        assert!(fresh.history().is_empty());
    }

    #[test]
    fn sessions_are_isolated_from_each_other() {
        let store = SessionStore::new();
        let a = store.resolve_or_create(&SessionId::from("a"));
        let b = store.resolve_or_create(&SessionId::from("b"));

        a.append(ChatRole::User, "for a");
        b.append(ChatRole::User, "for b");
        b.append(ChatRole::Assistant, "reply b");

        assert!(a.history().iter().all(|m| m.id.starts_with("a_")));
        assert!(b.history().iter().all(|m| m.content != "for a"));
        assert_eq!(a.history().len(), 1);
        assert_eq!(b.history().len(), 2);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn racing_first_references_share_one_session() {
        let store = Arc::new(SessionStore::new());
        let id = SessionId::from("contended");
        let barrier = Arc::new(tokio::sync::Barrier::new(32));

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let store = Arc::clone(&store);
                let barrier = Arc::clone(&barrier);
                let id = id.clone();
                tokio::spawn(async move {
                    barrier.wait().await;
                    let session = store.resolve_or_create(&id);
                    session.append(ChatRole::User, "x");
                    session
                })
            })
            .collect();

        let mut sessions = Vec::new();
        for handle in handles {
            sessions.push(handle.await.expect("resolve task should finish"));
        }

        let winner = store.get(&id).expect("session should exist");
        assert!(sessions.iter().all(|session| Arc::ptr_eq(session, &winner)));
        assert_eq!(winner.history().len(), 32);
        assert_eq!(store.len(), 1);
    }
}
