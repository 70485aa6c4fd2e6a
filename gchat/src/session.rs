//! A single conversation: an append-only message log behind a reader/writer lock.

use std::sync::{PoisonError, RwLock};

use chrono::Utc;
use gcommon::SessionId;
use crate::{ChatMessage, ChatRole};

#[derive(Debug)]
pub struct Session {
    id: SessionId,
    messages: RwLock<Vec<ChatMessage>>,
}

impl Session {
    pub fn new(id: impl Into<SessionId>) -> Self {
        Self {
            id: id.into(),
            messages: RwLock::new(Vec::new()),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Records a message and returns it.
    ///
    /// The id is `"<session id>_<position>"`, computed under the write lock so
    /// concurrent appenders never share a position.
    pub fn append(&self, role: ChatRole, content: impl Into<String>) -> ChatMessage {
        let mut messages = self
            .messages
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let message = ChatMessage {
            id: format!("{}_{}", self.id, messages.len()),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        };
        messages.push(message.clone());
        message
    }

    /// Owned snapshot of the log.
    pub fn history(&self) -> Vec<ChatMessage> {
        self.messages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn history_excluding(&self, message_id: &str) -> Vec<ChatMessage> {
        self.messages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|message| message.id != message_id)
            .cloned()
            .collect()
    }
}
