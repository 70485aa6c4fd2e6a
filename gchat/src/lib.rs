//! Multi-session chat state and turn orchestration over model providers.
//!
//! A [`SessionStore`] maps session ids to [`Session`] logs. [`ChatService`]
//! records the user message, renders prior turns with [`render_context`], asks
//! the provider for a reply, and records the reply.
//!
//! ```rust
//! use gchat::{ChatRole, SessionId, SessionStore, render_context};
//!
//! let store = SessionStore::new();
//! let session = store.resolve_or_create(&SessionId::from("demo"));
//! let hello = session.append(ChatRole::User, "hello");
//! assert_eq!(hello.id, "demo_0");
//!
//! let prefix = render_context(&session.history());
//! assert!(prefix.contains("User: hello"));
//! ```

mod context;
mod error;
mod hooks;
mod service;
mod session;
mod store;
mod types;

pub mod prelude {
    pub use crate::{
        ChatError, ChatErrorKind, ChatMessage, ChatPolicy, ChatRole, ChatService,
        ChatServiceBuilder, ChatTurnHooks, ChatTurnRequest, ChatTurnResult, NoopChatHooks, Session,
        SessionStore, render_context,
    };
    pub use gcommon::{GenerationOptions, SessionId};
}

pub use context::{CONTEXT_HEADER, CONTEXT_INSTRUCTION, render_context};
pub use error::{ChatError, ChatErrorKind};
pub use hooks::{ChatTurnHooks, NoopChatHooks};
pub use service::{
    ChatPolicy, ChatService, ChatServiceBuilder, DEFAULT_TURN_TIMEOUT, generate_session_id,
};
pub use session::Session;
pub use store::SessionStore;
pub use types::{ChatMessage, ChatRole, ChatTurnRequest, ChatTurnResult};
pub use gcommon::{GenerationOptions, SessionId};
