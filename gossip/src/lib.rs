//! Unified facade over the gossip workspace crates.
//!
//! This crate is the single dependency the HTTP server needs. It re-exports
//! the chat core, the generation client and the observability hooks, and
//! assembles a chat service from plain configuration values.
//!
//! ```rust
//! use std::time::Duration;
//!
//! use gossip::{ChatPolicy, Endpoint, ProviderId, RetryPolicy, build_chat_service, connect};
//!
//! let provider = connect(
//!     Endpoint::new(ProviderId::Ollama),
//!     Duration::from_secs(30),
//!     RetryPolicy::default(),
//! )
//! .expect("ollama needs no key");
//! let chat = build_chat_service(provider, ChatPolicy::default()).expect("default policy is valid");
//! assert!(chat.store().is_empty());
//! ```

pub mod prelude;
pub mod runtime;

pub use gchat;
pub use gcommon;
pub use gobserve;
pub use gprovider;

pub use gchat::{
    CONTEXT_HEADER, CONTEXT_INSTRUCTION, ChatError, ChatErrorKind, ChatMessage, ChatPolicy,
    ChatRole, ChatService, ChatServiceBuilder, ChatTurnHooks, ChatTurnRequest, ChatTurnResult,
    DEFAULT_TURN_TIMEOUT, NoopChatHooks, Session, SessionStore, render_context,
};
pub use gcommon::{BoxFuture, GenerationOptions, SessionId};
pub use gobserve::{HookSet, TracingChatHooks};
pub use gprovider::{
    CompatClient, DEFAULT_REQUEST_TIMEOUT, Endpoint, FinishReason, Generation, GenerationRequest,
    ModelProvider, ProviderError, ProviderErrorKind, ProviderFuture, ProviderId, RetryPolicy,
    TokenUsage,
};

pub use runtime::{build_chat_service, connect, default_chat_hooks};
