//! Common `gossip` imports for applications.

pub use crate::{
    ChatError, ChatErrorKind, ChatMessage, ChatPolicy, ChatRole, ChatService, ChatTurnRequest,
    ChatTurnResult, Endpoint, GenerationOptions, ModelProvider, ProviderError, ProviderId,
    RetryPolicy, SessionId, build_chat_service, connect,
};
