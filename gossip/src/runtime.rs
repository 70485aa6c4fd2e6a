//! Assembles a ready-to-serve chat service from configuration values.

use std::sync::Arc;
use std::time::Duration;

use crate::{
    ChatError, ChatPolicy, ChatService, ChatTurnHooks, CompatClient, Endpoint, HookSet,
    ModelProvider, ProviderError, RetryPolicy, TracingChatHooks,
};

/// Chat hooks installed by [`build_chat_service`].
pub fn default_chat_hooks() -> HookSet {
    HookSet::new().with("tracing", Arc::new(TracingChatHooks))
}

/// An OpenAI-compatible client for `endpoint`, shared behind the provider trait.
pub fn connect(
    endpoint: Endpoint,
    request_timeout: Duration,
    retry: RetryPolicy,
) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    let client = CompatClient::new(endpoint, request_timeout)?.with_retry_policy(retry);
    Ok(Arc::new(client))
}

/// A chat service with its own session store and the default hooks.
pub fn build_chat_service(
    provider: Arc<dyn ModelProvider>,
    policy: ChatPolicy,
) -> Result<ChatService, ChatError> {
    let hooks: Arc<dyn ChatTurnHooks> = Arc::new(default_chat_hooks());
    ChatService::builder(provider)
        .policy(policy)
        .hooks(hooks)
        .build()
}
