//! Turn orchestration over a session store and a generation provider.

use std::future::Future;
use std::pin::pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_timer::Delay;
use futures_util::future::{self, Either};
use gcommon::{BoxFuture, GenerationOptions, SessionId};
use gprovider::{Generation, GenerationRequest, ModelProvider, ProviderError, validate_options};
use uuid::Uuid;

use crate::{
    ChatError, ChatMessage, ChatRole, ChatTurnHooks, ChatTurnRequest, ChatTurnResult,
    NoopChatHooks, SessionStore, render_context,
};

pub const DEFAULT_TURN_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, PartialEq)]
pub struct ChatPolicy {
    /// Empty means the provider's own default model.
    pub model: String,
    pub system_prompt: Option<String>,
    pub options: GenerationOptions,
    pub turn_timeout: Option<Duration>,
}

impl Default for ChatPolicy {
    fn default() -> Self {
        Self {
            model: String::new(),
            system_prompt: None,
            options: GenerationOptions::default(),
            turn_timeout: Some(DEFAULT_TURN_TIMEOUT),
        }
    }
}

impl ChatPolicy {
    pub fn validate(&self) -> Result<(), ChatError> {
        validate_options(&self.options)
            .map_err(|err| ChatError::invalid_request(err.message))?;

        if self.turn_timeout == Some(Duration::ZERO) {
            return Err(ChatError::invalid_request(
                "turn_timeout must be greater than zero",
            ));
        }

        Ok(())
    }
}

#[derive(Clone)]
pub struct ChatService {
    provider: Arc<dyn ModelProvider>,
    store: Arc<SessionStore>,
    policy: ChatPolicy,
    hooks: Arc<dyn ChatTurnHooks>,
}

impl ChatService {
    pub fn builder(provider: Arc<dyn ModelProvider>) -> ChatServiceBuilder {
        ChatServiceBuilder::new(provider)
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub async fn run_turn(&self, request: ChatTurnRequest) -> Result<ChatTurnResult, ChatError> {
        self.run_turn_with_cancellation(request, future::pending::<()>())
            .await
    }

    /// Runs one turn, giving up when `cancel` resolves or the policy deadline passes.
    ///
    /// The user message is recorded before generation and is kept whatever the
    /// outcome; an assistant message is recorded only on success.
    pub async fn run_turn_with_cancellation<C>(
        &self,
        request: ChatTurnRequest,
        cancel: C,
    ) -> Result<ChatTurnResult, ChatError>
    where
        C: Future<Output = ()> + Send,
    {
        let ChatTurnRequest {
            session_id,
            message,
        } = request;

        if message.is_empty() {
            return Err(ChatError::invalid_request("message must not be empty"));
        }

        let session_id = match session_id {
            Some(id) if !id.is_empty() => id,
            _ => generate_session_id(),
        };

        let started = Instant::now();
        self.hooks.on_turn_start(&session_id);

        let outcome = self.execute_turn(&session_id, message, cancel).await;
        match &outcome {
            Ok(result) => self
                .hooks
                .on_turn_success(&session_id, started.elapsed(), result.usage),
            Err(error) => self
                .hooks
                .on_turn_failure(&session_id, started.elapsed(), error),
        }

        outcome
    }

    /// History for `session_id`. An unknown id is registered and yields an empty history.
    pub fn history(&self, session_id: &SessionId) -> Vec<ChatMessage> {
        self.store.resolve_or_create(session_id).history()
    }

    pub fn delete_session(&self, session_id: &SessionId) -> bool {
        let existed = self.store.delete(session_id);
        self.hooks.on_session_deleted(session_id, existed);
        existed
    }

    async fn execute_turn<C>(
        &self,
        session_id: &SessionId,
        message: String,
        cancel: C,
    ) -> Result<ChatTurnResult, ChatError>
    where
        C: Future<Output = ()> + Send,
    {
        let session = self.store.resolve_or_create(session_id);
        let user_message = session.append(ChatRole::User, message);
        let prior = session.history_excluding(&user_message.id);

        let prompt = format!("{}{}", render_context(&prior), user_message.content);
        let request = self.generation_request(session_id, prompt);

        // Only the Arc is held here; no session or store lock spans the provider call.
        let generation = self
            .await_generation(self.provider.generate(request), cancel)
            .await?;

        let assistant = session.append(ChatRole::Assistant, generation.text);
        Ok(ChatTurnResult {
            session_id: session.id().clone(),
            message: assistant,
            finish: generation.finish,
            usage: generation.usage,
        })
    }

    fn generation_request(&self, session_id: &SessionId, prompt: String) -> GenerationRequest {
        let mut request = GenerationRequest::new(prompt)
            .with_model(self.policy.model.clone())
            .with_options(self.policy.options)
            .for_session(session_id.clone());
        if let Some(system_prompt) = &self.policy.system_prompt {
            request = request.with_system_prompt(system_prompt.clone());
        }
        request
    }

    async fn await_generation<'a, C>(
        &self,
        generation: BoxFuture<'a, Result<Generation, ProviderError>>,
        cancel: C,
    ) -> Result<Generation, ChatError>
    where
        C: Future<Output = ()> + Send,
    {
        let deadline: BoxFuture<'static, ()> = match self.policy.turn_timeout {
            Some(limit) => Box::pin(Delay::new(limit)),
            None => Box::pin(future::pending()),
        };
        let cancel = pin!(cancel);

        match future::select(generation, future::select(deadline, cancel)).await {
            Either::Left((result, _)) => result.map_err(ChatError::from),
            Either::Right((Either::Left(_), _)) => Err(ChatError::timeout(format!(
                "generation did not finish within {}ms",
                self.policy
                    .turn_timeout
                    .map(|limit| limit.as_millis())
                    .unwrap_or_default()
            ))),
            Either::Right((Either::Right(_), _)) => {
                Err(ChatError::cancelled("turn cancelled before generation finished"))
            }
        }
    }
}

pub struct ChatServiceBuilder {
    provider: Arc<dyn ModelProvider>,
    policy: ChatPolicy,
    hooks: Arc<dyn ChatTurnHooks>,
}

impl ChatServiceBuilder {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            provider,
            policy: ChatPolicy::default(),
            hooks: Arc::new(NoopChatHooks),
        }
    }

    pub fn policy(mut self, policy: ChatPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.policy.model = model.into();
        self
    }

    pub fn system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.policy.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn options(mut self, options: GenerationOptions) -> Self {
        self.policy.options = options;
        self
    }

    pub fn turn_timeout(mut self, turn_timeout: Option<Duration>) -> Self {
        self.policy.turn_timeout = turn_timeout;
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn ChatTurnHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn build(self) -> Result<ChatService, ChatError> {
        self.policy.validate()?;

        Ok(ChatService {
            provider: self.provider,
            store: Arc::new(SessionStore::new()),
            policy: self.policy,
            hooks: self.hooks,
        })
    }
}

pub fn generate_session_id() -> SessionId {
    SessionId::new(format!("session_{}", Uuid::new_v4().simple()))
}
