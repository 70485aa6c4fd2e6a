//! The generation contract: one prompt in, one reply out.

use gcommon::{BoxFuture, GenerationOptions, SessionId};

use crate::{ProviderError, ProviderId};

pub type ProviderFuture<'a, T> = BoxFuture<'a, T>;

/// Produces a single reply for a fully rendered prompt.
pub trait ModelProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    fn generate<'a>(
        &'a self,
        request: GenerationRequest,
    ) -> ProviderFuture<'a, Result<Generation, ProviderError>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Empty selects the provider's default model.
    pub model: String,
    pub system_prompt: Option<String>,
    pub prompt: String,
    pub options: GenerationOptions,
    /// Conversation the prompt belongs to, for log correlation only.
    pub session_id: Option<SessionId>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            model: String::new(),
            system_prompt: None,
            prompt: prompt.into(),
            options: GenerationOptions::default(),
            session_id: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn for_session(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.prompt.is_empty() {
            return Err(ProviderError::invalid_request("prompt must not be empty"));
        }

        validate_options(&self.options)
    }
}

/// Range checks shared by request validation and up-front policy checks.
pub fn validate_options(options: &GenerationOptions) -> Result<(), ProviderError> {
    if let Some(temperature) = options.temperature
        && !(0.0..=2.0).contains(&temperature)
    {
        return Err(ProviderError::invalid_request(format!(
            "temperature {temperature} is outside 0.0..=2.0"
        )));
    }

    if let Some(top_p) = options.top_p
        && !(0.0..=1.0).contains(&top_p)
    {
        return Err(ProviderError::invalid_request(format!(
            "top_p {top_p} is outside 0.0..=1.0"
        )));
    }

    if options.max_tokens == Some(0) {
        return Err(ProviderError::invalid_request(
            "max_tokens must be greater than zero",
        ));
    }

    if options.top_k == Some(0) {
        return Err(ProviderError::invalid_request(
            "top_k must be greater than zero",
        ));
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinishReason {
    #[default]
    Stop,
    Length,
    ContentFilter,
    Other,
}

impl FinishReason {
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            None | Some("stop") => Self::Stop,
            Some("length") | Some("max_tokens") => Self::Length,
            Some("content_filter") => Self::ContentFilter,
            Some(_) => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    pub finish: FinishReason,
    pub usage: TokenUsage,
}

impl Generation {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            finish: FinishReason::Stop,
            usage: TokenUsage::default(),
        }
    }

    pub fn with_finish(mut self, finish: FinishReason) -> Self {
        self.finish = finish;
        self
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = usage;
        self
    }
}
