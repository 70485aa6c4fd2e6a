//! Text generation over OpenAI-compatible chat-completions endpoints.
//!
//! The chat layer depends only on [`ModelProvider`]. [`CompatClient`] is the
//! one production implementation; it talks to Gemini, OpenAI or Ollama
//! depending on its [`Endpoint`], retrying transient failures according to a
//! [`RetryPolicy`].
//!
//! ```rust
//! use gprovider::{GenerationOptions, GenerationRequest};
//!
//! let request = GenerationRequest::new("Hello")
//!     .with_system_prompt("Answer in one sentence.")
//!     .with_options(GenerationOptions::default().with_temperature(0.2));
//! assert!(request.validate().is_ok());
//! ```

mod client;
mod endpoint;
mod error;
mod generation;
mod retry;
mod wire;

pub use client::{CompatClient, DEFAULT_REQUEST_TIMEOUT};
pub use endpoint::{
    ApiKey, Endpoint, GEMINI_BASE_URL, OLLAMA_BASE_URL, OPENAI_BASE_URL, ProviderId,
};
pub use error::{ProviderError, ProviderErrorKind};
pub use generation::{
    FinishReason, Generation, GenerationRequest, ModelProvider, ProviderFuture, TokenUsage,
    validate_options,
};
pub use retry::RetryPolicy;
pub use gcommon::GenerationOptions;
