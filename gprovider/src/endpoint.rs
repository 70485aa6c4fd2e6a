//! Where generation requests go and how they authenticate.
//!
//! Every supported backend speaks the OpenAI chat-completions dialect; they
//! differ only in base URL, default model, credential and accepted sampling
//! parameters.
//!
//! ```rust
//! use gprovider::{Endpoint, ProviderId};
//!
//! let endpoint = Endpoint::new(ProviderId::Gemini).with_api_key("key-123");
//! assert_eq!(endpoint.default_model, "gemini-2.5-flash");
//! assert!(endpoint.completions_url().ends_with("/openai/chat/completions"));
//! assert!(!format!("{endpoint:?}").contains("key-123"));
//! ```

use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

use crate::ProviderError;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Gemini,
    OpenAi,
    Ollama,
}

impl ProviderId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::Gemini => GEMINI_BASE_URL,
            Self::OpenAi => OPENAI_BASE_URL,
            Self::Ollama => OLLAMA_BASE_URL,
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Self::Gemini => "gemini-2.5-flash",
            Self::OpenAi => "gpt-4o-mini",
            Self::Ollama => "llama3.2",
        }
    }

    /// Environment variable holding this backend's key; `None` for keyless backends.
    pub fn api_key_var(self) -> Option<&'static str> {
        match self {
            Self::Gemini => Some("GEMINI_API_KEY"),
            Self::OpenAi => Some("OPENAI_API_KEY"),
            Self::Ollama => None,
        }
    }

    /// Whether the backend accepts `top_k` on its chat-completions route.
    pub fn accepts_top_k(self) -> bool {
        matches!(self, Self::Ollama)
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" | "googleai" => Ok(Self::Gemini),
            "openai" | "open-ai" => Ok(Self::OpenAi),
            "ollama" | "local" => Ok(Self::Ollama),
            other => Err(format!(
                "unknown provider '{other}', expected 'gemini', 'openai' or 'ollama'"
            )),
        }
    }
}

/// A bearer credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for ApiKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub provider: ProviderId,
    pub base_url: String,
    pub api_key: Option<ApiKey>,
    /// Used when a request leaves its model empty.
    pub default_model: String,
}

impl Endpoint {
    pub fn new(provider: ProviderId) -> Self {
        Self {
            provider,
            base_url: provider.default_base_url().to_string(),
            api_key: None,
            default_model: provider.default_model().to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(ApiKey::new(api_key));
        self
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Rejects endpoints that could never produce a successful call.
    pub fn check(&self) -> Result<(), ProviderError> {
        if self.base_url.trim().is_empty() {
            return Err(ProviderError::invalid_request("base URL must not be empty"));
        }

        if self.default_model.trim().is_empty() {
            return Err(ProviderError::invalid_request(
                "default model must not be empty",
            ));
        }

        let keyed = self
            .api_key
            .as_ref()
            .is_some_and(|key| !key.expose().trim().is_empty());
        if let Some(variable) = self.provider.api_key_var()
            && !keyed
        {
            return Err(ProviderError::unauthorized(format!(
                "{} requires an API key ({variable})",
                self.provider
            )));
        }

        Ok(())
    }
}
