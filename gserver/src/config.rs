//! Server configuration read from environment variables.
//!
//! ```rust
//! use gserver::config::ServerConfig;
//!
//! let config = ServerConfig::from_lookup(|key| match key {
//!     "GOSSIP_PROVIDER" => Some("ollama".to_string()),
//!     "GOSSIP_TEMPERATURE" => Some("0.4".to_string()),
//!     _ => None,
//! })
//! .expect("config should parse");
//!
//! assert_eq!(config.endpoint().default_model, "llama3.2");
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use gossip::{
    ChatPolicy, DEFAULT_REQUEST_TIMEOUT, DEFAULT_TURN_TIMEOUT, Endpoint, GenerationOptions,
    ProviderId, RetryPolicy,
};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_RETRIES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub variable: &'static str,
    pub message: String,
}

impl ConfigError {
    pub fn new(variable: &'static str, message: impl Into<String>) -> Self {
        Self {
            variable,
            message: message.into(),
        }
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.variable, self.message)
    }
}

impl Error for ConfigError {}

#[derive(Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub provider: ProviderId,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub system_prompt: Option<String>,
    pub options: GenerationOptions,
    pub request_timeout: Duration,
    pub turn_timeout: Duration,
    pub shutdown_grace: Duration,
    pub max_retries: u32,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("system_prompt", &self.system_prompt)
            .field("options", &self.options)
            .field("request_timeout", &self.request_timeout)
            .field("turn_timeout", &self.turn_timeout)
            .field("shutdown_grace", &self.shutdown_grace)
            .field("max_retries", &self.max_retries)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bind_addr = parse_or(&text, "GOSSIP_BIND_ADDR", || {
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().map_err(|err| err.to_string())
        })?;

        let provider = match text("GOSSIP_PROVIDER") {
            Some(value) => value
                .parse::<ProviderId>()
                .map_err(|err| ConfigError::new("GOSSIP_PROVIDER", err))?,
            None => ProviderId::Gemini,
        };

        let api_key = match provider.api_key_var() {
            Some(variable) => Some(text(variable).ok_or_else(|| {
                ConfigError::new(
                    variable,
                    format!("required when GOSSIP_PROVIDER is '{provider}'"),
                )
            })?),
            None => None,
        };

        let options = GenerationOptions {
            temperature: parse_optional(&text, "GOSSIP_TEMPERATURE")?,
            max_tokens: parse_optional(&text, "GOSSIP_MAX_TOKENS")?,
            top_p: parse_optional(&text, "GOSSIP_TOP_P")?,
            top_k: parse_optional(&text, "GOSSIP_TOP_K")?,
        };

        let seconds = |key: &'static str, default: Duration| -> Result<Duration, ConfigError> {
            let value = parse_or(&text, key, || Ok(default.as_secs()))?;
            Ok(Duration::from_secs(value))
        };

        let log_format = match text("GOSSIP_LOG_FORMAT") {
            Some(value) => value
                .parse::<LogFormat>()
                .map_err(|err| ConfigError::new("GOSSIP_LOG_FORMAT", err))?,
            None => LogFormat::default(),
        };

        let config = Self {
            bind_addr,
            provider,
            api_key,
            base_url: text("GOSSIP_BASE_URL"),
            model: text("GOSSIP_MODEL"),
            system_prompt: text("GOSSIP_SYSTEM_PROMPT"),
            options,
            request_timeout: seconds("GOSSIP_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT)?,
            turn_timeout: seconds("GOSSIP_TURN_TIMEOUT_SECS", DEFAULT_TURN_TIMEOUT)?,
            shutdown_grace: seconds("GOSSIP_SHUTDOWN_GRACE_SECS", DEFAULT_SHUTDOWN_GRACE)?,
            max_retries: parse_or(&text, "GOSSIP_MAX_RETRIES", || Ok(DEFAULT_MAX_RETRIES))?,
            log_level: text("GOSSIP_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_format,
        };

        if config.turn_timeout.is_zero() {
            return Err(ConfigError::new(
                "GOSSIP_TURN_TIMEOUT_SECS",
                "must be greater than zero",
            ));
        }

        config
            .chat_policy()
            .validate()
            .map_err(|err| ConfigError::new("GOSSIP_SAMPLING", err.message))?;

        Ok(config)
    }

    pub fn model(&self) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| self.provider.default_model().to_string())
    }

    pub fn endpoint(&self) -> Endpoint {
        let mut endpoint = Endpoint::new(self.provider).with_default_model(self.model());

        if let Some(api_key) = &self.api_key {
            endpoint = endpoint.with_api_key(api_key.clone());
        }

        if let Some(base_url) = &self.base_url {
            endpoint = endpoint.with_base_url(base_url.clone());
        }

        endpoint
    }

    /// `GOSSIP_MAX_RETRIES` counts retries, so attempts are one more.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default().with_max_attempts(self.max_retries.saturating_add(1))
    }

    /// The model stays empty here; the endpoint carries the resolved one.
    pub fn chat_policy(&self) -> ChatPolicy {
        ChatPolicy {
            model: String::new(),
            system_prompt: self.system_prompt.clone(),
            options: self.options,
            turn_timeout: Some(self.turn_timeout),
        }
    }
}

/// Loads `.env` from the working directory or its nearest ancestor.
///
/// Variables already present in the environment are left untouched.
pub fn load_dotenv() -> Result<Option<PathBuf>, ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(ConfigError::new(".env", err.to_string())),
    }
}

fn parse_optional<T>(
    text: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    text(key)
        .map(|value| {
            value
                .parse::<T>()
                .map_err(|err| ConfigError::new(key, format!("invalid value '{value}': {err}")))
        })
        .transpose()
}

fn parse_or<T, D>(
    text: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: D,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    D: FnOnce() -> Result<T, String>,
{
    match parse_optional(text, key)? {
        Some(value) => Ok(value),
        None => default().map_err(|err| ConfigError::new(key, err)),
    }
}
