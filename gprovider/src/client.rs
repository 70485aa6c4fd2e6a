//! HTTP client for OpenAI-compatible chat-completions endpoints.

use std::time::Duration;

use reqwest::Client;

use crate::wire::{Completion, CompletionBody, error_message, retry_after};
use crate::{
    Endpoint, Generation, GenerationRequest, ModelProvider, ProviderError, ProviderFuture,
    ProviderId, RetryPolicy,
};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Debug, Clone)]
pub struct CompatClient {
    endpoint: Endpoint,
    http: Client,
    retry: RetryPolicy,
}

impl CompatClient {
    /// Builds a client whose individual HTTP calls give up after `request_timeout`.
    pub fn new(endpoint: Endpoint, request_timeout: Duration) -> Result<Self, ProviderError> {
        endpoint.check()?;

        let http = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|err| ProviderError::network(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            endpoint,
            http,
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    async fn call(&self, request: GenerationRequest) -> Result<Generation, ProviderError> {
        let model = match request.model.trim() {
            "" => self.endpoint.default_model.as_str(),
            model => model,
        };
        request.validate()?;

        let body = CompletionBody::new(self.endpoint.provider, model, &request);
        let session = request
            .session_id
            .as_ref()
            .map(|id| id.as_str())
            .unwrap_or_default();

        let mut attempt = 1;
        loop {
            match self.post(&body).await {
                Ok(generation) => {
                    tracing::debug!(
                        provider = %self.endpoint.provider,
                        model,
                        session,
                        attempt,
                        total_tokens = generation.usage.total_tokens,
                        "completion received"
                    );
                    return Ok(generation);
                }
                Err(error) => match self.retry.next_delay(attempt, &error) {
                    Some(delay) => {
                        tracing::warn!(
                            provider = %self.endpoint.provider,
                            session,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            error = %error,
                            "completion failed, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    None => return Err(error),
                },
            }
        }
    }

    async fn post(&self, body: &CompletionBody<'_>) -> Result<Generation, ProviderError> {
        let mut builder = self.http.post(self.endpoint.completions_url()).json(body);
        if let Some(key) = &self.endpoint.api_key {
            builder = builder.bearer_auth(key.expose());
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let wait = retry_after(response.headers());
            let text = response.text().await.unwrap_or_default();
            let message = error_message(&text)
                .unwrap_or_else(|| format!("{} returned {status}", self.endpoint.provider));

            let error = ProviderError::from_status(status.as_u16(), message);
            return Err(match wait {
                Some(wait) => error.with_retry_after(wait),
                None => error,
            });
        }

        response.json::<Completion>().await?.into_generation()
    }
}

impl ModelProvider for CompatClient {
    fn id(&self) -> ProviderId {
        self.endpoint.provider
    }

    fn generate<'a>(
        &'a self,
        request: GenerationRequest,
    ) -> ProviderFuture<'a, Result<Generation, ProviderError>> {
        Box::pin(self.call(request))
    }
}
