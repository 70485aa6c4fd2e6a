//! JSON shapes of the chat-completions route, limited to the fields a single
//! text turn needs.

use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{FinishReason, Generation, GenerationRequest, ProviderError, ProviderId, TokenUsage};

#[derive(Debug, Serialize)]
pub(crate) struct CompletionBody<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> CompletionBody<'a> {
    pub(crate) fn new(provider: ProviderId, model: &'a str, request: &'a GenerationRequest) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(system_prompt) = &request.system_prompt {
            messages.push(WireMessage {
                role: "system",
                content: system_prompt,
            });
        }
        messages.push(WireMessage {
            role: "user",
            content: &request.prompt,
        });

        let options = request.options;
        Self {
            model,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: options.top_p,
            top_k: options.top_k.filter(|_| provider.accepts_top_k()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Completion {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

impl Completion {
    pub(crate) fn into_generation(self) -> Result<Generation, ProviderError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::malformed("completion contained no choices"))?;

        let usage = self.usage.unwrap_or_default();
        Ok(Generation::new(choice.message.content.unwrap_or_default())
            .with_finish(FinishReason::from_wire(choice.finish_reason.as_deref()))
            .with_usage(TokenUsage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            }))
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Pulls the upstream's own error message out of a failure body.
///
/// Gemini wraps the envelope in a one-element array; OpenAI and Ollama do not.
pub(crate) fn error_message(body: &str) -> Option<String> {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return Some(envelope.error.message);
    }

    serde_json::from_str::<Vec<ErrorEnvelope>>(body)
        .ok()?
        .into_iter()
        .next()
        .map(|envelope| envelope.error.message)
}

/// Whole-second `Retry-After` values; HTTP-date forms are ignored.
pub(crate) fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use gcommon::GenerationOptions;
    use reqwest::header::HeaderValue;
    use serde_json::json;

    use super::*;
    use crate::ProviderErrorKind;

    fn request() -> GenerationRequest {
        GenerationRequest::new("Conversation history:\nUser: hi\n\nhello again")
            .with_system_prompt("Be brief.")
            .with_options(
                GenerationOptions::default()
                    .with_temperature(0.4)
                    .with_top_k(20),
            )
    }

    #[test]
    fn body_puts_system_prompt_first_and_omits_unset_options() {
        let request = request();
        let body = serde_json::to_value(CompletionBody::new(ProviderId::Gemini, "m", &request))
            .expect("body should encode");

        assert_eq!(
            body,
            json!({
                "model": "m",
                "messages": [
                    {"role": "system", "content": "Be brief."},
                    {"role": "user", "content": "Conversation history:\nUser: hi\n\nhello again"},
                ],
                "temperature": 0.4_f32,
            })
        );
    }

    #[test]
    fn top_k_reaches_only_backends_that_accept_it() {
        let request = request();
        let ollama = serde_json::to_value(CompletionBody::new(ProviderId::Ollama, "m", &request))
            .expect("body should encode");
        assert_eq!(ollama["top_k"], 20);

        let openai = serde_json::to_value(CompletionBody::new(ProviderId::OpenAi, "m", &request))
            .expect("body should encode");
        assert!(openai.get("top_k").is_none());
    }

    #[test]
    fn completion_maps_first_choice_and_usage() {
        let completion: Completion = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Hi there"}, "finish_reason": "length"}
            ],
            "usage": {"prompt_tokens": 9, "completion_tokens": 2, "total_tokens": 11}
        }))
        .expect("completion should decode");

        let generation = completion.into_generation().expect("generation");
        assert_eq!(generation.text, "Hi there");
        assert_eq!(generation.finish, FinishReason::Length);
        assert_eq!(generation.usage.total_tokens, 11);
    }

    #[test]
    fn completion_without_choices_is_malformed() {
        let completion: Completion =
            serde_json::from_value(json!({"choices": []})).expect("completion should decode");
        let error = completion.into_generation().expect_err("no choices");
        assert_eq!(error.kind, ProviderErrorKind::MalformedResponse);
    }

    #[test]
    fn error_messages_are_found_in_both_envelope_shapes() {
        assert_eq!(
            error_message(r#"{"error":{"message":"Incorrect API key","type":"invalid_request_error"}}"#),
            Some("Incorrect API key".to_string())
        );
        assert_eq!(
            error_message(r#"[{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}]"#),
            Some("API key not valid".to_string())
        );
        assert_eq!(error_message("<html>bad gateway</html>"), None);
    }

    #[test]
    fn retry_after_reads_whole_seconds() {
        let mut headers = HeaderMap::new();
        assert_eq!(retry_after(&headers), None);

        headers.insert(RETRY_AFTER, HeaderValue::from_static("7"));
        assert_eq!(retry_after(&headers), Some(Duration::from_secs(7)));

        headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2026 07:28:00 GMT"));
        assert_eq!(retry_after(&headers), None);
    }
}
