//! LLM provider implementations.
//!
//! Contains the Gemini implementation of the [`LlmProvider`] trait defined
//! in `gemtalk-core`, plus a factory ([`create_provider`]) that builds it
//! from the global configuration and a resolved API key.
//!
//! [`LlmProvider`]: gemtalk_core::llm::provider::LlmProvider

pub mod gemini;

use std::time::Duration;

use secrecy::SecretString;

use gemtalk_core::llm::box_provider::BoxLlmProvider;
use gemtalk_types::config::GlobalConfig;
use gemtalk_types::llm::LlmError;

use self::gemini::GeminiProvider;

/// Create a [`BoxLlmProvider`] for `model` using the endpoint and timeout
/// from `config`. A `request_timeout_secs` of 0 disables the timeout.
///
/// # Errors
///
/// Returns [`LlmError::InvalidRequest`] for an empty model name and
/// [`LlmError::Provider`] if the HTTP client cannot be built.
pub fn create_provider(
    config: &GlobalConfig,
    model: &str,
    api_key: SecretString,
) -> Result<BoxLlmProvider, LlmError> {
    let model = model.trim();
    if model.is_empty() {
        return Err(LlmError::InvalidRequest("model name is empty".to_string()));
    }

    let timeout = (config.request_timeout_secs > 0)
        .then(|| Duration::from_secs(config.request_timeout_secs));
    let provider = GeminiProvider::new(api_key, model.to_string(), timeout)?
    .with_base_url(config.base_url.clone());

    tracing::debug!(model, base_url = %config.base_url, "Created Gemini provider");
    Ok(BoxLlmProvider::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemtalk_types::llm::{CompletionRequest, Message};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn ping() -> CompletionRequest {
        CompletionRequest {
            model: String::new(),
            messages: vec![Message::user("ping")],
            system: None,
            max_tokens: None,
            temperature: None,
        }
    }

    #[test]
    fn test_create_provider_gemini() {
        let provider = create_provider(
            &GlobalConfig::default(),
            "gemini-2.0-flash",
            SecretString::from("test-key"),
        )
        .unwrap();
        assert_eq!(provider.name(), "gemini");
        assert!(provider.capabilities().vision);
    }

    #[test]
    fn test_create_provider_rejects_blank_model() {
        let result = create_provider(&GlobalConfig::default(), "  ", SecretString::from("k"));
        assert!(matches!(result, Err(LlmError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_created_provider_uses_configured_base_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"role": "model", "parts": [{"text": "pong"}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = GlobalConfig {
            base_url: server.uri(),
            ..GlobalConfig::default()
        };
        let provider =
            create_provider(&config, "gemini-1.5-flash", SecretString::from("k")).unwrap();

        let response = provider.complete(&ping()).await.unwrap();
        assert_eq!(response.content, "pong");
        assert_eq!(response.model, "gemini-1.5-flash");
    }

    #[tokio::test]
    async fn test_zero_timeout_means_no_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({
                        "candidates": [{"content": {"role": "model", "parts": [{"text": "late"}]}}]
                    }))
                    .set_delay(std::time::Duration::from_millis(200)),
            )
            .mount(&server)
            .await;

        let config = GlobalConfig {
            base_url: server.uri(),
            request_timeout_secs: 0,
            ..GlobalConfig::default()
        };
        let provider =
            create_provider(&config, "gemini-2.0-flash", SecretString::from("k")).unwrap();

        let response = provider.complete(&ping()).await.unwrap();
        assert_eq!(response.content, "late");
    }
}
