//! GeminiProvider -- concrete [`LlmProvider`] implementation for Google Gemini.
//!
//! Sends requests to `POST {base_url}/v1beta/models/{model}:generateContent`
//! with the key in the `x-goog-api-key` header. Images travel as base64
//! `inlineData` parts next to the question text.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use secrecy::{ExposeSecret, SecretString};

use gemtalk_core::llm::provider::LlmProvider;
use gemtalk_types::llm::{
    CompletionRequest, CompletionResponse, FinishReason, LlmError, Message, MessageRole,
    ProviderCapabilities, Usage,
};

use super::types::{
    GeminiBlob, GeminiContent, GeminiErrorEnvelope, GeminiPart, GeminiRequest, GeminiResponse,
    GenerationConfig,
};

/// Default public endpoint of the Generative Language API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Google Gemini LLM provider.
///
/// # API Key Security
///
/// The API key is stored as a [`SecretString`] and is only exposed when
/// constructing HTTP request headers. It never appears in URLs or logs.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    capabilities: ProviderCapabilities,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    ///
    /// # Arguments
    ///
    /// * `api_key` - API key wrapped in SecretString
    /// * `model` - Default model identifier (e.g., "gemini-2.0-flash"),
    ///   used when a request leaves `model` empty
    /// * `timeout` - Whole-request timeout; `None` waits indefinitely
    pub fn new(
        api_key: SecretString,
        model: String,
        timeout: Option<Duration>,
    ) -> Result<Self, LlmError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        let capabilities = Self::capabilities_for_model(&model);

        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model,
            capabilities,
        })
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn capabilities_for_model(model: &str) -> ProviderCapabilities {
        if model.contains("1.5-pro") || model.contains("2.5-pro") {
            ProviderCapabilities {
                vision: true,
                max_context_tokens: 2_000_000,
                max_output_tokens: 8_192,
            }
        } else if model.starts_with("gemini-1.0-pro") || model == "gemini-pro" {
            // Text-only first generation.
            ProviderCapabilities {
                vision: false,
                max_context_tokens: 32_760,
                max_output_tokens: 8_192,
            }
        } else {
            ProviderCapabilities {
                vision: true,
                max_context_tokens: 1_000_000,
                max_output_tokens: 8_192,
            }
        }
    }

    fn url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }

    fn to_gemini_content(message: &Message) -> GeminiContent {
        let role = match message.role {
            MessageRole::User => "user",
            MessageRole::Assistant => "model",
        };

        let mut parts = Vec::with_capacity(1 + message.attachments.len());
        if !message.content.is_empty() {
            parts.push(GeminiPart::Text {
                text: message.content.clone(),
            });
        }
        for attachment in &message.attachments {
            parts.push(GeminiPart::InlineData {
                inline_data: GeminiBlob {
                    mime_type: attachment.mime_type.clone(),
                    data: BASE64.encode(&attachment.data),
                },
            });
        }

        GeminiContent {
            role: Some(role.to_string()),
            parts,
        }
    }

    /// Convert a generic [`CompletionRequest`] into a [`GeminiRequest`].
    fn to_gemini_request(request: &CompletionRequest) -> GeminiRequest {
        let generation_config = if request.max_tokens.is_none() && request.temperature.is_none() {
            None
        } else {
            Some(GenerationConfig {
                max_output_tokens: request.max_tokens,
                temperature: request.temperature,
            })
        };

        GeminiRequest {
            contents: request.messages.iter().map(Self::to_gemini_content).collect(),
            system_instruction: request.system.as_ref().map(|system| GeminiContent {
                role: None,
                parts: vec![GeminiPart::Text {
                    text: system.clone(),
                }],
            }),
            generation_config,
        }
    }

    /// Map a non-2xx response to an [`LlmError`].
    fn error_for_status(status: reqwest::StatusCode, body: &str) -> LlmError {
        let (message, api_status) = match serde_json::from_str::<GeminiErrorEnvelope>(body) {
            Ok(envelope) => (envelope.error.message, envelope.error.status),
            Err(_) => (body.to_string(), String::new()),
        };

        match status.as_u16() {
            // Gemini reports a bad key as 400 INVALID_ARGUMENT.
            400 if message.contains("API key") => LlmError::AuthenticationFailed(message),
            401 | 403 => LlmError::AuthenticationFailed(message),
            429 => LlmError::RateLimited(message),
            400 | 404 => LlmError::InvalidRequest(format!("{api_status}: {message}")),
            _ => LlmError::Provider {
                message: format!("HTTP {status}: {message}"),
            },
        }
    }

    fn map_finish_reason(reason: Option<&str>) -> FinishReason {
        match reason {
            Some("STOP") | None => FinishReason::Stop,
            Some("MAX_TOKENS") => FinishReason::MaxTokens,
            Some("SAFETY") | Some("RECITATION") | Some("BLOCKLIST") | Some("PROHIBITED_CONTENT") => {
                FinishReason::Safety
            }
            Some(_) => FinishReason::Other,
        }
    }

    fn into_completion(response: GeminiResponse, model: &str) -> Result<CompletionResponse, LlmError> {
        let Some(candidate) = response.candidates.into_iter().next() else {
            let reason = response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .map(|r| format!("prompt blocked: {r}"))
                .unwrap_or_else(|| "no candidates".to_string());
            return Err(LlmError::EmptyResponse(reason));
        };

        let finish_reason = Self::map_finish_reason(candidate.finish_reason.as_deref());
        let content = candidate
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|part| match part {
                        GeminiPart::Text { text } => Some(text),
                        _ => None,
                    })
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if content.is_empty() {
            return Err(LlmError::EmptyResponse(format!(
                "finish reason {}",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        let usage = response.usage_metadata.unwrap_or_default();
        Ok(CompletionResponse {
            content,
            model: response.model_version.unwrap_or_else(|| model.to_string()),
            finish_reason,
            usage: Usage {
                input_tokens: usage.prompt_token_count,
                output_tokens: usage.candidates_token_count,
            },
        })
    }
}

// No Debug impl: the struct holds the API key.

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        if request.messages.is_empty() {
            return Err(LlmError::InvalidRequest("no messages to send".to_string()));
        }
        let model = if request.model.is_empty() {
            self.model.as_str()
        } else {
            request.model.as_str()
        };

        let has_images = request.messages.iter().any(|m| !m.attachments.is_empty());
        if has_images && !self.capabilities.vision {
            return Err(LlmError::InvalidRequest(format!(
                "model '{model}' does not accept images"
            )));
        }

        let body = Self::to_gemini_request(request);
        tracing::debug!(
            model,
            messages = body.contents.len(),
            has_images,
            "Calling Gemini generateContent"
        );

        let response = self
            .client
            .post(self.url(model))
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let err = Self::error_for_status(status, &error_body);
            tracing::warn!(%status, error = %err, "Gemini request failed");
            return Err(err);
        }

        let gemini_resp: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        Self::into_completion(gemini_resp, model)
    }
}
