//! Chat session: owns the transcript and forwards each user message,
//! together with the full prior transcript, to the provider.

use tracing::{Instrument, debug, info_span};

use gemtalk_types::chat::{Transcript, Turn};
use gemtalk_types::error::ChatError;
use gemtalk_types::llm::{CompletionRequest, Message};

use crate::llm::box_provider::BoxLlmProvider;

/// Per-session request settings.
#[derive(Debug, Clone)]
pub struct ChatOptions {
    pub model: String,
    pub system: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

impl ChatOptions {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: None,
            temperature: None,
            max_tokens: None,
        }
    }
}

/// A single terminal conversation.
///
/// The transcript only grows on a successful exchange: one user turn
/// followed by one assistant turn. A failed call leaves it untouched.
pub struct ChatSession {
    provider: BoxLlmProvider,
    options: ChatOptions,
    transcript: Transcript,
}

impl ChatSession {
    pub fn new(provider: BoxLlmProvider, options: ChatOptions) -> Self {
        Self {
            provider,
            options,
            transcript: Transcript::new(),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn model(&self) -> &str {
        &self.options.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Send one user message and return the assistant's turn.
    ///
    /// Issues exactly one provider call.
    pub async fn send(&mut self, text: &str) -> Result<&Turn, ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let request = self.build_request(text);
        debug!(
            model = %request.model,
            context_turns = self.transcript.len(),
            "Sending chat message"
        );

        let span = info_span!(
            "gen_ai.chat",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = ?request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
        );
        let response = self.provider.complete(&request).instrument(span).await?;
        debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            finish_reason = %response.finish_reason,
            "Received chat reply"
        );

        self.transcript.push(Turn::user(text));
        Ok(self.transcript.push(Turn::assistant(response.content)))
    }

    fn build_request(&self, text: &str) -> CompletionRequest {
        let mut messages = self.transcript.to_messages();
        messages.push(Message::user(text));

        CompletionRequest {
            model: self.options.model.clone(),
            messages,
            system: self.options.system.clone(),
            max_tokens: self.options.max_tokens,
            temperature: self.options.temperature,
        }
    }
}
