//! Scripted provider shared by the unit tests in this crate.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use gemtalk_types::llm::{
    CompletionRequest, CompletionResponse, FinishReason, LlmError, ProviderCapabilities, Usage,
};

use super::provider::LlmProvider;

enum MockReply {
    Text(String),
    AuthFailure,
    Unavailable,
}

/// Replays a fixed script of replies and records every request it sees.
pub struct MockProvider {
    capabilities: ProviderCapabilities,
    replies: Mutex<VecDeque<MockReply>>,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockProvider {
    fn with_replies(replies: Vec<MockReply>) -> Self {
        Self {
            capabilities: ProviderCapabilities {
                vision: true,
                max_context_tokens: 32_000,
                max_output_tokens: 2_048,
            },
            replies: Mutex::new(replies.into()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn replying<const N: usize>(texts: [&str; N]) -> Self {
        Self::with_replies(texts.iter().map(|t| MockReply::Text(t.to_string())).collect())
    }

    pub fn failing_auth() -> Self {
        Self::with_replies(vec![MockReply::AuthFailure])
    }

    pub fn unavailable() -> Self {
        Self::with_replies(vec![MockReply::Unavailable])
    }

    /// Shared handle to the recorded requests; stays valid after boxing.
    pub fn calls(&self) -> Arc<Mutex<Vec<CompletionRequest>>> {
        Arc::clone(&self.calls)
    }
}

impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.calls.lock().unwrap().push(request.clone());
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(MockReply::Text(content)) => Ok(CompletionResponse {
                content,
                model: request.model.clone(),
                finish_reason: FinishReason::Stop,
                usage: Usage {
                    input_tokens: 10,
                    output_tokens: 5,
                },
            }),
            Some(MockReply::AuthFailure) => {
                Err(LlmError::AuthenticationFailed("API key not valid".to_string()))
            }
            Some(MockReply::Unavailable) | None => Err(LlmError::Provider {
                message: "HTTP 503: service unavailable".to_string(),
            }),
        }
    }
}
