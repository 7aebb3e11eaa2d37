//! Per-submission handler for the image Q&A page.
//!
//! Each submission receives the current history and, on success, returns
//! the next history together with the answer to render. The caller owns
//! the history and replaces it only when an answer comes back, so decode
//! and provider failures leave it exactly as it was.

use tracing::{Instrument, debug, info, info_span};

use gemtalk_types::error::VisionError;
use gemtalk_types::image::{DecodedImage, ImageUpload};
use gemtalk_types::llm::{CompletionRequest, LlmError, Message};
use gemtalk_types::vision::QaEntry;

use crate::llm::box_provider::BoxLlmProvider;

use super::decoder::ImageDecoder;
use super::history::QaHistory;

/// What the browser sent in one submission. Either field may still be
/// missing while the user is filling in the form.
#[derive(Debug, Default)]
pub struct Submission {
    pub question: Option<String>,
    pub image: Option<ImageUpload>,
}

/// Result of handling a submission.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Image or question missing: nothing was sent, history is unchanged.
    Incomplete,
    /// The model answered; `history` already contains the new entry.
    Answered { answer: String, history: QaHistory },
}

/// Request settings for image questions.
#[derive(Debug, Clone)]
pub struct VisionOptions {
    pub model: String,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

/// Answers questions about uploaded images.
pub struct VisionService {
    provider: BoxLlmProvider,
    decoder: Box<dyn ImageDecoder>,
    options: VisionOptions,
}

impl VisionService {
    pub fn new(
        provider: BoxLlmProvider,
        decoder: Box<dyn ImageDecoder>,
        options: VisionOptions,
    ) -> Self {
        Self {
            provider,
            decoder,
            options,
        }
    }

    pub fn model(&self) -> &str {
        &self.options.model
    }

    /// Ask one question about an already-decoded image.
    pub async fn ask(&self, question: &str, image: &DecodedImage) -> Result<String, LlmError> {
        let request = CompletionRequest {
            model: self.options.model.clone(),
            messages: vec![Message::user(question).with_attachment(image.to_attachment())],
            system: None,
            max_tokens: self.options.max_tokens,
            temperature: self.options.temperature,
        };

        let span = info_span!(
            "gen_ai.vision",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            image.format = %image.format,
            image.bytes = image.bytes.len(),
        );
        let response = self.provider.complete(&request).instrument(span).await?;
        Ok(response.content)
    }

    /// Handle one form submission against the current `history`.
    pub async fn handle(
        &self,
        history: &QaHistory,
        submission: Submission,
    ) -> Result<Outcome, VisionError> {
        let question = submission
            .question
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());

        let (Some(question), Some(upload)) = (question, submission.image) else {
            debug!("Submission incomplete, waiting for both image and question");
            return Ok(Outcome::Incomplete);
        };

        let image = self.decoder.decode(&upload)?;
        debug!(
            format = %image.format,
            width = image.width,
            height = image.height,
            "Decoded uploaded image"
        );

        let answer = self.ask(&question, &image).await?;
        info!(model = %self.options.model, "Image question answered");

        let history = history.clone().record(&QaEntry::new(question, answer.clone()));
        Ok(Outcome::Answered { answer, history })
    }
}
