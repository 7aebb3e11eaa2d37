//! Question/answer entries produced by the image Q&A page.

use serde::{Deserialize, Serialize};

/// One answered question about an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaEntry {
    pub question: String,
    pub answer: String,
}

impl QaEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Format as `"Q: {question}\n\nA: {answer}"`.
    pub fn render(&self) -> String {
        format!("Q: {}\n\nA: {}", self.question, self.answer)
    }
}
