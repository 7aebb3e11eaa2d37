use thiserror::Error;

use crate::llm::LlmError;

/// Errors raised while turning an upload into a [`DecodedImage`](crate::image::DecodedImage).
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("no image data received")]
    Empty,

    #[error("unsupported image type '{0}' (expected jpg, jpeg, png or gif)")]
    UnsupportedFormat(String),

    #[error("could not decode image: {0}")]
    Decode(String),
}

/// Errors resolving the API credential.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("{0} is not set. Add it to your environment or a .env file")]
    Missing(String),

    #[error("{0} is set but empty")]
    Blank(String),

    #[error("failed to read .env file: {0}")]
    DotEnv(String),
}

/// Errors from a terminal chat exchange.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyMessage,

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Errors from one image Q&A submission.
#[derive(Debug, Error)]
pub enum VisionError {
    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Llm(#[from] LlmError),
}
