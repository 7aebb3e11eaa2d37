//! ImageDecoder port.
//!
//! Decoding is synchronous and CPU-bound; the implementation lives in
//! gemtalk-infra (`RasterDecoder`).

use gemtalk_types::error::ImageError;
use gemtalk_types::image::{DecodedImage, ImageUpload};

/// Turns raw upload bytes into a validated in-memory image.
pub trait ImageDecoder: Send + Sync {
    fn decode(&self, upload: &ImageUpload) -> Result<DecodedImage, ImageError>;
}
