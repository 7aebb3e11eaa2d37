//! Raster image decoding for uploads, backed by the `image` crate.
//!
//! The upload's real format is sniffed from its bytes; a filename extension,
//! when present, must still be one of the accepted ones.

use std::path::Path;

use gemtalk_core::vision::decoder::ImageDecoder;
use gemtalk_types::error::ImageError;
use gemtalk_types::image::{DecodedImage, ImageFormat, ImageUpload};

/// Decodes jpg/jpeg, png and gif uploads.
#[derive(Debug, Default, Clone, Copy)]
pub struct RasterDecoder;

impl RasterDecoder {
    pub fn new() -> Self {
        Self
    }
}

fn check_extension(filename: &str) -> Result<(), ImageError> {
    let Some(ext) = Path::new(filename).extension().and_then(|e| e.to_str()) else {
        return Ok(());
    };
    match ImageFormat::from_extension(ext) {
        Some(_) => Ok(()),
        None => Err(ImageError::UnsupportedFormat(ext.to_ascii_lowercase())),
    }
}

fn map_format(format: image::ImageFormat) -> Result<ImageFormat, ImageError> {
    match format {
        image::ImageFormat::Jpeg => Ok(ImageFormat::Jpeg),
        image::ImageFormat::Png => Ok(ImageFormat::Png),
        image::ImageFormat::Gif => Ok(ImageFormat::Gif),
        other => Err(ImageError::UnsupportedFormat(
            format!("{other:?}").to_ascii_lowercase(),
        )),
    }
}

impl ImageDecoder for RasterDecoder {
    fn decode(&self, upload: &ImageUpload) -> Result<DecodedImage, ImageError> {
        if upload.bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        if let Some(filename) = &upload.filename {
            check_extension(filename)?;
        }

        let detected =
            image::guess_format(&upload.bytes).map_err(|e| ImageError::Decode(e.to_string()))?;
        let format = map_format(detected)?;

        let decoded = image::load_from_memory_with_format(&upload.bytes, detected)
            .map_err(|e| ImageError::Decode(e.to_string()))?;

        Ok(DecodedImage {
            format,
            width: decoded.width(),
            height: decoded.height(),
            bytes: upload.bytes.clone(),
        })
    }
}
