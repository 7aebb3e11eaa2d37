//! Infrastructure layer for gemtalk.
//!
//! Contains implementations of the ports defined in `gemtalk-core`: the
//! Gemini REST provider, raster image decoding, credential loading from the
//! environment, and `config.toml` handling.

pub mod config;
pub mod filesystem;
pub mod raster;
pub mod llm;
pub mod secret;
