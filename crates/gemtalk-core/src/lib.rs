//! Business logic and provider trait definitions for gemtalk.
//!
//! This crate defines the "ports" (the `LlmProvider` and `ImageDecoder`
//! traits) that the infrastructure layer implements. It depends only on
//! `gemtalk-types` -- never on `gemtalk-infra` or any network/IO crate.

pub mod chat;
pub mod llm;
pub mod vision;
