//! Shared domain types for gemtalk.
//!
//! This crate contains the data shapes used across the workspace: chat turns
//! and transcripts, LLM request/response types, decoded images, Q/A entries,
//! configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod image;
pub mod llm;
pub mod vision;
