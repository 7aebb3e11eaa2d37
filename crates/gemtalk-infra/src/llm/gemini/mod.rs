//! Google Gemini LLM provider implementation.
//!
//! This module provides the [`GeminiProvider`] which implements the
//! [`LlmProvider`](gemtalk_core::llm::provider::LlmProvider) trait for the
//! Generative Language `generateContent` API, covering both text chat and
//! image questions.

pub mod client;
pub mod types;

pub use client::GeminiProvider;
