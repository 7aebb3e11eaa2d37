//! Global configuration types for gemtalk.
//!
//! `GlobalConfig` represents the `config.toml` that selects models, the API
//! base URL, request timeouts, and web server settings.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// Loaded from `~/.gemtalk/config.toml` (or `--config`). All fields have
/// sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Model used by the terminal chat.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Model used to answer questions about images.
    #[serde(default = "default_vision_model")]
    pub vision_model: String,

    /// Base URL of the Generative Language API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds. 0 disables the timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Pause after "Quitting ..." before the chat exits.
    #[serde(default = "default_farewell_pause_ms")]
    pub farewell_pause_ms: u64,

    /// Optional system instruction sent with every chat request.
    #[serde(default)]
    pub system_prompt: Option<String>,

    #[serde(default)]
    pub temperature: Option<f64>,

    #[serde(default)]
    pub max_output_tokens: Option<u32>,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_chat_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_vision_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_farewell_pause_ms() -> u64 {
    2000
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            chat_model: default_chat_model(),
            vision_model: default_vision_model(),
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            farewell_pause_ms: default_farewell_pause_ms(),
            system_prompt: None,
            temperature: None,
            max_output_tokens: None,
            server: ServerConfig::default(),
        }
    }
}

/// Web server settings for the image Q&A page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted multipart body, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Sessions untouched for this many seconds are dropped. 0 keeps them
    /// until deleted.
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,

    /// Live session cap; the least recently used one is evicted to make
    /// room. 0 means no cap.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_session_idle_secs() -> u64 {
    30 * 60
}

fn default_max_sessions() -> usize {
    1000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
            session_idle_secs: default_session_idle_secs(),
            max_sessions: default_max_sessions(),
        }
    }
}
