//! Global configuration loader for gemtalk.
//!
//! Reads `config.toml` (from the data directory, or an explicit `--config`
//! path) and deserializes it into [`GlobalConfig`]. Falls back to defaults
//! when the file is missing or malformed.

use std::path::Path;

use gemtalk_types::config::GlobalConfig;

/// Load configuration from `config_path`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and returns the default.
/// - Otherwise returns the parsed config.
pub async fn load_global_config(config_path: &Path) -> GlobalConfig {
    let content = match tokio::fs::read_to_string(config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_global_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_global_config(&tmp.path().join("config.toml")).await;
        assert_eq!(config.chat_model, "gemini-2.0-flash");
        assert_eq!(config.server.port, 8501);
    }

    #[tokio::test]
    async fn load_global_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(
            &config_path,
            r#"
vision_model = "gemini-1.5-flash"
request_timeout_secs = 30

[server]
host = "0.0.0.0"
max_upload_bytes = 1048576
"#,
        )
        .await
        .unwrap();

        let config = load_global_config(&config_path).await;
        assert_eq!(config.vision_model, "gemini-1.5-flash");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.max_upload_bytes, 1_048_576);
        assert_eq!(config.server.port, 8501);
    }

    #[tokio::test]
    async fn load_global_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(&config_path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_global_config(&config_path).await;
        assert_eq!(config.farewell_pause_ms, 2000);
        assert!(config.system_prompt.is_none());
    }
}
