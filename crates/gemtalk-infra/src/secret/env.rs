//! Environment variable credential source.

use std::path::PathBuf;

use secrecy::SecretString;

use gemtalk_types::error::CredentialError;

/// Default environment variable holding the Generative Language API key.
pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";

/// Load the nearest `.env` file, overriding existing variables.
///
/// Returns the path that was loaded, or `None` when no file was found.
pub fn load_dotenv() -> Result<Option<PathBuf>, CredentialError> {
    match dotenvy::dotenv_override() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "Loaded .env file");
            Ok(Some(path))
        }
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(CredentialError::DotEnv(err.to_string())),
    }
}

/// Reads the API key from one environment variable.
///
/// Read-only; the key is wrapped in [`SecretString`] as soon as it is read.
pub struct EnvCredentialSource {
    var: String,
}

impl EnvCredentialSource {
    /// Create a source for an arbitrary variable name.
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// Resolve the key. Missing, non-Unicode, or blank values are errors.
    pub fn api_key(&self) -> Result<SecretString, CredentialError> {
        match std::env::var(&self.var) {
            Ok(value) if value.trim().is_empty() => Err(CredentialError::Blank(self.var.clone())),
            Ok(value) => Ok(SecretString::from(value.trim().to_string())),
            Err(std::env::VarError::NotPresent) => {
                Err(CredentialError::Missing(self.var.clone()))
            }
            // A key must be a valid string; treat invalid Unicode as absent.
            Err(std::env::VarError::NotUnicode(_)) => {
                Err(CredentialError::Missing(self.var.clone()))
            }
        }
    }
}

impl Default for EnvCredentialSource {
    fn default() -> Self {
        Self::new(GOOGLE_API_KEY)
    }
}
