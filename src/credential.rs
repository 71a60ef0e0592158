//! API key loading and Basic auth encoding.
//!
//! The key comes either inline from the settings or from the environment
//! variable the settings point at. It is kept in a [`SecretString`] so it
//! never leaks through Debug output.

use base64::Engine;
use secrecy::{ExposeSecret, SecretString};

use crate::{config::Settings, error::ConfigError};

/// Resolve the API key for the given settings.
///
/// An inline `api_key` wins; otherwise the environment variable named by
/// `api_key_env` is read and trimmed. Fails when neither source yields a
/// non-empty value.
pub fn load_api_key(settings: &Settings) -> Result<SecretString, ConfigError> {
    if let Some(key) = &settings.api_key {
        return Ok(key.clone());
    }

    if let Some(name) = &settings.api_key_env {
        let value = std::env::var(name)
            .ok()
            .map(|v| v.trim().to_string())
            .unwrap_or_default();
        if value.is_empty() {
            return Err(ConfigError::ApiKeyEnvMissing { name: name.clone() });
        }
        return Ok(SecretString::from(value));
    }

    Err(ConfigError::MissingApiKey)
}

/// Basic auth credential for the Azure DevOps REST API: an empty username
/// and the API key as password, base64-encoded.
pub fn basic_auth_value(settings: &Settings) -> Result<String, ConfigError> {
    let key = load_api_key(settings)?;
    let raw = format!(":{}", key.expose_secret());
    Ok(base64::engine::general_purpose::STANDARD.encode(raw))
}
