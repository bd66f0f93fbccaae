//! API key resolution from the environment.
//!
//! The key is read once at startup and wrapped in a [`SecretString`] so it
//! never shows up in `Debug` output or logs.

use secrecy::SecretString;

use gamesmith_types::error::ConfigError;

/// Environment variable holding the Anthropic API key.
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

/// Read the API key from the process environment.
pub fn resolve_api_key() -> Result<SecretString, ConfigError> {
    resolve_api_key_from(|key| std::env::var(key).ok())
}

/// Read the API key through `lookup`. Blank values count as missing.
pub fn resolve_api_key_from(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    lookup(API_KEY_VAR)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::MissingApiKey(API_KEY_VAR.to_string()))
}
