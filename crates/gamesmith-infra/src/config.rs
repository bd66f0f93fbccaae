//! Studio configuration loader for Gamesmith.
//!
//! Reads `config.toml` from the data directory (`~/.gamesmith/` in production)
//! and deserializes it into [`StudioConfig`]. Falls back to sensible defaults
//! when the file is missing or malformed. Environment variables then override
//! individual generation settings.

use std::path::Path;

use gamesmith_types::config::StudioConfig;
use gamesmith_types::error::ConfigError;

/// Overrides `generation.model`.
pub const ENV_MODEL: &str = "GAMESMITH_MODEL";
/// Overrides `generation.max_tokens`.
pub const ENV_MAX_TOKENS: &str = "GAMESMITH_MAX_TOKENS";
/// Overrides `generation.base_url`.
pub const ENV_BASE_URL: &str = "GAMESMITH_BASE_URL";

/// Path of the config file inside `data_dir`.
pub fn config_path(data_dir: &Path) -> std::path::PathBuf {
    data_dir.join("config.toml")
}

/// Load studio configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`StudioConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_studio_config(data_dir: &Path) -> StudioConfig {
    let config_path = config_path(data_dir);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return StudioConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return StudioConfig::default();
        }
    };

    match toml::from_str::<StudioConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            StudioConfig::default()
        }
    }
}

/// Apply `GAMESMITH_*` environment overrides from the process environment.
pub fn apply_env_overrides(config: StudioConfig) -> Result<StudioConfig, ConfigError> {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

/// Apply overrides looked up through `lookup`.
///
/// Empty values are ignored. A `max_tokens` value that is not a positive
/// integer is an error rather than a silent fallback.
pub fn apply_overrides_from(
    mut config: StudioConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<StudioConfig, ConfigError> {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(model) = get(ENV_MODEL) {
        config.generation.model = model.trim().to_string();
    }
    if let Some(raw) = get(ENV_MAX_TOKENS) {
        let max_tokens = raw
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| ConfigError::InvalidValue {
                key: ENV_MAX_TOKENS.to_string(),
                message: format!("expected a positive integer, got '{raw}'"),
            })?;
        config.generation.max_tokens = max_tokens;
    }
    if let Some(base_url) = get(ENV_BASE_URL) {
        config.generation.base_url = base_url.trim().to_string();
    }
    Ok(config)
}
