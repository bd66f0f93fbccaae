//! Configuration types for Gamesmith.
//!
//! `StudioConfig` represents the top-level `config.toml` that controls the
//! generative service request, the preview render host, and artifact export.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// Loaded from `~/.gamesmith/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudioConfig {
    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

/// Settings for the request sent to the generative service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum output size bound for a single generation.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Base URL of the Messages API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Transport timeout for one request, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    4000
}

fn default_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Settings for the preview render host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Add `allow-same-origin` to the preview iframe sandbox. Off by default
    /// so the game cannot reach the hosting page's storage.
    #[serde(default)]
    pub allow_same_origin: bool,

    /// File name of the preview page written into the data directory.
    #[serde(default = "default_preview_file")]
    pub preview_file: String,
}

fn default_preview_file() -> String {
    "preview.html".to_string()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            allow_same_origin: false,
            preview_file: default_preview_file(),
        }
    }
}

/// Settings for downloadable artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Fixed prefix of exported file names.
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

fn default_file_prefix() -> String {
    "ai-game-".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_prefix: default_file_prefix(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_studio_config_default_values() {
        let config = StudioConfig::default();
        assert_eq!(config.generation.model, "claude-sonnet-4-20250514");
        assert_eq!(config.generation.max_tokens, 4000);
        assert_eq!(config.generation.timeout_secs, 300);
        assert!(!config.render.allow_same_origin);
        assert_eq!(config.export.file_prefix, "ai-game-");
    }

    #[test]
    fn test_studio_config_deserialize_empty() {
        let config: StudioConfig = toml::from_str("").unwrap();
        assert_eq!(config.generation.base_url, "https://api.anthropic.com");
        assert_eq!(config.render.preview_file, "preview.html");
    }

    #[test]
    fn test_studio_config_deserialize_partial() {
        let toml_str = r#"
[generation]
model = "claude-haiku-4-5"
max_tokens = 8000

[render]
allow_same_origin = true
"#;
        let config: StudioConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.generation.model, "claude-haiku-4-5");
        assert_eq!(config.generation.max_tokens, 8000);
        // Unspecified fields keep their defaults
        assert_eq!(config.generation.timeout_secs, 300);
        assert!(config.render.allow_same_origin);
        assert_eq!(config.export.file_prefix, "ai-game-");
    }
}
