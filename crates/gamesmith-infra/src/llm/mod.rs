//! LLM provider implementations.
//!
//! Contains the concrete [`LlmProvider`](gamesmith_core::llm::provider::LlmProvider)
//! for the Anthropic Messages API and a factory ([`create_provider`]) that
//! builds it from the generation config.

pub mod anthropic;

use std::time::Duration;

use secrecy::SecretString;

use gamesmith_core::llm::box_provider::BoxLlmProvider;
use gamesmith_types::config::GenerationConfig;
use gamesmith_types::llm::LlmError;

use self::anthropic::AnthropicProvider;

/// Create a [`BoxLlmProvider`] from the generation settings and a resolved
/// API key.
pub fn create_provider(
    config: &GenerationConfig,
    api_key: SecretString,
) -> Result<BoxLlmProvider, LlmError> {
    let provider = AnthropicProvider::new(
        api_key,
        config.model.clone(),
        Duration::from_secs(config.timeout_secs.max(1)),
    )?
    .with_base_url(config.base_url.clone());

    tracing::debug!(
        provider = "anthropic",
        model = %config.model,
        base_url = %config.base_url,
        "created LLM provider"
    );
    Ok(BoxLlmProvider::new(provider))
}
