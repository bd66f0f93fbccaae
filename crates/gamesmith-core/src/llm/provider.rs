//! LlmProvider trait definition.
//!
//! This is the core abstraction that generative service backends implement.
//! Uses RPITIT for `complete`, so the trait itself is not object-safe; see
//! `BoxLlmProvider` for dynamic dispatch.

use gamesmith_types::llm::{CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities};

/// Trait for LLM provider backends.
///
/// Implementations live in gamesmith-infra (e.g., `AnthropicProvider`).
/// A call performs exactly one request; retries are never done here.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "anthropic").
    fn name(&self) -> &str;

    /// Output and context limits of the configured model.
    fn capabilities(&self) -> &ProviderCapabilities;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
