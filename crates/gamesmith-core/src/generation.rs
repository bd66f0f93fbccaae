//! Generation client: one request to the generative service per call.
//!
//! Wraps a [`BoxLlmProvider`] and turns its response into raw document text,
//! or a tagged [`GenerationFailure`]. There are no retries here; the
//! regeneration path is the only way to try again.

use std::time::Instant;

use tracing::{Instrument, info_span};

use gamesmith_types::config::GenerationConfig;
use gamesmith_types::error::GenerationFailure;
use gamesmith_types::llm::{CompletionRequest, ContentSegment, Message, StopReason};

use crate::llm::box_provider::BoxLlmProvider;

// Value for the OTel GenAI `gen_ai.operation.name` span field.
const OP_GENERATE_GAME: &str = "generate_game";

/// Request parameters fixed for the lifetime of a client.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub model: String,
    pub max_tokens: u32,
}

impl From<&GenerationConfig> for GenerationSettings {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens.max(1),
        }
    }
}

/// Performs the request/response exchange with the generative service.
pub struct GenerationClient {
    provider: BoxLlmProvider,
    settings: GenerationSettings,
}

impl GenerationClient {
    pub fn new(provider: BoxLlmProvider, settings: GenerationSettings) -> Self {
        Self { provider, settings }
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    /// Build the single-message request for a prompt.
    ///
    /// The output bound is clamped to what the provider's model supports.
    fn build_request(&self, prompt: &str) -> CompletionRequest {
        let max_output = self.provider.capabilities().max_output_tokens;
        let max_tokens = if self.settings.max_tokens > max_output {
            tracing::warn!(
                requested = self.settings.max_tokens,
                max_output,
                "max_tokens exceeds model limit, clamping"
            );
            max_output
        } else {
            self.settings.max_tokens
        };

        CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![Message::user(prompt)],
            max_tokens,
        }
    }

    /// Send `prompt` and return the raw text of the response.
    ///
    /// Text segments are joined in response order with a newline, then
    /// trimmed. Any provider error, and a response with no text, comes back
    /// as a `GenerationFailure`; nothing escapes as a panic.
    pub async fn generate(&self, prompt: &str) -> Result<String, GenerationFailure> {
        let request = self.build_request(prompt);
        let span = info_span!(
            "generate",
            "gen_ai.operation.name" = OP_GENERATE_GAME,
            "gen_ai.provider.name" = self.provider.name(),
            "gen_ai.request.model" = %request.model,
            "gen_ai.request.max_tokens" = request.max_tokens,
        );

        async move {
            let start = Instant::now();
            let response = self.provider.complete(&request).await.inspect_err(|e| {
                tracing::warn!(error = %e, "generation request failed");
            })?;

            let elapsed_ms = start.elapsed().as_millis() as u64;
            tracing::info!(
                response_id = %response.id,
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                stop_reason = %response.stop_reason,
                segments = response.segments.len(),
                elapsed_ms,
                "generation completed"
            );
            if response.stop_reason == StopReason::MaxTokens {
                tracing::warn!("response hit max_tokens; the game may be truncated");
            }

            let text = join_text_segments(&response.segments);
            if text.is_empty() {
                return Err(GenerationFailure::EmptyOutput);
            }
            Ok(text)
        }
        .instrument(span)
        .await
    }
}

/// Concatenate text segments in order, skipping all other kinds, and trim.
pub fn join_text_segments(segments: &[ContentSegment]) -> String {
    segments
        .iter()
        .filter_map(ContentSegment::as_text)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
