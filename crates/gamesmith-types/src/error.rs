use thiserror::Error;

use crate::llm::LlmError;

/// Tagged failure of one generation attempt.
///
/// Every exit of the generation client that is not a usable document ends
/// up here; callers turn it into a user-visible assistant entry.
#[derive(Debug, Error)]
pub enum GenerationFailure {
    /// Transport error, non-success response, or malformed payload.
    #[error("{0}")]
    Service(#[from] LlmError),

    /// The service answered but produced no usable text.
    #[error("the generative service returned no game source")]
    EmptyOutput,
}

impl GenerationFailure {
    /// Human-readable cause for display in the conversation.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

/// Why a submission or regeneration was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("description is empty")]
    EmptyInput,

    #[error("a generation is already in progress")]
    Busy,

    #[error("there is no earlier description to regenerate from")]
    NoPromptToRegenerate,
}

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing API key: set {0}")]
    MissingApiKey(String),

    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors from exporting an artifact to disk.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no game has been generated yet")]
    NothingToExport,

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
