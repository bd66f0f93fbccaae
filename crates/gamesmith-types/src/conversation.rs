//! Conversation entry and artifact types for Gamesmith.
//!
//! A session is an append-only log of [`ConversationEntry`] values plus the
//! current [`Artifact`]. Assistant entries that came from a successful
//! generation point at the artifact they produced through an [`ArtifactRef`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Re-export MessageRole from llm module (it's used in both conversation and llm contexts).
pub use crate::llm::MessageRole;

/// A sanitized standalone HTML document representing a playable game.
///
/// Artifacts are immutable once produced. Regeneration creates a new
/// artifact; it never edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: Uuid,
    /// The sanitized document text.
    pub source: String,
    /// Version token assigned when the artifact was produced.
    pub version: u64,
    pub created_at: DateTime<Utc>,
}

impl Artifact {
    /// Create a new artifact with a fresh time-sortable id.
    pub fn new(source: String, version: u64) -> Self {
        Self {
            id: Uuid::now_v7(),
            source,
            version,
            created_at: Utc::now(),
        }
    }

    /// Lightweight reference for embedding in a conversation entry.
    pub fn reference(&self) -> ArtifactRef {
        ArtifactRef {
            id: self.id,
            version: self.version,
        }
    }
}

/// Reference from an assistant entry to the artifact it produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRef {
    pub id: Uuid,
    pub version: u64,
}

/// A single entry in the conversation log.
///
/// Entries are ordered by creation and never mutated after being appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub id: Uuid,
    pub role: MessageRole,
    /// Text shown to the user. For assistant entries this is a status
    /// message, never the artifact source itself.
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Present only on assistant entries from a successful generation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<ArtifactRef>,
}

impl ConversationEntry {
    /// A user entry carrying the submitted text verbatim.
    pub fn user(content: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            role: MessageRole::User,
            content,
            timestamp: Utc::now(),
            artifact: None,
        }
    }

    /// An assistant entry, optionally linked to an artifact.
    pub fn assistant(content: String, artifact: Option<ArtifactRef>) -> Self {
        Self {
            id: Uuid::now_v7(),
            role: MessageRole::Assistant,
            content,
            timestamp: Utc::now(),
            artifact,
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }
}
