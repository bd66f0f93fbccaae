//! Session state: the conversation log plus the current artifact.
//!
//! `SessionState` is the single source of truth for a conversation. The
//! log is append-only; the only counters that move are the display version
//! (bumped on every new artifact and every forced redisplay).

use std::sync::Arc;

use gamesmith_types::conversation::{Artifact, ConversationEntry};

use crate::messages;
use crate::render::RenderFrame;

/// Ordered conversation log and current artifact for one session.
#[derive(Debug, Default)]
pub struct SessionState {
    entries: Vec<ConversationEntry>,
    artifact: Option<Arc<Artifact>>,
    /// Display version token. Starts at 0 (nothing rendered yet).
    version: u64,
}

impl SessionState {
    /// An empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session whose first entry is the assistant greeting.
    pub fn with_greeting() -> Self {
        let mut state = Self::new();
        state
            .entries
            .push(ConversationEntry::assistant(messages::GREETING.to_string(), None));
        state
    }

    /// All entries in creation order.
    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    /// The current artifact, if any generation has succeeded.
    pub fn artifact(&self) -> Option<&Arc<Artifact>> {
        self.artifact.as_ref()
    }

    /// Current display version token.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Frame the render host should be showing, if any.
    pub fn current_frame(&self) -> Option<RenderFrame> {
        self.artifact
            .as_ref()
            .map(|artifact| RenderFrame::new(artifact.source.clone(), self.version))
    }

    /// Append a user entry holding `text` verbatim.
    ///
    /// Never fails; rejecting empty input or concurrent submissions is the
    /// caller's job.
    pub fn append_user(&mut self, text: String) -> &ConversationEntry {
        self.push(ConversationEntry::user(text))
    }

    /// Install a new artifact built from `source` and append an assistant
    /// entry that references it. Bumps the version.
    pub fn record_success(
        &mut self,
        content: String,
        source: String,
    ) -> (&ConversationEntry, Arc<Artifact>) {
        self.version += 1;
        let artifact = Arc::new(Artifact::new(source, self.version));
        self.artifact = Some(Arc::clone(&artifact));
        tracing::debug!(version = self.version, entries = self.entries.len() + 1, "artifact recorded");
        let entry = self.push(ConversationEntry::assistant(content, Some(artifact.reference())));
        (entry, artifact)
    }

    /// Append an assistant entry for a failed attempt. The current artifact
    /// and version are left untouched.
    pub fn record_failure(&mut self, content: String) -> &ConversationEntry {
        self.push(ConversationEntry::assistant(content, None))
    }

    /// Most recent user entry, however many assistant entries followed it.
    pub fn last_user_entry(&self) -> Option<&ConversationEntry> {
        self.entries.iter().rev().find(|entry| entry.is_user())
    }

    /// Bump the display version without producing a new artifact.
    ///
    /// Returns the frame to reload, or `None` (and changes nothing) when no
    /// artifact exists yet.
    pub fn force_redisplay(&mut self) -> Option<RenderFrame> {
        self.artifact.as_ref()?;
        self.version += 1;
        self.current_frame()
    }

    fn push(&mut self, entry: ConversationEntry) -> &ConversationEntry {
        self.entries.push(entry);
        // Just pushed, so the log is non-empty.
        &self.entries[self.entries.len() - 1]
    }
}
