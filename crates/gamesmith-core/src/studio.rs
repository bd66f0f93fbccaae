//! GameStudio -- the generation pipeline with single-flight gating.
//!
//! Flow for one turn:
//!
//! ```text
//! text -> GamePromptBuilder -> GenerationClient -> sanitize -> SessionState -> RenderHost
//! ```
//!
//! At most one generation is in flight per studio. The busy flag is taken
//! before anything touches the session and released by a guard on every
//! exit path. While it is held, submissions and regenerations are rejected
//! without changing the session. An accepted turn runs on its own task, so
//! it completes and records its assistant entry even if the caller stops
//! waiting.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use gamesmith_types::conversation::{Artifact, ConversationEntry};
use gamesmith_types::error::{GenerationFailure, SubmitRejected};

use crate::export::{ArtifactExport, export_artifact};
use crate::generation::GenerationClient;
use crate::messages;
use crate::prompt::GamePromptBuilder;
use crate::render::{RenderFrame, RenderHost};
use crate::sanitize::sanitize;
use crate::session::SessionState;

/// Result of an accepted submission or regeneration.
#[derive(Debug)]
pub enum TurnOutcome {
    Generated {
        entry: ConversationEntry,
        artifact: Arc<Artifact>,
    },
    Failed {
        entry: ConversationEntry,
        failure: GenerationFailure,
    },
}

impl TurnOutcome {
    /// The assistant entry this turn appended.
    pub fn entry(&self) -> &ConversationEntry {
        match self {
            TurnOutcome::Generated { entry, .. } | TurnOutcome::Failed { entry, .. } => entry,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TurnOutcome::Generated { .. })
    }
}

/// Point-in-time copy of the session for display.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub entries: Vec<ConversationEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<Artifact>,
    pub version: u64,
    pub busy: bool,
}

/// Holds the busy flag; clears it when dropped.
struct BusyGuard {
    flag: Arc<AtomicBool>,
}

impl BusyGuard {
    /// Take the flag, or `None` if a generation is already in flight.
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                flag: Arc::clone(flag),
            })
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Owns a session and drives the generation pipeline for it.
pub struct GameStudio {
    session: Mutex<SessionState>,
    busy: Arc<AtomicBool>,
    generator: GenerationClient,
    render_host: Arc<dyn RenderHost>,
    export_prefix: String,
}

impl GameStudio {
    pub fn new(
        session: SessionState,
        generator: GenerationClient,
        render_host: Arc<dyn RenderHost>,
    ) -> Self {
        Self {
            session: Mutex::new(session),
            busy: Arc::new(AtomicBool::new(false)),
            generator,
            render_host,
            export_prefix: "ai-game-".to_string(),
        }
    }

    /// Override the export file name prefix.
    pub fn with_export_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.export_prefix = prefix.into();
        self
    }

    /// Model identifier used for generation.
    pub fn model(&self) -> &str {
        self.generator.model()
    }

    /// Whether a generation is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Submit a new game description.
    ///
    /// Rejected (with no change to the session) when `text` is blank or a
    /// generation is in flight. Otherwise appends the user entry, runs the
    /// pipeline, and appends exactly one assistant entry.
    pub async fn submit(self: &Arc<Self>, text: String) -> Result<TurnOutcome, SubmitRejected> {
        if text.trim().is_empty() {
            return Err(SubmitRejected::EmptyInput);
        }
        let guard = BusyGuard::acquire(&self.busy).ok_or_else(|| {
            warn!("submission rejected: generation in progress");
            SubmitRejected::Busy
        })?;

        let entries = {
            let mut session = self.session.lock().await;
            session.append_user(text.clone());
            session.entries().len()
        };
        info!(entries, "submission accepted");

        Ok(self.spawn_turn(guard, text).await)
    }

    /// Re-run generation for the most recent user entry.
    ///
    /// Does not append a user entry. Rejected when busy or when the log has
    /// no user entry yet. The target is read after the busy flag is taken,
    /// so it is always the latest accepted description.
    pub async fn regenerate(self: &Arc<Self>) -> Result<TurnOutcome, SubmitRejected> {
        let guard = BusyGuard::acquire(&self.busy).ok_or_else(|| {
            warn!("regeneration rejected: generation in progress");
            SubmitRejected::Busy
        })?;

        let description = self
            .session
            .lock()
            .await
            .last_user_entry()
            .map(|entry| entry.content.clone())
            .ok_or(SubmitRejected::NoPromptToRegenerate)?;
        info!("regeneration accepted");

        Ok(self.spawn_turn(guard, description).await)
    }

    /// Reload the current artifact under a new version key.
    ///
    /// Returns the frame sent to the render host, or `None` if nothing has
    /// been generated yet.
    pub async fn restart(&self) -> Option<RenderFrame> {
        // Load under the session lock so frames reach the host in version order.
        let mut session = self.session.lock().await;
        let frame = session.force_redisplay()?;
        info!(version = frame.version, "restarting preview");
        self.render_host.load(frame.clone());
        Some(frame)
    }

    /// Copy of the conversation, current artifact, and version.
    pub async fn snapshot(&self) -> SessionSnapshot {
        let session = self.session.lock().await;
        SessionSnapshot {
            entries: session.entries().to_vec(),
            artifact: session.artifact().map(|a| Artifact::clone(a)),
            version: session.version(),
            busy: self.is_busy(),
        }
    }

    /// Frame the render host should currently show.
    pub async fn current_frame(&self) -> Option<RenderFrame> {
        self.session.lock().await.current_frame()
    }

    /// Package the current artifact for download, named for instant `at`.
    pub async fn export(&self, at: DateTime<Utc>) -> Option<ArtifactExport> {
        let session = self.session.lock().await;
        session
            .artifact()
            .map(|artifact| export_artifact(artifact, &self.export_prefix, at))
    }

    /// Run one turn on its own task, holding `guard` until it finishes.
    async fn spawn_turn(self: &Arc<Self>, guard: BusyGuard, description: String) -> TurnOutcome {
        let studio = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let _guard = guard;
            studio.run_turn(&description).await
        });

        match handle.await {
            Ok(outcome) => outcome,
            Err(join_error) => {
                // The guard was dropped with the task; record the failure so
                // the turn still gets its assistant entry.
                warn!(error = %join_error, "generation task aborted");
                let failure = GenerationFailure::Service(
                    gamesmith_types::llm::LlmError::Provider {
                        message: format!("generation task aborted: {join_error}"),
                    },
                );
                let entry = self
                    .session
                    .lock()
                    .await
                    .record_failure(messages::failure(&failure.reason()))
                    .clone();
                TurnOutcome::Failed { entry, failure }
            }
        }
    }

    /// Prompt, generate, sanitize, record, render.
    async fn run_turn(&self, description: &str) -> TurnOutcome {
        let prompt = GamePromptBuilder::build(description);

        match self.generator.generate(&prompt).await {
            Ok(raw) => {
                let source = sanitize(&raw);
                let mut session = self.session.lock().await;
                let (entry, artifact) =
                    session.record_success(messages::success(description), source);
                let entry = entry.clone();
                info!(version = artifact.version, bytes = artifact.source.len(), "game generated");
                if let Some(frame) = session.current_frame() {
                    self.render_host.load(frame);
                }
                TurnOutcome::Generated { entry, artifact }
            }
            Err(failure) => {
                warn!(reason = %failure, "game generation failed");
                let entry = self
                    .session
                    .lock()
                    .await
                    .record_failure(messages::failure(&failure.reason()))
                    .clone();
                TurnOutcome::Failed { entry, failure }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::future::Future;
    use std::sync::atomic::AtomicUsize;

    use chrono::TimeZone;
    use tokio::sync::Notify;

    use gamesmith_types::llm::{
        CompletionRequest, CompletionResponse, ContentSegment, LlmError, ProviderCapabilities,
        StopReason, Usage,
    };

    use crate::generation::GenerationSettings;
    use crate::generation::tests::ScriptedProvider;
    use crate::llm::box_provider::BoxLlmProvider;
    use crate::llm::provider::LlmProvider;

    const FENCED_GAME: &str = "```html\n<!DOCTYPE html>\n<html><body>snake</body></html>\n```";

    #[derive(Default)]
    struct RecordingHost {
        frames: std::sync::Mutex<Vec<RenderFrame>>,
    }

    impl RecordingHost {
        fn frames(&self) -> Vec<RenderFrame> {
            self.frames.lock().unwrap().clone()
        }
    }

    impl RenderHost for RecordingHost {
        fn load(&self, frame: RenderFrame) {
            self.frames.lock().unwrap().push(frame);
        }
    }

    /// Provider that holds every response until the gate is opened.
    struct GatedProvider {
        gate: Arc<Notify>,
        capabilities: ProviderCapabilities,
    }

    impl LlmProvider for GatedProvider {
        fn name(&self) -> &str {
            "gated"
        }

        fn capabilities(&self) -> &ProviderCapabilities {
            &self.capabilities
        }

        fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> impl Future<Output = Result<CompletionResponse, LlmError>> + Send {
            let gate = Arc::clone(&self.gate);
            async move {
                gate.notified().await;
                Ok(CompletionResponse {
                    id: "msg_gated".to_string(),
                    segments: vec![ContentSegment::Text {
                        text: "<html></html>".to_string(),
                    }],
                    model: "test-model".to_string(),
                    stop_reason: StopReason::EndTurn,
                    usage: Usage::default(),
                })
            }
        }
    }

    fn settings() -> GenerationSettings {
        GenerationSettings {
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 4000,
        }
    }

    fn studio_with<P: LlmProvider + 'static>(
        provider: P,
        session: SessionState,
    ) -> (Arc<GameStudio>, Arc<RecordingHost>) {
        let host = Arc::new(RecordingHost::default());
        let generator = GenerationClient::new(BoxLlmProvider::new(provider), settings());
        let studio = GameStudio::new(session, generator, host.clone());
        (Arc::new(studio), host)
    }

    fn scripted(
        script: Vec<Result<Vec<ContentSegment>, LlmError>>,
    ) -> (
        ScriptedProvider,
        Arc<std::sync::Mutex<Vec<CompletionRequest>>>,
        Arc<AtomicUsize>,
    ) {
        let provider = ScriptedProvider::new(script);
        let requests = provider.requests.clone();
        let calls = provider.calls.clone();
        (provider, requests, calls)
    }

    #[tokio::test]
    async fn test_submit_success_end_to_end() {
        let (provider, requests, _) = scripted(vec![ScriptedProvider::text(FENCED_GAME)]);
        let (studio, host) = studio_with(provider, SessionState::new());

        let outcome = studio.submit("Create a snake game".to_string()).await.unwrap();
        assert!(outcome.is_success());

        // Prompt carries the description exactly once.
        let prompt = requests.lock().unwrap()[0].messages[0].content.clone();
        assert_eq!(prompt.matches("Create a snake game").count(), 1);

        let snapshot = studio.snapshot().await;
        assert_eq!(snapshot.entries.len(), 2);
        assert_eq!(snapshot.entries[0].content, "Create a snake game");
        assert!(snapshot.entries[1].artifact.is_some());
        assert_eq!(snapshot.version, 1);
        assert!(!snapshot.busy);

        let artifact = snapshot.artifact.unwrap();
        assert!(artifact.source.starts_with("<!DOCTYPE html>"));
        assert!(!artifact.source.lines().any(|l| l.trim_start().starts_with("```")));

        let frames = host.frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].version, 1);
        assert_eq!(&*frames[0].source, artifact.source.as_str());
    }

    #[tokio::test]
    async fn test_submit_blank_is_rejected_without_side_effects() {
        let (provider, _, calls) = scripted(vec![]);
        let (studio, _) = studio_with(provider, SessionState::new());

        for text in ["", "   ", "\n\t"] {
            let err = studio.submit(text.to_string()).await.unwrap_err();
            assert_eq!(err, SubmitRejected::EmptyInput);
        }
        assert!(studio.snapshot().await.entries.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_submit_while_busy_is_noop() {
        let gate = Arc::new(Notify::new());
        let provider = GatedProvider {
            gate: gate.clone(),
            capabilities: ProviderCapabilities {
                max_context_tokens: 200_000,
                max_output_tokens: 8_192,
            },
        };
        let (studio, _) = studio_with(provider, SessionState::new());

        let first = {
            let studio = Arc::clone(&studio);
            tokio::spawn(async move { studio.submit("pong".to_string()).await })
        };
        while !studio.is_busy() {
            tokio::task::yield_now().await;
        }
        let before = studio.snapshot().await.entries.len();
        assert_eq!(before, 1);

        assert_eq!(
            studio.submit("breakout".to_string()).await.unwrap_err(),
            SubmitRejected::Busy
        );
        assert_eq!(studio.regenerate().await.unwrap_err(), SubmitRejected::Busy);
        assert_eq!(studio.snapshot().await.entries.len(), before);

        gate.notify_one();
        let outcome = first.await.unwrap().unwrap();
        assert!(outcome.is_success());
        assert!(!studio.is_busy());
        assert_eq!(studio.snapshot().await.entries.len(), 2);
    }

    #[tokio::test]
    async fn test_regenerate_targets_latest_user_entry() {
        let (provider, requests, _) = scripted(vec![
            ScriptedProvider::text("<!DOCTYPE html>\n<p>A1</p>"),
            Err(LlmError::Transport("connection reset".to_string())),
            ScriptedProvider::text("<!DOCTYPE html>\n<p>A2</p>"),
        ]);
        let (studio, _) = studio_with(provider, SessionState::new());

        assert!(studio.submit("snake".to_string()).await.unwrap().is_success());
        assert!(!studio
            .submit("snake but faster".to_string())
            .await
            .unwrap()
            .is_success());
        let before = studio.snapshot().await.entries.len();
        assert_eq!(before, 4);

        let outcome = studio.regenerate().await.unwrap();
        assert!(outcome.is_success());

        let prompt = requests.lock().unwrap()[2].messages[0].content.clone();
        assert!(prompt.contains("\"snake but faster\""));

        let snapshot = studio.snapshot().await;
        // Exactly one assistant entry, no new user entry.
        assert_eq!(snapshot.entries.len(), before + 1);
        assert!(!snapshot.entries.last().unwrap().is_user());
        assert_eq!(snapshot.version, 2);
        assert!(snapshot.artifact.unwrap().source.contains("A2"));
    }

    #[tokio::test]
    async fn test_failure_appends_one_entry_and_keeps_artifact() {
        let (provider, _, _) = scripted(vec![
            ScriptedProvider::text("<!DOCTYPE html>\n<p>first</p>"),
            Err(LlmError::Provider {
                message: "HTTP 500: boom".to_string(),
            }),
        ]);
        let (studio, host) = studio_with(provider, SessionState::new());

        studio.submit("first".to_string()).await.unwrap();
        let before = studio.snapshot().await;

        let outcome = studio.submit("second".to_string()).await.unwrap();
        match &outcome {
            TurnOutcome::Failed { entry, failure } => {
                assert!(entry.artifact.is_none());
                assert!(entry.content.contains("HTTP 500: boom"));
                assert!(matches!(failure, GenerationFailure::Service(_)));
            }
            other => panic!("expected failure, got {other:?}"),
        }

        let after = studio.snapshot().await;
        // user entry + failure entry
        assert_eq!(after.entries.len(), before.entries.len() + 2);
        assert_eq!(after.version, before.version);
        assert_eq!(after.artifact, before.artifact);
        assert_eq!(host.frames().len(), 1);
        assert!(!studio.is_busy());
    }

    #[tokio::test]
    async fn test_empty_output_is_recorded_as_failure() {
        let (provider, _, _) = scripted(vec![Ok(vec![])]);
        let (studio, host) = studio_with(provider, SessionState::new());

        let outcome = studio.submit("maze".to_string()).await.unwrap();
        assert!(matches!(
            outcome,
            TurnOutcome::Failed {
                failure: GenerationFailure::EmptyOutput,
                ..
            }
        ));
        let snapshot = studio.snapshot().await;
        assert_eq!(snapshot.entries.len(), 2);
        assert_eq!(snapshot.version, 0);
        assert!(host.frames().is_empty());
    }

    #[tokio::test]
    async fn test_regenerate_without_user_entry_is_rejected_and_releases_busy() {
        let (provider, _, calls) = scripted(vec![ScriptedProvider::text("<html></html>")]);
        let (studio, _) = studio_with(provider, SessionState::with_greeting());

        assert_eq!(
            studio.regenerate().await.unwrap_err(),
            SubmitRejected::NoPromptToRegenerate
        );
        assert!(!studio.is_busy());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(studio.snapshot().await.entries.len(), 1);

        // The flag was released, so a submission now goes through.
        assert!(studio.submit("tetris".to_string()).await.unwrap().is_success());
    }

    #[tokio::test]
    async fn test_restart_bumps_version_keeps_source() {
        let (provider, _, _) = scripted(vec![ScriptedProvider::text(FENCED_GAME)]);
        let (studio, host) = studio_with(provider, SessionState::new());

        assert!(studio.restart().await.is_none());
        assert!(host.frames().is_empty());

        studio.submit("snake".to_string()).await.unwrap();
        let before = studio.snapshot().await;

        let frame = studio.restart().await.unwrap();
        let after = studio.snapshot().await;
        assert_eq!(frame.version, before.version + 1);
        assert_eq!(after.version, before.version + 1);
        assert_eq!(after.artifact, before.artifact);
        assert_eq!(after.entries.len(), before.entries.len());

        let frames = host.frames();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].version, frame.version);
        assert_eq!(frames[0].source, frames[1].source);
    }

    #[tokio::test]
    async fn test_export_uses_prefix_and_source() {
        let (provider, _, _) = scripted(vec![ScriptedProvider::text("<p>hi</p>")]);
        let (studio, _) = studio_with(provider, SessionState::new());
        let at = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();

        assert!(studio.export(at).await.is_none());
        studio.submit("hi".to_string()).await.unwrap();

        let export = studio.export(at).await.unwrap();
        assert_eq!(export.file_name, "ai-game-1700000000000.html");
        assert_eq!(export.contents, "<!DOCTYPE html>\n<p>hi</p>");
    }
}
