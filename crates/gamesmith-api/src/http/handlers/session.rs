//! Session HTTP handlers.
//!
//! Endpoints:
//! - GET  /api/v1/session    - Conversation, current artifact, version, busy flag
//! - POST /api/v1/messages   - Submit a game description
//! - POST /api/v1/regenerate - Re-run the most recent description
//! - POST /api/v1/restart    - Reload the current game under a new version

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gamesmith_core::studio::{SessionSnapshot, TurnOutcome};
use gamesmith_types::conversation::ConversationEntry;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Request body for submitting a description.
#[derive(Debug, Deserialize)]
pub struct SubmitMessageRequest {
    pub text: String,
}

/// Artifact metadata returned with a successful turn.
#[derive(Debug, Serialize)]
pub struct ArtifactSummary {
    pub id: Uuid,
    pub version: u64,
    pub bytes: usize,
}

/// Result of an accepted turn.
///
/// A failed generation is still a completed request: the turn was accepted
/// and produced an assistant entry, so it comes back with `status: "failed"`.
#[derive(Debug, Serialize)]
pub struct TurnView {
    pub status: &'static str,
    pub entry: ConversationEntry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<ArtifactSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<TurnOutcome> for TurnView {
    fn from(outcome: TurnOutcome) -> Self {
        match outcome {
            TurnOutcome::Generated { entry, artifact } => Self {
                status: "generated",
                entry,
                artifact: Some(ArtifactSummary {
                    id: artifact.id,
                    version: artifact.version,
                    bytes: artifact.source.len(),
                }),
                reason: None,
            },
            TurnOutcome::Failed { entry, failure } => Self {
                status: "failed",
                entry,
                artifact: None,
                reason: Some(failure.reason()),
            },
        }
    }
}

/// Version after a restart.
#[derive(Debug, Serialize)]
pub struct RestartView {
    pub version: u64,
}

fn turn_response(outcome: TurnOutcome, start: Instant) -> Json<ApiResponse<TurnView>> {
    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(TurnView::from(outcome), Uuid::now_v7().to_string(), elapsed)
        .with_link("session", "/api/v1/session")
        .with_link("preview", "/preview");
    Json(resp)
}

/// GET /api/v1/session - Current session snapshot.
pub async fn get_session(State(state): State<AppState>) -> Json<ApiResponse<SessionSnapshot>> {
    let start = Instant::now();
    let snapshot = state.studio.snapshot().await;
    let elapsed = start.elapsed().as_millis() as u64;
    Json(
        ApiResponse::success(snapshot, Uuid::now_v7().to_string(), elapsed)
            .with_link("self", "/api/v1/session"),
    )
}

/// POST /api/v1/messages - Submit a description and wait for the game.
///
/// The generation runs on its own task; if the client disconnects, the turn
/// still completes and is recorded.
pub async fn submit_message(
    State(state): State<AppState>,
    Json(body): Json<SubmitMessageRequest>,
) -> Result<Json<ApiResponse<TurnView>>, AppError> {
    let start = Instant::now();
    let outcome = state.studio.submit(body.text).await?;
    Ok(turn_response(outcome, start))
}

/// POST /api/v1/regenerate - Re-run the most recent description.
pub async fn regenerate(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TurnView>>, AppError> {
    let start = Instant::now();
    let outcome = state.studio.regenerate().await?;
    Ok(turn_response(outcome, start))
}

/// POST /api/v1/restart - Reload the current game under a new version.
pub async fn restart(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<RestartView>>, AppError> {
    let start = Instant::now();
    let frame = state.studio.restart().await.ok_or(AppError::NoArtifact)?;
    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(
        ApiResponse::success(
            RestartView {
                version: frame.version,
            },
            Uuid::now_v7().to_string(),
            elapsed,
        )
        .with_link("preview", "/preview"),
    ))
}
