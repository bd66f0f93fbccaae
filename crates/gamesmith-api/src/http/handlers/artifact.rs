//! Artifact HTTP handlers.
//!
//! Endpoints:
//! - GET /api/v1/artifact          - Current artifact with its source
//! - GET /api/v1/artifact/download - Current artifact as an HTML attachment

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use gamesmith_types::conversation::Artifact;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/artifact - The current artifact.
pub async fn get_artifact(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Artifact>>, AppError> {
    let start = Instant::now();
    let artifact = state
        .studio
        .snapshot()
        .await
        .artifact
        .ok_or(AppError::NoArtifact)?;
    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(
        ApiResponse::success(artifact, Uuid::now_v7().to_string(), elapsed)
            .with_link("self", "/api/v1/artifact")
            .with_link("download", "/api/v1/artifact/download"),
    ))
}

/// GET /api/v1/artifact/download - The current artifact as a file.
///
/// The body is exactly the artifact source; the file name carries the
/// export instant in milliseconds.
pub async fn download_artifact(State(state): State<AppState>) -> Result<Response, AppError> {
    let export = state
        .studio
        .export(chrono::Utc::now())
        .await
        .ok_or(AppError::NoArtifact)?;

    tracing::info!(file_name = %export.file_name, "artifact downloaded");
    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.file_name),
            ),
        ],
        export.contents,
    )
        .into_response())
}
