//! Downloadable artifact export.
//!
//! An export is the current artifact source under a file name made of a
//! fixed prefix, the export instant in Unix milliseconds, and `.html`.

use chrono::{DateTime, Utc};

use gamesmith_types::conversation::Artifact;

/// Document file extension for exports.
pub const EXPORT_EXTENSION: &str = "html";

/// A named, ready-to-write copy of an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactExport {
    pub file_name: String,
    pub contents: String,
}

/// File name for an export taken at `at`, e.g. `ai-game-1718000000000.html`.
pub fn export_file_name(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{prefix}{}.{EXPORT_EXTENSION}", at.timestamp_millis())
}

/// Package `artifact` for download. The contents are byte-identical to the
/// artifact source.
pub fn export_artifact(artifact: &Artifact, prefix: &str, at: DateTime<Utc>) -> ArtifactExport {
    ArtifactExport {
        file_name: export_file_name(prefix, at),
        contents: artifact.source.clone(),
    }
}
