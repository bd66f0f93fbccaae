//! Writes an [`ArtifactExport`] to disk.

use std::path::{Path, PathBuf};

use gamesmith_core::export::ArtifactExport;
use gamesmith_types::error::ExportError;

use crate::filesystem::write_text_file;

/// Where an export lands.
///
/// No target means the current directory. An existing directory gets the
/// export's own file name inside it. Anything else is used as the file path.
pub async fn export_destination(export: &ArtifactExport, target: Option<&Path>) -> PathBuf {
    match target {
        None => PathBuf::from(&export.file_name),
        Some(path) if tokio::fs::metadata(path).await.is_ok_and(|m| m.is_dir()) => {
            path.join(&export.file_name)
        }
        Some(path) => path.to_path_buf(),
    }
}

/// Write `export` and return the path written.
pub async fn write_export(
    export: &ArtifactExport,
    target: Option<&Path>,
) -> Result<PathBuf, ExportError> {
    let path = export_destination(export, target).await;
    write_text_file(&path, &export.contents)
        .await
        .map_err(|source| ExportError::Write {
            path: path.display().to_string(),
            source,
        })?;
    tracing::info!(path = %path.display(), bytes = export.contents.len(), "game exported");
    Ok(path)
}
