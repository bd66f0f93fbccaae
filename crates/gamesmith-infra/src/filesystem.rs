//! Filesystem helpers: data directory resolution and text file writes.

use std::path::{Path, PathBuf};

/// Overrides the data directory.
pub const ENV_DATA_DIR: &str = "GAMESMITH_DATA_DIR";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `GAMESMITH_DATA_DIR` environment variable
/// 2. `~/.gamesmith` under the home directory
/// 3. `.gamesmith` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".gamesmith");
    }

    // Last resort: current directory
    PathBuf::from(".gamesmith")
}

/// Write `content` to `path`, creating parent directories as needed.
pub async fn write_text_file(path: &Path, content: &str) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, content).await
}
