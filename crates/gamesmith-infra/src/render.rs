//! File-backed render host.
//!
//! Publishes frames through a [`WatchRenderHost`] and keeps a background
//! task that writes the isolation shell for the newest frame to a file.
//! Opening that file in a browser shows the game in a sandboxed iframe.

use std::path::{Path, PathBuf};

use gamesmith_core::render::{RenderFrame, RenderHost, SandboxPolicy, WatchRenderHost, isolation_shell};

use crate::filesystem::write_text_file;

/// Render host that mirrors the current frame into an HTML file.
pub struct FileRenderHost {
    inner: WatchRenderHost,
    path: PathBuf,
}

impl FileRenderHost {
    /// Start the writer task. Must be called inside a Tokio runtime.
    ///
    /// The task exits when the host is dropped. Frames published faster
    /// than they can be written are coalesced; the file always ends up
    /// holding the newest one.
    pub fn spawn(path: PathBuf, sandbox: SandboxPolicy) -> Self {
        let inner = WatchRenderHost::new();
        let mut rx = inner.subscribe();
        let target = path.clone();

        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let frame = rx.borrow_and_update().clone();
                let Some(frame) = frame else { continue };
                let page = isolation_shell(&frame, sandbox);
                match write_text_file(&target, &page).await {
                    Ok(()) => tracing::debug!(
                        version = frame.version,
                        path = %target.display(),
                        "preview written"
                    ),
                    Err(e) => tracing::warn!(
                        version = frame.version,
                        path = %target.display(),
                        error = %e,
                        "failed to write preview"
                    ),
                }
            }
        });

        Self { inner, path }
    }

    /// Preview file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Frame most recently handed to this host.
    pub fn current(&self) -> Option<RenderFrame> {
        self.inner.current()
    }
}

impl RenderHost for FileRenderHost {
    fn load(&self, frame: RenderFrame) {
        self.inner.load(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use tempfile::tempdir;

    async fn wait_for_version(path: &Path, version: u64) -> String {
        let marker = format!("data-version=\"{version}\"");
        for _ in 0..200 {
            if let Ok(page) = tokio::fs::read_to_string(path).await {
                if page.contains(&marker) {
                    return page;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("preview for version {version} never written");
    }

    #[tokio::test]
    async fn test_file_host_writes_newest_frame() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preview.html");
        let host = FileRenderHost::spawn(path.clone(), SandboxPolicy::default());

        host.load(RenderFrame::new("<!DOCTYPE html>\n<p>one</p>", 1));
        host.load(RenderFrame::new("<!DOCTYPE html>\n<p>two</p>", 2));

        let page = wait_for_version(&path, 2).await;
        assert!(page.contains("&lt;p&gt;two&lt;/p&gt;"));
        assert!(page.contains(r#"sandbox="allow-scripts""#));
        assert_eq!(host.current().unwrap().version, 2);
        assert_eq!(host.path(), path.as_path());
    }

    #[tokio::test]
    async fn test_file_host_honors_sandbox_policy() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("preview.html");
        let host = FileRenderHost::spawn(
            path.clone(),
            SandboxPolicy {
                allow_same_origin: true,
            },
        );

        host.load(RenderFrame::new("<p>x</p>", 5));
        let page = wait_for_version(&path, 5).await;
        assert!(page.contains(r#"sandbox="allow-scripts allow-same-origin""#));
    }
}
