//! Render host port and the isolated preview shell.
//!
//! The pipeline hands a [`RenderFrame`] to a [`RenderHost`] and moves on:
//! loading is fire-and-forget and nothing flows back. A frame with a new
//! version means a cold reload of the whole execution context.

use std::sync::Arc;

use tokio::sync::watch;

/// A document to display together with its version key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFrame {
    pub source: Arc<str>,
    pub version: u64,
}

impl RenderFrame {
    pub fn new(source: impl Into<Arc<str>>, version: u64) -> Self {
        Self {
            source: source.into(),
            version,
        }
    }
}

/// Port for the isolated execution context that displays artifacts.
///
/// `load` must not block on rendering and has no way to report back.
pub trait RenderHost: Send + Sync {
    fn load(&self, frame: RenderFrame);
}

/// Render host that publishes the latest frame on a watch channel.
///
/// Subscribers (e.g. the HTTP preview page) always see the newest frame;
/// intermediate frames may be skipped. A frame older than the one on
/// display is dropped, so the published version never goes backwards.
pub struct WatchRenderHost {
    sender: watch::Sender<Option<RenderFrame>>,
}

impl WatchRenderHost {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self { sender }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<RenderFrame>> {
        self.sender.subscribe()
    }

    /// The frame currently on display, if any.
    pub fn current(&self) -> Option<RenderFrame> {
        self.sender.borrow().clone()
    }
}

impl Default for WatchRenderHost {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderHost for WatchRenderHost {
    fn load(&self, frame: RenderFrame) {
        let version = frame.version;
        let published = self.sender.send_if_modified(|current| {
            if current.as_ref().is_some_and(|shown| shown.version > version) {
                return false;
            }
            *current = Some(frame);
            true
        });
        if published {
            tracing::debug!(version, "publishing frame");
        } else {
            tracing::debug!(version, "dropping stale frame");
        }
    }
}

/// Capabilities granted to the preview iframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SandboxPolicy {
    pub allow_same_origin: bool,
}

impl SandboxPolicy {
    /// Value of the iframe `sandbox` attribute.
    pub fn attribute(&self) -> &'static str {
        if self.allow_same_origin {
            "allow-scripts allow-same-origin"
        } else {
            "allow-scripts"
        }
    }
}

/// Render the host page that runs `frame` inside a sandboxed iframe.
///
/// The artifact goes in through `srcdoc`, attribute-escaped, so the host
/// page never interprets it. The version is stamped on the iframe `name`
/// and a `data-version` attribute so every version is a distinct document.
pub fn isolation_shell(frame: &RenderFrame, sandbox: SandboxPolicy) -> String {
    let srcdoc = html_escape::encode_double_quoted_attribute(&frame.source);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="gamesmith-version" content="{version}">
<title>Game Preview (v{version})</title>
<style>html,body{{margin:0;height:100%;background:#030712}}iframe{{border:0;width:100%;height:100%;background:#fff}}</style>
</head>
<body data-version="{version}">
<iframe name="game-v{version}" title="Game Preview" sandbox="{sandbox}" srcdoc="{srcdoc}"></iframe>
</body>
</html>
"#,
        version = frame.version,
        sandbox = sandbox.attribute(),
    )
}
