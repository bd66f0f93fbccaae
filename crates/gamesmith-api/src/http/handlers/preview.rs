//! Live preview page.
//!
//! Endpoints:
//! - GET /preview         - Host page running the current game in a sandboxed iframe
//! - GET /preview/version - Version currently on display
//!
//! The host page polls `/preview/version` and reloads itself when the
//! version changes, so each new game or restart starts from a fresh
//! execution context.

use axum::Json;
use axum::extract::State;
use axum::response::Html;
use serde::Serialize;

use gamesmith_core::render::isolation_shell;

use crate::state::AppState;

const RELOAD_SCRIPT: &str = r#"<script>
(function () {
  var shown = document.body.dataset.version || null;
  setInterval(function () {
    fetch('/preview/version')
      .then(function (r) { return r.json(); })
      .then(function (d) {
        var next = d.version == null ? null : String(d.version);
        if (next !== shown) { location.reload(); }
      })
      .catch(function () {});
  }, 1000);
})();
</script>
"#;

const EMPTY_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Game Preview</title>
<style>body{margin:0;height:100vh;display:flex;align-items:center;justify-content:center;background:#030712;color:#9ca3af;font-family:sans-serif}</style>
</head>
<body>
<p>Your game will appear here</p>
</body>
</html>
"#;

/// Insert the reload script just before `</body>`.
fn with_reload_script(page: &str) -> String {
    match page.rfind("</body>") {
        Some(idx) => format!("{}{RELOAD_SCRIPT}{}", &page[..idx], &page[idx..]),
        None => format!("{page}{RELOAD_SCRIPT}"),
    }
}

/// Current preview version payload.
#[derive(Debug, Serialize)]
pub struct PreviewVersion {
    pub version: Option<u64>,
}

/// GET /preview - Host page for the current frame.
pub async fn preview_page(State(state): State<AppState>) -> Html<String> {
    let page = match state.preview.current() {
        Some(frame) => isolation_shell(&frame, state.sandbox()),
        None => EMPTY_PAGE.to_string(),
    };
    Html(with_reload_script(&page))
}

/// GET /preview/version - Version currently on display.
pub async fn preview_version(State(state): State<AppState>) -> Json<PreviewVersion> {
    Json(PreviewVersion {
        version: state.preview.current().map(|frame| frame.version),
    })
}
