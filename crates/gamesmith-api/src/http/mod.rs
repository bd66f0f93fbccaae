//! HTTP/REST API layer for Gamesmith.
//!
//! Axum-based REST API at `/api/v1/` with envelope response format and CORS
//! support, plus a `/preview` page that runs the current game in a
//! sandboxed iframe.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
