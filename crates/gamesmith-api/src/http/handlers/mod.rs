//! HTTP request handlers.

pub mod artifact;
pub mod preview;
pub mod session;
