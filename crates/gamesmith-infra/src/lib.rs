//! Infrastructure layer for Gamesmith.
//!
//! Contains implementations of the ports defined in `gamesmith-core`: the
//! Anthropic Messages API provider and the file-backed render host. Also
//! owns everything that touches the environment (data directory, config
//! file, API key, export files).

pub mod config;
pub mod export;
pub mod filesystem;
pub mod llm;
pub mod render;
pub mod secret;
