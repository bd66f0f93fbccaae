//! Shared domain types for Gamesmith.
//!
//! This crate contains the core domain types used across the Gamesmith
//! workspace: conversation entries, artifacts, LLM request/response shapes,
//! configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod conversation;
pub mod error;
pub mod llm;
