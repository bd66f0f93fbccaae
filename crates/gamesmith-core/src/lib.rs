//! Generation pipeline and port trait definitions for Gamesmith.
//!
//! This crate holds the pure parts of the pipeline (prompt building,
//! sanitization, session state) and the "ports" (LLM provider, render host)
//! that the infrastructure layer implements. It depends only on
//! `gamesmith-types` -- never on `gamesmith-infra` or any HTTP/IO crate.

pub mod export;
pub mod generation;
pub mod llm;
pub mod messages;
pub mod prompt;
pub mod render;
pub mod sanitize;
pub mod session;
pub mod studio;
