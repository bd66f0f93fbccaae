//! Interactive CLI game creation session.
//!
//! Implements the chat loop: welcome banner, greeting, input with slash
//! commands, a spinner while a game is generated, and a preview file that
//! is rewritten after every success or restart. Entry point:
//! `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
