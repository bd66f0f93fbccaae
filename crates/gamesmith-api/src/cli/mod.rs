//! CLI command definitions for the `gsmith` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod config;
pub mod generate;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Describe a game, get a playable HTML5 file.
#[derive(Parser, Debug)]
#[command(name = "gsmith", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true, env = "GAMESMITH_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive game creation session.
    Chat,

    /// Generate one game from a description and save it.
    #[command(alias = "gen")]
    Generate {
        /// What the game should be, e.g. "a snake game with score tracking".
        description: String,

        /// File or directory to write the game to (default: current directory).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start the REST API server with a live preview page.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Show the resolved configuration.
    Config,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

impl Cli {
    /// Default log filter for the chosen verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "warn",
            1 => "info,gamesmith_core=debug,gamesmith_infra=debug,gsmith=debug",
            _ => "trace",
        }
    }
}
