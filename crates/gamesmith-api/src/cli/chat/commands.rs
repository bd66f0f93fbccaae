//! Slash command parsing for the chat loop.
//!
//! Commands start with `/` and give in-chat access to regeneration,
//! restart, download, and session history.

use std::path::PathBuf;

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Generate again from the most recent description.
    Regenerate,
    /// Reload the current game from scratch.
    Restart,
    /// Save the current game, optionally to a file or directory.
    Download(Option<PathBuf>),
    /// Show conversation history for this session.
    History,
    /// Clear the terminal screen.
    Clear,
    /// Exit the chat session.
    Exit,
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let parts: Vec<&str> = trimmed.splitn(2, ' ').collect();
    let cmd = parts[0].to_lowercase();
    let arg = parts
        .get(1)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty());

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/regenerate" | "/regen" | "/r" => Some(ChatCommand::Regenerate),
        "/restart" => Some(ChatCommand::Restart),
        "/download" | "/save" => Some(ChatCommand::Download(arg.map(PathBuf::from))),
        "/history" => Some(ChatCommand::History),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Print the help text listing all available commands.
pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!("  {}       {}", style("/help").cyan(), "Show this help message");
    println!(
        "  {} {}",
        style("/regenerate").cyan(),
        "Build the last description again"
    );
    println!(
        "  {}    {}",
        style("/restart").cyan(),
        "Restart the current game"
    );
    println!(
        "  {}   {}",
        style("/download").cyan(),
        "Save the game as HTML (optional path)"
    );
    println!(
        "  {}    {}",
        style("/history").cyan(),
        "Show conversation history"
    );
    println!("  {}      {}", style("/clear").cyan(), "Clear the screen");
    println!("  {}       {}", style("/exit").cyan(), "End the session");
    println!();
    println!(
        "  {}",
        style("Anything else is a game description.").dim()
    );
    println!();
}
