//! Welcome banner display for chat sessions.

use std::path::Path;

use console::style;

/// Print the welcome banner at the start of a chat session.
pub fn print_welcome_banner(model: &str, preview_path: &Path) {
    println!();
    println!("  {} {}", "🎮", style("AI Game Creator").cyan().bold());
    println!("  {}", style("Describe a game and play it in your browser").dim());
    println!();
    println!("  {}    {}", style("Model:").bold(), style(model).dim());
    println!(
        "  {}  {}",
        style("Preview:").bold(),
        style(preview_path.display()).dim()
    );
    println!();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
