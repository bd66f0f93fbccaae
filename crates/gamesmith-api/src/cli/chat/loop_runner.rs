//! Main chat loop orchestration.
//!
//! Coordinates the session lifecycle: welcome banner, greeting, the input
//! loop with slash commands, and a spinner while a game is being built.
//! Every success and restart rewrites the preview file; the user opens it
//! in a browser to play.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use gamesmith_core::studio::TurnOutcome;
use gamesmith_infra::export::write_export;
use gamesmith_types::conversation::ConversationEntry;
use gamesmith_types::error::SubmitRejected;

use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};

/// Spinner shown while a generation is in flight.
pub(crate) fn thinking_spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Await `work` with a spinner on screen.
async fn with_spinner<F: Future>(message: &'static str, work: F) -> F::Output {
    let spinner = thinking_spinner(message);
    let output = work.await;
    spinner.finish_and_clear();
    output
}

/// Print an assistant message, indented.
fn print_assistant(content: &str) {
    println!();
    for line in content.lines() {
        println!("  {line}");
    }
    println!();
}

/// First `max` characters of `text` on one line, with an ellipsis if cut.
pub(crate) fn preview_line(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > max {
        let cut: String = flat.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        flat
    }
}

fn print_history(entries: &[ConversationEntry]) {
    println!();
    for entry in entries {
        let label = if entry.is_user() {
            format!("{}", style("You").green())
        } else {
            format!("{}", style("Studio").cyan())
        };
        let marker = entry
            .artifact
            .map(|a| format!(" {}", style(format!("[game v{}]", a.version)).dim()))
            .unwrap_or_default();
        println!(
            "  {} {}{}",
            style(label).bold(),
            preview_line(&entry.content, 100),
            marker
        );
    }
    println!();
}

fn report_turn(result: Result<TurnOutcome, SubmitRejected>, preview_path: &Path) {
    match result {
        Ok(TurnOutcome::Generated { entry, artifact }) => {
            print_assistant(&entry.content);
            println!(
                "  {} Preview v{} written to {}",
                style("▶").green().bold(),
                artifact.version,
                style(preview_path.display()).cyan()
            );
            println!();
        }
        Ok(TurnOutcome::Failed { entry, .. }) => {
            print_assistant(&entry.content);
        }
        Err(SubmitRejected::NoPromptToRegenerate) => {
            println!(
                "\n  {} Nothing to regenerate yet. Describe a game first.\n",
                style("?").yellow().bold()
            );
        }
        Err(rejected) => {
            println!("\n  {} {rejected}\n", style("!").yellow().bold());
        }
    }
}

/// Run the interactive game creation loop.
pub async fn run_chat_loop(state: &AppState) -> anyhow::Result<()> {
    let studio = &state.studio;
    let preview_path = state.data_dir.join(&state.config.render.preview_file);

    print_welcome_banner(studio.model(), &preview_path);
    for entry in studio.snapshot().await.entries {
        print_assistant(&entry.content);
    }

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep creating.").dim());
                continue;
            }
            InputEvent::Message(text) => text,
        };
        if text.trim().is_empty() {
            continue;
        }

        let Some(cmd) = commands::parse(&text) else {
            let result = with_spinner("Building your game...", studio.submit(text)).await;
            report_turn(result, &preview_path);
            continue;
        };

        match cmd {
            ChatCommand::Help => commands::print_help(),
            ChatCommand::Clear => chat_input.clear(),
            ChatCommand::Exit => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            ChatCommand::Regenerate => {
                let result = with_spinner("Rebuilding your game...", studio.regenerate()).await;
                report_turn(result, &preview_path);
            }
            ChatCommand::Restart => match studio.restart().await {
                Some(frame) => println!(
                    "\n  {} Game restarted (v{})\n",
                    style("↻").cyan().bold(),
                    frame.version
                ),
                None => println!(
                    "\n  {} No game to restart yet.\n",
                    style("?").yellow().bold()
                ),
            },
            ChatCommand::Download(target) => match studio.export(chrono::Utc::now()).await {
                Some(export) => match write_export(&export, target.as_deref()).await {
                    Ok(path) => println!(
                        "\n  {} Saved {}\n",
                        style("✓").green().bold(),
                        style(path.display()).cyan()
                    ),
                    Err(e) => println!("\n  {} {e}\n", style("!").red().bold()),
                },
                None => println!(
                    "\n  {} No game to download yet.\n",
                    style("?").yellow().bold()
                ),
            },
            ChatCommand::History => print_history(&studio.snapshot().await.entries),
            ChatCommand::Unknown(name) => println!(
                "\n  {} Unknown command: {}. Type /help for available commands.\n",
                style("?").yellow().bold(),
                style(name).dim()
            ),
        }
    }

    let snapshot = studio.snapshot().await;
    info!(entries = snapshot.entries.len(), version = snapshot.version, "chat session ended");
    Ok(())
}
