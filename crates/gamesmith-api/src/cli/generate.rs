//! One-shot generation: `gsmith generate "<description>"`.

use std::path::PathBuf;

use console::style;

use gamesmith_core::studio::TurnOutcome;
use gamesmith_infra::export::write_export;

use crate::cli::chat::loop_runner::thinking_spinner;
use crate::state::AppState;

/// Generate a game from `description` and write it to `output`.
///
/// Fails when the description is rejected or the generation fails, so the
/// process exits non-zero.
pub async fn generate_once(
    state: &AppState,
    description: String,
    output: Option<PathBuf>,
    json: bool,
    quiet: bool,
) -> anyhow::Result<()> {
    let spinner = (!json && !quiet).then(|| thinking_spinner("Building your game..."));
    let result = state.studio.submit(description).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let artifact = match result? {
        TurnOutcome::Generated { artifact, .. } => artifact,
        TurnOutcome::Failed { failure, .. } => {
            anyhow::bail!("game generation failed: {failure}");
        }
    };

    let export = state
        .studio
        .export(chrono::Utc::now())
        .await
        .ok_or(gamesmith_types::error::ExportError::NothingToExport)?;
    let path = write_export(&export, output.as_deref()).await?;

    if json {
        let out = serde_json::json!({
            "file": path.display().to_string(),
            "artifact_id": artifact.id,
            "version": artifact.version,
            "bytes": artifact.source.len(),
            "model": state.studio.model(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if !quiet {
        println!();
        println!(
            "  {} Game saved to {}",
            style("✓").green().bold(),
            style(path.display()).cyan()
        );
        println!(
            "  {}",
            style("Open it in a browser to play.").dim()
        );
        println!();
    }
    Ok(())
}
