//! `gsmith config`: print the configuration the other commands would use.

use console::style;

use gamesmith_core::render::SandboxPolicy;
use gamesmith_infra::config::{apply_env_overrides, config_path, load_studio_config};
use gamesmith_infra::filesystem::resolve_data_dir;
use gamesmith_infra::secret::{API_KEY_VAR, resolve_api_key};

/// Show the resolved configuration. The API key is reported as present or
/// missing, never printed.
pub async fn show_config(json: bool) -> anyhow::Result<()> {
    let data_dir = resolve_data_dir();
    let path = config_path(&data_dir);
    let file_exists = tokio::fs::try_exists(&path).await.unwrap_or(false);
    let config = apply_env_overrides(load_studio_config(&data_dir).await)?;
    let api_key_set = resolve_api_key().is_ok();

    if json {
        let out = serde_json::json!({
            "data_dir": data_dir.display().to_string(),
            "config_file": path.display().to_string(),
            "config_file_exists": file_exists,
            "api_key_set": api_key_set,
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let check = |ok: bool| {
        if ok {
            format!("{}", style("✓").green())
        } else {
            format!("{}", style("✗").red())
        }
    };

    println!();
    println!("  {}", style("Gamesmith configuration").bold());
    println!();
    println!("  {}       {}", style("Data dir:").bold(), data_dir.display());
    println!(
        "  {}    {} {}",
        style("Config file:").bold(),
        check(file_exists),
        path.display()
    );
    println!(
        "  {}        {} {}",
        style("API key:").bold(),
        check(api_key_set),
        style(API_KEY_VAR).dim()
    );
    println!();
    println!("  {}          {}", style("Model:").bold(), config.generation.model);
    println!("  {}     {}", style("Max tokens:").bold(), config.generation.max_tokens);
    println!("  {}       {}", style("Base URL:").bold(), config.generation.base_url);
    println!("  {}        {}s", style("Timeout:").bold(), config.generation.timeout_secs);
    println!(
        "  {}        {}",
        style("Sandbox:").bold(),
        SandboxPolicy {
            allow_same_origin: config.render.allow_same_origin,
        }
        .attribute()
    );
    println!("  {}   {}", style("Preview file:").bold(), config.render.preview_file);
    println!("  {}  {}", style("Export prefix:").bold(), config.export.file_prefix);
    println!();
    Ok(())
}
