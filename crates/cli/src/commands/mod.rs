//! Subcommand implementations and the helpers they share.

pub mod classify;
pub mod config_cmd;
pub mod list;
pub mod route;
pub mod run;

use agentkata_config::KataConfig;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The config file in use: `--config` if given, else the default location.
pub fn config_file(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf)
        .unwrap_or_else(|| KataConfig::config_dir().join("config.toml"))
}

pub fn load_config(path: Option<&Path>) -> Result<KataConfig, Box<dyn std::error::Error>> {
    let file = config_file(path);
    debug!(path = %file.display(), "Loading config");
    KataConfig::load_with_env(&file).map_err(|e| format!("Failed to load config: {e}").into())
}

/// Apply a `--dispatch` override and re-validate.
pub fn with_dispatch(
    mut config: KataConfig,
    dispatch: Option<String>,
) -> Result<KataConfig, Box<dyn std::error::Error>> {
    if let Some(mode) = dispatch {
        config.router.dispatch = mode.trim().to_ascii_lowercase();
        config.validate()?;
    }
    Ok(config)
}

/// Fail early with setup instructions when no key is configured.
pub fn require_api_key(config: &KataConfig) -> Result<(), Box<dyn std::error::Error>> {
    let has_key = match config.default_provider.as_str() {
        "ollama" => true,
        "anthropic" => config.anthropic_api_key.is_some() || config.has_api_key(),
        _ => config.has_api_key(),
    };
    if has_key {
        return Ok(());
    }

    eprintln!();
    eprintln!("  ERROR: No API key configured for provider '{}'!", config.default_provider);
    eprintln!();
    eprintln!("  Set one of these environment variables:");
    eprintln!("    OPENAI_API_KEY=sk-...        (OpenAI)");
    eprintln!("    ANTHROPIC_API_KEY=sk-ant-... (Anthropic)");
    eprintln!("    AGENTKATA_API_KEY=...        (generic)");
    eprintln!();
    eprintln!("  Or add it to your config file:");
    eprintln!("    {}", KataConfig::config_dir().join("config.toml").display());
    eprintln!();
    Err("No API key found. See above for setup instructions.".into())
}
