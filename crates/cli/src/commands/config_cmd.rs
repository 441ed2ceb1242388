//! `agentkata config`: configuration management commands.

use agentkata_config::KataConfig;
use std::path::Path;

use super::{config_file, load_config};

pub async fn show(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(config_path)?;
    config.api_key = None;
    config.anthropic_api_key = None;
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

pub async fn path(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", config_file(config_path).display());
    Ok(())
}

pub async fn init(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let path = config_file(config_path);
    if path.exists() {
        println!("  Config already exists at {}", path.display());
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, KataConfig::default_toml())?;
    println!("  Wrote default config to {}", path.display());
    Ok(())
}

pub async fn validate(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("Validating configuration...");

    match load_config(config_path) {
        Ok(config) => {
            println!("  Config parsed successfully");

            let mut warnings = Vec::new();
            if !config.has_api_key() && config.default_provider != "ollama" {
                warnings.push("No API key set (set OPENAI_API_KEY or AGENTKATA_API_KEY)");
            }

            if warnings.is_empty() {
                println!("  All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("  warning: {w}");
                }
            }

            println!();
            println!("  Provider:    {}", config.default_provider);
            println!("  Model:       {}", config.default_model);
            println!(
                "  Classifier:  {} (max {} attempts, {}s timeout)",
                config.classifier_model(),
                config.classifier.max_retries,
                config.classifier.timeout_secs
            );
            println!("  Dispatch:    {}", config.router.dispatch);
            println!("  Retriever:   {} (k={})", config.retriever.url, config.retriever.k);
            println!("  Fixtures:    {}", config.fixtures_dir().display());
        }
        Err(e) => {
            println!("  Config error: {e}");
            return Err(e);
        }
    }

    Ok(())
}
