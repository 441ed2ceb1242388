//! `agentkata list`: show every kata.

use agentkata_katas::all_katas;
use std::path::Path;

use super::load_config;

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let provider = agentkata_providers::build_from_config(&config);

    println!("AgentKata");
    println!("=========");
    for kata in all_katas(&config, provider) {
        println!("  {}  {:<22} {}", kata.id(), kata.title(), kata.description());
    }
    println!();
    println!("  Run one with: agentkata run <id>");
    Ok(())
}
