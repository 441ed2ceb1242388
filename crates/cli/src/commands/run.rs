//! `agentkata run`: run one kata.

use agentkata_katas::{all_katas, find_kata};
use std::path::Path;

use super::{load_config, with_dispatch};

pub async fn run(
    config_path: Option<&Path>,
    id: &str,
    dispatch: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = with_dispatch(load_config(config_path)?, dispatch)?;
    let provider = agentkata_providers::build_from_config(&config);

    let kata = find_kata(all_katas(&config, provider), id)
        .ok_or_else(|| format!("No kata with id '{id}'. Try `agentkata list`."))?;

    println!("Kata {}: {}", kata.id(), kata.title());

    match kata.run().await {
        Ok(output) => {
            println!("  {}", output.summary);
            println!();
            println!("{}", serde_json::to_string_pretty(&output.data)?);
            Ok(())
        }
        Err(e) if e.is_unimplemented() => {
            println!("  Not built yet. Implement it in crates/katas/src to make this pass.");
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}
