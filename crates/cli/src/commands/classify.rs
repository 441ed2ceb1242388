//! `agentkata classify`: classify one message.

use agentkata_routing::{CapabilityCatalog, ClassificationInput, Classifier};
use std::path::Path;

use super::{load_config, require_api_key};

pub async fn run(
    config_path: Option<&Path>,
    message: &str,
    sender: Option<String>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    require_api_key(&config)?;

    let provider = agentkata_providers::build_from_config(&config);
    let registry = agentkata_tools::default_registry(&config, provider.clone());
    let catalog = CapabilityCatalog::from_registry(&registry)?;

    let mut input = ClassificationInput::new(message);
    input.sender = sender;

    let classification = Classifier::from_config(provider, &config)
        .classify(&input, &catalog)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&classification)?);
    } else {
        println!("  Handler:    {}", classification.handler);
        println!("  Category:   {}", classification.category);
        println!("  Confidence: {:.2}", classification.confidence);
        println!("  Reasoning:  {}", classification.reasoning);
    }
    Ok(())
}
