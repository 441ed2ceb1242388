//! `agentkata route`: classify one message and dispatch it.

use agentkata_routing::{
    BatchRouter, CapabilityCatalog, ClassificationInput, Classifier, DispatchMode, Router,
};
use std::path::Path;
use std::sync::Arc;

use super::{load_config, require_api_key, with_dispatch};

pub async fn run(
    config_path: Option<&Path>,
    message: &str,
    sender: Option<String>,
    dispatch: Option<String>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = with_dispatch(load_config(config_path)?, dispatch)?;
    require_api_key(&config)?;

    let provider = agentkata_providers::build_from_config(&config);
    let registry = Arc::new(agentkata_tools::default_registry(&config, provider.clone()));
    let catalog = Arc::new(CapabilityCatalog::from_registry(&registry)?);

    let mode: DispatchMode = config.router.dispatch.parse()?;
    let router = match mode {
        DispatchMode::Mock => Router::mock(catalog),
        DispatchMode::Live => Router::live(catalog, registry),
    };
    let pipeline = BatchRouter::new(Classifier::from_config(provider, &config), router);

    let mut input = ClassificationInput::new(message);
    input.sender = sender;
    let routed = pipeline.route_one(&input).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&routed)?);
    } else {
        println!(
            "  Route:    {} ({}, {:.2})",
            routed.route.handler, routed.route.category, routed.route.confidence
        );
        println!("  Mode:     {mode}");
        println!("  Response: {}", routed.response);
    }
    Ok(())
}
