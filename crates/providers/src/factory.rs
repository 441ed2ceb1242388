//! Provider factory: builds the configured LLM backend.
//!
//! Every supported backend speaks the OpenAI chat-completions dialect, so the
//! factory only has to pick a base URL and the right key.

use std::sync::Arc;
use agentkata_config::KataConfig;
use agentkata_core::provider::Provider;
use tracing::info;

use crate::openai_compat::OpenAiCompatProvider;

/// Build the default provider from configuration.
pub fn build_from_config(config: &KataConfig) -> Arc<dyn Provider> {
    let name = config.default_provider.as_str();

    let base_url = config
        .api_url
        .clone()
        .unwrap_or_else(|| default_base_url(name));

    let api_key = match name {
        "anthropic" => config
            .anthropic_api_key
            .clone()
            .or_else(|| config.api_key.clone()),
        "ollama" => Some("ollama".into()),
        _ => config.api_key.clone(),
    }
    .unwrap_or_default();

    info!(provider = name, base_url = %base_url, model = %config.default_model, "Building provider");

    Arc::new(OpenAiCompatProvider::new(name, base_url, api_key))
}

/// Get the default base URL for well-known providers.
pub fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openai" => "https://api.openai.com/v1".into(),
        "anthropic" => "https://api.anthropic.com/v1".into(),
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}
