//! Kata 00: environment check.
//!
//! Proves the provider is reachable and can return structured output by
//! asking for a koan as a JSON object.

use agentkata_config::KataConfig;
use agentkata_core::error::KataError;
use agentkata_core::message::Message;
use agentkata_core::provider::{Provider, ProviderRequest};
use agentkata_routing::json_object;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::kata::{Kata, KataOutput};

/// A short, pithy statement about agentic AI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Koan {
    pub koan: String,
    /// The (obviously fictional) monk credited with it.
    pub master: String,
}

impl Koan {
    pub fn validate(&self) -> Result<(), KataError> {
        if self.koan.trim().is_empty() {
            return Err(KataError::Validation("koan is empty".into()));
        }
        if self.master.trim().is_empty() {
            return Err(KataError::Validation("master is empty".into()));
        }
        Ok(())
    }
}

const QUESTION: &str = "Why do we practice through code?";

const SYSTEM: &str = "You are an Agentic AI monk. Answer with a koan. \
Reply with only a JSON object: {\"koan\": <a koan about agentic AI>, \
\"master\": <the name of the fictional Agentic AI monk who said it>}";

pub struct SetupKata {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl SetupKata {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Model, temperature and token limit from the config defaults.
    pub fn from_config(provider: Arc<dyn Provider>, config: &KataConfig) -> Self {
        Self {
            provider,
            model: config.default_model.clone(),
            temperature: Some(config.default_temperature),
            max_tokens: Some(config.default_max_tokens),
        }
    }

    pub async fn ask(&self) -> Result<Koan, KataError> {
        let mut request = ProviderRequest::new(
            self.model.clone(),
            vec![Message::system(SYSTEM), Message::user(QUESTION)],
        )
        .json();
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        let response = self.provider.complete(request).await?;
        let object = json_object(&response.message.content)
            .map_err(|e| KataError::Validation(format!("reply is not a koan: {e}")))?;
        let koan: Koan = serde_json::from_value(serde_json::Value::Object(object))
            .map_err(|e| KataError::Validation(format!("reply is not a koan: {e}")))?;
        koan.validate()?;
        Ok(koan)
    }
}

#[async_trait]
impl Kata for SetupKata {
    fn id(&self) -> &str {
        "00"
    }

    fn title(&self) -> &str {
        "Setup"
    }

    fn description(&self) -> &str {
        "Verify configuration, API access and structured output"
    }

    async fn run(&self) -> Result<KataOutput, KataError> {
        let koan = self.ask().await?;
        tracing::info!(master = %koan.master, "Koan received");
        Ok(KataOutput::new(
            self.id(),
            format!("\"{}\" ({})", koan.koan, koan.master),
            &koan,
        ))
    }
}
