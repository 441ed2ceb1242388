//! Shared test helpers for kata tests.

use agentkata_core::error::ProviderError;
use agentkata_core::message::Message;
use agentkata_core::provider::{Provider, ProviderRequest, ProviderResponse};
use std::sync::Mutex;

/// Replays scripted replies in order, recording each request.
/// Panics when asked for more replies than it holds.
pub struct ScriptedProvider {
    replies: Vec<String>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<&str>) -> Self {
        Self::from_strings(replies.into_iter().map(String::from).collect())
    }

    pub fn from_strings(replies: Vec<String>) -> Self {
        Self {
            replies,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let call = requests.len();
        if call >= self.replies.len() {
            panic!("ScriptedProvider exhausted: call #{call}, have {}", self.replies.len());
        }
        requests.push(request);
        Ok(ProviderResponse {
            message: Message::assistant(self.replies[call].clone()),
            usage: None,
            model: "scripted".into(),
        })
    }
}

pub fn classification_json(category: &str, confidence: f64, handler: &str) -> String {
    serde_json::json!({
        "category": category,
        "confidence": confidence,
        "handler": handler,
        "reasoning": format!("{category} request"),
    })
    .to_string()
}
