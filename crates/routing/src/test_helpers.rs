//! Shared test helpers for routing tests.

use agentkata_core::error::{ProviderError, ToolError};
use agentkata_core::message::Message;
use agentkata_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use agentkata_core::tool::{Tool, ToolResult};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

use crate::catalog::{CapabilityCatalog, CapabilityDescriptor};

/// A mock provider that returns a sequence of scripted replies.
///
/// Each call to `complete` returns the next reply and records the request.
/// Panics if more calls are made than replies provided.
pub struct SequentialMockProvider {
    replies: Vec<String>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl SequentialMockProvider {
    pub fn new(replies: Vec<String>) -> Self {
        Self {
            replies,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let call = requests.len();
        if call >= self.replies.len() {
            panic!(
                "SequentialMockProvider: no more replies (call #{}, have {})",
                call,
                self.replies.len()
            );
        }
        requests.push(request);
        Ok(make_text_response(&self.replies[call]))
    }
}

/// Always fails at the transport level.
pub struct FailingProvider;

#[async_trait]
impl Provider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        Err(ProviderError::Network("connection refused".into()))
    }
}

/// Sleeps before answering with a valid conversation classification.
pub struct SlowProvider(pub Duration);

#[async_trait]
impl Provider for SlowProvider {
    fn name(&self) -> &str {
        "slow"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        tokio::time::sleep(self.0).await;
        Ok(make_text_response(&classification_json("chat", 0.5, "conversation")))
    }
}

pub fn make_text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock-model".into(),
    }
}

/// A well-formed classifier reply.
pub fn classification_json(category: &str, confidence: f64, handler: &str) -> String {
    serde_json::json!({
        "category": category,
        "confidence": confidence,
        "handler": handler,
        "reasoning": format!("Looks like a {category} message"),
    })
    .to_string()
}

/// All six capabilities in policy order.
pub fn full_catalog() -> CapabilityCatalog {
    CapabilityCatalog::new(
        [
            ("search_rolodex", "Look up who someone is"),
            ("search_wikipedia", "Research questions"),
            ("generate_and_email_report", "Create and email reports"),
            ("add_to_rolodex", "Save contact details"),
            ("conversation", "General chat"),
            ("summarize_webpage", "Summarize a URL"),
        ]
        .into_iter()
        .map(|(name, description)| CapabilityDescriptor::new(name, description))
        .collect(),
    )
    .unwrap()
}

/// Tool with a fixed behavior.
pub enum StubTool {
    /// Succeeds with this output.
    Ok(&'static str, &'static str),
    /// Succeeds, echoing its arguments as JSON.
    Echo(&'static str),
    /// Returns an execution error.
    Failing(&'static str),
    /// Returns `success: false`.
    Unsuccessful(&'static str),
}

#[async_trait]
impl Tool for StubTool {
    fn name(&self) -> &str {
        match self {
            StubTool::Ok(name, _)
            | StubTool::Echo(name)
            | StubTool::Failing(name)
            | StubTool::Unsuccessful(name) => name,
        }
    }

    fn description(&self) -> &str {
        "stub"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({"type": "object"})
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        match self {
            StubTool::Ok(_, output) => Ok(ToolResult::ok(*output)),
            StubTool::Echo(_) => Ok(ToolResult::ok(arguments.to_string())),
            StubTool::Failing(name) => Err(ToolError::ExecutionFailed {
                tool_name: name.to_string(),
                reason: "backend down".into(),
            }),
            StubTool::Unsuccessful(_) => Ok(ToolResult {
                call_id: String::new(),
                success: false,
                output: "partial".into(),
                data: None,
            }),
        }
    }
}
