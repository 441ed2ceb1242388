//! Fallback chit-chat handler.

use async_trait::async_trait;
use agentkata_core::error::ToolError;
use agentkata_core::message::Message;
use agentkata_core::provider::{Provider, ProviderRequest};
use agentkata_core::tool::{Tool, ToolResult};
use std::sync::Arc;

use crate::text::{message_arg, message_schema};

const PERSONA: &str = "You are a friendly assistant replying to a text message. \
Keep it short, casual and suitable for SMS. No markdown.";

/// Replies conversationally through the configured provider.
pub struct ConversationTool {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl ConversationTool {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: 256,
        }
    }

    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
impl Tool for ConversationTool {
    fn name(&self) -> &str {
        "conversation"
    }

    fn description(&self) -> &str {
        "General chat, greetings and banter that no other capability covers."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        message_schema()
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let message = message_arg(&arguments)?;

        let request = ProviderRequest::new(
            self.model.clone(),
            vec![Message::system(PERSONA), Message::user(message)],
        )
        .with_temperature(self.temperature)
        .with_max_tokens(self.max_tokens);

        let response = self
            .provider
            .complete(request)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: self.name().into(),
                reason: e.to_string(),
            })?;

        let reply = response.message.content.trim().to_string();
        Ok(ToolResult {
            call_id: String::new(),
            success: !reply.is_empty(),
            output: reply,
            data: None,
        })
    }
}
