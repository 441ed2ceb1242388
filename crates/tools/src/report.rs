//! Report request handler.
//!
//! Nothing is actually mailed: the request is acknowledged and queued in
//! memory so callers (and tests) can inspect what would have gone out.

use async_trait::async_trait;
use agentkata_core::error::ToolError;
use agentkata_core::tool::{Tool, ToolResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::text::{find_email, message_arg, message_schema, sender_arg, truncate};

/// A report someone asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub subject: String,
    /// Explicit address from the message, else the sender's number.
    pub recipient: String,
    pub requested_at: DateTime<Utc>,
}

/// Handler for "make me a report and email it" requests.
#[derive(Clone, Default)]
pub struct GenerateAndEmailReportTool {
    outbox: Arc<Mutex<Vec<ReportRequest>>>,
}

impl GenerateAndEmailReportTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything queued so far, oldest first.
    pub async fn outbox(&self) -> Vec<ReportRequest> {
        self.outbox.lock().await.clone()
    }
}

#[async_trait]
impl Tool for GenerateAndEmailReportTool {
    fn name(&self) -> &str {
        "generate_and_email_report"
    }

    fn description(&self) -> &str {
        "Create a report on a topic and email it to the requester."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        message_schema()
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let message = message_arg(&arguments)?;

        let recipient = find_email(message)
            .or_else(|| sender_arg(&arguments).map(str::to_string))
            .ok_or_else(|| ToolError::ExecutionFailed {
                tool_name: self.name().into(),
                reason: "no email address or sender to deliver the report to".into(),
            })?;

        let request = ReportRequest {
            subject: truncate(message.trim(), 60),
            recipient,
            requested_at: Utc::now(),
        };

        tracing::info!(recipient = %request.recipient, "Report queued");

        let output = format!(
            "Report \"{}\" queued for {} at {}.",
            request.subject,
            request.recipient,
            request.requested_at.format("%Y-%m-%d %H:%M UTC")
        );
        let data = serde_json::to_value(&request).unwrap_or_default();
        self.outbox.lock().await.push(request);

        Ok(ToolResult {
            call_id: String::new(),
            success: true,
            output,
            data: Some(data),
        })
    }
}
