//! Webpage summary handler.
//!
//! Fetches the first URL in the message, strips markup down to visible
//! text, and asks the provider for a short summary of it.

use async_trait::async_trait;
use agentkata_core::error::ToolError;
use agentkata_core::message::Message;
use agentkata_core::provider::{Provider, ProviderRequest};
use agentkata_core::tool::{Tool, ToolResult};
use scraper::{ElementRef, Html, Node};
use std::sync::Arc;
use std::time::Duration;

use crate::text::{find_url, message_arg, message_schema, truncate};

/// Page text beyond this is not sent to the model.
const MAX_PAGE_CHARS: usize = 8_000;

/// Where page bodies come from. Swapped out in tests.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, String>;
}

/// Plain HTTP GET.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("agentkata/0.1")
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(15))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status.as_u16()));
        }

        response.text().await.map_err(|e| format!("failed to read body: {e}"))
    }
}

/// Elements whose text never reaches the page reader.
const HIDDEN: &[&str] = &["script", "style", "noscript", "template", "head"];

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(text);
                out.push(' ');
            }
            Node::Element(el) if !HIDDEN.contains(&el.name()) => {
                if let Some(child) = ElementRef::wrap(child) {
                    collect_text(child, out);
                }
            }
            _ => {}
        }
    }
}

/// Readable text of an HTML document: entities decoded, whitespace
/// collapsed, and no attribute values, comments, scripts or styles.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut out = String::with_capacity(html.len() / 2);
    collect_text(document.root_element(), &mut out);
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub struct SummarizeWebpageTool {
    provider: Arc<dyn Provider>,
    model: String,
    fetcher: Arc<dyn PageFetcher>,
    temperature: f32,
    max_tokens: u32,
}

impl SummarizeWebpageTool {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self::with_fetcher(provider, model, Arc::new(HttpFetcher::default()))
    }

    pub fn with_fetcher(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            fetcher,
            temperature: 0.3,
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
impl Tool for SummarizeWebpageTool {
    fn name(&self) -> &str {
        "summarize_webpage"
    }

    fn description(&self) -> &str {
        "Summarize the content of a webpage when someone shares a URL or asks about one."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        message_schema()
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let message = message_arg(&arguments)?;
        let url = find_url(message)
            .ok_or_else(|| ToolError::InvalidArguments("No URL found in message".into()))?;

        tracing::debug!(url = %url, "Fetching page to summarize");

        let html = self
            .fetcher
            .fetch(&url)
            .await
            .map_err(|reason| ToolError::ExecutionFailed {
                tool_name: self.name().into(),
                reason: format!("{url}: {reason}"),
            })?;

        let text = visible_text(&html);
        if text.is_empty() {
            return Err(ToolError::ExecutionFailed {
                tool_name: self.name().into(),
                reason: format!("{url}: page has no readable text"),
            });
        }

        let prompt = format!(
            "Summarize this webpage in two or three sentences for a text message reply.\n\
             URL: {url}\n\n{}",
            truncate(&text, MAX_PAGE_CHARS)
        );
        let request = ProviderRequest::new(self.model.clone(), vec![Message::user(prompt)])
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);

        let summary = self
            .provider
            .complete(request)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: self.name().into(),
                reason: e.to_string(),
            })?
            .message
            .content
            .trim()
            .to_string();

        Ok(ToolResult {
            call_id: String::new(),
            success: !summary.is_empty(),
            output: summary,
            data: Some(serde_json::json!({ "url": url })),
        })
    }
}
