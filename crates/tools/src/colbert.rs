//! ColBERTv2 retrieval client.
//!
//! Talks to a remote nearest-neighbor passage search server. The hosted
//! wiki17 abstracts index answers `GET ?query=..&k=..` (or a JSON `POST`)
//! with `{"topk": [{"text": .., "pid": .., "rank": .., "score": ..}, ..]}`.

use async_trait::async_trait;
use agentkata_config::RetrieverConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// The hosted server refuses larger result sets.
pub const MAX_K: usize = 100;

/// One retrieved passage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    pub text: String,

    /// Mirror of `text` for callers that expect the long form.
    #[serde(default)]
    pub long_text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TopK {
    topk: Vec<Passage>,
}

/// Errors from the retrieval server.
#[derive(Debug, thiserror::Error)]
pub enum RetrieverError {
    #[error("k={0} exceeds the server limit of 100")]
    TooMany(usize),

    #[error("Retriever request failed: {0}")]
    Request(String),

    #[error("Retriever returned an unexpected payload: {0}")]
    Payload(String),
}

/// Anything that can return passages for a query.
#[async_trait]
pub trait PassageSearch: Send + Sync {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Passage>, RetrieverError>;
}

/// Client for a ColBERTv2 server.
pub struct ColBertV2 {
    url: String,
    post_requests: bool,
    client: reqwest::Client,
}

impl ColBertV2 {
    pub fn new(url: impl Into<String>, post_requests: bool, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            url: url.into(),
            post_requests,
            client,
        }
    }

    pub fn from_config(config: &RetrieverConfig) -> Self {
        Self::new(
            &config.url,
            config.post_requests,
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[async_trait]
impl PassageSearch for ColBertV2 {
    /// Retrieve the top `k` passages for a query.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Passage>, RetrieverError> {
        if k > MAX_K {
            return Err(RetrieverError::TooMany(k));
        }

        debug!(url = %self.url, k, post = self.post_requests, "ColBERTv2 query");

        let k_param = k.to_string();

        let request = if self.post_requests {
            self.client
                .post(&self.url)
                .header("Content-Type", "application/json; charset=utf-8")
                .json(&serde_json::json!({ "query": query, "k": k }))
        } else {
            self.client
                .get(&self.url)
                .query(&[("query", query), ("k", k_param.as_str())])
        };

        let body = request
            .send()
            .await
            .map_err(|e| RetrieverError::Request(e.to_string()))?
            .error_for_status()
            .map_err(|e| RetrieverError::Request(e.to_string()))?
            .text()
            .await
            .map_err(|e| RetrieverError::Request(e.to_string()))?;

        parse_topk(&body, k)
    }
}

/// Decode a server payload, keeping at most `k` passages.
pub fn parse_topk(body: &str, k: usize) -> Result<Vec<Passage>, RetrieverError> {
    let parsed: TopK = serde_json::from_str(body).map_err(|e| RetrieverError::Payload(e.to_string()))?;
    Ok(parsed
        .topk
        .into_iter()
        .take(k)
        .map(|mut p| {
            p.long_text = p.text.clone();
            p
        })
        .collect())
}
