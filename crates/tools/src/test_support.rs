//! Scripted provider for handler tests.

use async_trait::async_trait;
use agentkata_core::error::ProviderError;
use agentkata_core::message::Message;
use agentkata_core::provider::{Provider, ProviderRequest, ProviderResponse};
use std::sync::Mutex;

/// Returns canned replies in order and records every request it sees.
pub struct CannedProvider {
    replies: Mutex<Vec<String>>,
    requests: Mutex<Vec<ProviderRequest>>,
    fail: bool,
}

impl CannedProvider {
    pub fn new<const N: usize>(replies: [&str; N]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().rev().map(|r| r.to_string()).collect()),
            requests: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            replies: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for CannedProvider {
    fn name(&self) -> &str {
        "canned"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.requests.lock().unwrap().push(request);
        if self.fail {
            return Err(ProviderError::Network("connection reset".into()));
        }
        let reply = self.replies.lock().unwrap().pop().unwrap_or_default();
        Ok(ProviderResponse {
            message: Message::assistant(reply),
            usage: None,
            model: "canned".into(),
        })
    }
}
