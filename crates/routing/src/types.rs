//! Value types passed between classifier, router and validator.

use agentkata_core::text_message::TextMessage;
use serde::{Deserialize, Serialize};

/// What the classifier sees. Only `body` reaches the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationInput {
    pub body: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,

    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl ClassificationInput {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }
}

/// Any expected handler on the fixture is dropped here.
impl From<TextMessage> for ClassificationInput {
    fn from(message: TextMessage) -> Self {
        let (message, _expected) = message.strip_expectation();
        Self {
            body: message.body,
            sender: Some(message.from).filter(|s| !s.is_empty()),
            metadata: message.meta.unwrap_or_default(),
        }
    }
}

impl From<&TextMessage> for ClassificationInput {
    fn from(message: &TextMessage) -> Self {
        message.clone().into()
    }
}

/// A validated classifier decision.
///
/// Only ever built by [`crate::structured::parse_classification`], so
/// `confidence` is in `[0, 1]` and `handler` names a catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub category: String,
    pub confidence: f64,
    pub handler: String,
    pub reasoning: String,
}

/// The routing decision recorded on a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub category: String,
    pub confidence: f64,
    pub handler: String,
}

impl From<&Classification> for Route {
    fn from(c: &Classification) -> Self {
        Self {
            category: c.category.clone(),
            confidence: c.confidence,
            handler: c.handler.clone(),
        }
    }
}

/// An input, the route taken, and the handler's response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutedResult {
    pub input: ClassificationInput,
    pub route: Route,
    pub response: String,
}
