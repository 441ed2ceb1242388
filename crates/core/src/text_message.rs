//! Text message fixtures.
//!
//! SMS-style messages and the conversations that hold them. These are the
//! inputs the routing kata classifies. A fixture may carry the handler it is
//! expected to trigger; that annotation is for validation only and must be
//! stripped before a message reaches a classifier.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use uuid::Uuid;

use crate::error::Error;

/// Media attachment in a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaObject {
    /// URL to the media file
    pub url: String,

    /// Media type (e.g. image/jpeg)
    #[serde(rename = "type")]
    pub media_type: String,
}

/// A text message with metadata and optional attachments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextMessage {
    #[serde(default = "new_id")]
    pub id: String,

    /// Sender in E.164 format (e.g. +18015551234)
    #[serde(rename = "from")]
    pub from: String,

    /// Recipient in E.164 format
    pub to: String,

    /// Message content, less than 1600 characters
    pub body: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<Vec<MediaObject>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Map<String, serde_json::Value>>,

    /// Handler this message should be routed to. Test fixtures only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_handler: Option<String>,

    /// Creation timestamp in Unix epoch seconds
    #[serde(rename = "createdAt", default = "now_epoch")]
    pub created_at: i64,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn now_epoch() -> i64 {
    Utc::now().timestamp()
}

impl TextMessage {
    pub fn new(from: impl Into<String>, to: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            from: from.into(),
            to: to.into(),
            body: body.into(),
            media: None,
            meta: None,
            expected_handler: None,
            created_at: now_epoch(),
        }
    }

    pub fn expecting(mut self, handler: impl Into<String>) -> Self {
        self.expected_handler = Some(handler.into());
        self
    }

    /// Split the fixture into the message a classifier may see and its
    /// ground-truth annotation.
    pub fn strip_expectation(mut self) -> (TextMessage, Option<String>) {
        let expected = self.expected_handler.take();
        (self, expected)
    }
}

/// A collection of related text messages forming a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(default = "new_id")]
    pub id: String,

    /// Participants: name → E.164 phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub who: Option<Vec<HashMap<String, String>>>,

    /// Lowercase slug of the topic, less than 5 words.
    #[serde(default)]
    pub topic: String,

    #[serde(default)]
    pub messages: Vec<TextMessage>,
}

impl Conversation {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            who: None,
            topic: topic.into(),
            messages: Vec::new(),
        }
    }

    /// Append a message to the conversation.
    pub fn add_message(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        body: impl Into<String>,
    ) -> &mut TextMessage {
        self.messages.push(TextMessage::new(from, to, body));
        let last = self.messages.len() - 1;
        &mut self.messages[last]
    }

    /// Messages in chronological order (stable for equal timestamps).
    pub fn messages_sorted(&self) -> Vec<&TextMessage> {
        let mut sorted: Vec<&TextMessage> = self.messages.iter().collect();
        sorted.sort_by_key(|m| m.created_at);
        sorted
    }

    /// Load a conversation from a JSON fixture file.
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Fixture {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| Error::Fixture {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load every `*.json` conversation in a directory, ordered by file name.
    pub fn load_dir(dir: &Path) -> Result<Vec<Self>, Error> {
        let entries = std::fs::read_dir(dir).map_err(|e| Error::Fixture {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut paths: Vec<_> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        tracing::debug!(dir = %dir.display(), count = paths.len(), "Loading conversation fixtures");
        paths.iter().map(|p| Self::load_from(p)).collect()
    }
}
