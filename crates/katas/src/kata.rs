//! The kata abstraction.

use agentkata_core::error::KataError;
use async_trait::async_trait;
use serde::Serialize;

/// What a successful kata run produced.
#[derive(Debug, Clone, Serialize)]
pub struct KataOutput {
    pub kata_id: String,
    /// One-line human summary for the CLI.
    pub summary: String,
    /// The kata's result type, serialized.
    pub data: serde_json::Value,
}

impl KataOutput {
    pub fn new(kata_id: &str, summary: impl Into<String>, data: &impl Serialize) -> Self {
        Self {
            kata_id: kata_id.to_string(),
            summary: summary.into(),
            data: serde_json::to_value(data).unwrap_or_default(),
        }
    }
}

/// One exercise in the collection.
#[async_trait]
pub trait Kata: Send + Sync {
    /// Two-digit identifier, e.g. "03".
    fn id(&self) -> &str;

    fn title(&self) -> &str;

    /// What pattern the kata demonstrates.
    fn description(&self) -> &str;

    async fn run(&self) -> Result<KataOutput, KataError>;
}

/// A kata that exists in the collection but has no body yet.
pub struct PendingKata {
    id: &'static str,
    title: &'static str,
    description: &'static str,
}

impl PendingKata {
    pub const fn new(id: &'static str, title: &'static str, description: &'static str) -> Self {
        Self {
            id,
            title,
            description,
        }
    }
}

#[async_trait]
impl Kata for PendingKata {
    fn id(&self) -> &str {
        self.id
    }

    fn title(&self) -> &str {
        self.title
    }

    fn description(&self) -> &str {
        self.description
    }

    async fn run(&self) -> Result<KataOutput, KataError> {
        Err(KataError::Unimplemented(format!("{} ({})", self.id, self.title)))
    }
}
