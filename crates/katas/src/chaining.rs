//! Kata 02: prompt chaining.

use serde::{Deserialize, Serialize};

use crate::kata::PendingKata;

/// A single step in a chain of prompts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainStep {
    pub prompt: String,
    pub response: String,
    #[serde(default)]
    pub next_step: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainResult {
    pub steps: Vec<ChainStep>,
    pub final_result: String,
}

pub fn kata() -> PendingKata {
    PendingKata::new(
        "02",
        "Prompt Chaining",
        "Decompose a task into sequential LLM calls with gates between them",
    )
}
