//! Kata 07: full agent.

use serde::{Deserialize, Serialize};

use crate::kata::PendingKata;

/// One turn of the reason-act-observe loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentThought {
    pub thought: String,
    pub action: String,
    pub observation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResult {
    pub thoughts: Vec<AgentThought>,
    pub final_answer: String,
    pub tools_used: Vec<String>,
}

pub fn kata() -> PendingKata {
    PendingKata::new(
        "07",
        "Agent",
        "An autonomous agent that plans, uses tools and recovers from errors",
    )
}
