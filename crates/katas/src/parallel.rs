//! Kata 04: parallelization with voting.

use agentkata_core::error::KataError;
use serde::{Deserialize, Serialize};

use crate::kata::PendingKata;

/// One of the parallel executions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallelResult {
    pub task_id: String,
    pub result: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VotingResult {
    pub parallel_results: Vec<ParallelResult>,
    pub winning_result: String,
    pub vote_confidence: f64,
}

impl VotingResult {
    pub fn validate(&self) -> Result<(), KataError> {
        if self.parallel_results.is_empty() {
            return Err(KataError::Validation("vote needs at least one parallel result".into()));
        }
        if !(0.0..=1.0).contains(&self.vote_confidence) {
            return Err(KataError::Validation(format!(
                "vote confidence {} is outside [0, 1]",
                self.vote_confidence
            )));
        }
        Ok(())
    }
}

pub fn kata() -> PendingKata {
    PendingKata::new(
        "04",
        "Parallelization",
        "Split work into parallel LLM calls and aggregate them by voting",
    )
}
