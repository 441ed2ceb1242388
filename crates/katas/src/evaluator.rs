//! Kata 06: evaluator and optimizer.
//!
//! One model produces, another scores and gives feedback, and the loop
//! repeats until the score is good enough. A run is only accepted when
//! each attempt scores at least as well as the one before it.

use agentkata_core::error::KataError;
use serde::{Deserialize, Serialize};

use crate::kata::PendingKata;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// In `[0, 1]`.
    pub score: f64,
    pub feedback: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationAttempt {
    pub attempt_number: u32,
    pub result: String,
    pub evaluation: Evaluation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorResult {
    pub attempts: Vec<OptimizationAttempt>,
    pub final_result: String,
    pub final_score: f64,
}

impl EvaluatorResult {
    pub fn validate(&self) -> Result<(), KataError> {
        let invalid = |reason: String| Err(KataError::Validation(reason));

        let Some(last) = self.attempts.last() else {
            return invalid("no optimization attempts".into());
        };

        let mut previous: Option<&OptimizationAttempt> = None;
        for (i, attempt) in self.attempts.iter().enumerate() {
            let score = attempt.evaluation.score;
            if !(0.0..=1.0).contains(&score) {
                return invalid(format!(
                    "attempt {} score {score} is outside [0, 1]",
                    attempt.attempt_number
                ));
            }
            if attempt.attempt_number as usize != i + 1 {
                return invalid(format!(
                    "attempt numbers must count up from 1, found {} at position {}",
                    attempt.attempt_number,
                    i + 1
                ));
            }
            if let Some(prev) = previous {
                if score < prev.evaluation.score {
                    return invalid(format!(
                        "score regressed from {} to {score} at attempt {}",
                        prev.evaluation.score, attempt.attempt_number
                    ));
                }
            }
            previous = Some(attempt);
        }

        if self.final_score != last.evaluation.score {
            return invalid(format!(
                "final score {} does not match last attempt score {}",
                self.final_score, last.evaluation.score
            ));
        }
        Ok(())
    }
}

pub fn kata() -> PendingKata {
    PendingKata::new(
        "06",
        "Evaluator-Optimizer",
        "Iteratively improve an output using a second LLM as the judge",
    )
}
