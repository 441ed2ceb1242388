//! # AgentKata Katas
//!
//! Short exercises, one per agentic design pattern:
//!
//! | id | kata |
//! |----|------|
//! | 00 | setup (structured output smoke test) |
//! | 01 | augmented LLM |
//! | 02 | prompt chaining |
//! | 03 | routing |
//! | 04 | parallelization with voting |
//! | 05 | orchestrator and workers |
//! | 06 | evaluator and optimizer |
//! | 07 | full agent |
//!
//! Katas without a body yet return [`KataError::Unimplemented`]; their
//! result types are defined here regardless.

pub mod agent;
pub mod augmented;
pub mod chaining;
pub mod evaluator;
pub mod fixtures;
pub mod kata;
pub mod orchestrator;
pub mod parallel;
pub mod routing;
pub mod setup;

#[cfg(test)]
pub(crate) mod test_helpers;

use agentkata_config::KataConfig;
use agentkata_core::provider::Provider;
use std::sync::Arc;

pub use agent::{AgentResult, AgentThought};
pub use agentkata_core::error::KataError;
pub use augmented::{AugmentedKata, AugmentedResult, AugmentedTurn, QuestionAnswerWithContext};
pub use chaining::{ChainResult, ChainStep};
pub use evaluator::{Evaluation, EvaluatorResult, OptimizationAttempt};
pub use kata::{Kata, KataOutput, PendingKata};
pub use orchestrator::{OrchestratorResult, WorkerResult, WorkerTask};
pub use parallel::{ParallelResult, VotingResult};
pub use routing::{RoutingKata, RoutingReport};
pub use setup::{Koan, SetupKata};

/// Every kata, in order.
pub fn all_katas(config: &KataConfig, provider: Arc<dyn Provider>) -> Vec<Box<dyn Kata>> {
    vec![
        Box::new(SetupKata::from_config(provider.clone(), config)),
        Box::new(AugmentedKata::from_config(provider.clone(), config)),
        Box::new(chaining::kata()),
        Box::new(RoutingKata::new(config.clone(), provider)),
        Box::new(parallel::kata()),
        Box::new(orchestrator::kata()),
        Box::new(evaluator::kata()),
        Box::new(agent::kata()),
    ]
}

/// Find a kata by id ("3" and "03" both work).
pub fn find_kata(katas: Vec<Box<dyn Kata>>, id: &str) -> Option<Box<dyn Kata>> {
    let wanted = format!("{:0>2}", id.trim());
    katas.into_iter().find(|k| k.id() == wanted)
}
