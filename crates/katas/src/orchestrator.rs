//! Kata 05: orchestrator and workers.

use agentkata_core::error::KataError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::kata::PendingKata;

/// A subtask the orchestrator hands to a worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerTask {
    pub id: String,
    pub description: String,
    /// Tasks that must finish first.
    #[serde(default)]
    pub depends_on: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerResult {
    pub task_id: String,
    pub output: String,
    pub success: bool,
    /// Attempts the worker needed, first try included.
    pub attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorResult {
    pub tasks: Vec<WorkerTask>,
    pub results: Vec<WorkerResult>,
    pub final_result: String,
}

impl OrchestratorResult {
    /// Dependencies and results must refer to planned tasks.
    pub fn validate(&self) -> Result<(), KataError> {
        let ids: HashSet<&str> = self.tasks.iter().map(|t| t.id.as_str()).collect();
        for task in &self.tasks {
            if let Some(missing) = task.depends_on.iter().find(|d| !ids.contains(d.as_str())) {
                return Err(KataError::Validation(format!(
                    "task {} depends on unknown task {missing}",
                    task.id
                )));
            }
        }
        if let Some(stray) = self.results.iter().find(|r| !ids.contains(r.task_id.as_str())) {
            return Err(KataError::Validation(format!(
                "result for unknown task {}",
                stray.task_id
            )));
        }
        Ok(())
    }
}

pub fn kata() -> PendingKata {
    PendingKata::new(
        "05",
        "Orchestrator-Workers",
        "A central LLM plans subtasks and delegates them to workers",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, deps: &[&str]) -> WorkerTask {
        WorkerTask {
            id: id.into(),
            description: format!("do {id}"),
            depends_on: deps.iter().map(|d| d.to_string()).collect(),
        }
    }

    #[test]
    fn consistent_plan_validates() {
        let result = OrchestratorResult {
            tasks: vec![task("research", &[]), task("write", &["research"])],
            results: vec![WorkerResult {
                task_id: "research".into(),
                output: "notes".into(),
                success: true,
                attempts: 1,
            }],
            final_result: "essay".into(),
        };
        assert!(result.validate().is_ok());
    }

    #[test]
    fn unknown_dependency_rejected() {
        let result = OrchestratorResult {
            tasks: vec![task("write", &["research"])],
            results: vec![],
            final_result: String::new(),
        };
        assert!(result.validate().unwrap_err().to_string().contains("research"));
    }
}
