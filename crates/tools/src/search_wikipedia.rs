//! Encyclopedia lookup handler backed by a ColBERTv2 passage index.

use async_trait::async_trait;
use agentkata_core::error::ToolError;
use agentkata_core::tool::{Tool, ToolResult};
use std::sync::Arc;

use crate::colbert::PassageSearch;
use crate::text::{message_arg, message_schema};

/// Answers research questions with the top passages from the index.
pub struct SearchWikipediaTool {
    retriever: Arc<dyn PassageSearch>,
    k: usize,
}

impl SearchWikipediaTool {
    pub fn new(retriever: Arc<dyn PassageSearch>, k: usize) -> Self {
        Self { retriever, k }
    }
}

#[async_trait]
impl Tool for SearchWikipediaTool {
    fn name(&self) -> &str {
        "search_wikipedia"
    }

    fn description(&self) -> &str {
        "Search Wikipedia abstracts for facts, history, lyrics or general research questions."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        message_schema()
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let query = message_arg(&arguments)?.trim();
        if query.is_empty() {
            return Err(ToolError::InvalidArguments("Empty search query".into()));
        }

        tracing::debug!(query, k = self.k, "Searching wikipedia abstracts");

        let passages = self
            .retriever
            .search(query, self.k)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: self.name().into(),
                reason: e.to_string(),
            })?;

        if passages.is_empty() {
            return Ok(ToolResult::ok(format!("No passages found for: {query}")));
        }

        let output = passages
            .iter()
            .enumerate()
            .map(|(i, p)| format!("[{}] {}", i + 1, p.text))
            .collect::<Vec<_>>()
            .join("\n");

        Ok(ToolResult {
            call_id: String::new(),
            success: true,
            output,
            data: Some(serde_json::to_value(&passages).unwrap_or_default()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colbert::{Passage, RetrieverError};
    use std::sync::Mutex;

    struct FixedIndex {
        passages: Vec<Passage>,
        seen: Mutex<Vec<(String, usize)>>,
    }

    #[async_trait]
    impl PassageSearch for FixedIndex {
        async fn search(&self, query: &str, k: usize) -> Result<Vec<Passage>, RetrieverError> {
            self.seen.lock().unwrap().push((query.to_string(), k));
            Ok(self.passages.iter().take(k).cloned().collect())
        }
    }

    struct DownIndex;

    #[async_trait]
    impl PassageSearch for DownIndex {
        async fn search(&self, _query: &str, _k: usize) -> Result<Vec<Passage>, RetrieverError> {
            Err(RetrieverError::Request("connection refused".into()))
        }
    }

    fn passage(text: &str) -> Passage {
        Passage {
            text: text.into(),
            long_text: text.into(),
            pid: None,
            rank: None,
            score: None,
        }
    }

    #[tokio::test]
    async fn joins_numbered_passages() {
        let index = Arc::new(FixedIndex {
            passages: vec![
                passage("Wellerman | \"Wellerman\" is a New Zealand sea shanty."),
                passage("Sea shanty | A sea shanty is a work song."),
            ],
            seen: Mutex::new(Vec::new()),
        });
        let tool = SearchWikipediaTool::new(index.clone(), 3);

        let result = tool
            .execute(serde_json::json!({"message": "  lyrics to the Wellerman  "}))
            .await
            .unwrap();

        assert!(result.output.starts_with("[1] Wellerman"));
        assert!(result.output.contains("[2] Sea shanty"));
        assert_eq!(
            index.seen.lock().unwrap()[0],
            ("lyrics to the Wellerman".to_string(), 3)
        );
    }

    #[tokio::test]
    async fn no_passages_is_still_success() {
        let index = Arc::new(FixedIndex {
            passages: vec![],
            seen: Mutex::new(Vec::new()),
        });
        let result = SearchWikipediaTool::new(index, 3)
            .execute(serde_json::json!({"message": "plumbus"}))
            .await
            .unwrap();
        assert!(result.success);
        assert!(result.output.contains("plumbus"));
    }

    #[tokio::test]
    async fn retriever_failure_is_execution_failure() {
        let err = SearchWikipediaTool::new(Arc::new(DownIndex), 3)
            .execute(serde_json::json!({"message": "anything"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed { .. }));
    }

    #[tokio::test]
    async fn blank_query_rejected() {
        let err = SearchWikipediaTool::new(Arc::new(DownIndex), 3)
            .execute(serde_json::json!({"message": "   "}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
