//! Sequential batch routing over fixture messages.

use agentkata_core::error::RoutingError;
use agentkata_core::text_message::TextMessage;
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::classifier::Classifier;
use crate::router::Router;
use crate::types::{ClassificationInput, RoutedResult};
use crate::validator::ValidationCase;

/// What happened to one message.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    Routed(RoutedResult),
    Failed(RoutingError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    pub message_id: String,
    pub body: String,
    pub expected_handler: Option<String>,
    pub outcome: BatchOutcome,
}

/// Results of a batch, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn routed(&self) -> impl Iterator<Item = &RoutedResult> {
        self.entries.iter().filter_map(|e| match &e.outcome {
            BatchOutcome::Routed(r) => Some(r),
            BatchOutcome::Failed(_) => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&BatchEntry, &RoutingError)> {
        self.entries.iter().filter_map(|e| match &e.outcome {
            BatchOutcome::Failed(err) => Some((e, err)),
            BatchOutcome::Routed(_) => None,
        })
    }

    /// How many messages each handler received. Failed messages are not
    /// counted.
    pub fn handler_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for routed in self.routed() {
            *counts.entry(routed.route.handler.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Validation cases for every routed message.
    pub fn validation_cases(&self) -> Vec<ValidationCase> {
        self.entries
            .iter()
            .filter_map(|e| match &e.outcome {
                BatchOutcome::Routed(r) => Some(ValidationCase {
                    input: e.body.clone(),
                    routed_result: r.clone(),
                    expected_handler: e.expected_handler.clone(),
                }),
                BatchOutcome::Failed(_) => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Classifies and routes messages one at a time.
pub struct BatchRouter {
    classifier: Classifier,
    router: Router,
}

impl BatchRouter {
    pub fn new(classifier: Classifier, router: Router) -> Self {
        Self { classifier, router }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Classify and route a single input.
    pub async fn route_one(&self, input: &ClassificationInput) -> Result<RoutedResult, RoutingError> {
        let classification = self.classifier.classify(input, self.router.catalog()).await?;
        self.router.route(input, &classification).await
    }

    /// Route every message, continuing past failures.
    pub async fn run(&self, messages: Vec<TextMessage>) -> BatchReport {
        let total = messages.len();
        let mut report = BatchReport::default();

        for (i, message) in messages.into_iter().enumerate() {
            let message_id = message.id.clone();
            let (message, expected_handler) = message.strip_expectation();
            let body = message.body.clone();
            let input = ClassificationInput::from(message);

            let outcome = match self.route_one(&input).await {
                Ok(routed) => {
                    info!(
                        n = i + 1,
                        total,
                        handler = %routed.route.handler,
                        "Routed fixture message"
                    );
                    BatchOutcome::Routed(routed)
                }
                Err(e) => {
                    warn!(n = i + 1, total, error = %e, "Fixture message failed to route");
                    BatchOutcome::Failed(e)
                }
            };

            report.entries.push(BatchEntry {
                message_id,
                body,
                expected_handler,
                outcome,
            });
        }

        report
    }
}
