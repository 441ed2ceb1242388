//! LLM-backed message classifier.
//!
//! Given a message body and a [`CapabilityCatalog`], asks the model which
//! handler should take the message. The reply must be a JSON object that
//! passes [`parse_classification`]; malformed replies are sent back to the
//! model with a correction until the attempt budget runs out.

use agentkata_config::KataConfig;
use agentkata_core::error::RoutingError;
use agentkata_core::message::Message;
use agentkata_core::provider::{Provider, ProviderRequest};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tracing::{Instrument, debug, info, warn};

use crate::catalog::CapabilityCatalog;
use crate::structured::parse_classification;
use crate::types::{Classification, ClassificationInput};

/// Routing policy, in priority order. A rule is only shown to the model
/// when its handler is in the catalog.
const POLICY: &[(&str, &str)] = &[
    (
        "search_rolodex",
        "when someone is trying to identify who someone is, asking 'who is this?', or needs contact information",
    ),
    (
        "search_wikipedia",
        "for general information lookups or research queries",
    ),
    (
        "generate_and_email_report",
        "for requests to create and send reports",
    ),
    (
        "add_to_rolodex",
        "when someone is providing their contact information",
    ),
    (
        "conversation",
        "for general chat that doesn't fit the above categories",
    ),
    (
        "summarize_webpage",
        "when someone shares a URL or asks about webpage content",
    ),
];

/// Classifies messages by delegating to a [`Provider`].
pub struct Classifier {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_attempts: u32,
    timeout: Duration,
}

impl Classifier {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.0,
            max_attempts: 3,
            timeout: Duration::from_secs(60),
        }
    }

    /// Use the `[classifier]` section of the config.
    pub fn from_config(provider: Arc<dyn Provider>, config: &KataConfig) -> Self {
        Self {
            provider,
            model: config.classifier_model().to_string(),
            temperature: config.classifier.temperature,
            max_attempts: config.classifier.max_retries.max(1),
            timeout: Duration::from_secs(config.classifier.timeout_secs),
        }
    }

    /// Total provider calls allowed per classification, first try included.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The instruction set for a given catalog.
    pub fn system_prompt(catalog: &CapabilityCatalog) -> String {
        let mut prompt = String::from(
            "You are an expert text message classifier and routing assistant. \
             You are given a text message and you need to classify it into a category. \
             You should also return the handler that should process this message. \
             Here is a list of potential tools that can be used as handlers: ",
        );
        prompt.push_str(&catalog.names().join(","));
        prompt.push_str("\n\nTool descriptions:\n");
        for capability in catalog.iter() {
            prompt.push_str(&format!("- {}: {}\n", capability.name, capability.description));
        }

        prompt.push_str("\nGuidelines for classification:\n");
        let rules = POLICY.iter().filter(|(handler, _)| catalog.contains(handler));
        for (i, (handler, when)) in rules.enumerate() {
            prompt.push_str(&format!("{}. Use {handler} {when}\n", i + 1));
        }

        prompt.push_str(
            "\nRespond with only a JSON object with these keys:\n\
             - \"category\": short name of the category the message belongs to\n\
             - \"confidence\": number between 0 and 1\n\
             - \"handler\": exactly one of the tool names above\n\
             - \"reasoning\": one sentence explaining the choice",
        );
        prompt
    }

    fn correction(error: &str, catalog: &CapabilityCatalog) -> String {
        format!(
            "Your previous reply was rejected: {error}. \
             Reply again with only a JSON object with keys category, confidence, handler and reasoning. \
             confidence must be a number between 0 and 1 and handler must be one of: {}.",
            catalog.names().join(", ")
        )
    }

    /// Classify one input against a catalog.
    ///
    /// Only `input.body` is sent to the model. Fails with
    /// [`RoutingError::ClassificationFailure`] when the provider errors, when
    /// every attempt yields an invalid reply, or when the whole call exceeds
    /// the configured timeout.
    pub async fn classify(
        &self,
        input: &ClassificationInput,
        catalog: &CapabilityCatalog,
    ) -> Result<Classification, RoutingError> {
        let attempts = AtomicU32::new(0);
        let span = tracing::info_span!("classify", model = %self.model, capabilities = catalog.len());

        let outcome = tokio::time::timeout(self.timeout, self.attempt(input, catalog, &attempts))
            .instrument(span)
            .await;

        match outcome {
            Ok(result) => result,
            Err(_) => {
                let made = attempts.load(Ordering::Relaxed);
                warn!(timeout_secs = self.timeout.as_secs_f64(), attempts = made, "Classification timed out");
                Err(RoutingError::ClassificationFailure {
                    attempts: made,
                    reason: format!("timed out after {:?}", self.timeout),
                })
            }
        }
    }

    async fn attempt(
        &self,
        input: &ClassificationInput,
        catalog: &CapabilityCatalog,
        attempts: &AtomicU32,
    ) -> Result<Classification, RoutingError> {
        let mut messages = vec![
            Message::system(Self::system_prompt(catalog)),
            Message::user(&input.body),
        ];
        let mut last_error = String::new();

        for attempt in 1..=self.max_attempts {
            attempts.store(attempt, Ordering::Relaxed);

            let request = ProviderRequest::new(self.model.clone(), messages.clone())
                .with_temperature(self.temperature)
                .json();

            let response = self.provider.complete(request).await.map_err(|e| {
                warn!(attempt, error = %e, "Provider call failed during classification");
                RoutingError::ClassificationFailure {
                    attempts: attempt,
                    reason: e.to_string(),
                }
            })?;

            let raw = response.message.content;
            match parse_classification(&raw, catalog) {
                Ok(classification) => {
                    info!(
                        handler = %classification.handler,
                        category = %classification.category,
                        confidence = classification.confidence,
                        attempt,
                        "Message classified"
                    );
                    return Ok(classification);
                }
                Err(e) => {
                    debug!(attempt, error = %e, "Rejected classifier reply");
                    last_error = e.to_string();
                    messages.push(Message::assistant(raw));
                    messages.push(Message::user(Self::correction(&last_error, catalog)));
                }
            }
        }

        warn!(attempts = self.max_attempts, error = %last_error, "Classifier gave up");
        Err(RoutingError::ClassificationFailure {
            attempts: self.max_attempts,
            reason: last_error,
        })
    }
}
