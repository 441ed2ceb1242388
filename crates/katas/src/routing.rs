//! Kata 03: routing.
//!
//! Classifies every fixture message against the six capabilities, routes it,
//! and checks the chosen handler against the fixture's annotation.

use agentkata_config::KataConfig;
use agentkata_core::error::KataError;
use agentkata_core::provider::Provider;
use agentkata_core::text_message::Conversation;
use agentkata_core::tool::ToolRegistry;
use agentkata_routing::{
    BatchRouter, CapabilityCatalog, Classifier, DispatchMode, RoutedResult, Router, validate,
    validate_routed_result,
};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::fixtures;
use crate::kata::{Kata, KataOutput};

/// Summary of a routing kata run.
#[derive(Debug, Clone, Serialize)]
pub struct RoutingReport {
    pub mode: DispatchMode,
    pub total: usize,
    pub handler_counts: BTreeMap<String, usize>,
    pub results: Vec<RoutedResult>,
}

pub struct RoutingKata {
    config: KataConfig,
    provider: Arc<dyn Provider>,
    registry: Option<Arc<ToolRegistry>>,
    conversations: Option<Vec<Conversation>>,
}

impl RoutingKata {
    pub fn new(config: KataConfig, provider: Arc<dyn Provider>) -> Self {
        Self {
            config,
            provider,
            registry: None,
            conversations: None,
        }
    }

    /// Route these conversations instead of the configured fixtures.
    pub fn with_conversations(mut self, conversations: Vec<Conversation>) -> Self {
        self.conversations = Some(conversations);
        self
    }

    /// Use this registry instead of the built-in handlers.
    pub fn with_registry(mut self, registry: Arc<ToolRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    fn dispatch_mode(&self) -> Result<DispatchMode, KataError> {
        self.config.router.dispatch.parse().map_err(KataError::Config)
    }

    fn registry(&self) -> Arc<ToolRegistry> {
        self.registry.clone().unwrap_or_else(|| {
            Arc::new(agentkata_tools::default_registry(&self.config, self.provider.clone()))
        })
    }

    pub async fn route_fixtures(&self) -> Result<RoutingReport, KataError> {
        let mode = self.dispatch_mode()?;
        let conversations = match &self.conversations {
            Some(c) => c.clone(),
            None => fixtures::load(&self.config)?,
        };
        let messages = fixtures::flatten(&conversations);

        let registry = self.registry();
        let catalog = Arc::new(CapabilityCatalog::from_registry(&registry)?);
        let router = match mode {
            DispatchMode::Mock => Router::mock(catalog),
            DispatchMode::Live => Router::live(catalog, registry),
        };
        let batch = BatchRouter::new(
            Classifier::from_config(self.provider.clone(), &self.config),
            router,
        );

        tracing::info!(messages = messages.len(), %mode, "Routing fixture messages");
        let report = batch.run(messages).await;

        if let Some((entry, err)) = report.failures().next() {
            tracing::warn!(message_id = %entry.message_id, "Routing kata stopped on failure");
            return Err(err.clone().into());
        }

        for routed in report.routed() {
            validate_routed_result(routed).map_err(KataError::Validation)?;
        }
        validate(&report.validation_cases())?;

        Ok(RoutingReport {
            mode,
            total: report.len(),
            handler_counts: report.handler_counts(),
            results: report.routed().cloned().collect(),
        })
    }
}

#[async_trait]
impl Kata for RoutingKata {
    fn id(&self) -> &str {
        "03"
    }

    fn title(&self) -> &str {
        "Routing"
    }

    fn description(&self) -> &str {
        "Classify messages and dispatch them to specialized handlers"
    }

    async fn run(&self) -> Result<KataOutput, KataError> {
        let report = self.route_fixtures().await?;
        let counts = report
            .handler_counts
            .iter()
            .map(|(handler, n)| format!("{handler}={n}"))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(KataOutput::new(
            self.id(),
            format!("{} messages routed ({}): {counts}", report.total, report.mode),
            &report,
        ))
    }
}
