//! Router: turns a classification into a routed result.
//!
//! Two dispatch modes. `Mock` answers with a deterministic placeholder so
//! the routing decision can be exercised without running any handler.
//! `Live` executes the chosen handler from a [`ToolRegistry`].

use agentkata_core::error::RoutingError;
use agentkata_core::tool::{ToolCall, ToolRegistry};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::catalog::CapabilityCatalog;
use crate::types::{Classification, ClassificationInput, Route, RoutedResult};

/// How the router produces a response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    #[default]
    Mock,
    Live,
}

impl fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchMode::Mock => write!(f, "mock"),
            DispatchMode::Live => write!(f, "live"),
        }
    }
}

impl FromStr for DispatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(DispatchMode::Mock),
            "live" => Ok(DispatchMode::Live),
            other => Err(format!("unknown dispatch mode '{other}' (expected mock or live)")),
        }
    }
}

/// The placeholder response used in mock mode.
pub fn mock_response(handler: &str) -> String {
    format!("Mock response from {handler}")
}

pub struct Router {
    catalog: Arc<CapabilityCatalog>,
    registry: Option<Arc<ToolRegistry>>,
}

impl Router {
    /// Router that never executes handlers.
    pub fn mock(catalog: Arc<CapabilityCatalog>) -> Self {
        Self {
            catalog,
            registry: None,
        }
    }

    /// Router that executes handlers from `registry`.
    pub fn live(catalog: Arc<CapabilityCatalog>, registry: Arc<ToolRegistry>) -> Self {
        Self {
            catalog,
            registry: Some(registry),
        }
    }

    pub fn mode(&self) -> DispatchMode {
        if self.registry.is_some() {
            DispatchMode::Live
        } else {
            DispatchMode::Mock
        }
    }

    pub fn catalog(&self) -> &CapabilityCatalog {
        &self.catalog
    }

    /// Dispatch one classified input. Handler failures are not retried.
    pub async fn route(
        &self,
        input: &ClassificationInput,
        classification: &Classification,
    ) -> Result<RoutedResult, RoutingError> {
        let handler = classification.handler.as_str();
        if !self.catalog.contains(handler) {
            warn!(handler, "Classification names a handler outside the catalog");
            return Err(RoutingError::UnknownHandler(handler.to_string()));
        }

        let response = match &self.registry {
            None => mock_response(handler),
            Some(registry) => Self::execute(registry, handler, input).await?,
        };

        info!(handler, mode = %self.mode(), "Message routed");

        Ok(RoutedResult {
            input: input.clone(),
            route: Route::from(classification),
            response,
        })
    }

    async fn execute(
        registry: &ToolRegistry,
        handler: &str,
        input: &ClassificationInput,
    ) -> Result<String, RoutingError> {
        if !registry.contains(handler) {
            return Err(RoutingError::UnknownHandler(handler.to_string()));
        }

        let call = ToolCall {
            id: format!("route_{}", uuid::Uuid::new_v4()),
            name: handler.to_string(),
            arguments: serde_json::json!({
                "message": input.body,
                "sender": input.sender,
            }),
        };

        debug!(handler, call_id = %call.id, "Executing handler");

        let failed = |cause: String| RoutingError::HandlerExecutionError {
            handler: handler.to_string(),
            cause,
        };

        let result = registry.execute(&call).await.map_err(|e| failed(e.to_string()))?;
        if !result.success {
            return Err(failed(format!("handler reported failure: {}", result.output)));
        }
        if result.output.trim().is_empty() {
            return Err(failed("handler returned an empty response".into()));
        }
        Ok(result.output)
    }
}
