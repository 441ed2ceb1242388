//! The set of capabilities a classification may choose from.

use agentkata_core::error::RoutingError;
use agentkata_core::tool::ToolRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One possible handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityDescriptor {
    pub name: String,
    pub description: String,
}

impl CapabilityDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A non-empty set of uniquely named capabilities.
///
/// Order is preserved as given; the classifier lists capabilities to the
/// model in this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityCatalog {
    capabilities: Vec<CapabilityDescriptor>,
}

impl CapabilityCatalog {
    pub fn new(capabilities: Vec<CapabilityDescriptor>) -> Result<Self, RoutingError> {
        if capabilities.is_empty() {
            return Err(RoutingError::InvalidCatalog("no capabilities given".into()));
        }

        let mut seen = HashSet::new();
        for capability in &capabilities {
            if capability.name.trim().is_empty() {
                return Err(RoutingError::InvalidCatalog("capability with empty name".into()));
            }
            if !seen.insert(capability.name.as_str()) {
                return Err(RoutingError::InvalidCatalog(format!(
                    "duplicate capability '{}'",
                    capability.name
                )));
            }
        }

        Ok(Self { capabilities })
    }

    /// Catalog of every tool in a registry.
    pub fn from_registry(registry: &ToolRegistry) -> Result<Self, RoutingError> {
        Self::new(
            registry
                .descriptors()
                .into_iter()
                .map(|(name, description)| CapabilityDescriptor { name, description })
                .collect(),
        )
    }

    pub fn contains(&self, name: &str) -> bool {
        self.capabilities.iter().any(|c| c.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&CapabilityDescriptor> {
        self.capabilities.iter().find(|c| c.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.capabilities.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CapabilityDescriptor> {
        self.capabilities.iter()
    }

    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    /// Never true for a constructed catalog.
    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}
