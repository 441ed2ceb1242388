//! # AgentKata Routing
//!
//! Classify a text message against a catalog of capabilities, then route it.
//!
//! ```text
//! TextMessage ─► ClassificationInput ─► Classifier ─► Classification
//!                                                        │
//!                              RoutedResult ◄─ Router ◄──┘
//! ```
//!
//! The classifier talks to an LLM through the [`agentkata_core::Provider`]
//! trait and only ever returns classifications that passed
//! [`structured::parse_classification`]. The router either synthesizes a
//! mock response or executes the chosen handler from a tool registry.
//! [`validator`] compares results with fixture expectations, and
//! [`batch::BatchRouter`] drives whole fixture sets.

pub mod batch;
pub mod catalog;
pub mod classifier;
pub mod router;
pub mod structured;
pub mod types;
pub mod validator;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use batch::{BatchEntry, BatchOutcome, BatchReport, BatchRouter};
pub use catalog::{CapabilityCatalog, CapabilityDescriptor};
pub use classifier::Classifier;
pub use router::{DispatchMode, Router, mock_response};
pub use structured::{StructuredError, json_object, parse_classification};
pub use types::{Classification, ClassificationInput, Route, RoutedResult};
pub use validator::{ValidationCase, validate, validate_routed_result};
