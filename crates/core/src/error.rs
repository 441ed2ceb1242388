//! Error types for the AgentKata domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all AgentKata operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Routing errors ---
    #[error("Routing error: {0}")]
    Routing(#[from] RoutingError),

    // --- Fixtures ---
    #[error("Fixture error at {path}: {reason}")]
    Fixture {
        path: std::path::PathBuf,
        reason: String,
    },
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Tool execution failed: {tool_name}: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),
}

/// Failures of the classify → route → validate pipeline.
///
/// All variants are reported to the immediate caller. Batch drivers may keep
/// going after one input fails, but must record the failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoutingError {
    /// The decision mechanism never produced a well-formed classification.
    #[error("Classification failed after {attempts} attempt(s): {reason}")]
    ClassificationFailure { attempts: u32, reason: String },

    /// The classification names a handler absent from the dispatch table.
    #[error("Unknown handler: {0}")]
    UnknownHandler(String),

    /// The dispatched handler itself failed. Not retried.
    #[error("Handler '{handler}' failed: {cause}")]
    HandlerExecutionError { handler: String, cause: String },

    /// A fixture's expected handler differs from the one actually chosen.
    #[error("Routing mismatch for input '{input}': expected '{expected}', got '{actual}'")]
    ValidationMismatch {
        input: String,
        expected: String,
        actual: String,
    },

    /// The capability set handed to the classifier is unusable.
    #[error("Invalid capability catalog: {0}")]
    InvalidCatalog(String),
}

/// Errors surfaced by a kata run.
#[derive(Debug, Error)]
pub enum KataError {
    /// The kata exists in the collection but has not been built yet.
    #[error("Kata {0} is not yet implemented")]
    Unimplemented(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error("Kata result failed validation: {0}")]
    Validation(String),

    #[error("Kata misconfigured: {0}")]
    Config(String),
}

impl KataError {
    /// Whether this is the "not yet built" marker rather than a runtime failure.
    pub fn is_unimplemented(&self) -> bool {
        matches!(self, KataError::Unimplemented(_))
    }
}
