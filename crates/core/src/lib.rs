//! # AgentKata Core
//!
//! Domain types, traits, and error definitions shared by every kata.
//! This crate has **no framework dependencies**; it defines the domain model
//! that the provider, tool, routing, and kata crates implement against.
//!
//! ## Design Philosophy
//!
//! LLM backends and capability handlers are traits here. Implementations live
//! in their respective crates, so every pattern can be exercised against
//! scripted mock providers in tests.

pub mod error;
pub mod message;
pub mod provider;
pub mod text_message;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, KataError, ProviderError, Result, RoutingError, ToolError};
pub use message::{Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, ResponseFormat};
pub use text_message::{Conversation, MediaObject, TextMessage};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult};
