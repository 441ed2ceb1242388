//! LLM provider implementations for AgentKata.
//!
//! All providers implement the `agentkata_core::Provider` trait.
//! [`build_from_config`] picks the backend named in the configuration.

pub mod factory;
pub mod openai_compat;

pub use factory::{build_from_config, default_base_url};
pub use openai_compat::OpenAiCompatProvider;
