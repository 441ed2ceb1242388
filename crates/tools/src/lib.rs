//! Capability handlers for AgentKata.
//!
//! These are the handlers the router dispatches classified messages to:
//! rolodex lookups and updates, encyclopedia search, report requests,
//! webpage summaries, and plain conversation.
//!
//! Every handler takes `{"message": <body>, "sender": <number>}` and is
//! registered under the exact name the classifier is allowed to return.

pub mod colbert;
pub mod conversation;
pub mod report;
pub mod rolodex;
pub mod search_wikipedia;
pub mod summarize_webpage;
pub mod text;

#[cfg(test)]
mod test_support;

use agentkata_config::KataConfig;
use agentkata_core::provider::Provider;
use agentkata_core::tool::ToolRegistry;
use std::sync::Arc;

pub use colbert::{ColBertV2, Passage, PassageSearch, RetrieverError};
pub use conversation::ConversationTool;
pub use report::{GenerateAndEmailReportTool, ReportRequest};
pub use rolodex::{AddToRolodexTool, Contact, Rolodex, SearchRolodexTool};
pub use search_wikipedia::SearchWikipediaTool;
pub use summarize_webpage::{HttpFetcher, PageFetcher, SummarizeWebpageTool};

/// The six capability names, in the classifier's policy order.
pub const CAPABILITY_NAMES: [&str; 6] = [
    "search_rolodex",
    "search_wikipedia",
    "generate_and_email_report",
    "add_to_rolodex",
    "conversation",
    "summarize_webpage",
];

/// Create a registry with every built-in handler.
///
/// The two rolodex handlers share one contact book. Handlers that talk to
/// an LLM use `provider` with the config's default model, temperature and
/// token limit.
pub fn default_registry(config: &KataConfig, provider: Arc<dyn Provider>) -> ToolRegistry {
    let model = config.default_model.clone();
    let (temperature, max_tokens) = (config.default_temperature, config.default_max_tokens);
    let retriever = &config.retriever;
    let rolodex = Rolodex::new();
    let mut registry = ToolRegistry::new();

    registry.register(Box::new(SearchRolodexTool::new(rolodex.clone())));
    registry.register(Box::new(AddToRolodexTool::new(rolodex)));
    registry.register(Box::new(SearchWikipediaTool::new(
        Arc::new(ColBertV2::from_config(retriever)),
        retriever.k,
    )));
    registry.register(Box::new(GenerateAndEmailReportTool::new()));
    registry.register(Box::new(
        ConversationTool::new(provider.clone(), model.clone()).with_sampling(temperature, max_tokens),
    ));
    registry.register(Box::new(
        SummarizeWebpageTool::new(provider, model).with_sampling(temperature, max_tokens),
    ));

    registry
}
