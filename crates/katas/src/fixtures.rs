//! Conversation fixtures for the routing kata.
//!
//! A set of annotated conversations ships with the crate. A fixtures
//! directory with `*.json` files in it takes precedence.

use agentkata_config::KataConfig;
use agentkata_core::error::KataError;
use agentkata_core::text_message::{Conversation, TextMessage};
use std::path::Path;

const BUNDLED: &[(&str, &str)] = &[
    ("casual_banter", include_str!("../fixtures/casual_banter.json")),
    ("new_phone_who_dis", include_str!("../fixtures/new_phone_who_dis.json")),
    ("email_me_a_thing", include_str!("../fixtures/email_me_a_thing.json")),
    ("sea_shanty_lookup", include_str!("../fixtures/sea_shanty_lookup.json")),
    ("link_share", include_str!("../fixtures/link_share.json")),
];

/// The conversations compiled into the crate.
pub fn bundled() -> Result<Vec<Conversation>, KataError> {
    BUNDLED
        .iter()
        .map(|(name, json)| {
            serde_json::from_str(json)
                .map_err(|e| KataError::Config(format!("bundled fixture {name} is invalid: {e}")))
        })
        .collect()
}

fn has_json_files(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .any(|e| e.path().extension().is_some_and(|ext| ext == "json"))
        })
        .unwrap_or(false)
}

/// Conversations from the configured directory, or the bundled set when
/// that directory holds none.
pub fn load(config: &KataConfig) -> Result<Vec<Conversation>, KataError> {
    let dir = config.fixtures_dir();
    if has_json_files(&dir) {
        tracing::debug!(dir = %dir.display(), "Loading conversation fixtures");
        return Conversation::load_dir(&dir).map_err(|e| KataError::Config(e.to_string()));
    }
    bundled()
}

/// Every message from every conversation, each conversation in time order.
pub fn flatten(conversations: &[Conversation]) -> Vec<TextMessage> {
    conversations
        .iter()
        .flat_map(|c| c.messages_sorted().into_iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_fixtures_parse_and_are_annotated() {
        let conversations = bundled().unwrap();
        assert_eq!(conversations.len(), BUNDLED.len());

        let messages = flatten(&conversations);
        assert!(!messages.is_empty());
        assert!(messages.iter().all(|m| m.expected_handler.is_some()));
        assert!(messages.iter().all(|m| !m.body.trim().is_empty()));
    }

    #[test]
    fn bundled_fixtures_cover_every_capability() {
        let messages = flatten(&bundled().unwrap());
        for name in agentkata_tools::CAPABILITY_NAMES {
            assert!(
                messages.iter().any(|m| m.expected_handler.as_deref() == Some(name)),
                "no fixture expects {name}"
            );
        }
    }

    #[test]
    fn directory_overrides_bundled_set() {
        let dir = tempfile::tempdir().unwrap();
        let mut conversation = Conversation::new("one-off");
        conversation
            .add_message("+1", "+2", "Who is this?")
            .expected_handler = Some("search_rolodex".into());
        std::fs::write(
            dir.path().join("one_off.json"),
            serde_json::to_string(&conversation).unwrap(),
        )
        .unwrap();

        let config = KataConfig {
            fixtures_dir: Some(dir.path().to_path_buf()),
            ..KataConfig::default()
        };
        let loaded = load(&config).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].topic, "one-off");
    }

    #[test]
    fn empty_directory_falls_back_to_bundled() {
        let dir = tempfile::tempdir().unwrap();
        let config = KataConfig {
            fixtures_dir: Some(dir.path().to_path_buf()),
            ..KataConfig::default()
        };
        assert_eq!(load(&config).unwrap().len(), BUNDLED.len());
    }

    #[test]
    fn flatten_orders_within_conversation() {
        let mut conversation = Conversation::new("t");
        conversation.add_message("+1", "+2", "second").created_at = 20;
        conversation.add_message("+1", "+2", "first").created_at = 10;
        let bodies: Vec<_> = flatten(&[conversation]).into_iter().map(|m| m.body).collect();
        assert_eq!(bodies, vec!["first", "second"]);
    }
}
