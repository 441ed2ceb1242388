//! In-memory contact book and the two handlers over it.
//!
//! `search_rolodex` answers "who is this?" by looking the sender (or a name
//! mentioned in the message) up. `add_to_rolodex` records contact details a
//! sender volunteers. Both handlers share one [`Rolodex`].

use async_trait::async_trait;
use agentkata_core::error::ToolError;
use agentkata_core::tool::{Tool, ToolResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::text::{find_email, message_arg, message_schema, sender_arg};

/// One entry in the contact book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    /// E.164 phone number
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Shared contact storage.
#[derive(Clone, Default)]
pub struct Rolodex {
    contacts: Arc<RwLock<Vec<Contact>>>,
}

impl Rolodex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contacts(contacts: Vec<Contact>) -> Self {
        Self {
            contacts: Arc::new(RwLock::new(contacts)),
        }
    }

    /// Insert or update the contact keyed by phone number.
    pub async fn upsert(&self, contact: Contact) {
        let mut contacts = self.contacts.write().await;
        match contacts.iter_mut().find(|c| c.phone == contact.phone) {
            Some(existing) => {
                existing.name = contact.name;
                if contact.email.is_some() {
                    existing.email = contact.email;
                }
            }
            None => contacts.push(contact),
        }
    }

    pub async fn find_by_phone(&self, phone: &str) -> Option<Contact> {
        self.contacts.read().await.iter().find(|c| c.phone == phone).cloned()
    }

    /// Contacts whose name appears in the text (case-insensitive).
    pub async fn find_mentioned(&self, text: &str) -> Vec<Contact> {
        let lower = text.to_lowercase();
        self.contacts
            .read()
            .await
            .iter()
            .filter(|c| lower.contains(&c.name.to_lowercase()))
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.contacts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.contacts.read().await.is_empty()
    }
}

/// Pull a self-introduced name out of a message ("this is Lancelot", "I'm Bob").
fn introduced_name(text: &str) -> Option<String> {
    const MARKERS: &[&str] = &["my name is ", "this is ", "i'm ", "i am ", "it's ", "its "];
    // ASCII lowering keeps byte offsets aligned with `text`.
    let lower = text.to_ascii_lowercase();

    MARKERS.iter().find_map(|marker| {
        let start = lower.find(marker)? + marker.len();
        let name: Vec<&str> = text[start..]
            .split(|c: char| matches!(c, ',' | '.' | '!' | '?' | '\n' | ';'))
            .next()?
            .split_whitespace()
            .take_while(|w| w.chars().next().is_some_and(char::is_uppercase))
            .take(3)
            .collect();
        (!name.is_empty()).then(|| name.join(" "))
    })
}

/// Handler for identity and contact lookups.
pub struct SearchRolodexTool {
    rolodex: Rolodex,
}

impl SearchRolodexTool {
    pub fn new(rolodex: Rolodex) -> Self {
        Self { rolodex }
    }
}

#[async_trait]
impl Tool for SearchRolodexTool {
    fn name(&self) -> &str {
        "search_rolodex"
    }

    fn description(&self) -> &str {
        "Look up who someone is. Use when a sender asks 'who is this?' or needs contact information."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        message_schema()
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let message = message_arg(&arguments)?;
        let sender = sender_arg(&arguments);

        let mut matches = self.rolodex.find_mentioned(message).await;
        if let Some(phone) = sender {
            if let Some(contact) = self.rolodex.find_by_phone(phone).await {
                if !matches.contains(&contact) {
                    matches.insert(0, contact);
                }
            }
        }

        let output = if matches.is_empty() {
            match sender {
                Some(phone) => format!("No rolodex entry found for {phone}."),
                None => "No matching rolodex entry found.".to_string(),
            }
        } else {
            matches
                .iter()
                .map(|c| match &c.email {
                    Some(email) => format!("{} ({}, {})", c.name, c.phone, email),
                    None => format!("{} ({})", c.name, c.phone),
                })
                .collect::<Vec<_>>()
                .join("\n")
        };

        Ok(ToolResult {
            call_id: String::new(),
            success: true,
            output,
            data: Some(serde_json::to_value(&matches).unwrap_or_default()),
        })
    }
}

/// Handler for senders volunteering their own contact details.
pub struct AddToRolodexTool {
    rolodex: Rolodex,
}

impl AddToRolodexTool {
    pub fn new(rolodex: Rolodex) -> Self {
        Self { rolodex }
    }
}

#[async_trait]
impl Tool for AddToRolodexTool {
    fn name(&self) -> &str {
        "add_to_rolodex"
    }

    fn description(&self) -> &str {
        "Save contact information (name, email) that a sender provides about themselves."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        message_schema()
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let message = message_arg(&arguments)?;
        let phone = sender_arg(&arguments).ok_or_else(|| {
            ToolError::InvalidArguments("add_to_rolodex needs the sender's number".into())
        })?;

        let email = find_email(message);
        let name = introduced_name(message);

        if name.is_none() && email.is_none() {
            return Err(ToolError::ExecutionFailed {
                tool_name: self.name().into(),
                reason: "no name or email found in message".into(),
            });
        }

        let existing = self.rolodex.find_by_phone(phone).await;
        let contact = Contact {
            name: name
                .or_else(|| existing.as_ref().map(|c| c.name.clone()))
                .unwrap_or_else(|| phone.to_string()),
            phone: phone.to_string(),
            email,
        };

        tracing::debug!(phone, name = %contact.name, "Saving rolodex entry");
        self.rolodex.upsert(contact.clone()).await;

        Ok(ToolResult {
            call_id: String::new(),
            success: true,
            output: format!("Saved {} ({}) to the rolodex.", contact.name, contact.phone),
            data: Some(serde_json::to_value(&contact).unwrap_or_default()),
        })
    }
}
