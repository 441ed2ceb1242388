//! Small text helpers shared by the handlers.
//!
//! Every handler receives the same argument shape from the router:
//! `{"message": <body>, "sender": <E.164 number>}`.

use agentkata_core::error::ToolError;

/// JSON Schema for the router's standard handler arguments.
pub fn message_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "message": {
                "type": "string",
                "description": "The text message body being handled"
            },
            "sender": {
                "type": "string",
                "description": "Sender phone number in E.164 format"
            }
        },
        "required": ["message"]
    })
}

/// Extract the required `message` argument.
pub fn message_arg(arguments: &serde_json::Value) -> Result<&str, ToolError> {
    arguments["message"]
        .as_str()
        .ok_or_else(|| ToolError::InvalidArguments("Missing 'message' argument".into()))
}

/// Extract the optional `sender` argument.
pub fn sender_arg(arguments: &serde_json::Value) -> Option<&str> {
    arguments["sender"].as_str().filter(|s| !s.is_empty())
}

fn trim_token(token: &str) -> &str {
    token.trim_matches(|c: char| matches!(c, '<' | '>' | '(' | ')' | '"' | '\'' | ',' | '.' | '!' | '?' | ';' | ':'))
}

/// First `http://` or `https://` URL in the text.
pub fn find_url(text: &str) -> Option<String> {
    text.split_whitespace()
        .map(|t| t.trim_start_matches(|c: char| matches!(c, '<' | '(' | '"' | '\'')))
        .find(|t| t.starts_with("http://") || t.starts_with("https://"))
        .map(|t| t.trim_end_matches(|c: char| matches!(c, '>' | ')' | '"' | '\'' | ',' | '.' | '!' | '?' | ';')))
        .map(str::to_string)
}

/// First token that looks like an email address.
pub fn find_email(text: &str) -> Option<String> {
    text.split_whitespace()
        .map(trim_token)
        .find(|t| {
            let mut parts = t.splitn(2, '@');
            match (parts.next(), parts.next()) {
                (Some(local), Some(domain)) => {
                    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
                }
                _ => false,
            }
        })
        .map(str::to_string)
}

/// Truncate to at most `max` characters, appending an ellipsis when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{cut}…")
}
