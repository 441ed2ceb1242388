//! Structured-output boundary.
//!
//! Raw model text becomes a [`Classification`] here and nowhere else. Every
//! shape and range check lives in [`parse_classification`]; a value that
//! makes it out is safe to route on.

use crate::catalog::CapabilityCatalog;
use crate::types::Classification;

/// Why a model reply was rejected. The message is fed back to the model on
/// retry, so it says what to fix.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StructuredError {
    #[error("reply is not a JSON object: {0}")]
    NotJson(String),

    #[error("field '{0}' is missing or not a {1}")]
    WrongType(&'static str, &'static str),

    #[error("field '{0}' must not be empty")]
    Empty(&'static str),

    #[error("confidence {0} is outside [0, 1]")]
    ConfidenceOutOfRange(f64),

    #[error("handler '{handler}' is not one of: {allowed}")]
    UnknownHandler { handler: String, allowed: String },
}

/// The first JSON object in a model reply.
///
/// Code fences and prose on either side are ignored, including prose that
/// itself contains braces.
pub fn json_object(
    raw: &str,
) -> Result<serde_json::Map<String, serde_json::Value>, StructuredError> {
    let trimmed = raw.trim();
    let mut first_error = None;

    for (start, _) in trimmed.match_indices('{') {
        let mut values =
            serde_json::Deserializer::from_str(&trimmed[start..]).into_iter::<serde_json::Value>();
        match values.next() {
            Some(Ok(serde_json::Value::Object(object))) => return Ok(object),
            Some(Err(e)) => {
                first_error.get_or_insert_with(|| e.to_string());
            }
            _ => {}
        }
    }

    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => Err(StructuredError::NotJson(format!("got {value}"))),
        Err(e) => Err(StructuredError::NotJson(
            first_error.unwrap_or_else(|| e.to_string()),
        )),
    }
}

fn text_field(
    object: &serde_json::Map<String, serde_json::Value>,
    key: &'static str,
) -> Result<String, StructuredError> {
    let value = object
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or(StructuredError::WrongType(key, "string"))?
        .trim();
    if value.is_empty() {
        return Err(StructuredError::Empty(key));
    }
    Ok(value.to_string())
}

/// Decode and validate a classifier reply against the catalog it was asked
/// to choose from.
pub fn parse_classification(
    raw: &str,
    catalog: &CapabilityCatalog,
) -> Result<Classification, StructuredError> {
    let object = json_object(raw)?;

    let category = text_field(&object, "category")?;
    let handler = text_field(&object, "handler")?;
    let reasoning = text_field(&object, "reasoning")?;

    let confidence = object
        .get("confidence")
        .and_then(|v| v.as_f64())
        .ok_or(StructuredError::WrongType("confidence", "number"))?;
    if !(0.0..=1.0).contains(&confidence) {
        return Err(StructuredError::ConfidenceOutOfRange(confidence));
    }

    if !catalog.contains(&handler) {
        return Err(StructuredError::UnknownHandler {
            handler,
            allowed: catalog.names().join(", "),
        });
    }

    Ok(Classification {
        category,
        confidence,
        handler,
        reasoning,
    })
}
