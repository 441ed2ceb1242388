//! Checks routed results against fixture expectations.

use agentkata_core::error::RoutingError;
use serde::{Deserialize, Serialize};

use crate::types::RoutedResult;

/// Inputs longer than this are shortened in mismatch reports.
const INPUT_PREVIEW_CHARS: usize = 50;

/// One routed input and, for fixtures, the handler it should have reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationCase {
    pub input: String,
    pub routed_result: RoutedResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_handler: Option<String>,
}

fn preview(input: &str) -> String {
    if input.chars().count() <= INPUT_PREVIEW_CHARS {
        return input.to_string();
    }
    let head: String = input.chars().take(INPUT_PREVIEW_CHARS).collect();
    format!("{head}…")
}

/// Compare every case with an expectation against the handler chosen.
///
/// Stops at the first mismatch. Cases without an expectation always pass.
pub fn validate(cases: &[ValidationCase]) -> Result<bool, RoutingError> {
    for case in cases {
        let Some(expected) = &case.expected_handler else {
            continue;
        };
        let actual = &case.routed_result.route.handler;
        if actual != expected {
            return Err(RoutingError::ValidationMismatch {
                input: preview(&case.input),
                expected: expected.clone(),
                actual: actual.clone(),
            });
        }
    }
    Ok(true)
}

/// Structural checks every routed result must pass.
pub fn validate_routed_result(result: &RoutedResult) -> Result<(), String> {
    if result.input.body.trim().is_empty() {
        return Err("routed result has an empty input".into());
    }
    if result.route.category.trim().is_empty() {
        return Err("route has an empty category".into());
    }
    if result.route.handler.trim().is_empty() {
        return Err("route has an empty handler".into());
    }
    if !(0.0..=1.0).contains(&result.route.confidence) {
        return Err(format!(
            "route confidence {} is outside [0, 1]",
            result.route.confidence
        ));
    }
    if result.response.trim().is_empty() {
        return Err("routed result has an empty response".into());
    }
    Ok(())
}
