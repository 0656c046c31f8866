//! Shared helpers for integration tests.

use almanac_rules::{CalendarValidator, RulesError, RulesResult};
use chrono::NaiveDate;
use serde_json::Value;

/// ## Summary
/// Validator with default configuration.
#[must_use]
pub fn validator() -> CalendarValidator {
    CalendarValidator::default()
}

#[must_use]
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

/// ## Summary
/// Serialises a JSON value into a request body.
#[must_use]
pub fn body(value: &Value) -> String {
    value.to_string()
}

/// ## Summary
/// `(parameter, code)` of every collected error.
///
/// ## Panics
/// Panics if `result` is not a validation failure.
pub fn failures(result: RulesResult<()>) -> Vec<(String, String)> {
    match result {
        Err(RulesError::ValidationFailed(errors)) => errors
            .errors()
            .iter()
            .map(|e| (e.parameter().to_string(), e.code().to_string()))
            .collect(),
        other => panic!("expected ValidationFailed, got {other:?}"),
    }
}

/// ## Summary
/// Parameters that failed, in the order they were recorded.
///
/// ## Panics
/// Panics if `result` is not a validation failure.
pub fn failed_parameters(result: RulesResult<()>) -> Vec<String> {
    failures(result).into_iter().map(|(p, _)| p).collect()
}
