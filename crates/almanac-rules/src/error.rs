use almanac_core::error::CoreError;
use thiserror::Error;

use crate::validate::ValidationErrors;

/// Calendar request, validation and recurrence errors
#[derive(Error, Debug)]
pub enum RulesError {
    /// The body is blank, not JSON, or not a JSON object.
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// The body carries keys outside the supported parameter set.
    #[error("Unsupported parameter(s): {}", .0.join(", "))]
    UnsupportedParameter(Vec<String>),

    /// One or more business rules were violated; carries every violation.
    #[error("{0}")]
    ValidationFailed(ValidationErrors),

    #[error("Invalid recurrence: {0}")]
    InvalidRecurrence(String),

    #[error("Invalid RRULE: {0}")]
    InvalidRRule(String),

    #[error(transparent)]
    CoreError(#[from] CoreError),
}

impl RulesError {
    /// Returns the collected validation errors, if this is a validation failure.
    #[must_use]
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::ValidationFailed(errors) => Some(errors),
            _ => None,
        }
    }
}

pub type RulesResult<T> = std::result::Result<T, RulesError>;
