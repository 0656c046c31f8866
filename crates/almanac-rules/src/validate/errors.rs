//! Field-level validation error accumulator.
//!
//! A [`ValidationErrors`] collects one [`ApiParameterError`] per failed rule
//! chain. Chains are started with [`ValidationErrors::parameter`] and stop at
//! their first failing check, so each chain contributes at most one error.

use std::fmt;

use almanac_core::constants::{
    VALIDATION_ERRORS_EXIST, VALIDATION_ERRORS_EXIST_MESSAGE, VALIDATION_MSG_PREFIX,
};
use serde::Serialize;
use serde_json::Value;

use crate::error::{RulesError, RulesResult};
use crate::model::CodedValue;
use crate::request::{Expected, Extracted};

/// The rule a parameter failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    CannotBeBlank,
    ExceedsMaxLength { max: usize },
    NotWithinRange { min: i64, max: i64 },
    NotGreaterThanZero,
    InvalidText,
    InvalidInteger,
    InvalidBoolean,
    InvalidDate { format: String },
    InvalidTime { format: String },
    /// Both this parameter and `other` were supplied.
    MutuallyExclusive { other: &'static str },
    /// A date that precedes the event's start date.
    BeforeStartDate,
    /// A date that is not generated by the event's recurrence.
    NotAnOccurrence,
}

impl Rule {
    /// Rule that reports a present value of the wrong type.
    #[must_use]
    pub fn for_invalid(expected: &Expected) -> Self {
        match expected {
            Expected::Text => Self::InvalidText,
            Expected::Integer | Expected::IntegerList => Self::InvalidInteger,
            Expected::Boolean => Self::InvalidBoolean,
            Expected::Date(format) => Self::InvalidDate {
                format: format.clone(),
            },
            Expected::Time(format) => Self::InvalidTime {
                format: format.clone(),
            },
        }
    }

    /// Last segment of the globalisation code.
    #[must_use]
    pub fn code(&self) -> String {
        match self {
            Self::CannotBeBlank => "cannot.be.blank".to_string(),
            Self::ExceedsMaxLength { .. } => "exceeds.max.length".to_string(),
            Self::NotWithinRange { .. } => "is.not.within.expected.range".to_string(),
            Self::NotGreaterThanZero => "not.greater.than.zero".to_string(),
            Self::InvalidText => "invalid.text".to_string(),
            Self::InvalidInteger => "not.an.integer".to_string(),
            Self::InvalidBoolean => "invalid.boolean".to_string(),
            Self::InvalidDate { .. } => "invalid.date.format".to_string(),
            Self::InvalidTime { .. } => "invalid.time.format".to_string(),
            Self::MutuallyExclusive { other } => format!("cannot.be.provided.with.{other}"),
            Self::BeforeStartDate => "cannot.be.before.start.date".to_string(),
            Self::NotAnOccurrence => "not.a.meeting.date".to_string(),
        }
    }

    /// Default English message for `parameter`.
    #[must_use]
    pub fn default_message(&self, parameter: &str) -> String {
        match self {
            Self::CannotBeBlank => format!("The parameter `{parameter}` is mandatory."),
            Self::ExceedsMaxLength { max } => {
                format!("The parameter `{parameter}` exceeds max length of {max}.")
            }
            Self::NotWithinRange { min, max } => {
                format!("The parameter `{parameter}` must be between {min} and {max}.")
            }
            Self::NotGreaterThanZero => {
                format!("The parameter `{parameter}` must be greater than 0.")
            }
            Self::InvalidText => format!("The parameter `{parameter}` must be text."),
            Self::InvalidInteger => {
                format!("The parameter `{parameter}` must be a whole number.")
            }
            Self::InvalidBoolean => {
                format!("The parameter `{parameter}` must be set as true or false.")
            }
            Self::InvalidDate { format } => {
                format!("The parameter `{parameter}` is not a valid date in format `{format}`.")
            }
            Self::InvalidTime { format } => {
                format!("The parameter `{parameter}` is not a valid time in format `{format}`.")
            }
            Self::MutuallyExclusive { other } => {
                format!("The parameter `{parameter}` cannot be provided together with `{other}`.")
            }
            Self::BeforeStartDate => {
                format!("The parameter `{parameter}` cannot be before the start date.")
            }
            Self::NotAnOccurrence => {
                format!("The parameter `{parameter}` is not a date of the meeting schedule.")
            }
        }
    }
}

/// ## Summary
/// One failed rule on one request parameter.
///
/// Serialises in the platform's error body shape (`developerMessage`,
/// `defaultUserMessage`, `userMessageGlobalisationCode`, `parameterName`,
/// `value`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiParameterError {
    developer_message: String,
    default_user_message: String,
    user_message_globalisation_code: String,
    parameter_name: String,
    value: Value,
    #[serde(skip)]
    resource: &'static str,
    #[serde(skip)]
    rule: Rule,
}

impl ApiParameterError {
    #[must_use]
    pub fn new(resource: &'static str, parameter: &str, value: Value, rule: Rule) -> Self {
        let code = format!("{VALIDATION_MSG_PREFIX}.{resource}.{parameter}.{}", rule.code());
        let message = rule.default_message(parameter);
        Self {
            developer_message: message.clone(),
            default_user_message: message,
            user_message_globalisation_code: code,
            parameter_name: parameter.to_string(),
            value,
            resource,
            rule,
        }
    }

    #[must_use]
    pub fn resource(&self) -> &'static str {
        self.resource
    }

    #[must_use]
    pub fn parameter(&self) -> &str {
        &self.parameter_name
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[must_use]
    pub const fn rule(&self) -> &Rule {
        &self.rule
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.user_message_globalisation_code
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.default_user_message
    }
}

/// ## Summary
/// Accumulated validation failures for one request.
///
/// Serialises as the 400 response body: the aggregate message key plus every
/// collected [`ApiParameterError`] under `errors`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors {
    resource: &'static str,
    errors: Vec<ApiParameterError>,
}

impl ValidationErrors {
    #[must_use]
    pub const fn new(resource: &'static str) -> Self {
        Self {
            resource,
            errors: Vec::new(),
        }
    }

    /// Starts a check chain on one parameter's extracted value.
    pub fn parameter<'a, 'v, T>(
        &'a mut self,
        name: &'static str,
        extracted: &'v Extracted<T>,
    ) -> ParameterCheck<'a, 'v, T> {
        ParameterCheck {
            errors: self,
            name,
            extracted,
            done: false,
        }
    }

    /// Records a failure directly, outside any check chain.
    pub fn add(&mut self, parameter: &str, value: Value, rule: Rule) {
        tracing::trace!(parameter, code = %rule.code(), "Validation rule failed");
        self.errors
            .push(ApiParameterError::new(self.resource, parameter, value, rule));
    }

    #[must_use]
    pub fn resource(&self) -> &'static str {
        self.resource
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn errors(&self) -> &[ApiParameterError] {
        &self.errors
    }

    /// Errors recorded against `parameter`.
    pub fn for_parameter<'a>(
        &'a self,
        parameter: &'a str,
    ) -> impl Iterator<Item = &'a ApiParameterError> + 'a {
        self.errors.iter().filter(move |e| e.parameter() == parameter)
    }

    /// ## Summary
    /// Converts the accumulator into a result.
    ///
    /// ## Errors
    /// Returns `ValidationFailed` carrying every error if any were recorded.
    pub fn into_result(self) -> RulesResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(RulesError::ValidationFailed(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{VALIDATION_ERRORS_EXIST_MESSAGE}")?;
        for (i, error) in self.errors.iter().enumerate() {
            let sep = if i == 0 { " " } else { "; " };
            write!(f, "{sep}{}", error.code())?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
    developer_message: &'static str,
    default_user_message: &'static str,
    user_message_globalisation_code: &'static str,
    errors: &'a [ApiParameterError],
}

impl Serialize for ValidationErrors {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ErrorBody {
            developer_message: VALIDATION_ERRORS_EXIST_MESSAGE,
            default_user_message: VALIDATION_ERRORS_EXIST_MESSAGE,
            user_message_globalisation_code: VALIDATION_ERRORS_EXIST,
            errors: &self.errors,
        }
        .serialize(serializer)
    }
}

/// ## Summary
/// A rule chain on one parameter.
///
/// Checks run in order until one fails; later checks on the same chain are
/// skipped. A present value of the wrong type fails the first check that
/// needs the value. Checks other than [`not_null`](Self::not_null) and
/// [`not_blank`](Self::not_blank) pass on a missing value.
pub struct ParameterCheck<'a, 'v, T> {
    errors: &'a mut ValidationErrors,
    name: &'static str,
    extracted: &'v Extracted<T>,
    done: bool,
}

impl<'v, T> ParameterCheck<'_, 'v, T> {
    fn fail(&mut self, rule: Rule) {
        let value = self.extracted.raw().cloned().unwrap_or(Value::Null);
        self.errors.add(self.name, value, rule);
        self.done = true;
    }

    /// The value to check, or `None` if the chain is finished or the value
    /// is missing. Records a type error for an invalid value.
    fn current(&mut self) -> Option<&'v T> {
        if self.done {
            return None;
        }
        match self.extracted {
            Extracted::Value { value, .. } => Some(value),
            Extracted::Invalid { expected, .. } => {
                self.fail(Rule::for_invalid(expected));
                None
            }
            Extracted::Absent | Extracted::Null => None,
        }
    }

    /// Fails on an absent key or null value.
    pub fn not_null(&mut self) -> &mut Self {
        if !self.done && self.extracted.is_missing() {
            self.fail(Rule::CannotBeBlank);
        }
        self
    }

    /// Ends the chain without error when the value is missing.
    pub fn ignore_if_null(&mut self) -> &mut Self {
        if self.extracted.is_missing() {
            self.done = true;
        }
        self
    }

    /// Fails only if a present value is of the wrong type.
    pub fn well_formed(&mut self) -> &mut Self {
        self.current();
        self
    }

    /// Fails with `rule` if a present value does not satisfy `check`.
    pub fn satisfies(&mut self, check: impl FnOnce(&T) -> bool, rule: Rule) -> &mut Self {
        if let Some(value) = self.current() {
            if !check(value) {
                self.fail(rule);
            }
        }
        self
    }

    /// True once a check in this chain has failed or the chain was ended.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.done
    }
}

impl ParameterCheck<'_, '_, String> {
    /// Fails on a missing value or one that is only whitespace.
    pub fn not_blank(&mut self) -> &mut Self {
        if self.done {
            return self;
        }
        let blank = match self.extracted {
            Extracted::Value { value, .. } => value.trim().is_empty(),
            Extracted::Absent | Extracted::Null => true,
            Extracted::Invalid { .. } => false,
        };
        if blank {
            self.fail(Rule::CannotBeBlank);
        }
        self
    }

    pub fn not_exceeding_length_of(&mut self, max: usize) -> &mut Self {
        self.satisfies(
            |s| s.chars().count() <= max,
            Rule::ExceedsMaxLength { max },
        )
    }
}

impl ParameterCheck<'_, '_, i64> {
    pub fn in_min_max_range(&mut self, min: i64, max: i64) -> &mut Self {
        self.satisfies(|n| (min..=max).contains(n), Rule::NotWithinRange { min, max })
    }

    /// Range check against a coded enumeration's accepted values.
    pub fn in_range_of<C: CodedValue>(&mut self) -> &mut Self {
        self.in_min_max_range(C::MIN_VALUE, C::MAX_VALUE)
    }

    pub fn integer_greater_than_zero(&mut self) -> &mut Self {
        self.satisfies(|n| *n > 0, Rule::NotGreaterThanZero)
    }
}

impl ParameterCheck<'_, '_, Vec<i64>> {
    /// Fails on a missing value or an empty list.
    pub fn not_empty(&mut self) -> &mut Self {
        if self.done {
            return self;
        }
        let empty = match self.extracted {
            Extracted::Value { value, .. } => value.is_empty(),
            Extracted::Absent | Extracted::Null => true,
            Extracted::Invalid { .. } => false,
        };
        if empty {
            self.fail(Rule::CannotBeBlank);
        }
        self
    }

    /// Every element within `C`'s accepted values.
    pub fn each_in_range_of<C: CodedValue>(&mut self) -> &mut Self {
        let (min, max) = (C::MIN_VALUE, C::MAX_VALUE);
        self.satisfies(
            |items| items.iter().all(|n| (min..=max).contains(n)),
            Rule::NotWithinRange { min, max },
        )
    }
}
