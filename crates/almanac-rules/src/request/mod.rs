//! Typed field extraction from a JSON request body.
//!
//! Every extractor reports one of four outcomes so callers can tell a
//! missing key from an explicit `null` and from a value that is present but
//! cannot be read as the requested type.

mod format;
pub mod params;

use almanac_core::config::CalendarRulesConfig;
use chrono::{NaiveDate, NaiveTime};
use serde_json::{Map, Value};

pub use format::to_chrono_format;

use crate::error::{RulesError, RulesResult};

/// Kind of value an extractor was asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected {
    Text,
    Integer,
    IntegerList,
    Boolean,
    /// A date in the given request pattern.
    Date(String),
    /// A time of day in the given request pattern.
    Time(String),
}

/// Outcome of extracting one named field.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted<T> {
    /// The key is not in the request.
    Absent,
    /// The key is present with `null` or a blank string.
    Null,
    /// The key is present but its value is not a `T`.
    Invalid { raw: Value, expected: Expected },
    Value { value: T, raw: Value },
}

impl<T> Extracted<T> {
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value { value, .. } => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Value { value, .. } => Some(value),
            _ => None,
        }
    }

    /// The raw JSON value, if the key was present with a non-null value.
    #[must_use]
    pub fn raw(&self) -> Option<&Value> {
        match self {
            Self::Invalid { raw, .. } | Self::Value { raw, .. } => Some(raw),
            Self::Absent | Self::Null => None,
        }
    }

    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// True for an absent key, an explicit null, or a blank string.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Absent | Self::Null)
    }
}

/// Private conversion outcome for a present, non-null value.
enum Parsed<T> {
    Blank,
    Value(T),
    Invalid,
}

/// ## Summary
/// A calendar request body: a JSON object plus the date and time patterns it
/// is read with.
///
/// The patterns come from the request's own `dateFormat` / `timeFormat`
/// keys, falling back to the configured defaults.
#[derive(Debug, Clone)]
pub struct JsonRequest {
    fields: Map<String, Value>,
    date_pattern: String,
    date_format: String,
    time_pattern: String,
    time_format: String,
}

impl JsonRequest {
    /// ## Summary
    /// Parses a request body.
    ///
    /// ## Errors
    /// Returns `MalformedRequest` if the body is blank, is not JSON, is not a
    /// JSON object, or names a date/time pattern that cannot be used.
    pub fn from_body(body: &str, config: &CalendarRulesConfig) -> RulesResult<Self> {
        if body.trim().is_empty() {
            return Err(RulesError::MalformedRequest("request body is blank".to_string()));
        }
        let value: Value = serde_json::from_str(body)
            .map_err(|e| RulesError::MalformedRequest(format!("invalid JSON: {e}")))?;
        Self::from_value(value, config)
    }

    /// ## Summary
    /// Wraps an already-parsed JSON value.
    ///
    /// ## Errors
    /// Returns `MalformedRequest` if the value is not an object or names a
    /// date/time pattern that cannot be used.
    pub fn from_value(value: Value, config: &CalendarRulesConfig) -> RulesResult<Self> {
        let Value::Object(fields) = value else {
            return Err(RulesError::MalformedRequest(
                "request body must be a JSON object".to_string(),
            ));
        };

        let date_pattern = pattern_from(&fields, params::DATE_FORMAT, &config.default_date_format);
        let time_pattern = pattern_from(&fields, params::TIME_FORMAT, &config.default_time_format);
        let date_format = to_chrono_format(&date_pattern).map_err(|field| {
            RulesError::MalformedRequest(format!(
                "unsupported field '{field}' in date format '{date_pattern}'"
            ))
        })?;
        let time_format = to_chrono_format(&time_pattern).map_err(|field| {
            RulesError::MalformedRequest(format!(
                "unsupported field '{field}' in time format '{time_pattern}'"
            ))
        })?;

        Ok(Self {
            fields,
            date_pattern,
            date_format,
            time_pattern,
            time_format,
        })
    }

    /// ## Summary
    /// Fails if the request carries keys outside `allowed`.
    ///
    /// ## Errors
    /// Returns `UnsupportedParameter` listing every unknown key.
    pub fn check_for_unsupported_parameters(&self, allowed: &[&str]) -> RulesResult<()> {
        let unsupported: Vec<String> = self
            .fields
            .keys()
            .filter(|key| !allowed.contains(&key.as_str()))
            .cloned()
            .collect();

        if unsupported.is_empty() {
            Ok(())
        } else {
            Err(RulesError::UnsupportedParameter(unsupported))
        }
    }

    #[must_use]
    pub fn parameter_exists(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Keys present in the request, in sorted order.
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    #[must_use]
    pub fn date_pattern(&self) -> &str {
        &self.date_pattern
    }

    #[must_use]
    pub fn time_pattern(&self) -> &str {
        &self.time_pattern
    }

    /// Text value; numbers and booleans are read as their JSON text.
    #[must_use]
    pub fn extract_string(&self, name: &str) -> Extracted<String> {
        self.extract(name, Expected::Text, |value| match value {
            Value::String(s) => Parsed::Value(s.clone()),
            Value::Number(n) => Parsed::Value(n.to_string()),
            Value::Bool(b) => Parsed::Value(b.to_string()),
            _ => Parsed::Invalid,
        })
    }

    /// Integer value; numeric strings are accepted, blank strings read as null.
    #[must_use]
    pub fn extract_int(&self, name: &str) -> Extracted<i64> {
        self.extract(name, Expected::Integer, integer_of)
    }

    /// Either a single integer or an array of integers.
    #[must_use]
    pub fn extract_int_list(&self, name: &str) -> Extracted<Vec<i64>> {
        self.extract(name, Expected::IntegerList, |value| match value {
            Value::Array(items) => items
                .iter()
                .map(|item| match integer_of(item) {
                    Parsed::Value(n) => Some(n),
                    Parsed::Blank | Parsed::Invalid => None,
                })
                .collect::<Option<Vec<_>>>()
                .map_or(Parsed::Invalid, Parsed::Value),
            other => match integer_of(other) {
                Parsed::Value(n) => Parsed::Value(vec![n]),
                Parsed::Blank => Parsed::Blank,
                Parsed::Invalid => Parsed::Invalid,
            },
        })
    }

    /// Boolean value; `"true"` / `"false"` strings are accepted.
    #[must_use]
    pub fn extract_bool(&self, name: &str) -> Extracted<bool> {
        self.extract(name, Expected::Boolean, |value| match value {
            Value::Bool(b) => Parsed::Value(*b),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "" => Parsed::Blank,
                "true" => Parsed::Value(true),
                "false" => Parsed::Value(false),
                _ => Parsed::Invalid,
            },
            _ => Parsed::Invalid,
        })
    }

    /// Date in the request's date pattern, or a `[year, month, day]` array.
    #[must_use]
    pub fn extract_date(&self, name: &str) -> Extracted<NaiveDate> {
        let expected = Expected::Date(self.date_pattern.clone());
        self.extract(name, expected, |value| match value {
            Value::String(s) if s.trim().is_empty() => Parsed::Blank,
            Value::String(s) => NaiveDate::parse_from_str(s.trim(), &self.date_format)
                .map_or(Parsed::Invalid, Parsed::Value),
            Value::Array(parts) => date_from_parts(parts).map_or(Parsed::Invalid, Parsed::Value),
            _ => Parsed::Invalid,
        })
    }

    /// Time of day in the request's time pattern.
    #[must_use]
    pub fn extract_time(&self, name: &str) -> Extracted<NaiveTime> {
        let expected = Expected::Time(self.time_pattern.clone());
        self.extract(name, expected, |value| match value {
            Value::String(s) if s.trim().is_empty() => Parsed::Blank,
            Value::String(s) => NaiveTime::parse_from_str(s.trim(), &self.time_format)
                .map_or(Parsed::Invalid, Parsed::Value),
            _ => Parsed::Invalid,
        })
    }

    fn extract<T>(
        &self,
        name: &str,
        expected: Expected,
        convert: impl FnOnce(&Value) -> Parsed<T>,
    ) -> Extracted<T> {
        match self.fields.get(name) {
            None => Extracted::Absent,
            Some(Value::Null) => Extracted::Null,
            Some(raw) => match convert(raw) {
                Parsed::Blank => Extracted::Null,
                Parsed::Value(value) => Extracted::Value {
                    value,
                    raw: raw.clone(),
                },
                Parsed::Invalid => Extracted::Invalid {
                    raw: raw.clone(),
                    expected,
                },
            },
        }
    }
}

fn pattern_from(fields: &Map<String, Value>, key: &str, default: &str) -> String {
    match fields.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        _ => default.to_string(),
    }
}

fn integer_of(value: &Value) -> Parsed<i64> {
    match value {
        Value::Number(n) => n.as_i64().map_or(Parsed::Invalid, Parsed::Value),
        Value::String(s) if s.trim().is_empty() => Parsed::Blank,
        Value::String(s) => s.trim().parse().map_or(Parsed::Invalid, Parsed::Value),
        _ => Parsed::Invalid,
    }
}

fn date_from_parts(parts: &[Value]) -> Option<NaiveDate> {
    let [year, month, day] = parts else {
        return None;
    };
    NaiveDate::from_ymd_opt(
        i32::try_from(year.as_i64()?).ok()?,
        u32::try_from(month.as_i64()?).ok()?,
        u32::try_from(day.as_i64()?).ok()?,
    )
}
