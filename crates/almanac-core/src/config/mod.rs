use std::path::Path;

use anyhow::Result;
use config::Config;
use serde::{Deserialize, Serialize};

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_DATE_FORMAT, DEFAULT_DESCRIPTION_MAX_LENGTH,
    DEFAULT_LOCATION_MAX_LENGTH, DEFAULT_LOG_LEVEL, DEFAULT_MAX_OCCURRENCES, DEFAULT_TIME_FORMAT,
    DEFAULT_TITLE_MAX_LENGTH, ENV_PREFIX, ENV_SEPARATOR,
};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub calendar: CalendarRulesConfig,
    pub expansion: ExpansionConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// How reminder offsets are checked on the update path.
///
/// Creation always requires offsets greater than zero. Updates historically
/// only required the value to be present, which lets an offset of `0` through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderOffsetCheck {
    /// Accept any integer, including zero and negatives.
    #[default]
    PresenceOnly,
    /// Apply the same `> 0` rule as creation.
    Positive,
}

/// Limits and formats applied by the calendar request validator.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CalendarRulesConfig {
    pub title_max_length: usize,
    pub description_max_length: usize,
    pub location_max_length: usize,
    /// Date pattern (`yyyy-MM-dd` style) used when a request has no `dateFormat`.
    pub default_date_format: String,
    /// Time pattern (`HH:mm` style) used when a request has no `timeFormat`.
    pub default_time_format: String,
    pub reminder_offsets_on_update: ReminderOffsetCheck,
}

impl Default for CalendarRulesConfig {
    fn default() -> Self {
        Self {
            title_max_length: DEFAULT_TITLE_MAX_LENGTH,
            description_max_length: DEFAULT_DESCRIPTION_MAX_LENGTH,
            location_max_length: DEFAULT_LOCATION_MAX_LENGTH,
            default_date_format: DEFAULT_DATE_FORMAT.to_string(),
            default_time_format: DEFAULT_TIME_FORMAT.to_string(),
            reminder_offsets_on_update: ReminderOffsetCheck::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExpansionConfig {
    pub max_occurrences: usize,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            max_occurrences: DEFAULT_MAX_OCCURRENCES,
        }
    }
}

impl Settings {
    /// ## Summary
    /// Loads configuration from defaults, an optional `almanac.toml` (or the
    /// given file) and `ALMANAC__*` environment variables.
    /// Environment variables take precedence over file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration, deserializing it or
    /// validating the result fails.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(CONFIG_FILE_NAME).required(false),
        };

        let settings = Config::builder()
            .set_default("logging.level", DEFAULT_LOG_LEVEL)?
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        settings.validate()?;
        tracing::debug!(settings = ?settings, "Configuration validated");

        Ok(settings)
    }

    /// ## Summary
    /// Rejects settings the validator and expander cannot work with.
    ///
    /// ## Errors
    /// Returns `CoreError::ConfigError` naming the first offending key.
    pub fn validate(&self) -> CoreResult<()> {
        let calendar = &self.calendar;
        let limits = [
            ("calendar.title_max_length", calendar.title_max_length),
            ("calendar.description_max_length", calendar.description_max_length),
            ("calendar.location_max_length", calendar.location_max_length),
            ("expansion.max_occurrences", self.expansion.max_occurrences),
        ];
        if let Some((key, _)) = limits.iter().find(|(_, value)| *value == 0) {
            return Err(CoreError::ConfigError(format!("{key} must be greater than zero")));
        }

        if calendar.default_date_format.trim().is_empty() {
            return Err(CoreError::ConfigError(
                "calendar.default_date_format must not be blank".to_string(),
            ));
        }
        if calendar.default_time_format.trim().is_empty() {
            return Err(CoreError::ConfigError(
                "calendar.default_time_format must not be blank".to_string(),
            ));
        }

        Ok(())
    }
}

/// ## Summary
/// Loads configuration from environment variables, `.env` file and the
/// optional configuration file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config(path: Option<&Path>) -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load(path)
}

#[cfg(test)]
mod tests;
