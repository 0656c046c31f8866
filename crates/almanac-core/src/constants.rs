/// Resource tag attached to every calendar validation error.
pub const CALENDAR_RESOURCE: &str = "calendar";

/// Prefix of every validation globalisation code.
pub const VALIDATION_MSG_PREFIX: &str = "validation.msg";

/// Message key carried by an aggregate validation failure.
pub const VALIDATION_ERRORS_EXIST: &str =
    const_str::concat!(VALIDATION_MSG_PREFIX, ".validation.errors.exist");

/// Default user message for an aggregate validation failure.
pub const VALIDATION_ERRORS_EXIST_MESSAGE: &str = "Validation errors exist.";

pub const DEFAULT_TITLE_MAX_LENGTH: usize = 50;
pub const DEFAULT_DESCRIPTION_MAX_LENGTH: usize = 100;
pub const DEFAULT_LOCATION_MAX_LENGTH: usize = 50;

/// Request date pattern used when a request carries no `dateFormat`.
pub const DEFAULT_DATE_FORMAT: &str = "yyyy-MM-dd";
/// Request time pattern used when a request carries no `timeFormat`.
pub const DEFAULT_TIME_FORMAT: &str = "HH:mm";

/// Upper bound on the number of occurrences a single expansion yields.
pub const DEFAULT_MAX_OCCURRENCES: usize = 10_000;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable prefix (`ALMANAC__LOGGING__LEVEL=debug`).
pub const ENV_PREFIX: &str = "ALMANAC";
pub const ENV_SEPARATOR: &str = "__";

/// Base name of the optional configuration file (`almanac.toml`).
pub const CONFIG_FILE_NAME: &str = "almanac";
