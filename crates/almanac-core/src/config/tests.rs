//! Tests for configuration module.

use std::io::Write;

use super::*;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp file should be created");
    file.write_all(contents.as_bytes())
        .expect("temp file should be writable");
    file
}

#[test]
fn test_default_calendar_limits() {
    let config = CalendarRulesConfig::default();

    assert_eq!(config.title_max_length, 50);
    assert_eq!(config.description_max_length, 100);
    assert_eq!(config.location_max_length, 50);
    assert_eq!(config.default_date_format, "yyyy-MM-dd");
    assert_eq!(config.default_time_format, "HH:mm");
    assert_eq!(config.reminder_offsets_on_update, ReminderOffsetCheck::PresenceOnly);
}

#[test]
fn test_default_settings_validate() {
    let settings = Settings::default();

    assert!(settings.validate().is_ok());
    assert_eq!(settings.expansion.max_occurrences, 10_000);
    assert_eq!(settings.logging.level, "info");
}

#[test]
fn test_zero_limit_rejected() {
    let mut settings = Settings::default();
    settings.calendar.location_max_length = 0;

    let err = settings.validate().expect_err("zero limit must be rejected");
    assert!(err.to_string().contains("calendar.location_max_length"));
}

#[test]
fn test_blank_date_format_rejected() {
    let mut settings = Settings::default();
    settings.calendar.default_date_format = "  ".to_string();

    assert!(matches!(settings.validate(), Err(CoreError::ConfigError(_))));
}

#[test_log::test]
fn test_load_from_file_overrides_defaults() {
    tracing::debug!("Loading settings from a temporary file");

    let file = write_config(
        r#"
[logging]
level = "trace"

[calendar]
title_max_length = 80
reminder_offsets_on_update = "positive"

[expansion]
max_occurrences = 25
"#,
    );

    let settings = Settings::load(Some(file.path())).expect("settings should load");

    assert_eq!(settings.logging.level, "trace");
    assert_eq!(settings.calendar.title_max_length, 80);
    assert_eq!(settings.calendar.location_max_length, 50);
    assert_eq!(
        settings.calendar.reminder_offsets_on_update,
        ReminderOffsetCheck::Positive
    );
    assert_eq!(settings.expansion.max_occurrences, 25);
}

#[test]
fn test_load_rejects_invalid_file_values() {
    let file = write_config(
        r"
[expansion]
max_occurrences = 0
",
    );

    assert!(Settings::load(Some(file.path())).is_err());
}

#[test]
fn test_load_missing_explicit_file_fails() {
    let path = std::env::temp_dir().join("almanac-definitely-missing-config.toml");

    assert!(Settings::load(Some(&path)).is_err());
}
