//! Tests for calendar create and update validation.

use almanac_rules::RulesError;
use serde_json::json;

use super::helpers::{body, failed_parameters, failures, validator};

fn valid_create() -> serde_json::Value {
    json!({
        "title": "Weekly group meeting",
        "description": "Repayment collection",
        "location": "Village hall",
        "startDate": "2024-01-01",
        "typeId": 2,
        "locale": "en",
        "dateFormat": "yyyy-MM-dd"
    })
}

/// ## Summary
/// Every independent violation is reported, not only the first.
#[test_log::test]
fn collects_every_independent_violation() {
    let request = json!({
        "title": "",
        "description": "d".repeat(101),
        "location": "l".repeat(51),
        "startDate": "not a date",
        "typeId": 8,
        "remindById": 3,
        "firstReminderOffset": 0,
        "secondReminderOffset": -4,
        "meetingTime": "25:99"
    });
    let failed = failed_parameters(validator().validate_for_create(&body(&request)));
    assert_eq!(
        failed,
        vec![
            "title",
            "description",
            "location",
            "startDate",
            "typeId",
            "remindById",
            "firstReminderOffset",
            "secondReminderOffset",
            "meetingTime",
        ]
    );
}

/// ## Summary
/// Title, start date and type are mandatory on create.
#[test]
fn create_requires_title_start_date_and_type() {
    for key in ["title", "startDate", "typeId"] {
        let mut request = valid_create();
        request.as_object_mut().unwrap().remove(key);
        let failed = failed_parameters(validator().validate_for_create(&body(&request)));
        assert_eq!(failed, vec![key.to_string()], "missing {key}");
    }
    assert!(validator().validate_for_create(&body(&valid_create())).is_ok());
}

/// ## Summary
/// A weekly repeat needs at least one weekday.
#[test]
fn weekly_repeat_requires_weekday() {
    let mut request = valid_create();
    let fields = request.as_object_mut().unwrap();
    fields.insert("repeating".into(), json!(true));
    fields.insert("frequency".into(), json!(2));

    assert_eq!(
        failures(validator().validate_for_create(&body(&request))),
        vec![(
            "repeatsOnDay".to_string(),
            "validation.msg.calendar.repeatsOnDay.cannot.be.blank".to_string()
        )]
    );

    request["repeatsOnDay"] = json!(1);
    assert!(validator().validate_for_create(&body(&request)).is_ok());

    request["repeatsOnDay"] = json!([1, 4]);
    assert!(validator().validate_for_create(&body(&request)).is_ok());

    request["repeatsOnDay"] = json!([]);
    assert_eq!(
        failed_parameters(validator().validate_for_create(&body(&request))),
        vec!["repeatsOnDay"]
    );

    request["repeatsOnDay"] = json!(8);
    assert_eq!(
        failures(validator().validate_for_create(&body(&request))),
        vec![(
            "repeatsOnDay".to_string(),
            "validation.msg.calendar.repeatsOnDay.is.not.within.expected.range".to_string()
        )]
    );
}

/// ## Summary
/// An interval too large to expand is rejected by validation rather than
/// surfacing later as a parse failure.
#[test]
fn interval_upper_bound() {
    let mut request = valid_create();
    let fields = request.as_object_mut().unwrap();
    fields.insert("repeating".into(), json!(true));
    fields.insert("frequency".into(), json!(2));
    fields.insert("repeatsOnDay".into(), json!(1));
    fields.insert("interval".into(), json!(65_535));
    assert!(validator().validate_for_create(&body(&request)).is_ok());

    request["interval"] = json!(5_000_000_000_i64);
    assert_eq!(
        failures(validator().validate_for_create(&body(&request))),
        vec![(
            "interval".to_string(),
            "validation.msg.calendar.interval.is.not.within.expected.range".to_string()
        )]
    );
    assert!(matches!(
        validator().command_for_create(&body(&request)),
        Err(RulesError::ValidationFailed(_))
    ));

    request["interval"] = json!(0);
    assert_eq!(
        failures(validator().validate_for_create(&body(&request))),
        vec![(
            "interval".to_string(),
            "validation.msg.calendar.interval.not.greater.than.zero".to_string()
        )]
    );
}

/// ## Summary
/// Nth-day-of-month and last-weekday-of-month cannot both be set.
#[test]
fn monthly_styles_are_mutually_exclusive() {
    let mut request = valid_create();
    let fields = request.as_object_mut().unwrap();
    fields.insert("repeating".into(), json!(true));
    fields.insert("frequency".into(), json!(3));
    fields.insert("repeatsOnNthDayOfMonth".into(), json!(2));
    fields.insert("repeatsOnDay".into(), json!(2));
    assert!(validator().validate_for_create(&body(&request)).is_ok());

    request["repeatsOnLastWeekdayOfMonth"] = json!(5);
    assert_eq!(
        failed_parameters(validator().validate_for_create(&body(&request))),
        vec!["repeatsOnLastWeekdayOfMonth"]
    );
}

/// ## Summary
/// Range checks include both bounds.
#[test]
fn entity_type_range_is_inclusive() {
    let mut request = valid_create();
    request["typeId"] = json!(7);
    assert!(validator().validate_for_create(&body(&request)).is_ok());

    request["typeId"] = json!(8);
    assert_eq!(
        failures(validator().validate_for_create(&body(&request))),
        vec![(
            "typeId".to_string(),
            "validation.msg.calendar.typeId.is.not.within.expected.range".to_string()
        )]
    );

    request["typeId"] = json!(1);
    request["frequency"] = json!(4);
    request["repeating"] = json!(true);
    assert!(validator().validate_for_create(&body(&request)).is_ok());

    request["frequency"] = json!(5);
    assert_eq!(
        failed_parameters(validator().validate_for_create(&body(&request))),
        vec!["frequency"]
    );
}

/// ## Summary
/// Reminder offsets must be positive on create.
#[test]
fn reminder_offsets_must_be_positive_on_create() {
    for (offset, ok) in [(0, false), (-1, false), (5, true)] {
        let mut request = valid_create();
        request["firstReminderOffset"] = json!(offset);
        let result = validator().validate_for_create(&body(&request));
        assert_eq!(result.is_ok(), ok, "offset {offset}");
    }
}

/// ## Summary
/// An update touching only one field checks only that field.
#[test]
fn update_validates_only_supplied_fields() {
    let request = json!({"location": "Branch office"});
    assert!(validator().validate_for_update(&body(&request)).is_ok());

    let request = json!({"location": "l".repeat(51)});
    assert_eq!(
        failed_parameters(validator().validate_for_update(&body(&request))),
        vec!["location"]
    );
}

/// ## Summary
/// Unknown keys are rejected before any business rule runs.
#[test]
fn unsupported_parameters_rejected_first() {
    let request = json!({"title": "", "colour": "blue", "priority": 1});
    match validator().validate_for_create(&body(&request)) {
        Err(RulesError::UnsupportedParameter(keys)) => {
            assert_eq!(keys, vec!["colour".to_string(), "priority".to_string()]);
        }
        other => panic!("expected UnsupportedParameter, got {other:?}"),
    }
}

/// ## Summary
/// A blank or non-object body is malformed, not a validation failure.
#[test]
fn malformed_bodies() {
    for body in ["", "   ", "nope", "[]", "42"] {
        assert!(
            matches!(
                validator().validate_for_create(body),
                Err(RulesError::MalformedRequest(_))
            ),
            "body {body:?}"
        );
    }
}

/// ## Summary
/// A null `repeating` flag is a validation error rather than a crash.
#[test]
fn null_repeating_reported() {
    let mut request = valid_create();
    request["repeating"] = serde_json::Value::Null;
    assert_eq!(
        failed_parameters(validator().validate_for_create(&body(&request))),
        vec!["repeating"]
    );
    assert_eq!(
        failed_parameters(validator().validate_for_update(r#"{"repeating": null}"#)),
        vec!["repeating"]
    );
}

/// ## Summary
/// Dates follow the request's own `dateFormat`.
#[test]
fn request_date_format_applies() {
    let mut request = valid_create();
    request["dateFormat"] = json!("dd MMMM yyyy");
    request["startDate"] = json!("01 January 2024");
    assert!(validator().validate_for_create(&body(&request)).is_ok());

    request["startDate"] = json!("2024-01-01");
    assert_eq!(
        failures(validator().validate_for_create(&body(&request))),
        vec![(
            "startDate".to_string(),
            "validation.msg.calendar.startDate.invalid.date.format".to_string()
        )]
    );
}

/// ## Summary
/// The error body carries the aggregate key and each parameter error.
#[test]
fn error_body_shape() {
    let err = validator().validate_for_create("{}").unwrap_err();
    let errors = err.validation_errors().expect("validation failure");
    let value = serde_json::to_value(errors).unwrap();
    assert_eq!(
        value["userMessageGlobalisationCode"],
        "validation.msg.validation.errors.exist"
    );
    assert_eq!(value["defaultUserMessage"], "Validation errors exist.");
    assert_eq!(value["errors"].as_array().map(Vec::len), Some(3));
    assert_eq!(value["errors"][0]["parameterName"], "title");
    assert_eq!(
        value["errors"][0]["defaultUserMessage"],
        "The parameter `title` is mandatory."
    );
}
