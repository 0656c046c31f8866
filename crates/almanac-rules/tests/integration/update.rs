//! Tests for applying update requests to stored events.

use almanac_rules::model::{CalendarEvent, EntityType, RecurrenceSpec, Weekday};
use almanac_rules::validate::Rule;
use almanac_rules::RulesError;
use serde_json::{Value, json};

use super::helpers::{body, date, validator};

fn weekly_group_meeting() -> CalendarEvent {
    let request = json!({
        "title": "Group meeting",
        "startDate": "2024-01-01",
        "typeId": 2,
        "repeating": true,
        "frequency": 2,
        "repeatsOnDay": 1
    });
    validator()
        .command_for_create(&body(&request))
        .expect("valid create request")
}

/// ## Summary
/// Turning repetition off clears the recurrence and reports both changes.
#[test_log::test]
fn repeating_false_clears_recurrence() {
    let mut event = weekly_group_meeting();
    assert!(event.recurrence.is_some());

    let changes = validator()
        .apply_update(&mut event, r#"{"repeating": false}"#)
        .unwrap();
    assert!(!event.repeating);
    assert!(event.recurrence.is_none());
    assert_eq!(changes.get("repeating"), Some(&json!(false)));
    assert_eq!(changes.get("recurrence"), Some(&Value::Null));
}

/// ## Summary
/// Changing the frequency rebuilds the recurrence.
#[test]
fn switching_to_monthly_last_weekday() {
    let mut event = weekly_group_meeting();
    let changes = validator()
        .apply_update(
            &mut event,
            r#"{"repeating": true, "frequency": 3, "repeatsOnLastWeekdayOfMonth": 5}"#,
        )
        .unwrap();
    assert_eq!(
        event.recurrence.as_ref().map(ToString::to_string).as_deref(),
        Some("FREQ=MONTHLY;BYDAY=-1FR")
    );
    assert_eq!(changes.get("recurrence"), Some(&json!("FREQ=MONTHLY;BYDAY=-1FR")));
    assert!(!changes.contains_key("repeating"));
}

/// ## Summary
/// Re-enabling a monthly repeat without naming the day keeps the current
/// monthly rule instead of resetting it to the same day of the month.
#[test]
fn monthly_repeat_keeps_current_day_rule() {
    let request = json!({
        "title": "Center meeting",
        "startDate": "2024-01-26",
        "typeId": 4,
        "repeating": true,
        "frequency": 3,
        "repeatsOnLastWeekdayOfMonth": 5
    });
    let mut event = validator().command_for_create(&body(&request)).unwrap();
    assert_eq!(
        event.recurrence.as_ref().map(ToString::to_string).as_deref(),
        Some("FREQ=MONTHLY;BYDAY=-1FR")
    );

    let changes = validator()
        .apply_update(&mut event, r#"{"repeating": true, "frequency": 3}"#)
        .unwrap();
    assert_eq!(
        event.recurrence.as_ref().map(ToString::to_string).as_deref(),
        Some("FREQ=MONTHLY;BYDAY=-1FR")
    );
    assert!(!changes.contains_key("recurrence"));
}

/// ## Summary
/// Only values that actually differ are reported.
#[test]
fn unchanged_values_not_reported() {
    let mut event = weekly_group_meeting();
    let changes = validator()
        .apply_update(&mut event, r#"{"title": "Group meeting", "location": "Hall"}"#)
        .unwrap();
    assert_eq!(changes.keys().copied().collect::<Vec<_>>(), vec!["location"]);
}

/// ## Summary
/// Rescheduling moves the start date and the weekday.
#[test]
fn reschedule_from_meeting_date() {
    let mut event = weekly_group_meeting();
    let request = json!({
        "rescheduleBasedOnMeetingDates": true,
        "presentMeetingDate": "2024-01-15",
        "newMeetingDate": "2024-01-17"
    });
    let changes = validator().apply_update(&mut event, &body(&request)).unwrap();
    assert_eq!(event.start_date, date(2024, 1, 17));
    assert_eq!(
        event.recurrence,
        Some(RecurrenceSpec::weekly(1, [Weekday::Wednesday]).unwrap())
    );
    assert_eq!(changes.get("startDate"), Some(&json!("2024-01-17")));
}

/// ## Summary
/// Rescheduling from a date the event does not meet on fails and leaves the
/// event unchanged.
#[test]
fn reschedule_from_non_meeting_date_fails() {
    let mut event = weekly_group_meeting();
    let before = event.clone();
    let request = json!({
        "title": "Renamed",
        "rescheduleBasedOnMeetingDates": true,
        "presentMeetingDate": "2024-01-16",
        "newMeetingDate": "2024-01-17"
    });
    let err = validator()
        .apply_update(&mut event, &body(&request))
        .unwrap_err();
    let RulesError::ValidationFailed(errors) = err else {
        panic!("expected ValidationFailed");
    };
    assert_eq!(errors.errors()[0].parameter(), "presentMeetingDate");
    assert_eq!(errors.errors()[0].rule(), &Rule::NotAnOccurrence);
    assert_eq!(event, before);
}

/// ## Summary
/// An invalid update does not touch the event.
#[test]
fn invalid_update_leaves_event() {
    let mut event = CalendarEvent::new("Visit", date(2024, 5, 1), EntityType::Clients);
    let before = event.clone();
    let result = validator().apply_update(&mut event, r#"{"title": "", "typeId": 99}"#);
    assert!(matches!(result, Err(RulesError::ValidationFailed(ref e)) if e.len() == 2));
    assert_eq!(event, before);
}

/// ## Summary
/// A null optional field clears the stored value.
#[test]
fn null_clears_optional_field() {
    let mut event = weekly_group_meeting();
    validator()
        .apply_update(&mut event, r#"{"description": "First"}"#)
        .unwrap();
    assert_eq!(event.description.as_deref(), Some("First"));

    let changes = validator()
        .apply_update(&mut event, r#"{"description": null}"#)
        .unwrap();
    assert_eq!(event.description, None);
    assert_eq!(changes.get("description"), Some(&Value::Null));
}
