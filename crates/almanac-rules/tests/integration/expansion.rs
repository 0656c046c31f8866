//! Tests for recurrence expansion.

use almanac_rules::expand::{Window, expand, is_occurrence, next_occurrence_after};
use almanac_rules::model::{MonthlyRule, NthDay, RecurrenceSpec, Weekday};
use chrono::NaiveDate;
use serde_json::json;

use super::helpers::{body, date, validator};

fn ours(spec: &RecurrenceSpec, seed: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    expand(spec, seed, Window::new(seed, to)).unwrap().collect()
}

fn dates(days: &[(i32, u32, u32)]) -> Vec<NaiveDate> {
    days.iter().map(|&(y, m, d)| date(y, m, d)).collect()
}

/// ## Summary
/// Weekly Monday meetings over a two-week window include both ends.
#[test_log::test]
fn weekly_window_boundaries() {
    let spec = RecurrenceSpec::weekly(1, [Weekday::Monday]).unwrap();
    let seed = date(2024, 1, 1);
    let found: Vec<_> = expand(&spec, seed, Window::new(seed, date(2024, 1, 15)))
        .unwrap()
        .collect();
    assert_eq!(found, dates(&[(2024, 1, 1), (2024, 1, 8), (2024, 1, 15)]));
}

/// ## Summary
/// A fifth-Friday rule produces nothing in months with four Fridays.
#[test]
fn fifth_weekday_missing_months_skipped() {
    let spec = RecurrenceSpec::monthly(
        1,
        MonthlyRule::NthWeekday {
            nth: NthDay::Fifth,
            weekday: Weekday::Friday,
        },
    )
    .unwrap();
    // February 2024 has four Fridays.
    let feb: Vec<_> = expand(
        &spec,
        date(2024, 1, 1),
        Window::new(date(2024, 2, 1), date(2024, 2, 29)),
    )
    .unwrap()
    .collect();
    assert!(feb.is_empty());
}

#[test]
fn weekly_rules() {
    let spec = RecurrenceSpec::weekly(2, [Weekday::Monday, Weekday::Thursday]).unwrap();
    assert_eq!(
        ours(&spec, date(2024, 1, 1), date(2024, 2, 15)),
        dates(&[
            (2024, 1, 1),
            (2024, 1, 4),
            (2024, 1, 15),
            (2024, 1, 18),
            (2024, 1, 29),
            (2024, 2, 1),
            (2024, 2, 12),
            (2024, 2, 15),
        ])
    );

    let spec = RecurrenceSpec::weekly(3, [Weekday::Tuesday, Weekday::Saturday, Weekday::Sunday])
        .unwrap();
    assert_eq!(
        ours(&spec, date(2024, 2, 6), date(2024, 3, 31)),
        dates(&[
            (2024, 2, 6),
            (2024, 2, 10),
            (2024, 2, 11),
            (2024, 2, 27),
            (2024, 3, 2),
            (2024, 3, 3),
            (2024, 3, 19),
            (2024, 3, 23),
            (2024, 3, 24),
        ])
    );
}

#[test]
fn monthly_rules() {
    let fifth_friday = RecurrenceSpec::monthly(
        1,
        MonthlyRule::NthWeekday {
            nth: NthDay::Fifth,
            weekday: Weekday::Friday,
        },
    )
    .unwrap();
    assert_eq!(
        ours(&fifth_friday, date(2024, 3, 29), date(2025, 3, 31)),
        dates(&[
            (2024, 3, 29),
            (2024, 5, 31),
            (2024, 8, 30),
            (2024, 11, 29),
            (2025, 1, 31),
        ])
    );

    let last_monday =
        RecurrenceSpec::monthly(2, MonthlyRule::LastWeekday(Weekday::Monday)).unwrap();
    assert_eq!(
        ours(&last_monday, date(2024, 1, 29), date(2024, 12, 31)),
        dates(&[
            (2024, 1, 29),
            (2024, 3, 25),
            (2024, 5, 27),
            (2024, 7, 29),
            (2024, 9, 30),
            (2024, 11, 25),
        ])
    );
}

#[test]
fn daily_and_yearly_rules() {
    let daily = RecurrenceSpec::daily(5).unwrap();
    assert_eq!(
        ours(&daily, date(2024, 2, 27), date(2024, 3, 20)),
        dates(&[
            (2024, 2, 27),
            (2024, 3, 3),
            (2024, 3, 8),
            (2024, 3, 13),
            (2024, 3, 18),
        ])
    );

    let yearly = RecurrenceSpec::yearly(1).unwrap();
    assert_eq!(
        ours(&yearly, date(2024, 2, 29), date(2036, 1, 1)),
        dates(&[(2024, 2, 29), (2028, 2, 29), (2032, 2, 29)])
    );
}

/// ## Summary
/// A rule read back from its RRULE text expands to the same dates.
#[test]
fn parsed_rule_expands_like_original() {
    let spec = RecurrenceSpec::monthly(3, MonthlyRule::LastWeekday(Weekday::Friday)).unwrap();
    let parsed: RecurrenceSpec = spec.to_string().parse().unwrap();
    let seed = date(2024, 1, 26);
    let to = date(2026, 12, 31);
    assert_eq!(ours(&parsed, seed, to), ours(&spec, seed, to));
}

/// ## Summary
/// A window that starts after the seed yields the tail of the full sequence.
#[test]
fn late_window_is_a_suffix() {
    let spec = RecurrenceSpec::weekly(2, [Weekday::Friday]).unwrap();
    let seed = date(2024, 1, 5);
    let to = date(2024, 12, 31);
    let from = date(2024, 6, 1);
    let full = ours(&spec, seed, to);
    let tail: Vec<_> = expand(&spec, seed, Window::new(from, to)).unwrap().collect();
    let expected: Vec<_> = full.into_iter().filter(|d| *d >= from).collect();
    assert_eq!(tail, expected);
}

#[test]
fn membership_and_next() {
    let spec = RecurrenceSpec::monthly(1, MonthlyRule::LastWeekday(Weekday::Friday)).unwrap();
    let seed = date(2024, 1, 26);
    assert!(is_occurrence(&spec, seed, date(2024, 2, 23)).unwrap());
    assert!(!is_occurrence(&spec, seed, date(2024, 2, 16)).unwrap());
    assert_eq!(
        next_occurrence_after(&spec, seed, date(2024, 2, 23)).unwrap(),
        Some(date(2024, 3, 29))
    );
}

/// ## Summary
/// A parsed request's recurrence expands from its start date.
#[test]
fn parsed_request_expands() {
    let request = json!({
        "title": "Center meeting",
        "startDate": "2024-01-09",
        "typeId": 4,
        "repeating": true,
        "frequency": 3,
        "repeatsOnNthDayOfMonth": 2,
        "repeatsOnDay": 2
    });
    let event = validator().command_for_create(&body(&request)).unwrap();
    let found = event
        .meeting_dates(Window::new(date(2024, 1, 1), date(2024, 4, 30)), 100)
        .unwrap();
    assert_eq!(
        found,
        dates(&[(2024, 1, 9), (2024, 2, 13), (2024, 3, 12), (2024, 4, 9)])
    );
}
