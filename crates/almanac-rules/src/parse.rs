//! Structural parsing of calendar requests into events and updates.
//!
//! Parsing reads values; it does not apply the length and positivity rules
//! of the validator. Mandatory fields that cannot be read and coded values
//! outside their enumeration still fail, since no event can be built
//! without them.

use std::collections::BTreeSet;

use almanac_core::constants::CALENDAR_RESOURCE;
use chrono::{Datelike, NaiveDate};
use serde_json::Value;

use crate::error::{RulesError, RulesResult};
use crate::model::{
    CalendarEvent, CodedValue, EntityType, EventUpdate, Frequency, MonthlyRule, NthDay,
    RecurrencePatch, RecurrenceSpec, RemindBy, RepeatRule, RepeatingUpdate, Reschedule, Weekday,
};
use crate::request::{Extracted, JsonRequest, params};
use crate::validate::{Rule, ValidationErrors};

/// ## Summary
/// Builds a [`CalendarEvent`] from a creation request.
///
/// ## Errors
/// Returns `ValidationFailed` if the title, start date or type cannot be
/// read, or a coded value is out of range, and `InvalidRecurrence` if the
/// repeat fields do not describe a recurrence.
pub fn event_from_request(request: &JsonRequest) -> RulesResult<CalendarEvent> {
    let mut errors = ValidationErrors::new(CALENDAR_RESOURCE);

    let title = required(&mut errors, params::TITLE, request.extract_string(params::TITLE));
    let start_date = required(
        &mut errors,
        params::START_DATE,
        request.extract_date(params::START_DATE),
    );
    let entity_type = required(&mut errors, params::TYPE_ID, request.extract_int(params::TYPE_ID))
        .and_then(|n| coded::<EntityType>(&mut errors, params::TYPE_ID, n));
    let remind_by = request
        .extract_int(params::REMIND_BY_ID)
        .into_value()
        .and_then(|n| coded::<RemindBy>(&mut errors, params::REMIND_BY_ID, n));

    let (Some(title), Some(start_date), Some(entity_type)) = (title, start_date, entity_type)
    else {
        return Err(RulesError::ValidationFailed(errors));
    };
    errors.into_result()?;

    let recurrence = if request.extract_bool(params::REPEATING).into_value() == Some(true) {
        Some(recurrence_from_request(request, start_date)?)
    } else {
        None
    };

    Ok(CalendarEvent {
        title,
        description: request.extract_string(params::DESCRIPTION).into_value(),
        location: request.extract_string(params::LOCATION).into_value(),
        start_date,
        end_date: request.extract_date(params::END_DATE).into_value(),
        duration: request.extract_int(params::DURATION).into_value(),
        entity_type,
        repeating: recurrence.is_some(),
        recurrence,
        remind_by,
        first_reminder_offset: request.extract_int(params::FIRST_REMINDER_OFFSET).into_value(),
        second_reminder_offset: request.extract_int(params::SECOND_REMINDER_OFFSET).into_value(),
        meeting_time: request.extract_time(params::MEETING_TIME).into_value(),
    })
}

/// ## Summary
/// Builds an [`EventUpdate`] holding only the fields present in `request`.
///
/// ## Errors
/// Returns `ValidationFailed` for a coded value outside its enumeration and
/// `InvalidRecurrence` for unusable repeat fields.
pub fn update_from_request(request: &JsonRequest) -> RulesResult<EventUpdate> {
    let mut errors = ValidationErrors::new(CALENDAR_RESOURCE);

    let entity_type = request
        .extract_int(params::TYPE_ID)
        .into_value()
        .and_then(|n| coded::<EntityType>(&mut errors, params::TYPE_ID, n));
    let remind_by = match patch(request.extract_int(params::REMIND_BY_ID)) {
        Some(Some(n)) => coded::<RemindBy>(&mut errors, params::REMIND_BY_ID, n).map(Some),
        Some(None) => Some(None),
        None => None,
    };
    errors.into_result()?;

    let repeating = match request.extract_bool(params::REPEATING).into_value() {
        Some(false) => Some(RepeatingUpdate::Off),
        Some(true) => Some(RepeatingUpdate::On(recurrence_patch(request)?)),
        None => None,
    };

    let reschedule = if request
        .extract_bool(params::RESCHEDULE_BASED_ON_MEETING_DATES)
        .into_value()
        == Some(true)
    {
        match (
            request.extract_date(params::PRESENT_MEETING_DATE).into_value(),
            request.extract_date(params::NEW_MEETING_DATE).into_value(),
        ) {
            (Some(present), Some(new)) => Some(Reschedule { present, new }),
            _ => None,
        }
    } else {
        None
    };

    Ok(EventUpdate {
        title: request.extract_string(params::TITLE).into_value(),
        description: patch(request.extract_string(params::DESCRIPTION)),
        location: patch(request.extract_string(params::LOCATION)),
        start_date: request.extract_date(params::START_DATE).into_value(),
        end_date: patch(request.extract_date(params::END_DATE)),
        duration: patch(request.extract_int(params::DURATION)),
        entity_type,
        repeating,
        remind_by,
        first_reminder_offset: patch(request.extract_int(params::FIRST_REMINDER_OFFSET)),
        second_reminder_offset: patch(request.extract_int(params::SECOND_REMINDER_OFFSET)),
        meeting_time: patch(request.extract_time(params::MEETING_TIME)),
        reschedule,
    })
}

/// Builds the recurrence of a repeating creation request seeded on
/// `start_date`. A weekly rule without `repeatsOnDay` repeats on the start
/// date's weekday.
fn recurrence_from_request(
    request: &JsonRequest,
    start_date: NaiveDate,
) -> RulesResult<RecurrenceSpec> {
    let patch = recurrence_patch(request)?;
    let frequency = patch
        .frequency
        .ok_or_else(|| RulesError::InvalidRecurrence("frequency is required".to_string()))?;

    let rule = match frequency {
        Frequency::Daily => RepeatRule::Daily,
        Frequency::Weekly => RepeatRule::Weekly(
            patch
                .weekdays
                .unwrap_or_else(|| BTreeSet::from([Weekday::from(start_date.weekday())])),
        ),
        Frequency::Monthly => RepeatRule::Monthly(patch.monthly.unwrap_or(MonthlyRule::DayOfMonth)),
        Frequency::Yearly => RepeatRule::Yearly,
    };

    RecurrenceSpec::new(patch.interval.unwrap_or(1), rule)
}

/// Reads whichever recurrence parts the request supplies.
fn recurrence_patch(request: &JsonRequest) -> RulesResult<RecurrencePatch> {
    let frequency = request
        .extract_int(params::FREQUENCY)
        .into_value()
        .map(|n| coded_recurrence::<Frequency>(params::FREQUENCY, n))
        .transpose()?;

    let interval = request
        .extract_int(params::INTERVAL)
        .into_value()
        .map(|n| {
            u32::try_from(n).map_err(|err| {
                RulesError::InvalidRecurrence(format!("interval {n} out of range: {err}"))
            })
        })
        .transpose()?;

    let weekdays = match frequency {
        Some(Frequency::Weekly) => request
            .extract_int_list(params::REPEATS_ON_DAY)
            .into_value()
            .map(|days| {
                days.into_iter()
                    .map(|n| coded_recurrence::<Weekday>(params::REPEATS_ON_DAY, n))
                    .collect::<RulesResult<BTreeSet<_>>>()
            })
            .transpose()?,
        _ => None,
    };

    let monthly = match frequency {
        Some(Frequency::Monthly) => monthly_rule(request)?,
        _ => None,
    };

    Ok(RecurrencePatch {
        frequency,
        interval,
        weekdays,
        monthly,
    })
}

/// The monthly style named by the request, `None` if it names neither.
fn monthly_rule(request: &JsonRequest) -> RulesResult<Option<MonthlyRule>> {
    let nth = request
        .extract_int(params::REPEATS_ON_NTH_DAY_OF_MONTH)
        .into_value();
    let last = request
        .extract_int(params::REPEATS_ON_LAST_WEEKDAY_OF_MONTH)
        .into_value();

    match (nth, last) {
        (Some(_), Some(_)) => Err(RulesError::InvalidRecurrence(format!(
            "{} and {} are mutually exclusive",
            params::REPEATS_ON_NTH_DAY_OF_MONTH,
            params::REPEATS_ON_LAST_WEEKDAY_OF_MONTH
        ))),
        (Some(n), None) => {
            let nth = coded_recurrence::<NthDay>(params::REPEATS_ON_NTH_DAY_OF_MONTH, n)?;
            let day = request
                .extract_int(params::REPEATS_ON_DAY)
                .into_value()
                .ok_or_else(|| {
                    RulesError::InvalidRecurrence(format!(
                        "{} requires {}",
                        params::REPEATS_ON_NTH_DAY_OF_MONTH,
                        params::REPEATS_ON_DAY
                    ))
                })?;
            let weekday = coded_recurrence::<Weekday>(params::REPEATS_ON_DAY, day)?;
            Ok(Some(MonthlyRule::NthWeekday { nth, weekday }))
        }
        (None, Some(n)) => Ok(Some(MonthlyRule::LastWeekday(coded_recurrence::<Weekday>(
            params::REPEATS_ON_LAST_WEEKDAY_OF_MONTH,
            n,
        )?))),
        (None, None) => Ok(None),
    }
}

/// Three-way reading of an optional field: untouched, cleared, or set.
fn patch<T>(extracted: Extracted<T>) -> Option<Option<T>> {
    match extracted {
        Extracted::Absent | Extracted::Invalid { .. } => None,
        Extracted::Null => Some(None),
        Extracted::Value { value, .. } => Some(Some(value)),
    }
}

/// The field's value, recording `CannotBeBlank` (or a type error) if there
/// is none.
fn required<T>(errors: &mut ValidationErrors, name: &'static str, extracted: Extracted<T>) -> Option<T> {
    match extracted {
        Extracted::Value { value, .. } => Some(value),
        Extracted::Invalid { raw, expected } => {
            errors.add(name, raw, Rule::for_invalid(&expected));
            None
        }
        Extracted::Absent | Extracted::Null => {
            errors.add(name, Value::Null, Rule::CannotBeBlank);
            None
        }
    }
}

fn coded<C: CodedValue>(errors: &mut ValidationErrors, name: &'static str, value: i64) -> Option<C> {
    let converted = C::from_int(value).filter(|_| (C::MIN_VALUE..=C::MAX_VALUE).contains(&value));
    if converted.is_none() {
        errors.add(
            name,
            Value::from(value),
            Rule::NotWithinRange {
                min: C::MIN_VALUE,
                max: C::MAX_VALUE,
            },
        );
    }
    converted
}

fn coded_recurrence<C: CodedValue>(name: &str, value: i64) -> RulesResult<C> {
    C::from_int(value)
        .filter(|_| (C::MIN_VALUE..=C::MAX_VALUE).contains(&value))
        .ok_or_else(|| {
            RulesError::InvalidRecurrence(format!(
                "{name} must be between {} and {}, got {value}",
                C::MIN_VALUE,
                C::MAX_VALUE
            ))
        })
}
