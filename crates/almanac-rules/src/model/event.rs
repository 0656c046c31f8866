//! Calendar events and partial updates to them.

use std::collections::{BTreeMap, BTreeSet};

use almanac_core::constants::CALENDAR_RESOURCE;
use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::Serialize;
use serde_json::Value;

use super::{EntityType, Frequency, MonthlyRule, RecurrenceSpec, RemindBy, RepeatRule, Weekday};
use crate::error::{RulesError, RulesResult};
use crate::expand::{Expansion, Window, is_occurrence};
use crate::request::params;
use crate::validate::{Rule, ValidationErrors};

/// Field name to new value for every field an update actually changed.
pub type Changes = BTreeMap<&'static str, Value>;

/// Key under which a changed recurrence is reported, as RRULE text.
pub const RECURRENCE: &str = "recurrence";

/// ## Summary
/// A calendar entry attached to a client, group, loan, center or savings
/// account, optionally repeating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    pub entity_type: EntityType,
    pub repeating: bool,
    /// Present iff `repeating`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remind_by: Option<RemindBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_reminder_offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_reminder_offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_time: Option<NaiveTime>,
}

/// How an update changes the repeat pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepeatingUpdate {
    /// Stop repeating; the recurrence is cleared.
    Off,
    /// Repeat, rebuilding the recurrence from the supplied parts and the
    /// current pattern.
    On(RecurrencePatch),
}

/// Recurrence parts supplied by an update. Missing parts fall back to the
/// event's current recurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecurrencePatch {
    pub frequency: Option<Frequency>,
    pub interval: Option<u32>,
    pub weekdays: Option<BTreeSet<Weekday>>,
    pub monthly: Option<MonthlyRule>,
}

/// Move the schedule so that `present` becomes `new`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reschedule {
    pub present: NaiveDate,
    pub new: NaiveDate,
}

/// ## Summary
/// A partial update. `None` leaves a field untouched; for optional fields
/// `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<Option<NaiveDate>>,
    pub duration: Option<Option<i64>>,
    pub entity_type: Option<EntityType>,
    pub repeating: Option<RepeatingUpdate>,
    pub remind_by: Option<Option<RemindBy>>,
    pub first_reminder_offset: Option<Option<i64>>,
    pub second_reminder_offset: Option<Option<i64>>,
    pub meeting_time: Option<Option<NaiveTime>>,
    pub reschedule: Option<Reschedule>,
}

impl CalendarEvent {
    /// A one-off event with no optional fields set.
    #[must_use]
    pub fn new(title: impl Into<String>, start_date: NaiveDate, entity_type: EntityType) -> Self {
        Self {
            title: title.into(),
            description: None,
            location: None,
            start_date,
            end_date: None,
            duration: None,
            entity_type,
            repeating: false,
            recurrence: None,
            remind_by: None,
            first_reminder_offset: None,
            second_reminder_offset: None,
            meeting_time: None,
        }
    }

    /// Makes the event repeat with `recurrence`.
    #[must_use]
    pub fn with_recurrence(mut self, recurrence: RecurrenceSpec) -> Self {
        self.repeating = true;
        self.recurrence = Some(recurrence);
        self
    }

    /// The window of dates the event can occur on, narrowed to `window`.
    fn active_window(&self, window: Window) -> Window {
        match self.end_date {
            Some(end) => window.clipped_to(end),
            None => window,
        }
    }

    /// ## Summary
    /// Meeting dates inside `window`, at most `max_occurrences` of them.
    ///
    /// A one-off event meets on its start date only. Nothing is produced
    /// after the end date.
    ///
    /// ## Errors
    /// Returns `InvalidRecurrence` if the recurrence cannot be expanded.
    pub fn meeting_dates(
        &self,
        window: Window,
        max_occurrences: usize,
    ) -> RulesResult<Vec<NaiveDate>> {
        let window = self.active_window(window);
        Ok(match &self.recurrence {
            Some(spec) => Expansion::new(spec, self.start_date, window)?
                .with_max_occurrences(max_occurrences)
                .iter()
                .collect(),
            None if window.contains(self.start_date) && max_occurrences > 0 => {
                vec![self.start_date]
            }
            None => Vec::new(),
        })
    }

    /// True if the event meets on `date`.
    ///
    /// ## Errors
    /// Returns `InvalidRecurrence` if the recurrence cannot be expanded.
    pub fn is_meeting_date(&self, date: NaiveDate) -> RulesResult<bool> {
        if self.end_date.is_some_and(|end| date > end) {
            return Ok(false);
        }
        match &self.recurrence {
            Some(spec) => is_occurrence(spec, self.start_date, date),
            None => Ok(date == self.start_date),
        }
    }

    /// ## Summary
    /// Applies `update`, returning the fields that actually changed.
    ///
    /// The event is left untouched if any part of the update fails.
    ///
    /// ## Errors
    /// Returns `ValidationFailed` if a reschedule names a date the event does
    /// not meet on, or the update leaves the end date before the start date.
    /// Returns `InvalidRecurrence` if the rebuilt recurrence is not valid.
    pub fn apply_update(&mut self, update: EventUpdate) -> RulesResult<Changes> {
        if let Some(reschedule) = update.reschedule {
            if !self.is_meeting_date(reschedule.present)? {
                let mut errors = ValidationErrors::new(CALENDAR_RESOURCE);
                errors.add(
                    params::PRESENT_MEETING_DATE,
                    Value::String(reschedule.present.to_string()),
                    Rule::NotAnOccurrence,
                );
                return Err(RulesError::ValidationFailed(errors));
            }
        }

        let mut next = self.clone();
        if let Some(title) = update.title {
            next.title = title;
        }
        if let Some(description) = update.description {
            next.description = description;
        }
        if let Some(location) = update.location {
            next.location = location;
        }
        if let Some(start_date) = update.start_date {
            next.start_date = start_date;
        }
        if let Some(end_date) = update.end_date {
            next.end_date = end_date;
        }
        if let Some(duration) = update.duration {
            next.duration = duration;
        }
        if let Some(entity_type) = update.entity_type {
            next.entity_type = entity_type;
        }
        if let Some(remind_by) = update.remind_by {
            next.remind_by = remind_by;
        }
        if let Some(offset) = update.first_reminder_offset {
            next.first_reminder_offset = offset;
        }
        if let Some(offset) = update.second_reminder_offset {
            next.second_reminder_offset = offset;
        }
        if let Some(meeting_time) = update.meeting_time {
            next.meeting_time = meeting_time;
        }

        match update.repeating {
            Some(RepeatingUpdate::Off) => {
                next.repeating = false;
                next.recurrence = None;
            }
            Some(RepeatingUpdate::On(patch)) => {
                next.recurrence = Some(next.rebuild_recurrence(patch)?);
                next.repeating = true;
            }
            None => {}
        }

        if let Some(reschedule) = update.reschedule {
            next.start_date = reschedule.new;
            next.recurrence = next
                .recurrence
                .as_ref()
                .map(|spec| spec.anchored_on(reschedule.new));
        }

        if let Some(end) = next.end_date {
            if end < next.start_date {
                let mut errors = ValidationErrors::new(CALENDAR_RESOURCE);
                errors.add(
                    params::END_DATE,
                    Value::String(end.to_string()),
                    Rule::BeforeStartDate,
                );
                return Err(RulesError::ValidationFailed(errors));
            }
        }

        let changes = self.changes_to(&next);
        tracing::debug!(changed = ?changes.keys().collect::<Vec<_>>(), "Calendar updated");
        *self = next;
        Ok(changes)
    }

    fn rebuild_recurrence(&self, patch: RecurrencePatch) -> RulesResult<RecurrenceSpec> {
        let current = self.recurrence.as_ref();
        let frequency = patch
            .frequency
            .or_else(|| current.map(RecurrenceSpec::frequency))
            .unwrap_or(Frequency::Weekly);
        let interval = patch
            .interval
            .or_else(|| current.map(RecurrenceSpec::interval))
            .unwrap_or(1);

        let rule = match frequency {
            Frequency::Daily => RepeatRule::Daily,
            Frequency::Weekly => RepeatRule::Weekly(
                patch
                    .weekdays
                    .or_else(|| current.and_then(RecurrenceSpec::weekdays).cloned())
                    .unwrap_or_else(|| BTreeSet::from([Weekday::from(self.start_date.weekday())])),
            ),
            Frequency::Monthly => RepeatRule::Monthly(
                patch
                    .monthly
                    .or_else(|| current.and_then(RecurrenceSpec::monthly_rule))
                    .unwrap_or(MonthlyRule::DayOfMonth),
            ),
            Frequency::Yearly => RepeatRule::Yearly,
        };

        RecurrenceSpec::new(interval, rule)
    }

    /// JSON values of every field that differs between `self` and `next`.
    fn changes_to(&self, next: &Self) -> Changes {
        let mut changes = Changes::new();
        record(&mut changes, params::TITLE, &self.title, &next.title);
        record(&mut changes, params::DESCRIPTION, &self.description, &next.description);
        record(&mut changes, params::LOCATION, &self.location, &next.location);
        record(&mut changes, params::START_DATE, &self.start_date, &next.start_date);
        record(&mut changes, params::END_DATE, &self.end_date, &next.end_date);
        record(&mut changes, params::DURATION, &self.duration, &next.duration);
        record(&mut changes, params::TYPE_ID, &self.entity_type, &next.entity_type);
        record(&mut changes, params::REPEATING, &self.repeating, &next.repeating);
        record(&mut changes, RECURRENCE, &self.recurrence, &next.recurrence);
        record(&mut changes, params::REMIND_BY_ID, &self.remind_by, &next.remind_by);
        record(
            &mut changes,
            params::FIRST_REMINDER_OFFSET,
            &self.first_reminder_offset,
            &next.first_reminder_offset,
        );
        record(
            &mut changes,
            params::SECOND_REMINDER_OFFSET,
            &self.second_reminder_offset,
            &next.second_reminder_offset,
        );
        record(&mut changes, params::MEETING_TIME, &self.meeting_time, &next.meeting_time);
        changes
    }
}

fn record<T: PartialEq + Serialize>(changes: &mut Changes, key: &'static str, old: &T, new: &T) {
    if old != new {
        match serde_json::to_value(new) {
            Ok(value) => {
                changes.insert(key, value);
            }
            Err(error) => tracing::warn!(%error, key, "Changed value could not be serialized"),
        }
    }
}
