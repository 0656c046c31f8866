//! Immutable description of how a calendar event repeats.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{Frequency, NthDay, Weekday};
use crate::error::{RulesError, RulesResult};

/// Which day of the month a monthly rule lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonthlyRule {
    /// Same day of the month as the seed date.
    DayOfMonth,
    /// The nth given weekday of the month (e.g. the 2nd Tuesday).
    NthWeekday { nth: NthDay, weekday: Weekday },
    /// The final given weekday of the month.
    LastWeekday(Weekday),
}

impl MonthlyRule {
    /// ## Summary
    /// Builds the rule that keeps a date's position when re-anchoring onto it.
    ///
    /// `DayOfMonth` stays as is, `NthWeekday` takes the date's ordinal and
    /// weekday (a fifth weekday becomes `LastWeekday`), `LastWeekday` takes
    /// the date's weekday.
    #[must_use]
    pub fn anchored_on(self, date: NaiveDate) -> Self {
        let weekday = Weekday::from(date.weekday());
        match self {
            Self::DayOfMonth => Self::DayOfMonth,
            Self::NthWeekday { .. } => match NthDay::of_day(date.day()) {
                Some(nth) if nth != NthDay::Fifth => Self::NthWeekday { nth, weekday },
                _ => Self::LastWeekday(weekday),
            },
            Self::LastWeekday(_) => Self::LastWeekday(weekday),
        }
    }
}

/// Frequency-specific repeat pattern.
///
/// Only the fields that apply to a frequency exist on its variant, so a
/// weekly rule always carries weekdays and a daily rule never does.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RepeatRule {
    Daily,
    /// Selected weekdays; never empty once inside a [`RecurrenceSpec`].
    Weekly(BTreeSet<Weekday>),
    Monthly(MonthlyRule),
    Yearly,
}

impl RepeatRule {
    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        match self {
            Self::Daily => Frequency::Daily,
            Self::Weekly(_) => Frequency::Weekly,
            Self::Monthly(_) => Frequency::Monthly,
            Self::Yearly => Frequency::Yearly,
        }
    }
}

/// ## Summary
/// A validated recurrence: a repeat rule and a positive interval.
///
/// Serialises as its RRULE text (`FREQ=WEEKLY;INTERVAL=2;BYDAY=MO`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecurrenceSpec {
    interval: u32,
    rule: RepeatRule,
}

impl RecurrenceSpec {
    /// Largest interval the `rrule` crate can expand (its interval is 16-bit).
    pub const MAX_INTERVAL: u32 = 0xFFFF;

    /// ## Summary
    /// Creates a recurrence repeating every `interval` units of the rule's
    /// frequency.
    ///
    /// ## Errors
    /// Returns `InvalidRecurrence` if `interval` is outside
    /// `1..=MAX_INTERVAL` or a weekly rule has no weekdays.
    pub fn new(interval: u32, rule: RepeatRule) -> RulesResult<Self> {
        if interval == 0 {
            return Err(RulesError::InvalidRecurrence(
                "interval must be greater than zero".to_string(),
            ));
        }
        if interval > Self::MAX_INTERVAL {
            return Err(RulesError::InvalidRecurrence(format!(
                "interval must not exceed {}",
                Self::MAX_INTERVAL
            )));
        }
        if let RepeatRule::Weekly(days) = &rule {
            if days.is_empty() {
                return Err(RulesError::InvalidRecurrence(
                    "weekly recurrence needs at least one weekday".to_string(),
                ));
            }
        }
        Ok(Self { interval, rule })
    }

    /// ## Summary
    /// Creates a daily recurrence.
    ///
    /// ## Errors
    /// Returns `InvalidRecurrence` if `interval` is zero.
    pub fn daily(interval: u32) -> RulesResult<Self> {
        Self::new(interval, RepeatRule::Daily)
    }

    /// ## Summary
    /// Creates a weekly recurrence on the given weekdays.
    ///
    /// ## Errors
    /// Returns `InvalidRecurrence` if `interval` is zero or `days` is empty.
    pub fn weekly(interval: u32, days: impl IntoIterator<Item = Weekday>) -> RulesResult<Self> {
        Self::new(interval, RepeatRule::Weekly(days.into_iter().collect()))
    }

    /// ## Summary
    /// Creates a monthly recurrence.
    ///
    /// ## Errors
    /// Returns `InvalidRecurrence` if `interval` is zero.
    pub fn monthly(interval: u32, rule: MonthlyRule) -> RulesResult<Self> {
        Self::new(interval, RepeatRule::Monthly(rule))
    }

    /// ## Summary
    /// Creates a yearly recurrence.
    ///
    /// ## Errors
    /// Returns `InvalidRecurrence` if `interval` is zero.
    pub fn yearly(interval: u32) -> RulesResult<Self> {
        Self::new(interval, RepeatRule::Yearly)
    }

    #[must_use]
    pub const fn interval(&self) -> u32 {
        self.interval
    }

    #[must_use]
    pub const fn rule(&self) -> &RepeatRule {
        &self.rule
    }

    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        self.rule.frequency()
    }

    /// Weekdays of a weekly rule; `None` for other frequencies.
    #[must_use]
    pub fn weekdays(&self) -> Option<&BTreeSet<Weekday>> {
        match &self.rule {
            RepeatRule::Weekly(days) => Some(days),
            _ => None,
        }
    }

    /// Day selection of a monthly rule; `None` for other frequencies.
    #[must_use]
    pub const fn monthly_rule(&self) -> Option<MonthlyRule> {
        match &self.rule {
            RepeatRule::Monthly(rule) => Some(*rule),
            _ => None,
        }
    }

    /// ## Summary
    /// Returns the same recurrence re-anchored on a new seed date.
    ///
    /// Weekly rules move to the date's weekday, monthly weekday rules take
    /// the date's position in its month. Daily and yearly rules are unchanged.
    #[must_use]
    pub fn anchored_on(&self, date: NaiveDate) -> Self {
        let rule = match &self.rule {
            RepeatRule::Weekly(_) => {
                RepeatRule::Weekly(BTreeSet::from([Weekday::from(date.weekday())]))
            }
            RepeatRule::Monthly(monthly) => RepeatRule::Monthly(monthly.anchored_on(date)),
            other => other.clone(),
        };
        Self {
            interval: self.interval,
            rule,
        }
    }

    /// ## Summary
    /// Renders a short English description, e.g. "Every 2 weeks on Monday, Thursday".
    #[must_use]
    pub fn describe(&self) -> String {
        let freq = self.frequency();
        let head = match (freq, self.interval) {
            (Frequency::Daily, 1) => "Daily".to_string(),
            (Frequency::Weekly, 1) => "Weekly".to_string(),
            (Frequency::Monthly, 1) => "Monthly".to_string(),
            (Frequency::Yearly, 1) => "Yearly".to_string(),
            (_, n) => format!("Every {n} {}s", freq.unit()),
        };

        match &self.rule {
            RepeatRule::Daily | RepeatRule::Yearly => head,
            RepeatRule::Weekly(days) => {
                let names: Vec<_> = days.iter().map(|d| d.name()).collect();
                format!("{head} on {}", names.join(", "))
            }
            RepeatRule::Monthly(MonthlyRule::DayOfMonth) => format!("{head} on the same day"),
            RepeatRule::Monthly(MonthlyRule::NthWeekday { nth, weekday }) => {
                format!("{head} on the {} {}", nth.name(), weekday.name())
            }
            RepeatRule::Monthly(MonthlyRule::LastWeekday(weekday)) => {
                format!("{head} on the last {}", weekday.name())
            }
        }
    }
}

impl Serialize for RecurrenceSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RecurrenceSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
