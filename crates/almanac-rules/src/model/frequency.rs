//! Recurrence frequency, weekday and nth-weekday enumerations.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::CodedValue;

/// Recurrence frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Returns the RRULE representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }

    #[must_use]
    pub const fn is_daily(self) -> bool {
        matches!(self, Self::Daily)
    }

    #[must_use]
    pub const fn is_weekly(self) -> bool {
        matches!(self, Self::Weekly)
    }

    #[must_use]
    pub const fn is_monthly(self) -> bool {
        matches!(self, Self::Monthly)
    }

    #[must_use]
    pub const fn is_yearly(self) -> bool {
        matches!(self, Self::Yearly)
    }

    /// Unit noun used in human-readable summaries.
    pub(crate) const fn unit(self) -> &'static str {
        match self {
            Self::Daily => "day",
            Self::Weekly => "week",
            Self::Monthly => "month",
            Self::Yearly => "year",
        }
    }
}

impl CodedValue for Frequency {
    const MIN_VALUE: i64 = 1;
    const MAX_VALUE: i64 = 4;

    fn from_int(value: i64) -> Option<Self> {
        Some(match value {
            1 => Self::Daily,
            2 => Self::Weekly,
            3 => Self::Monthly,
            4 => Self::Yearly,
            _ => return None,
        })
    }

    fn value(self) -> i64 {
        match self {
            Self::Daily => 1,
            Self::Weekly => 2,
            Self::Monthly => 3,
            Self::Yearly => 4,
        }
    }
}

impl From<Frequency> for rrule::Frequency {
    fn from(freq: Frequency) -> Self {
        match freq {
            Frequency::Daily => Self::Daily,
            Frequency::Weekly => Self::Weekly,
            Frequency::Monthly => Self::Monthly,
            Frequency::Yearly => Self::Yearly,
        }
    }
}

impl TryFrom<rrule::Frequency> for Frequency {
    type Error = rrule::Frequency;

    /// Sub-daily frequencies have no calendar counterpart and are returned as
    /// the error.
    fn try_from(freq: rrule::Frequency) -> Result<Self, Self::Error> {
        match freq {
            rrule::Frequency::Daily => Ok(Self::Daily),
            rrule::Frequency::Weekly => Ok(Self::Weekly),
            rrule::Frequency::Monthly => Ok(Self::Monthly),
            rrule::Frequency::Yearly => Ok(Self::Yearly),
            other => Err(other),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day of the week, numbered Monday = 1 through Sunday = 7.
///
/// Ordering follows the numbering, so a `BTreeSet<Weekday>` iterates in
/// calendar order for Monday-start weeks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Returns the two-letter abbreviation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "MO",
            Self::Tuesday => "TU",
            Self::Wednesday => "WE",
            Self::Thursday => "TH",
            Self::Friday => "FR",
            Self::Saturday => "SA",
            Self::Sunday => "SU",
        }
    }

    /// Returns the English name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }

    /// Days since the Monday that starts the week (Monday = 0).
    #[must_use]
    pub const fn days_from_monday(self) -> u32 {
        match self {
            Self::Monday => 0,
            Self::Tuesday => 1,
            Self::Wednesday => 2,
            Self::Thursday => 3,
            Self::Friday => 4,
            Self::Saturday => 5,
            Self::Sunday => 6,
        }
    }

    /// Returns all weekdays in order (Monday through Sunday).
    #[must_use]
    pub const fn all() -> [Self; 7] {
        [
            Self::Monday,
            Self::Tuesday,
            Self::Wednesday,
            Self::Thursday,
            Self::Friday,
            Self::Saturday,
            Self::Sunday,
        ]
    }
}

impl CodedValue for Weekday {
    const MIN_VALUE: i64 = 1;
    const MAX_VALUE: i64 = 7;

    fn from_int(value: i64) -> Option<Self> {
        let index = usize::try_from(value.checked_sub(1)?).ok()?;
        Self::all().get(index).copied()
    }

    fn value(self) -> i64 {
        i64::from(self.days_from_monday()) + 1
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(wd: chrono::Weekday) -> Self {
        match wd {
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
            chrono::Weekday::Sun => Self::Sunday,
        }
    }
}

impl From<Weekday> for chrono::Weekday {
    fn from(wd: Weekday) -> Self {
        match wd {
            Weekday::Monday => Self::Mon,
            Weekday::Tuesday => Self::Tue,
            Weekday::Wednesday => Self::Wed,
            Weekday::Thursday => Self::Thu,
            Weekday::Friday => Self::Fri,
            Weekday::Saturday => Self::Sat,
            Weekday::Sunday => Self::Sun,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordinal of a weekday within its month ("the 2nd Tuesday").
///
/// `Fifth` exists for rules built in code or read from RRULE text; requests
/// may only ask for the first four (`MAX_VALUE` is 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NthDay {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
}

impl NthDay {
    /// One-based position within the month.
    #[must_use]
    pub const fn ordinal(self) -> u32 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
            Self::Fourth => 4,
            Self::Fifth => 5,
        }
    }

    /// Returns the ordinal holding the given day of the month (1..=31).
    #[must_use]
    pub fn of_day(day: u32) -> Option<Self> {
        Self::from_ordinal(day.checked_sub(1)? / 7 + 1)
    }

    /// Converts a one-based position (1..=5).
    #[must_use]
    pub const fn from_ordinal(ordinal: u32) -> Option<Self> {
        Some(match ordinal {
            1 => Self::First,
            2 => Self::Second,
            3 => Self::Third,
            4 => Self::Fourth,
            5 => Self::Fifth,
            _ => return None,
        })
    }

    /// English ordinal word.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Second => "second",
            Self::Third => "third",
            Self::Fourth => "fourth",
            Self::Fifth => "fifth",
        }
    }
}

impl CodedValue for NthDay {
    const MIN_VALUE: i64 = 1;
    const MAX_VALUE: i64 = 4;

    fn from_int(value: i64) -> Option<Self> {
        Self::from_ordinal(u32::try_from(value).ok()?)
    }

    fn value(self) -> i64 {
        i64::from(self.ordinal())
    }
}
