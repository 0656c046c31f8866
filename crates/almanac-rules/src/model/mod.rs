//! Calendar domain model: coded enumerations, recurrence rules and events.

mod entity;
mod event;
mod frequency;
mod recurrence;
mod rrule;

pub use entity::{EntityType, RemindBy};
pub use event::{
    CalendarEvent, Changes, EventUpdate, RECURRENCE, RecurrencePatch, RepeatingUpdate, Reschedule,
};
pub use frequency::{Frequency, NthDay, Weekday};
pub use recurrence::{MonthlyRule, RecurrenceSpec, RepeatRule};

/// ## Summary
/// A closed enumeration with a stable integer wire value.
///
/// `MIN_VALUE..=MAX_VALUE` is the range accepted from requests; the
/// validator range-checks raw integers against it before calling
/// [`CodedValue::from_int`].
pub trait CodedValue: Sized + Copy {
    const MIN_VALUE: i64;
    const MAX_VALUE: i64;

    /// Converts a wire value into the enumeration.
    fn from_int(value: i64) -> Option<Self>;

    /// Returns the wire value.
    fn value(self) -> i64;
}
