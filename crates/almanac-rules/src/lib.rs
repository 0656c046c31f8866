//! Calendar recurrence rules for meeting schedules.
//!
//! - [`request`]: typed extraction from JSON request bodies
//! - [`validate`]: create/update business rules with error accumulation
//! - [`parse`]: requests into [`model::CalendarEvent`]s and updates
//! - [`expand`]: recurrence rules into occurrence dates

pub mod error;
pub mod expand;
pub mod model;
pub mod parse;
pub mod request;
pub mod validate;

pub use error::{RulesError, RulesResult};
pub use expand::{Expansion, Occurrences, Window, expand, is_occurrence, next_occurrence_after};
pub use model::{CalendarEvent, Changes, RecurrenceSpec};
pub use validate::{CalendarValidator, Mode, ValidationErrors};
