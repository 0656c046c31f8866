//! Calendar request validation.
//!
//! [`CalendarValidator`] applies the create and update rules; the
//! [`ValidationErrors`] accumulator and its check chains are usable on their
//! own for other resources.

mod calendar;
mod errors;
mod monthly;

pub use calendar::{CalendarValidator, Mode};
pub use errors::{ApiParameterError, ParameterCheck, Rule, ValidationErrors};
