//! Expansion of recurrence rules into concrete occurrence dates.

mod expander;

pub use expander::{Expansion, Occurrences, Window, expand, is_occurrence, next_occurrence_after};
