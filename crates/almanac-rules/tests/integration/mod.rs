//! Integration tests for the calendar rule engine.
//!
//! ## Test Organization
//!
//! - `validation`: create/update rule checks and error collection
//! - `update`: applying update requests to stored events
//! - `expansion`: occurrence generation through the `rrule` crate

mod expansion;
mod helpers;
mod update;
mod validation;
