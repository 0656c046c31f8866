//! Command-line front end for the calendar rules: validates, parses and
//! expands calendar requests read from files or standard input.

pub mod cli;
pub mod error;
