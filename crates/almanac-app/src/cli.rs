use std::io;
use std::path::{Path, PathBuf};

use almanac_core::config::Settings;
use almanac_rules::{CalendarValidator, Mode, RecurrenceSpec, RulesError, Window};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::{AppError, AppResult};

/// Input path that reads the request from standard input.
const STDIN: &str = "-";

#[derive(Debug, Parser)]
#[command(name = "almanac")]
#[command(about = "Validate calendar requests and expand their meeting dates")]
pub struct Cli {
    /// Configuration file (defaults to `almanac.toml` when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check a request body against the create or update rules
    Validate {
        #[arg(short, long, value_enum, default_value_t = RequestMode::Create)]
        mode: RequestMode,

        /// Request body file, or `-` for standard input
        input: PathBuf,
    },
    /// Validate a creation request and print the calendar it describes
    Parse {
        /// Request body file, or `-` for standard input
        input: PathBuf,
    },
    /// Print the meeting dates of a creation request within a date window
    Expand {
        /// Request body file, or `-` for standard input
        input: PathBuf,

        /// First day of the window (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,

        /// Last day of the window, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: NaiveDate,

        /// Maximum number of dates (defaults to `expansion.max_occurrences`)
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RequestMode {
    Create,
    Update,
}

impl From<RequestMode> for Mode {
    fn from(mode: RequestMode) -> Self {
        match mode {
            RequestMode::Create => Self::Create,
            RequestMode::Update => Self::Update,
        }
    }
}

/// ## Summary
/// JSON written to stdout, and whether the request passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub accepted: bool,
    pub output: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Expanded {
    #[serde(skip_serializing_if = "Option::is_none")]
    recurrence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    dates: Vec<NaiveDate>,
}

impl Command {
    #[must_use]
    pub fn input(&self) -> &Path {
        match self {
            Self::Validate { input, .. } | Self::Parse { input } | Self::Expand { input, .. } => {
                input
            }
        }
    }

    /// ## Summary
    /// Reads the request and runs the command against it.
    ///
    /// A request that fails validation is not an error: the outcome carries
    /// the structured error body and `accepted` is false.
    ///
    /// ## Errors
    /// Returns an error if the input cannot be read, the body is malformed or
    /// names unsupported parameters, or the output cannot be rendered.
    pub fn run(&self, settings: &Settings) -> AppResult<Outcome> {
        let validator = CalendarValidator::from_settings(settings);
        let body = read_input(self.input())?;

        match self.execute(&validator, &body) {
            Ok(output) => Ok(Outcome {
                accepted: true,
                output,
            }),
            Err(AppError::RulesError(RulesError::ValidationFailed(errors))) => {
                tracing::info!(count = errors.len(), "Request rejected");
                Ok(Outcome {
                    accepted: false,
                    output: serde_json::to_value(&errors)?,
                })
            }
            Err(e) => Err(e),
        }
    }

    fn execute(&self, validator: &CalendarValidator, body: &str) -> AppResult<Value> {
        match self {
            Self::Validate { mode, .. } => {
                let request = validator.request(body)?;
                validator.validate(&request, (*mode).into())?;
                Ok(json!({ "valid": true }))
            }
            Self::Parse { .. } => Ok(serde_json::to_value(validator.command_for_create(body)?)?),
            Self::Expand {
                from, to, limit, ..
            } => {
                let event = validator.command_for_create(body)?;
                let limit = limit.unwrap_or_else(|| validator.max_occurrences());
                let dates = event.meeting_dates(Window::new(*from, *to), limit)?;
                tracing::debug!(count = dates.len(), %from, %to, "Expanded meeting dates");

                Ok(serde_json::to_value(Expanded {
                    recurrence: event.recurrence.as_ref().map(ToString::to_string),
                    description: event.recurrence.as_ref().map(RecurrenceSpec::describe),
                    dates,
                })?)
            }
        }
    }
}

fn read_input(input: &Path) -> AppResult<String> {
    let read = if input == Path::new(STDIN) {
        io::read_to_string(io::stdin())
    } else {
        std::fs::read_to_string(input)
    };
    read.map_err(|source| AppError::InputError {
        path: input.to_path_buf(),
        source,
    })
}
