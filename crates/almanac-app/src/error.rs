use std::path::PathBuf;

use thiserror::Error;

/// Application-level errors (command-line layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    RulesError(#[from] almanac_rules::RulesError),

    #[error(transparent)]
    CoreError(#[from] almanac_core::error::CoreError),

    #[error("Failed to read {path}: {source}")]
    InputError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render output: {0}")]
    OutputError(#[from] serde_json::Error),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
