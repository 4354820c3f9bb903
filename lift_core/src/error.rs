//! Error types for the lift_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for lift_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Caller supplied a value outside the accepted domain
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The active routine has no days to schedule
    #[error("No active routine days")]
    NoActiveRoutineDays,

    /// Routine day orders are not contiguous from 1
    #[error("Malformed routine: {0}")]
    MalformedRoutine(String),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// State management error
    #[error("State error: {0}")]
    State(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error comes from routine scheduling rather than I/O
    pub fn is_scheduling(&self) -> bool {
        matches!(self, Error::NoActiveRoutineDays | Error::MalformedRoutine(_))
    }
}
