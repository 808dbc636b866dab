use thiserror::Error;

use crate::fuel::FuelType;

/// Convenient result alias for the voyage emissions library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a consumed fuel has no entry in the emission factor table.
    #[error("no emission factor configured for fuel {fuel}")]
    MissingFactor { fuel: FuelType },

    /// Raised when a consumed fuel's emission factor cannot produce meaningful energy.
    #[error("invalid emission factor for fuel {fuel}: {reason}")]
    InvalidFactor { fuel: FuelType, reason: String },

    /// Raised when a fuel name could not be matched to a known fuel type.
    #[error("unknown fuel type: {name}{}", format_suggestions(.suggestions))]
    UnknownFuelType {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when an emission factor table fails to load or validate.
    #[error("invalid emission factor table: {message}")]
    FactorTableValidation { message: String },

    /// Raised when consumption figures fail to load or validate.
    #[error("invalid fuel consumption data: {message}")]
    ConsumptionValidation { message: String },

    /// Raised by input validation; all problems are collected before reporting.
    #[error("voyage input failed validation: {}", .problems.join("; "))]
    VoyageValidation { problems: Vec<String> },

    /// Raised when an environment override cannot be parsed.
    #[error("invalid configuration value for {key}: {message}")]
    Config { key: String, message: String },

    /// Wrapper for CSV reader/writer errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Wrapper for JSON (de)serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
