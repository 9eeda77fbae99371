//! Error types for the demand_forecast crate

use std::collections::BTreeSet;
use thiserror::Error;

/// Custom error types for the demand_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The ledger lacks one or more required columns
    #[error("Schema error: missing columns {}", format_columns(.missing))]
    SchemaError {
        /// Exactly the required columns that were absent
        missing: BTreeSet<String>,
    },

    /// A ledger value could not be parsed into its expected type
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The model artifact is missing, unreadable or incompatible
    #[error("Model load error: {0}")]
    ModelLoadError(String),

    /// The model expects features the pipeline does not produce
    #[error("Feature mismatch: {0}")]
    FeatureMismatchError(String),

    /// A value reaching the decision stage violates its preconditions
    #[error("Invalid input: {0}")]
    InvalidInputError(String),

    /// The model misbehaved while predicting
    #[error("Model error: {0}")]
    ModelError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error while writing CSV output
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Error from the window/lag calculations
    #[error("Math error: {0}")]
    MathError(#[from] stock_math::MathError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl ForecastError {
    /// Build a schema error from the columns that were not found
    pub fn missing_columns<I, S>(missing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ForecastError::SchemaError {
            missing: missing.into_iter().map(Into::into).collect(),
        }
    }
}

fn format_columns(columns: &BTreeSet<String>) -> String {
    let names: Vec<&str> = columns.iter().map(String::as_str).collect();
    format!("{{{}}}", names.join(", "))
}

impl From<polars::prelude::PolarsError> for ForecastError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::CsvError(err.to_string())
    }
}
