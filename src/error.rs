use std::path::PathBuf;

use thiserror::Error;

use crate::types::CityId;

/// Convenience result type for loading and analysis operations.
pub type BikeshareResult<T> = Result<T, BikeshareError>;

/// Error type returned by ingestion and statistics functions.
///
/// A single enum shared across CSV/JSON/Parquet ingestion and the statistics engine.
#[derive(Debug, Error)]
pub enum BikeshareError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV ingestion error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Parquet ingestion error.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// The source mapped to a city does not exist or cannot be read.
    #[error("no readable data source for {city} at '{}': {source}", path.display())]
    DataSourceNotFound {
        city: CityId,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input does not have the expected shape (missing required columns, unknown format).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A row's start time could not be parsed; no derived field can be computed for it.
    #[error("malformed record at row {row}: {message} (raw='{raw}')")]
    MalformedRecord {
        row: usize,
        raw: String,
        message: String,
    },

    /// A typed value other than the start time could not be parsed.
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },

    /// A mode-based statistic group was asked for over zero records.
    #[error("no trips match the current filter; cannot compute {group}")]
    EmptyDataset { group: &'static str },

    /// Records exist but every cell a statistic group needs is blank.
    #[error("no non-blank values to compute {group}")]
    MissingValues { group: &'static str },
}

/// Rejected user input for a city, month or day selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised {kind} '{input}' (expected one of: {expected})")]
pub struct FilterParseError {
    /// Which selection was being parsed ("city", "month", "day").
    pub kind: &'static str,
    /// The raw input as given.
    pub input: String,
    /// Human-readable list of accepted forms.
    pub expected: &'static str,
}
