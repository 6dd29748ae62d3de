//! Error types for the tasador engine.
//!
//! Only conditions that fail a whole request live here. A single line item
//! that cannot be resolved, or a ratio whose denominator is not positive, is
//! not an error: it degrades to an absent value inside the metric pipeline.

use thiserror::Error;

/// The main error type for tasador operations.
#[derive(Debug, Error)]
pub enum TasadorError {
    /// The provider does not know the ticker, or returned a placeholder record.
    #[error("Ticker not found: {0}")]
    SymbolNotFound(String),

    /// The provider call failed for any reason other than an unknown ticker.
    #[error("Upstream provider failure: {0}")]
    Upstream(String),

    /// Error due to invalid or malformed data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Error when a required column is missing from a table.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Configuration could not be loaded or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TasadorError {
    /// Whether this error means the ticker identity could not be confirmed.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::SymbolNotFound(_))
    }
}

/// A specialized Result type for tasador operations.
pub type Result<T> = std::result::Result<T, TasadorError>;
