//! Error types for FMP API client.

use tasador_traits::TasadorError;
use thiserror::Error;

/// Errors that can occur when using the FMP API.
#[derive(Debug, Error)]
pub enum FmpError {
    /// Missing API key.
    #[error("FMP_API_KEY environment variable not set")]
    MissingApiKey,

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned an error.
    #[error("FMP API error: {0}")]
    Api(String),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded. Free tier allows 250 requests/day.")]
    RateLimitExceeded,

    /// Symbol not found.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// No data available.
    #[error("No data available for {0}")]
    NoData(String),
}

impl From<FmpError> for TasadorError {
    fn from(err: FmpError) -> Self {
        match err {
            FmpError::SymbolNotFound(symbol) => Self::SymbolNotFound(symbol),
            FmpError::MissingApiKey => Self::Config(err.to_string()),
            other => Self::Upstream(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_not_found() {
        let err = TasadorError::from(FmpError::SymbolNotFound("ZZZZ".into()));
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Ticker not found: ZZZZ");
    }

    #[test]
    fn test_other_failures_are_upstream() {
        let err = TasadorError::from(FmpError::RateLimitExceeded);
        assert!(matches!(err, TasadorError::Upstream(ref msg) if msg.contains("Rate limit")));

        let err = TasadorError::from(FmpError::Api("HTTP 500: boom".into()));
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("boom"));

        assert!(matches!(
            TasadorError::from(FmpError::MissingApiKey),
            TasadorError::Config(_)
        ));
    }
}
