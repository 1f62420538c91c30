//! Error types for dataset loading

use thiserror::Error;

/// Result type for dataset operations
pub type DataResult<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading the source dataset.
///
/// Loading failures are handled once at the [`crate::service::AnalyticsService`]
/// boundary: after a failed load the cache stays empty and every query
/// degrades to empty results. Derived calculators never produce errors for
/// valid-but-sparse input.
#[derive(Debug, Error)]
pub enum DataError {
    /// Source file missing or unreadable
    #[error("dataset source unreachable: {0}")]
    Unreachable(#[from] std::io::Error),

    /// Source is fundamentally not parseable as CSV
    #[error("dataset unparseable: {0}")]
    Unparseable(#[from] csv::Error),

    /// A column the index cannot be built without is absent
    #[error("required column missing from dataset header: {0}")]
    MissingColumn(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DataError::MissingColumn("trust_code");
        assert_eq!(
            err.to_string(),
            "required column missing from dataset header: trust_code"
        );

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = DataError::from(io);
        assert!(err.to_string().starts_with("dataset source unreachable"));
    }
}
