//! Error type shared by every structure in the crate.

use thiserror::Error;

/// Errors returned by constructors, merges and ingestion.
#[derive(Debug, Error)]
pub enum Error {
    /// A construction parameter was out of range. No instance is produced.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value, rendered for diagnostics.
        value: String,
        /// What the parameter must satisfy.
        reason: &'static str,
    },

    /// Two estimators with different register counts cannot be merged.
    #[error("precision mismatch: expected {expected}, found {found}")]
    PrecisionMismatch {
        /// Precision of the receiving estimator.
        expected: u8,
        /// Precision of the estimator being merged in.
        found: u8,
    },

    /// The ingestion source could not be read.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// Ingestion finished without finding a single usable item.
    #[error("no valid items found in input")]
    NoValidItems,
}

impl Error {
    pub(crate) fn invalid_parameter(
        name: &'static str,
        value: impl ToString,
        reason: &'static str,
    ) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn test_invalid_parameter_display() {
        let err = Error::invalid_parameter("bit_count", 0, "must be positive");
        assert_eq!(
            err.to_string(),
            "invalid parameter `bit_count` = 0: must be positive",
        );
    }

    #[test]
    fn test_precision_mismatch_display() {
        let err = Error::PrecisionMismatch {
            expected: 10,
            found: 12,
        };
        assert_eq!(err.to_string(), "precision mismatch: expected 10, found 12");
    }
}
