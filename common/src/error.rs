//! Validation errors raised while constructing value objects.

use thiserror::Error;

/// Broad classification of a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationKind {
    /// Input could not be parsed or has the wrong shape.
    Format,
    /// Input parsed but is zero or negative.
    Negative,
}

/// Error raised when a value object rejects its input.
///
/// Value objects validate once, at construction. A value that exists is
/// valid, so none of these can surface later in its lifetime.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Currency code is not exactly three alphabetic characters.
    #[error("Currency code must be 3 alphabetic characters long, got {0:?}")]
    InvalidCurrencyCode(String),

    /// Amount could not be parsed as a decimal.
    #[error("Unparsable amount: {0:?}")]
    UnparsableAmount(String),

    /// Amount is zero or negative (after quantization).
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(String),

    /// Arithmetic on amounts left the representable range.
    #[error("Amount out of range: {0}")]
    AmountOverflow(String),

    /// Timestamp could not be parsed.
    #[error("Unparsable timestamp: {0:?}")]
    UnparsableTimestamp(String),
}

impl ValidationError {
    /// Classify the error.
    pub fn kind(&self) -> ValidationKind {
        match self {
            ValidationError::NonPositiveAmount(_) => ValidationKind::Negative,
            ValidationError::InvalidCurrencyCode(_)
            | ValidationError::UnparsableAmount(_)
            | ValidationError::AmountOverflow(_)
            | ValidationError::UnparsableTimestamp(_) => ValidationKind::Format,
        }
    }

    /// Get error code for reporting across a process boundary.
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::InvalidCurrencyCode(_) => "INVALID_CURRENCY_CODE",
            ValidationError::UnparsableAmount(_) => "UNPARSABLE_AMOUNT",
            ValidationError::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            ValidationError::AmountOverflow(_) => "AMOUNT_OVERFLOW",
            ValidationError::UnparsableTimestamp(_) => "UNPARSABLE_TIMESTAMP",
        }
    }
}

/// Result type alias for value object construction.
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;
