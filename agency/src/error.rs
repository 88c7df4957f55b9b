//! Agency and service error types.

use std::fmt;

use currency_convert_common::ValidationError;
use thiserror::Error;

use crate::strategy::RawRate;

/// Error creating an agency.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Agency could not be created: {0}")]
pub struct CreationError(#[from] pub ValidationError);

/// Why a rate query produced nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFoundReason {
    /// No stored rate matched a required leg.
    NoMatchingRate,
    /// Legs were found but the derived rate failed validation.
    InvalidDerivation(ValidationError),
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFoundReason::NoMatchingRate => write!(f, "no rate with the given criteria found"),
            NotFoundReason::InvalidDerivation(e) => write!(f, "derived rate is invalid ({e})"),
        }
    }
}

/// No stored or derivable rate satisfies the query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No rate from {from} to {to}: {reason}")]
pub struct RateNotFoundError {
    pub from: String,
    pub to: String,
    pub reason: NotFoundReason,
}

impl RateNotFoundError {
    pub(crate) fn no_match(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            reason: NotFoundReason::NoMatchingRate,
        }
    }

    pub(crate) fn invalid(from: &str, to: &str, error: ValidationError) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            reason: NotFoundReason::InvalidDerivation(error),
        }
    }
}

/// A raw record rejected during batch ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Record {index} rejected: {error}")]
pub struct UnprocessableEntry {
    /// Position of the record in its batch.
    pub index: usize,
    /// The record as received.
    pub raw: RawRate,
    /// First validation failure.
    pub error: ValidationError,
}

/// Errors raised by update strategies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// Feed payload has an unexpected structure.
    #[error("Malformed feed data: {0}")]
    Malformed(String),

    /// Feed could not be reached.
    #[error("Feed unavailable: {0}")]
    Unavailable(String),
}

/// Result type for update strategies.
pub type FeedResult<T> = Result<T, FeedError>;

/// Errors from pulling a batch from an update strategy into an agency.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateError {
    /// The strategy itself failed; nothing was ingested.
    #[error(transparent)]
    Feed(#[from] FeedError),

    /// Some records were rejected; every valid record was still stored.
    #[error("{} raw rates could not be processed", .0.len())]
    Rejected(Vec<UnprocessableEntry>),
}

/// Errors surfaced by repository implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// An agency with the same id is already stored.
    #[error("Agency already stored: {0}")]
    Conflict(String),

    /// Agency to save was never added.
    #[error("Agency not stored: {0}")]
    NotFound(String),

    /// Backend failure; opaque to the engine.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Coarse classification for mapping errors onto an outer protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Conflict,
    NotFound,
    Validation,
    Internal,
}

/// Errors returned by [`AgencyService`](crate::service::AgencyService).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// An agency with that name already exists.
    #[error("Agency already exists: {0}")]
    AgencyExists(String),

    /// No agency with that name or id.
    #[error("Agency not found: {0}")]
    AgencyNotFound(String),

    #[error(transparent)]
    Creation(#[from] CreationError),

    #[error(transparent)]
    RateNotFound(#[from] RateNotFoundError),

    /// Raw records rejected during an update.
    #[error("{} raw rates could not be processed", .0.len())]
    Ingestion(Vec<UnprocessableEntry>),

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::AgencyExists(_) => ErrorKind::Conflict,
            ServiceError::AgencyNotFound(_) | ServiceError::RateNotFound(_) => ErrorKind::NotFound,
            ServiceError::Creation(_) | ServiceError::Ingestion(_) => ErrorKind::Validation,
            ServiceError::Feed(_) => ErrorKind::Internal,
            ServiceError::Repository(e) => match e {
                RepositoryError::Conflict(_) => ErrorKind::Conflict,
                RepositoryError::NotFound(_) => ErrorKind::NotFound,
                RepositoryError::Storage(_) => ErrorKind::Internal,
            },
        }
    }

    /// Get error code for reporting across a process boundary.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::AgencyExists(_) => "AGENCY_EXISTS",
            ServiceError::AgencyNotFound(_) => "AGENCY_NOT_FOUND",
            ServiceError::Creation(_) => "AGENCY_CREATION_FAILED",
            ServiceError::RateNotFound(_) => "RATE_NOT_FOUND",
            ServiceError::Ingestion(_) => "UNPROCESSABLE_RATES",
            ServiceError::Feed(_) => "FEED_ERROR",
            ServiceError::Repository(_) => "REPOSITORY_ERROR",
        }
    }
}

impl From<UpdateError> for ServiceError {
    fn from(error: UpdateError) -> Self {
        match error {
            UpdateError::Feed(e) => ServiceError::Feed(e),
            UpdateError::Rejected(entries) => ServiceError::Ingestion(entries),
        }
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_not_found_messages() {
        let missing = RateNotFoundError::no_match("EUR", "JPY");
        assert_eq!(
            missing.to_string(),
            "No rate from EUR to JPY: no rate with the given criteria found"
        );

        let invalid = RateNotFoundError::invalid(
            "EUR",
            "JPY",
            ValidationError::NonPositiveAmount("0".into()),
        );
        assert!(invalid.to_string().contains("derived rate is invalid"));
    }

    #[test]
    fn test_service_error_kinds() {
        assert_eq!(ServiceError::AgencyExists("ECB".into()).kind(), ErrorKind::Conflict);
        assert_eq!(ServiceError::AgencyNotFound("ECB".into()).kind(), ErrorKind::NotFound);
        assert_eq!(
            ServiceError::from(RateNotFoundError::no_match("A", "B")).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ServiceError::from(CreationError(ValidationError::InvalidCurrencyCode("US".into())))
                .kind(),
            ErrorKind::Validation
        );
        assert_eq!(ServiceError::Ingestion(Vec::new()).kind(), ErrorKind::Validation);
        assert_eq!(
            ServiceError::from(RepositoryError::Storage("disk".into())).kind(),
            ErrorKind::Internal
        );
        assert_eq!(
            ServiceError::from(RepositoryError::Conflict("id".into())).kind(),
            ErrorKind::Conflict
        );
    }

    #[test]
    fn test_update_error_conversion() {
        let err: ServiceError = UpdateError::Feed(FeedError::Unavailable("timeout".into())).into();
        assert_eq!(err.error_code(), "FEED_ERROR");

        let err: ServiceError = UpdateError::Rejected(Vec::new()).into();
        assert_eq!(err.error_code(), "UNPROCESSABLE_RATES");
    }
}
