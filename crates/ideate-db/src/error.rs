//! Store error types for ideate-db.

use ideate_core::CoreError;
use ideate_core::enums::Operation;
use ideate_core::validation::Violation;
use thiserror::Error;

/// Errors from document store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Request-level failure: not found, validation, or disabled feature.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A SQL query failed or returned data that cannot be decoded.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration or collection provisioning failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Stored JSON could not be encoded or decoded.
    #[error("Codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoreError {
    pub(crate) fn not_found(domain: &str, id: &str) -> Self {
        Self::Core(CoreError::NotFound {
            domain: domain.to_string(),
            id: id.to_string(),
        })
    }

    pub(crate) const fn validation(violations: Vec<Violation>) -> Self {
        Self::Core(CoreError::Validation { violations })
    }

    pub(crate) fn feature_disabled(domain: &str, operation: Operation) -> Self {
        Self::Core(CoreError::FeatureDisabled {
            domain: domain.to_string(),
            operation,
        })
    }

    /// Whether this is a `NotFound` failure.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Core(CoreError::NotFound { .. }))
    }

    /// Violations, if this is a validation failure.
    #[must_use]
    pub fn violations(&self) -> Option<&[Violation]> {
        match self {
            Self::Core(CoreError::Validation { violations }) => Some(violations),
            _ => None,
        }
    }
}
