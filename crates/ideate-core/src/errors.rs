//! Cross-cutting error types for Ideate.
//!
//! This module defines the request-level error taxonomy shared by the store
//! and the API surface. Layer-specific errors (`SchemaError`, `StoreError`,
//! `ApiError`) live in their respective crates and wrap or map these.

use thiserror::Error;

use crate::enums::Operation;
use crate::validation::Violation;

/// Errors that can be raised by any Ideate crate while serving a request.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {domain} {id}")]
    NotFound { domain: String, id: String },

    /// Payload failed validation. Nothing was written.
    #[error("Validation failed with {} violation(s)", violations.len())]
    Validation { violations: Vec<Violation> },

    /// The operation is not enabled by the domain's feature flags.
    #[error("Operation '{operation}' is not enabled for domain '{domain}'")]
    FeatureDisabled { domain: String, operation: Operation },

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    /// Stable machine-readable code for this error class.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Validation { .. } => "validation_failed",
            Self::FeatureDisabled { .. } => "feature_disabled",
            Self::Other(_) => "internal",
        }
    }
}
