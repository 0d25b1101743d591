//! Structured errors returned to callers of the entity surface.

use ideate_core::validation::Violation;
use serde_json::{Value, json};
use thiserror::Error;

/// JSON-RPC code for an unknown id.
pub const RPC_NOT_FOUND: i32 = -32001;
/// JSON-RPC code for an operation the domain does not enable.
pub const RPC_FEATURE_DISABLED: i32 = -32002;

/// A failed entity operation, safe to show to a client.
///
/// Store internals never reach this type; they are logged and replaced by
/// [`ApiError::Internal`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Payload rejected. Nothing was written.
    #[error("{message}")]
    Validation {
        message: String,
        violations: Vec<Violation>,
    },

    /// No entity with the requested id.
    #[error("{message}")]
    NotFound { message: String },

    /// Operation not enabled for this domain.
    #[error("{message}")]
    FeatureDisabled { message: String },

    /// Persistence failure. Details are in the server log only.
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    /// Validation failure with a standard message.
    #[must_use]
    pub fn validation(violations: Vec<Violation>) -> Self {
        Self::Validation {
            message: "Validation failed".into(),
            violations,
        }
    }

    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_failed",
            Self::NotFound { .. } => "not_found",
            Self::FeatureDisabled { .. } => "feature_disabled",
            Self::Internal => "internal",
        }
    }

    /// HTTP-style status.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::NotFound { .. } => 404,
            Self::FeatureDisabled { .. } => 405,
            Self::Internal => 500,
        }
    }

    /// JSON-RPC error code.
    #[must_use]
    pub const fn rpc_code(&self) -> i32 {
        match self {
            Self::Validation { .. } => -32602,
            Self::NotFound { .. } => RPC_NOT_FOUND,
            Self::FeatureDisabled { .. } => RPC_FEATURE_DISABLED,
            Self::Internal => -32603,
        }
    }

    /// Violations for a validation failure, empty otherwise.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Validation { violations, .. } => violations,
            _ => &[],
        }
    }

    /// Error body: `{error, message}` plus `violations` for validation failures.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "error": self.code(),
            "message": self.to_string(),
        });
        if let Self::Validation { violations, .. } = self {
            body["violations"] = json!(violations);
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ideate_core::ViolationKind;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(ApiError::validation(vec![]), "validation_failed", 400, -32602)]
    #[case(ApiError::NotFound { message: "Product not found".into() }, "not_found", 404, -32001)]
    #[case(ApiError::FeatureDisabled { message: "off".into() }, "feature_disabled", 405, -32002)]
    #[case(ApiError::Internal, "internal", 500, -32603)]
    fn codes_line_up(
        #[case] err: ApiError,
        #[case] code: &str,
        #[case] status: u16,
        #[case] rpc: i32,
    ) {
        assert_eq!(err.code(), code);
        assert_eq!(err.status(), status);
        assert_eq!(err.rpc_code(), rpc);
    }

    #[test]
    fn validation_body_lists_violations() {
        let err = ApiError::validation(vec![Violation::new(
            "name",
            ViolationKind::MissingRequired,
            "Name is required",
        )]);
        assert_eq!(
            err.to_json(),
            json!({
                "error": "validation_failed",
                "message": "Validation failed",
                "violations": [
                    {"field": "name", "kind": "missing-required", "message": "Name is required"}
                ]
            })
        );
    }

    #[test]
    fn internal_body_is_opaque() {
        assert_eq!(
            ApiError::Internal.to_json(),
            json!({"error": "internal", "message": "Internal server error"})
        );
    }
}
