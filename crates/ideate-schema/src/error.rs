//! Descriptor and schema-registry error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading a domain descriptor or using the schema registry.
///
/// Any load error is fatal for the domain: it refuses to serve.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A mandatory descriptor key is absent. `path` is e.g. `labelPlural` or `fields[2].type`.
    #[error("Missing required key: {path}")]
    MissingRequiredKey { path: String },

    /// Two fields share the same key.
    #[error("Duplicate field key: {key}")]
    DuplicateFieldKey { key: String },

    /// A field declares a type token outside the supported set.
    #[error("Invalid type token '{token}' for field '{key}'")]
    InvalidTypeToken { key: String, token: String },

    /// The domain slug is not URL-safe.
    #[error("Invalid domain slug '{domain}': expected lowercase letters, digits, '-' or '_', starting with a letter")]
    InvalidSlug { domain: String },

    /// A field is named like a store-managed field.
    #[error("Field key '{key}' is reserved for the store")]
    ReservedFieldKey { key: String },

    /// A declared default does not satisfy the field's own type and bounds.
    #[error("Invalid default for field '{key}': {reason}")]
    InvalidDefault { key: String, reason: String },

    /// `min`/`max` declared on a non-number field, or `min > max`.
    #[error("Invalid bounds for field '{key}': {reason}")]
    InvalidBounds { key: String, reason: String },

    /// A key holds the wrong JSON type.
    #[error("Malformed descriptor at '{path}': expected {expected}")]
    Malformed { path: String, expected: &'static str },

    /// Reload attempted to change the domain slug of a live schema.
    #[error("Reload would change domain from '{from}' to '{to}'")]
    DomainChanged { from: String, to: String },

    /// Descriptor text is not valid JSON.
    #[error("Descriptor is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Descriptor file could not be read.
    #[error("Failed to read descriptor {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Requested schema name was not found in the registry.
    #[error("Schema not found: {0}")]
    NotFound(String),

    /// JSON value did not pass registry schema validation.
    #[error("Validation failed: {errors:?}")]
    ValidationFailed {
        /// Individual error messages from the validator.
        errors: Vec<String>,
    },

    /// Schema generation or compilation error.
    #[error("Schema generation error: {0}")]
    Generation(String),
}
