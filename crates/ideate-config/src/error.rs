//! Errors raised while assembling an [`IdeateConfig`](crate::IdeateConfig).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A TOML layer or `IDEATE_*` variable could not be parsed into its section.
    #[error("Invalid ideate configuration: {0}")]
    Figment(#[from] figment::Error),

    /// No descriptor path came from TOML, `IDEATE_DOMAIN__DESCRIPTOR`, or `DOMAIN_CONFIG`.
    #[error("No domain descriptor configured (set domain.descriptor)")]
    MissingDescriptor,

    /// A value parsed but falls outside its allowed set, e.g. `general.default_format`.
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
