//! Validation outcome types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value::FieldMap;

/// Category of a single rule failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    MissingRequired,
    TypeMismatch,
    OutOfRange,
    /// A store-managed field (`id`, `archived`, ...) appeared in a payload.
    ReservedKey,
    /// A key that names no field of the domain.
    UnknownField,
}

impl ViolationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingRequired => "missing-required",
            Self::TypeMismatch => "type-mismatch",
            Self::OutOfRange => "out-of-range",
            Self::ReservedKey => "reserved-key",
            Self::UnknownField => "unknown-field",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One itemized rule failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Violation {
    pub field: String,
    pub kind: ViolationKind,
    /// Human-readable message, built from the field label.
    pub message: String,
}

impl Violation {
    #[must_use]
    pub fn new(field: impl Into<String>, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.field, self.kind, self.message)
    }
}

/// Outcome of validating one payload.
///
/// On success `fields` holds the typed values to write and `cleared` the keys
/// an update sets to null. Both are empty when `violations` is non-empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    pub fields: FieldMap,
    pub cleared: Vec<String>,
    pub violations: Vec<Violation>,
}

impl ValidationResult {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Split into the typed patch or the violation list.
    ///
    /// # Errors
    ///
    /// Returns the collected violations if any rule failed.
    pub fn into_result(self) -> Result<(FieldMap, Vec<String>), Vec<Violation>> {
        if self.violations.is_empty() {
            Ok((self.fields, self.cleared))
        } else {
            Err(self.violations)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serializes_kebab_case() {
        let json = serde_json::to_value(ViolationKind::MissingRequired).unwrap();
        assert_eq!(json, serde_json::json!("missing-required"));
        assert_eq!(ViolationKind::OutOfRange.to_string(), "out-of-range");
    }

    #[test]
    fn into_result_discards_fields_on_failure() {
        let result = ValidationResult {
            violations: vec![Violation::new(
                "price",
                ViolationKind::TypeMismatch,
                "Price must be a number",
            )],
            ..ValidationResult::default()
        };
        assert!(!result.is_valid());
        let violations = result.into_result().unwrap_err();
        assert_eq!(violations[0].field, "price");
    }
}
