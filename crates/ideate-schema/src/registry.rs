//! Registry of the static JSON Schemas Ideate publishes.
//!
//! The `SchemaRegistry` builds JSON Schemas from ideate-core types at
//! construction time using [`schemars::schema_for!`] and provides validation
//! via `jsonschema`. Per-domain contracts are dynamic and live in
//! [`crate::contract`] instead.

use std::collections::HashMap;

use schemars::schema_for;

use crate::error::SchemaError;

/// Central store of the descriptor-format and envelope schemas.
pub struct SchemaRegistry {
    schemas: HashMap<&'static str, serde_json::Value>,
}

/// Insert a schema into the map, converting the `schemars` output to a
/// `serde_json::Value`.
macro_rules! register {
    ($map:expr, $name:expr, $ty:ty) => {
        if let Ok(value) = serde_json::to_value(schema_for!($ty)) {
            $map.insert($name, value);
        }
    };
}

impl SchemaRegistry {
    /// Build a new registry containing the descriptor, violation, and
    /// response schemas from ideate-core.
    #[must_use]
    pub fn new() -> Self {
        let mut schemas = HashMap::new();

        // --- Descriptor format ---
        register!(schemas, "domain_descriptor", ideate_core::DomainSchema);
        register!(schemas, "field_descriptor", ideate_core::FieldDescriptor);

        // --- Validation ---
        register!(schemas, "violation", ideate_core::Violation);

        // --- Responses ---
        register!(
            schemas,
            "action_response",
            ideate_core::responses::ActionResponse
        );

        Self { schemas }
    }

    /// Get a schema by name. Returns `None` if not found.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.schemas.get(name)
    }

    /// Validate a JSON value against a named schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if the schema name is unknown, or
    /// `SchemaError::ValidationFailed` if validation produces errors.
    pub fn validate(&self, name: &str, instance: &serde_json::Value) -> Result<(), SchemaError> {
        let schema = self
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;

        let validator = jsonschema::validator_for(schema)
            .map_err(|e| SchemaError::Generation(format!("{e}")))?;

        let errors: Vec<String> = validator
            .iter_errors(instance)
            .map(|e| format!("{e}"))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed { errors })
        }
    }

    /// List all registered schema names.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.schemas.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
