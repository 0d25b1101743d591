//! Payload validation against a compiled schema.

use ideate_core::entity::is_system_field;
use ideate_core::enums::ValidateMode;
use ideate_core::{FieldMap, ValidationResult, Violation, ViolationKind};
use serde_json::Value;

use crate::constraint::CompiledSchema;

/// Validate an untyped payload.
///
/// Checks every field in schema order, then reports reserved and unknown keys
/// in payload order. All violations are collected; nothing short-circuits.
///
/// - `Create`: absent fields take their default; fields that must be supplied
///   and are still absent are `missing-required`. `null` on an optional field
///   counts as absent.
/// - `Update`: absent fields are skipped. `null` on an optional field clears it.
///
/// In both modes `null` or blank text on a required field is `missing-required`.
#[must_use]
pub fn validate(compiled: &CompiledSchema, payload: &Value, mode: ValidateMode) -> ValidationResult {
    let mut result = ValidationResult::default();

    let Some(obj) = payload.as_object() else {
        result.violations.push(Violation::new(
            "$",
            ViolationKind::TypeMismatch,
            "Payload must be a JSON object",
        ));
        return result;
    };

    for c in compiled.iter() {
        match obj.get(&c.key) {
            Some(Value::Null) if c.required => result.violations.push(c.missing()),
            Some(Value::Null) if mode == ValidateMode::Update => result.cleared.push(c.key.clone()),
            Some(Value::Null) | None => {
                if mode == ValidateMode::Update {
                    continue;
                }
                if let Some(default) = &c.default {
                    result.fields.insert(&c.key, default.clone());
                } else if c.required_on_create {
                    result.violations.push(c.missing());
                }
            }
            Some(value) => match c.coerce(value) {
                Ok(typed) => {
                    result.fields.insert(&c.key, typed);
                }
                Err(violation) => result.violations.push(violation),
            },
        }
    }

    for key in obj.keys() {
        if is_system_field(key) {
            result.violations.push(Violation::new(
                key,
                ViolationKind::ReservedKey,
                format!("'{key}' is managed by the store and cannot be set"),
            ));
        } else if compiled.get(key).is_none() {
            result.violations.push(Violation::new(
                key,
                ViolationKind::UnknownField,
                format!("Unknown field '{key}'"),
            ));
        }
    }

    if !result.violations.is_empty() {
        result.fields = FieldMap::new();
        result.cleared.clear();
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::compile;
    use crate::loader::load;
    use ideate_core::FieldValue;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn products() -> CompiledSchema {
        let schema = load(&json!({
            "domain": "products",
            "label": "Product",
            "labelPlural": "Products",
            "fields": [
                {"key": "name", "label": "Name", "type": "string", "required": true},
                {"key": "price", "label": "Price", "type": "number", "min": 0, "max": 100000},
                {"key": "stock", "label": "Stock", "type": "number", "min": 0},
                {"key": "active", "label": "Active", "type": "boolean", "default": true},
                {"key": "sku", "label": "SKU", "type": "string", "required": true, "hidden": true},
                {"key": "notes", "label": "Notes", "type": "text"}
            ]
        }))
        .unwrap();
        compile(&schema).unwrap()
    }

    fn pairs(result: &ValidationResult) -> Vec<(&str, ViolationKind)> {
        result
            .violations
            .iter()
            .map(|v| (v.field.as_str(), v.kind))
            .collect()
    }

    #[test]
    fn conforming_create_passes_with_defaults() {
        let result = validate(
            &products(),
            &json!({"name": "Mouse", "price": 25, "stock": 10}),
            ValidateMode::Create,
        );
        assert!(result.is_valid(), "{:?}", result.violations);
        assert_eq!(
            result.fields.keys().collect::<Vec<_>>(),
            vec!["name", "price", "stock", "active"]
        );
        assert_eq!(result.fields.get("active"), Some(&FieldValue::Boolean(true)));
    }

    #[test]
    fn collects_every_violation_in_field_order() {
        let result = validate(
            &products(),
            &json!({"price": -1, "stock": 10}),
            ValidateMode::Create,
        );
        assert_eq!(
            pairs(&result),
            vec![
                ("name", ViolationKind::MissingRequired),
                ("price", ViolationKind::OutOfRange),
            ]
        );
        assert!(result.fields.is_empty());
    }

    #[test]
    fn missing_required_cites_only_that_field() {
        let result = validate(&products(), &json!({"price": 10}), ValidateMode::Create);
        assert_eq!(pairs(&result), vec![("name", ViolationKind::MissingRequired)]);
    }

    #[test]
    fn blank_required_string_is_missing() {
        let result = validate(&products(), &json!({"name": "  "}), ValidateMode::Create);
        assert_eq!(pairs(&result), vec![("name", ViolationKind::MissingRequired)]);
    }

    #[test]
    fn update_skips_required_checks_for_absent_fields() {
        let result = validate(&products(), &json!({"price": 30}), ValidateMode::Update);
        assert!(result.is_valid());
        assert_eq!(result.fields.keys().collect::<Vec<_>>(), vec!["price"]);
    }

    #[test]
    fn update_still_checks_present_fields() {
        let result = validate(
            &products(),
            &json!({"price": "cheap", "name": ""}),
            ValidateMode::Update,
        );
        assert_eq!(
            pairs(&result),
            vec![
                ("name", ViolationKind::MissingRequired),
                ("price", ViolationKind::TypeMismatch),
            ]
        );
    }

    #[test]
    fn update_null_clears_optional_field() {
        let result = validate(&products(), &json!({"notes": null}), ValidateMode::Update);
        assert!(result.is_valid());
        assert_eq!(result.cleared, vec!["notes".to_string()]);
        assert!(result.fields.is_empty());
    }

    #[test]
    fn null_on_required_field_is_missing_in_both_modes() {
        for mode in [ValidateMode::Create, ValidateMode::Update] {
            let result = validate(&products(), &json!({"name": null}), mode);
            assert_eq!(pairs(&result), vec![("name", ViolationKind::MissingRequired)]);
        }
    }

    #[test]
    fn create_null_on_optional_field_takes_default() {
        let result = validate(
            &products(),
            &json!({"name": "Mouse", "active": null}),
            ValidateMode::Create,
        );
        assert_eq!(result.fields.get("active"), Some(&FieldValue::Boolean(true)));
        assert!(result.cleared.is_empty());
    }

    #[test]
    fn hidden_required_field_not_required_on_create() {
        let result = validate(&products(), &json!({"name": "Mouse"}), ValidateMode::Create);
        assert!(result.is_valid());
        assert!(!result.fields.contains_key("sku"));
    }

    #[test]
    fn reserved_and_unknown_keys_rejected_in_both_modes() {
        for mode in [ValidateMode::Create, ValidateMode::Update] {
            let result = validate(
                &products(),
                &json!({"name": "Mouse", "id": "x", "colour": "red", "archived": true}),
                mode,
            );
            assert_eq!(
                pairs(&result),
                vec![
                    ("id", ViolationKind::ReservedKey),
                    ("colour", ViolationKind::UnknownField),
                    ("archived", ViolationKind::ReservedKey),
                ]
            );
        }
    }

    #[test]
    fn non_object_payload_is_type_mismatch() {
        let result = validate(&products(), &json!([1, 2]), ValidateMode::Create);
        assert_eq!(pairs(&result), vec![("$", ViolationKind::TypeMismatch)]);
    }

    #[test]
    fn empty_update_is_valid_and_empty() {
        let result = validate(&products(), &json!({}), ValidateMode::Update);
        assert!(result.is_valid());
        assert!(result.fields.is_empty());
        assert!(result.cleared.is_empty());
    }
}
