//! Serde roundtrip and JsonSchema validation tests for the descriptor types.

use ideate_core::{DomainSchema, FieldType};
use schemars::schema_for;
use serde_json::json;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

fn products_descriptor() -> serde_json::Value {
    json!({
        "domain": "products",
        "label": "Product",
        "labelPlural": "Products",
        "icon": "package",
        "branding": {"primaryColor": "#111111"},
        "features": {"archive": true},
        "fields": [
            {"key": "name", "label": "Name", "type": "string", "required": true, "showInList": true},
            {"key": "price", "label": "Price", "type": "number", "min": 0, "max": 100000},
            {"key": "stock", "label": "Stock", "type": "number", "min": 0, "default": 0},
            {"key": "released", "label": "Released", "type": "date"}
        ]
    })
}

#[test]
fn descriptor_validates_against_generated_schema() {
    let schema = serde_json::to_value(schema_for!(DomainSchema)).unwrap();
    let errors = validate_against_schema(&schema, &products_descriptor());
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[test]
fn generated_schema_rejects_unknown_type_token() {
    let schema = serde_json::to_value(schema_for!(DomainSchema)).unwrap();
    let mut descriptor = products_descriptor();
    descriptor["fields"][0]["type"] = json!("email");
    assert!(!validate_against_schema(&schema, &descriptor).is_empty());
}

#[test]
fn descriptor_roundtrips_through_serde() {
    let parsed: DomainSchema = serde_json::from_value(products_descriptor()).unwrap();
    assert_eq!(parsed.fields[1].field_type, FieldType::Number);
    assert_eq!(parsed.branding.secondary_color, "#10B981");
    assert!(parsed.features.archive);

    let text = serde_json::to_string_pretty(&parsed).unwrap();
    let recovered: DomainSchema = serde_json::from_str(&text).unwrap();
    assert_eq!(recovered, parsed);
}
