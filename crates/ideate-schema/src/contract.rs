//! Per-operation protocol contracts (JSON Schema draft 2020-12).
//!
//! Field rules come from the same `FieldConstraint`s the validation engine
//! uses. Contracts are derived only for operations the domain enables.

use ideate_core::enums::Operation;
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::cell::LoadedSchema;
use crate::constraint::CompiledSchema;

const DRAFT: &str = "https://json-schema.org/draft/2020-12/schema";

/// Input and output contract of one operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationContract {
    pub operation: Operation,
    /// `{domain}_{operation}`, e.g. `products_create`.
    pub tool_name: String,
    pub description: String,
    pub input: Value,
    pub output: Value,
}

/// Tool name for an operation of a domain.
#[must_use]
pub fn tool_name(domain: &str, operation: Operation) -> String {
    format!("{domain}_{operation}")
}

/// Contracts for every enabled operation, in exposure order.
#[must_use]
pub fn contracts(loaded: &LoadedSchema) -> Vec<OperationContract> {
    loaded
        .schema
        .features
        .operations()
        .into_iter()
        .map(|op| contract(loaded, op))
        .collect()
}

/// Contract of a single operation. Does not check the feature flags.
#[must_use]
pub fn contract(loaded: &LoadedSchema, operation: Operation) -> OperationContract {
    let schema = &loaded.schema;
    let domain = &schema.domain;
    let label = &schema.label;
    let tool = tool_name(domain, operation);

    let (description, input, output) = match operation {
        Operation::List => (
            format!("List {}, oldest first", schema.label_plural),
            list_input(&tool),
            list_output(&tool, &loaded.compiled),
        ),
        Operation::Get => (
            format!("Get a {label} by id"),
            id_input(&tool),
            entity_output(&format!("{tool} output"), &loaded.compiled),
        ),
        Operation::Create => (
            format!("Create a {label}"),
            create_input(&tool, &loaded.compiled),
            entity_output(&format!("{tool} output"), &loaded.compiled),
        ),
        Operation::Update => (
            format!("Update fields of a {label}; omitted fields are left unchanged"),
            update_input(&tool, &loaded.compiled),
            entity_output(&format!("{tool} output"), &loaded.compiled),
        ),
        Operation::Delete => (
            format!("Permanently delete a {label}"),
            id_input(&tool),
            action_output(&tool),
        ),
        Operation::Archive => (
            format!("Archive a {label}"),
            id_input(&tool),
            action_output(&tool),
        ),
        Operation::Restore => (
            format!("Restore an archived {label}"),
            id_input(&tool),
            action_output(&tool),
        ),
    };

    OperationContract {
        operation,
        tool_name: tool,
        description,
        input,
        output,
    }
}

/// Payload schema for `create`.
#[must_use]
pub fn create_input(title: &str, compiled: &CompiledSchema) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for c in compiled.iter() {
        properties.insert(c.key.clone(), c.json_schema(!c.required));
        if c.required_on_create {
            required.push(Value::String(c.key.clone()));
        }
    }
    object_schema(&format!("{title} input"), properties, required)
}

/// Payload schema for `update`: mandatory `id`, every field optional.
#[must_use]
pub fn update_input(title: &str, compiled: &CompiledSchema) -> Value {
    let mut properties = Map::new();
    properties.insert("id".into(), id_property());
    for c in compiled.iter() {
        properties.insert(c.key.clone(), c.json_schema(!c.required));
    }
    object_schema(&format!("{title} input"), properties, vec![json!("id")])
}

fn list_input(title: &str) -> Value {
    let mut properties = Map::new();
    properties.insert(
        "includeArchived".into(),
        json!({"type": "boolean", "description": "Include archived records"}),
    );
    properties.insert(
        "archivedOnly".into(),
        json!({"type": "boolean", "description": "Return only archived records"}),
    );
    object_schema(&format!("{title} input"), properties, Vec::new())
}

fn id_input(title: &str) -> Value {
    let mut properties = Map::new();
    properties.insert("id".into(), id_property());
    object_schema(&format!("{title} input"), properties, vec![json!("id")])
}

fn id_property() -> Value {
    json!({"type": "string", "minLength": 1, "description": "Entity id"})
}

/// Schema of a stored entity in wire form.
///
/// Field properties are listed but never required or constrained: records
/// written under an earlier schema version are returned as stored.
#[must_use]
pub fn entity_schema(title: &str, compiled: &CompiledSchema) -> Value {
    let mut properties = Map::new();
    properties.insert("id".into(), json!({"type": "string", "readOnly": true}));
    properties.insert("archived".into(), json!({"type": "boolean", "readOnly": true}));
    properties.insert(
        "created_date".into(),
        json!({"type": "string", "format": "date-time", "readOnly": true}),
    );
    properties.insert(
        "updated_date".into(),
        json!({"type": "string", "format": "date-time", "readOnly": true}),
    );
    properties.insert(
        "schema_version".into(),
        json!({"type": "integer", "minimum": 0, "readOnly": true}),
    );
    for c in compiled.iter() {
        properties.insert(c.key.clone(), c.output_schema());
    }
    json!({
        "title": title,
        "type": "object",
        "properties": properties,
        "required": ["id", "archived", "created_date", "updated_date", "schema_version"],
    })
}

fn entity_output(title: &str, compiled: &CompiledSchema) -> Value {
    let mut schema = entity_schema(title, compiled);
    if let Some(obj) = schema.as_object_mut() {
        obj.insert("$schema".into(), json!(DRAFT));
    }
    schema
}

fn list_output(tool: &str, compiled: &CompiledSchema) -> Value {
    json!({
        "$schema": DRAFT,
        "title": format!("{tool} output"),
        "type": "object",
        "properties": {
            "items": {"type": "array", "items": entity_schema("entity", compiled)},
            "count": {"type": "integer", "minimum": 0},
        },
        "required": ["items", "count"],
    })
}

fn action_output(tool: &str) -> Value {
    json!({
        "$schema": DRAFT,
        "title": format!("{tool} output"),
        "type": "object",
        "properties": {
            "success": {"type": "boolean"},
            "message": {"type": "string"},
        },
        "required": ["success", "message"],
    })
}

fn object_schema(title: &str, properties: Map<String, Value>, required: Vec<Value>) -> Value {
    json!({
        "$schema": DRAFT,
        "title": title,
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ideate_core::enums::Operation;
    use pretty_assertions::assert_eq;

    fn loaded(features: Value) -> LoadedSchema {
        let schema = crate::loader::load(&json!({
            "domain": "products",
            "label": "Product",
            "labelPlural": "Products",
            "features": features,
            "fields": [
                {"key": "name", "label": "Name", "type": "string", "required": true},
                {"key": "price", "label": "Price", "type": "number", "min": 0, "max": 100000},
                {"key": "stock", "label": "Stock", "type": "number", "min": 0, "required": true, "default": 0}
            ]
        }))
        .unwrap();
        LoadedSchema::new(schema, 1).unwrap()
    }

    #[test]
    fn contracts_follow_feature_flags() {
        let all = contracts(&loaded(json!({"archive": true})));
        let names: Vec<_> = all.iter().map(|c| c.tool_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "products_list",
                "products_get",
                "products_create",
                "products_update",
                "products_delete",
                "products_archive",
                "products_restore",
            ]
        );

        let read_only = contracts(&loaded(json!({"create": false, "update": false, "delete": false})));
        let ops: Vec<_> = read_only.iter().map(|c| c.operation).collect();
        assert_eq!(ops, vec![Operation::List, Operation::Get]);
    }

    #[test]
    fn create_input_requires_fields_without_defaults() {
        let c = contract(&loaded(json!({})), Operation::Create);
        assert_eq!(c.input["required"], json!(["name"]));
        assert_eq!(c.input["additionalProperties"], json!(false));
        assert_eq!(c.input["properties"]["price"]["minimum"], json!(0.0));
        assert_eq!(
            c.input["properties"]["price"]["type"],
            json!(["number", "string", "null"])
        );
        assert_eq!(c.input["properties"]["stock"]["type"], json!(["number", "string"]));
        assert_eq!(c.input["properties"]["stock"]["default"], json!(0));
        assert_eq!(c.input["properties"]["name"]["pattern"], json!("\\S"));
    }

    #[test]
    fn update_input_requires_only_id() {
        let c = contract(&loaded(json!({})), Operation::Update);
        assert_eq!(c.input["required"], json!(["id"]));
        assert!(c.input["properties"]["name"].is_object());
    }

    #[test]
    fn entity_output_accepts_values_written_under_older_rules() {
        let c = contract(&loaded(json!({})), Operation::Get);
        let validator = jsonschema::validator_for(&c.output).unwrap();
        let stored = json!({
            "id": "products-1",
            "archived": false,
            "created_date": "2025-01-31T10:00:00.000000Z",
            "updated_date": "2025-01-31T10:00:00.000000Z",
            "schema_version": 1,
            "name": "Mouse",
            "price": "twenty"
        });
        assert!(validator.is_valid(&stored));
        assert!(c.output["properties"]["price"].get("minimum").is_none());
    }

    #[test]
    fn entity_output_lists_system_fields() {
        let c = contract(&loaded(json!({})), Operation::Get);
        assert_eq!(
            c.output["required"],
            json!(["id", "archived", "created_date", "updated_date", "schema_version"])
        );
    }

    #[test]
    fn every_contract_is_a_valid_schema() {
        for c in contracts(&loaded(json!({"archive": true}))) {
            assert!(jsonschema::validator_for(&c.input).is_ok(), "{}", c.tool_name);
            assert!(jsonschema::validator_for(&c.output).is_ok(), "{}", c.tool_name);
        }
    }
}
