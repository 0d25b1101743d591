//! Domain descriptor loader.
//!
//! Walks the raw JSON so each failure can name the exact key that caused it.
//! A descriptor that loads here is guaranteed to compile: defaults are typed
//! against their own field before the schema is returned.

use std::collections::HashSet;
use std::path::Path;

use ideate_core::entity::is_system_field;
use ideate_core::{Branding, DomainSchema, Features, FieldDescriptor, FieldType};
use serde_json::{Map, Value};

use crate::constraint;
use crate::error::SchemaError;

type Object = Map<String, Value>;

/// Parse and check a descriptor.
///
/// # Errors
///
/// Returns the first `SchemaError` encountered: missing keys, duplicate field
/// keys, unknown type tokens, bad slugs, bad bounds, or ill-typed defaults.
pub fn load(descriptor: &Value) -> Result<DomainSchema, SchemaError> {
    let root = descriptor.as_object().ok_or_else(|| SchemaError::Malformed {
        path: "$".into(),
        expected: "an object",
    })?;

    let domain = required_str(root, "domain", "domain")?;
    if !is_valid_slug(&domain) {
        return Err(SchemaError::InvalidSlug { domain });
    }
    let label = required_str(root, "label", "label")?;
    let label_plural = required_str(root, "labelPlural", "labelPlural")?;
    let icon = optional_str(root, "icon", "icon")?;
    let description = optional_str(root, "description", "description")?;
    let branding: Branding = optional_section(root, "branding")?;
    let features: Features = optional_section(root, "features")?;

    let raw_fields = root
        .get("fields")
        .ok_or_else(|| SchemaError::MissingRequiredKey {
            path: "fields".into(),
        })?
        .as_array()
        .ok_or_else(|| SchemaError::Malformed {
            path: "fields".into(),
            expected: "an array",
        })?;

    let mut seen = HashSet::with_capacity(raw_fields.len());
    let mut fields = Vec::with_capacity(raw_fields.len());
    for (i, raw) in raw_fields.iter().enumerate() {
        let field = load_field(i, raw)?;
        if !seen.insert(field.key.clone()) {
            return Err(SchemaError::DuplicateFieldKey { key: field.key });
        }
        fields.push(field);
    }

    let schema = DomainSchema {
        domain,
        label,
        label_plural,
        icon,
        description,
        branding,
        features,
        fields,
    };

    // Surfaces ill-typed defaults.
    constraint::compile(&schema)?;

    tracing::debug!(
        domain = %schema.domain,
        fields = schema.fields.len(),
        "descriptor loaded"
    );
    Ok(schema)
}

/// Parse descriptor text, then [`load`] it.
///
/// # Errors
///
/// Returns `SchemaError::Parse` for invalid JSON, otherwise as [`load`].
pub fn load_str(text: &str) -> Result<DomainSchema, SchemaError> {
    let value: Value = serde_json::from_str(text)?;
    load(&value)
}

/// Read a descriptor file, then [`load`] it.
///
/// # Errors
///
/// Returns `SchemaError::Io` if the file cannot be read, otherwise as [`load_str`].
pub fn load_file(path: &Path) -> Result<DomainSchema, SchemaError> {
    let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_str(&text)
}

fn load_field(index: usize, raw: &Value) -> Result<FieldDescriptor, SchemaError> {
    let base = format!("fields[{index}]");
    let obj = raw.as_object().ok_or_else(|| SchemaError::Malformed {
        path: base.clone(),
        expected: "an object",
    })?;

    let key = required_str(obj, "key", &format!("{base}.key"))?;
    if key.trim().is_empty() {
        return Err(SchemaError::Malformed {
            path: format!("{base}.key"),
            expected: "a non-empty string",
        });
    }
    if is_system_field(&key) {
        return Err(SchemaError::ReservedFieldKey { key });
    }
    let label = required_str(obj, "label", &format!("{base}.label"))?;
    let token = required_str(obj, "type", &format!("{base}.type"))?;
    let field_type = FieldType::parse(&token)
        .ok_or_else(|| SchemaError::InvalidTypeToken {
            key: key.clone(),
            token,
        })?;

    let min = optional_number(obj, "min", &base)?;
    let max = optional_number(obj, "max", &base)?;
    if (min.is_some() || max.is_some()) && field_type != FieldType::Number {
        return Err(SchemaError::InvalidBounds {
            key,
            reason: format!("min/max only apply to number fields, not {field_type}"),
        });
    }
    if let (Some(lo), Some(hi)) = (min, max)
        && lo > hi
    {
        return Err(SchemaError::InvalidBounds {
            key,
            reason: format!("min {lo} is greater than max {hi}"),
        });
    }

    let mut field = FieldDescriptor::new(key, label, field_type);
    field.required = optional_bool(obj, "required", &base)?.unwrap_or(false);
    field.hidden = optional_bool(obj, "hidden", &base)?.unwrap_or(false);
    field.show_in_list = optional_bool(obj, "showInList", &base)?.unwrap_or(false);
    field.show_in_detail = optional_bool(obj, "showInDetail", &base)?.unwrap_or(true);
    field.placeholder = optional_str(obj, "placeholder", &format!("{base}.placeholder"))?;
    field.help_text = optional_str(obj, "helpText", &format!("{base}.helpText"))?;
    field.min = min;
    field.max = max;
    field.default = obj.get("default").filter(|v| !v.is_null()).cloned();
    Ok(field)
}

/// `^[a-z][a-z0-9_-]*$`
fn is_valid_slug(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

fn required_str(obj: &Object, key: &str, path: &str) -> Result<String, SchemaError> {
    match obj.get(key) {
        None | Some(Value::Null) => Err(SchemaError::MissingRequiredKey { path: path.into() }),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(SchemaError::Malformed {
            path: path.into(),
            expected: "a string",
        }),
    }
}

fn optional_str(obj: &Object, key: &str, path: &str) -> Result<Option<String>, SchemaError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(SchemaError::Malformed {
            path: path.into(),
            expected: "a string",
        }),
    }
}

fn optional_bool(obj: &Object, key: &str, base: &str) -> Result<Option<bool>, SchemaError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(SchemaError::Malformed {
            path: format!("{base}.{key}"),
            expected: "a boolean",
        }),
    }
}

fn optional_number(obj: &Object, key: &str, base: &str) -> Result<Option<f64>, SchemaError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(_) => Err(SchemaError::Malformed {
            path: format!("{base}.{key}"),
            expected: "a number",
        }),
    }
}

fn optional_section<T>(obj: &Object, key: &str) -> Result<T, SchemaError>
where
    T: Default + serde::de::DeserializeOwned,
{
    match obj.get(key) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(v @ Value::Object(_)) => {
            serde_json::from_value(v.clone()).map_err(|_| SchemaError::Malformed {
                path: key.into(),
                expected: "an object with valid values",
            })
        }
        Some(_) => Err(SchemaError::Malformed {
            path: key.into(),
            expected: "an object",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn descriptor() -> Value {
        json!({
            "domain": "products",
            "label": "Product",
            "labelPlural": "Products",
            "fields": [
                {"key": "name", "label": "Name", "type": "string", "required": true, "showInList": true},
                {"key": "price", "label": "Price", "type": "number", "min": 0, "max": 100000},
                {"key": "stock", "label": "Stock", "type": "number", "min": 0}
            ]
        })
    }

    #[test]
    fn loads_minimal_descriptor() {
        let schema = load(&descriptor()).unwrap();
        assert_eq!(schema.domain, "products");
        assert_eq!(schema.fields.len(), 3);
        assert_eq!(schema.fields[1].max, Some(100_000.0));
        assert!(schema.features.delete);
        assert!(!schema.features.archive);
    }

    #[test]
    fn missing_top_level_key_names_it() {
        let mut d = descriptor();
        d.as_object_mut().unwrap().remove("labelPlural");
        let err = load(&d).unwrap_err();
        assert!(matches!(err, SchemaError::MissingRequiredKey { ref path } if path == "labelPlural"));
    }

    #[test]
    fn missing_field_key_names_index() {
        let mut d = descriptor();
        d["fields"][2].as_object_mut().unwrap().remove("type");
        let err = load(&d).unwrap_err();
        assert!(matches!(err, SchemaError::MissingRequiredKey { ref path } if path == "fields[2].type"));
    }

    #[test]
    fn duplicate_field_key_rejected() {
        let mut d = descriptor();
        d["fields"][2]["key"] = json!("name");
        let err = load(&d).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateFieldKey { ref key } if key == "name"));
    }

    #[test]
    fn unknown_type_token_rejected() {
        let mut d = descriptor();
        d["fields"][0]["type"] = json!("email");
        let err = load(&d).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::InvalidTypeToken { ref key, ref token } if key == "name" && token == "email"
        ));
    }

    #[test]
    fn slug_must_be_url_safe() {
        for bad in ["Products", "my products", "9lives", ""] {
            let mut d = descriptor();
            d["domain"] = json!(bad);
            assert!(
                matches!(load(&d), Err(SchemaError::InvalidSlug { .. })),
                "{bad:?} should be rejected"
            );
        }
        let mut d = descriptor();
        d["domain"] = json!("line-items_v2");
        assert!(load(&d).is_ok());
    }

    #[test]
    fn reserved_field_key_rejected() {
        let mut d = descriptor();
        d["fields"][0]["key"] = json!("created_date");
        assert!(matches!(load(&d), Err(SchemaError::ReservedFieldKey { .. })));
    }

    #[test]
    fn bounds_on_text_field_rejected() {
        let mut d = descriptor();
        d["fields"][0]["min"] = json!(1);
        assert!(matches!(load(&d), Err(SchemaError::InvalidBounds { .. })));
    }

    #[test]
    fn inverted_bounds_rejected() {
        let mut d = descriptor();
        d["fields"][1]["min"] = json!(10);
        d["fields"][1]["max"] = json!(1);
        assert!(matches!(load(&d), Err(SchemaError::InvalidBounds { .. })));
    }

    #[test]
    fn ill_typed_default_rejected() {
        let mut d = descriptor();
        d["fields"][2]["default"] = json!("none");
        assert!(matches!(load(&d), Err(SchemaError::InvalidDefault { .. })));
    }

    #[test]
    fn wrong_json_type_is_malformed() {
        let mut d = descriptor();
        d["fields"][0]["required"] = json!("yes");
        let err = load(&d).unwrap_err();
        assert!(matches!(err, SchemaError::Malformed { ref path, .. } if path == "fields[0].required"));
    }

    #[test]
    fn load_str_rejects_invalid_json() {
        assert!(matches!(load_str("{not json"), Err(SchemaError::Parse(_))));
    }

    #[test]
    fn load_file_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, SchemaError::Io { .. }));
    }
}
