//! Stored records and their flat wire form.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use crate::value::FieldMap;

/// Store-managed keys. Never client-writable, never valid field keys.
pub const SYSTEM_FIELDS: [&str; 5] = [
    "id",
    "archived",
    "created_date",
    "updated_date",
    "schema_version",
];

/// Whether `key` names a store-managed field.
#[must_use]
pub fn is_system_field(key: &str) -> bool {
    SYSTEM_FIELDS.contains(&key)
}

/// Format a store timestamp: RFC 3339, UTC, microsecond precision.
#[must_use]
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// One stored record of a domain.
///
/// Serializes to the flat wire form: system fields first, then field values
/// as plain JSON scalars in field order.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: String,
    pub archived: bool,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
    /// Persisted schema version active when the record was created.
    pub schema_version: u64,
    pub fields: FieldMap,
}

impl Entity {
    /// Wire form as a JSON value.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert("id".into(), self.id.clone().into());
        map.insert("archived".into(), self.archived.into());
        map.insert(
            "created_date".into(),
            format_timestamp(&self.created_date).into(),
        );
        map.insert(
            "updated_date".into(),
            format_timestamp(&self.updated_date).into(),
        );
        map.insert("schema_version".into(), self.schema_version.into());
        map.extend(self.fields.to_json());
        serde_json::Value::Object(map)
    }
}

impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FieldValue;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn wire_form_is_flat() {
        let ts = DateTime::parse_from_rfc3339("2025-03-01T12:00:00.000001Z")
            .unwrap()
            .with_timezone(&Utc);
        let entity = Entity {
            id: "products-0a1b".into(),
            archived: false,
            created_date: ts,
            updated_date: ts,
            schema_version: 1,
            fields: [("name", FieldValue::from("Mouse")), ("price", FieldValue::from(25_i64))]
                .into_iter()
                .collect(),
        };

        let expected = json!({
            "id": "products-0a1b",
            "archived": false,
            "created_date": "2025-03-01T12:00:00.000001Z",
            "updated_date": "2025-03-01T12:00:00.000001Z",
            "schema_version": 1,
            "name": "Mouse",
            "price": 25
        });
        assert_eq!(serde_json::to_value(&entity).unwrap(), expected);
        assert_eq!(entity.to_json(), expected);
    }

    #[test]
    fn system_fields_come_before_field_values() {
        let ts = Utc::now();
        let entity = Entity {
            id: "notes-1".into(),
            archived: true,
            created_date: ts,
            updated_date: ts,
            schema_version: 3,
            fields: [("body", FieldValue::from("hi")), ("id_hint", FieldValue::from(1_i64))]
                .into_iter()
                .collect(),
        };
        let text = serde_json::to_string(&entity).unwrap();
        let keys: Vec<String> = serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(&text)
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(
            keys,
            ["id", "archived", "created_date", "updated_date", "schema_version", "body", "id_hint"]
        );
    }

    #[test]
    fn system_fields_are_recognized() {
        assert!(is_system_field("updated_date"));
        assert!(!is_system_field("name"));
    }
}
