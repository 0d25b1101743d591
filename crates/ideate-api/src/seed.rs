//! Demo data for an empty store.
//!
//! Known domains get curated samples; anything else gets one record with
//! every required string field set to `"Sample {label}"`. Sample keys the
//! active schema does not declare are dropped before insert, and a sample
//! that still fails validation is logged and skipped.

use ideate_core::{DomainSchema, FieldType};
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::error::ApiError;
use crate::surface::{ApiRequest, ApiResponse, EntityApi};

/// Outcome of a seeding run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub inserted: usize,
    pub skipped: usize,
    /// The store already had records, so nothing was attempted.
    pub store_was_populated: bool,
}

/// Sample payloads for `schema`'s domain.
#[must_use]
pub fn samples_for(schema: &DomainSchema) -> Vec<Value> {
    match schema.domain.as_str() {
        "products" => vec![
            json!({
                "name": "Wireless Mouse",
                "description": "Ergonomic wireless mouse with long battery life",
                "price": 29.99,
                "stock": 150,
                "priority": 4
            }),
            json!({
                "name": "USB-C Hub",
                "description": "Multi-port USB-C hub with HDMI and Ethernet",
                "price": 49.99,
                "stock": 75,
                "priority": 5
            }),
            json!({
                "name": "Laptop Stand",
                "description": "Adjustable aluminum laptop stand",
                "price": 39.99,
                "stock": 200,
                "priority": 3
            }),
        ],
        "customers" => vec![
            json!({
                "name": "John Doe",
                "email": "john@example.com",
                "phone": "+1-555-0123",
                "status": "active"
            }),
            json!({
                "name": "Jane Smith",
                "email": "jane@example.com",
                "phone": "+1-555-0456",
                "status": "active"
            }),
        ],
        "tasks" => vec![
            json!({
                "title": "Complete project proposal",
                "description": "Draft and submit Q1 project proposal",
                "status": "in_progress",
                "priority": 5
            }),
            json!({
                "title": "Review team feedback",
                "description": "Review and respond to team survey results",
                "status": "pending",
                "priority": 3
            }),
        ],
        _ => {
            let record: Map<String, Value> = schema
                .required_fields()
                .filter(|f| f.field_type == FieldType::String)
                .map(|f| (f.key.clone(), Value::String(format!("Sample {}", f.label))))
                .collect();
            vec![Value::Object(record)]
        }
    }
}

/// Keep only keys the schema declares.
fn restrict_to_schema(schema: &DomainSchema, sample: Value) -> Value {
    match sample {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(key, _)| schema.field(key).is_some())
                .collect(),
        ),
        other => other,
    }
}

/// Insert the domain's samples if the store holds no records.
///
/// # Errors
///
/// Returns `ApiError::Internal` if the store cannot be counted. Individual
/// sample failures are logged and counted in the report instead.
pub async fn seed_if_empty(api: &EntityApi) -> Result<SeedReport, ApiError> {
    let store = api.store();
    let empty = store.is_empty().await.map_err(|err| {
        tracing::error!(domain = store.domain(), error = %err, "could not count records");
        ApiError::Internal
    })?;
    if !empty {
        tracing::debug!(domain = store.domain(), "store not empty, skipping seed");
        return Ok(SeedReport {
            store_was_populated: true,
            ..SeedReport::default()
        });
    }

    let schema = api.describe();
    let mut report = SeedReport::default();
    for sample in samples_for(schema) {
        let body = restrict_to_schema(schema, sample);
        match api.handle(ApiRequest::Create { body }).await {
            Ok(ApiResponse::Created(entity)) => {
                tracing::debug!(domain = store.domain(), id = %entity.id, "seeded sample");
                report.inserted += 1;
            }
            Ok(_) => report.inserted += 1,
            Err(err) => {
                tracing::warn!(domain = store.domain(), error = %err, "could not seed sample");
                report.skipped += 1;
            }
        }
    }

    tracing::info!(
        domain = store.domain(),
        inserted = report.inserted,
        skipped = report.skipped,
        "sample data seeded"
    );
    Ok(report)
}
