//! Shared test utilities for ideate-db tests.

pub(crate) mod helpers {
    use std::sync::Arc;

    use ideate_schema::LoadedSchema;
    use serde_json::{Value, json};

    use crate::{DocumentStore, StoreDb};

    /// Load and compile a descriptor literal.
    pub fn schema_from(descriptor: Value) -> Arc<LoadedSchema> {
        let schema = ideate_schema::load(&descriptor).unwrap();
        Arc::new(LoadedSchema::new(schema, 1).unwrap())
    }

    /// Products: required name and non-negative price, optional sku,
    /// `in_stock` defaulting to true, archive enabled.
    pub fn products_schema() -> Arc<LoadedSchema> {
        schema_from(json!({
            "domain": "products",
            "label": "Product",
            "labelPlural": "Products",
            "features": {"archive": true},
            "fields": [
                {"key": "name", "label": "Name", "type": "string", "required": true},
                {"key": "price", "label": "Price", "type": "number", "required": true, "min": 0},
                {"key": "sku", "label": "SKU", "type": "string"},
                {"key": "in_stock", "label": "In Stock", "type": "boolean", "default": true}
            ]
        }))
    }

    /// Open an in-memory database and a store for `schema` on it.
    pub async fn open_store(schema: Arc<LoadedSchema>) -> (Arc<StoreDb>, DocumentStore) {
        let db = Arc::new(StoreDb::open_local(":memory:").await.unwrap());
        let store = DocumentStore::open(Arc::clone(&db), schema).await.unwrap();
        (db, store)
    }
}
