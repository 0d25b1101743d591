//! Shared test utilities for ideate-api tests.

pub(crate) mod helpers {
    use std::sync::Arc;

    use ideate_db::{DocumentStore, StoreDb};
    use ideate_schema::LoadedSchema;
    use serde_json::{Value, json};

    use crate::surface::EntityApi;

    /// The products domain: name, price 0..100000, stock >= 0, archive on.
    pub fn products_descriptor() -> Value {
        json!({
            "domain": "products",
            "label": "Product",
            "labelPlural": "Products",
            "features": {"archive": true},
            "fields": [
                {"key": "name", "label": "Name", "type": "string", "required": true},
                {"key": "description", "label": "Description", "type": "text"},
                {"key": "price", "label": "Price", "type": "number", "required": true, "min": 0, "max": 100000},
                {"key": "stock", "label": "Stock", "type": "number", "min": 0}
            ]
        })
    }

    /// An `EntityApi` over a fresh in-memory store for `descriptor`.
    pub async fn api_for(descriptor: Value) -> EntityApi {
        let schema = ideate_schema::load(&descriptor).unwrap();
        let loaded = Arc::new(LoadedSchema::new(schema, 1).unwrap());
        let db = Arc::new(StoreDb::open_local(":memory:").await.unwrap());
        let store = DocumentStore::open(db, loaded).await.unwrap();
        EntityApi::new(Arc::new(store))
    }
}
