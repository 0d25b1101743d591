//! # ideate-db
//!
//! libSQL-backed generic document store for Ideate domains.
//!
//! One collection per domain slug. Each record keeps its field values as a
//! JSON document plus store-managed columns (archived flag, timestamps,
//! schema version). Deleted ids are retired into a tombstone table and never
//! reissued.
//!
//! Uses the `libsql` crate (C `SQLite` fork, v0.9.29) in local mode.

pub mod error;
pub mod helpers;
pub mod locks;
mod migrations;
pub mod store;

#[cfg(test)]
mod test_support;

use error::StoreError;
use libsql::Builder;

pub use store::{DocumentStore, ListFilter};

/// Database handle shared by every domain store in the process.
pub struct StoreDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl StoreDb {
    /// Open a local database at the given path (`:memory:` for a throwaway one).
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, StoreError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        let store_db = Self { db, conn };
        store_db.run_migrations().await?;
        tracing::debug!(path, "store database opened");
        Ok(store_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed id via libSQL, e.g. `"products-3f9a…"`.
    ///
    /// Uses `randomblob(16)` for 128 random bits rendered as 32 hex chars.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, StoreError> {
        let mut rows = self
            .conn
            .query("SELECT ?1 || '-' || lower(hex(randomblob(16)))", [prefix])
            .await?;
        let row = rows.next().await?.ok_or(StoreError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn test_db() -> StoreDb {
        StoreDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_bookkeeping_tables() {
        let db = test_db().await;

        for table in ["ideate_schema_versions", "ideate_retired_ids"] {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn generate_id_format() {
        let db = test_db().await;
        let id = db.generate_id("products").await.unwrap();

        let hex = id.strip_prefix("products-").expect("prefix kept");
        assert_eq!(hex.len(), 32);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[tokio::test]
    async fn generate_id_unique() {
        let db = test_db().await;
        let mut ids = HashSet::new();
        for _ in 0..200 {
            assert!(ids.insert(db.generate_id("t").await.unwrap()));
        }
    }
}
