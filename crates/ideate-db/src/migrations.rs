//! Database migration runner and collection provisioning.
//!
//! Embeds the SQL migration files at compile time and executes them on
//! database open. All statements use `IF NOT EXISTS` for idempotent re-running.

use crate::StoreDb;
use crate::error::StoreError;

/// Shared tables: schema version history, retired ids.
const MIGRATION_001: &str = include_str!("../migrations/001_initial.sql");

impl StoreDb {
    /// Run all embedded migrations in sequence.
    pub(crate) async fn run_migrations(&self) -> Result<(), StoreError> {
        self.conn
            .execute_batch(MIGRATION_001)
            .await
            .map_err(|e| StoreError::Migration(format!("001_initial: {e}")))?;
        Ok(())
    }
}

/// Table name of a domain's collection. The slug is already URL-safe.
pub(crate) fn collection_table(domain: &str) -> String {
    format!("doc_{domain}")
}

/// DDL for one domain collection: table, insertion-order index, and the
/// trigger that retires ids on delete.
///
/// `seq` gives stable oldest-first ordering independent of clock resolution.
pub(crate) fn collection_ddl(domain: &str) -> String {
    let table = collection_table(domain);
    format!(
        r#"
CREATE TABLE IF NOT EXISTS "{table}" (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    data TEXT NOT NULL,
    archived INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    schema_version INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS "idx_{table}_archived" ON "{table}"(archived, seq);

CREATE TRIGGER IF NOT EXISTS "trg_{table}_retire" AFTER DELETE ON "{table}" BEGIN
    INSERT OR IGNORE INTO ideate_retired_ids (id, domain, retired_at)
    VALUES (old.id, '{domain}', strftime('%Y-%m-%dT%H:%M:%fZ', 'now'));
END;
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_table_is_prefixed() {
        assert_eq!(collection_table("line-items"), "doc_line-items");
    }

    #[test]
    fn ddl_quotes_identifiers() {
        let ddl = collection_ddl("line-items");
        assert!(ddl.contains(r#"CREATE TABLE IF NOT EXISTS "doc_line-items""#));
        assert!(ddl.contains("AFTER DELETE"));
    }
}
