//! Generic document store: one collection per domain.
//!
//! Every payload passes the validation engine before it is written. Every
//! persisted change is a single SQL statement, so a failed write never leaves
//! a partial record behind. Mutations of the same id are serialized through
//! [`KeyedLocks`]; reads are lock-free.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use ideate_core::clock::MonotonicClock;
use ideate_core::entity::format_timestamp;
use ideate_core::enums::{Operation, ValidateMode};
use ideate_core::{Entity, FieldMap};
use ideate_schema::LoadedSchema;
use serde_json::Value;

use crate::StoreDb;
use crate::error::StoreError;
use crate::helpers::{SELECT_COLS, parse_datetime, parse_version, row_to_entity};
use crate::locks::KeyedLocks;
use crate::migrations::{collection_ddl, collection_table};

/// Fresh ids drawn before giving up on finding an unused one.
const MAX_ID_ATTEMPTS: usize = 8;

/// Which records `list` returns.
///
/// `archived_only` implies `include_archived`. Both are ignored when the
/// domain has the archive feature disabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub include_archived: bool,
    pub archived_only: bool,
}

impl ListFilter {
    /// Everything, archived or not.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            include_archived: true,
            archived_only: false,
        }
    }

    /// Archived records only.
    #[must_use]
    pub const fn archived() -> Self {
        Self {
            include_archived: true,
            archived_only: true,
        }
    }

    fn where_clause(self, archive_enabled: bool) -> &'static str {
        if !archive_enabled {
            ""
        } else if self.archived_only {
            " WHERE archived = 1"
        } else if self.include_archived {
            ""
        } else {
            " WHERE archived = 0"
        }
    }
}

/// Validated CRUD over one domain's collection.
pub struct DocumentStore {
    db: Arc<StoreDb>,
    schema: Arc<LoadedSchema>,
    table: String,
    version: u64,
    clock: MonotonicClock,
    locks: KeyedLocks,
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("domain", &self.schema.domain())
            .field("table", &self.table)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl DocumentStore {
    /// Provision the domain's collection and register the schema version.
    ///
    /// A descriptor that differs from the last one registered for this domain
    /// gets the next version number; an identical one reuses the current.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Migration` if the collection cannot be created,
    /// or a query error from version registration.
    pub async fn open(db: Arc<StoreDb>, schema: Arc<LoadedSchema>) -> Result<Self, StoreError> {
        let domain = schema.domain().to_string();
        db.conn()
            .execute_batch(&collection_ddl(&domain))
            .await
            .map_err(|e| StoreError::Migration(format!("collection '{domain}': {e}")))?;

        let version = register_version(&db, &schema).await?;
        let store = Self {
            table: collection_table(&domain),
            db,
            schema,
            version,
            clock: MonotonicClock::new(),
            locks: KeyedLocks::new(),
        };
        if let Some(latest) = store.latest_update().await? {
            store.clock.observe(&latest);
        }

        tracing::debug!(domain = %domain, version, "document store ready");
        Ok(store)
    }

    /// The schema this store validates against.
    #[must_use]
    pub fn schema(&self) -> &Arc<LoadedSchema> {
        &self.schema
    }

    /// Domain slug.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.schema.domain()
    }

    /// Persisted schema version stamped on new records.
    #[must_use]
    pub const fn schema_version(&self) -> u64 {
        self.version
    }

    fn ensure(&self, operation: Operation) -> Result<(), StoreError> {
        if self.schema.schema.features.allows(operation) {
            Ok(())
        } else {
            Err(StoreError::feature_disabled(self.domain(), operation))
        }
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Records matching `filter`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails or a row cannot be decoded.
    pub async fn list(&self, filter: ListFilter) -> Result<Vec<Entity>, StoreError> {
        let archive_enabled = self.schema.schema.features.archive;
        let sql = format!(
            r#"SELECT {SELECT_COLS} FROM "{}"{} ORDER BY seq"#,
            self.table,
            filter.where_clause(archive_enabled)
        );
        let mut rows = self.db.conn().query(&sql, ()).await?;

        let mut entities = Vec::new();
        while let Some(row) = rows.next().await? {
            entities.push(self.decode(&row)?);
        }
        Ok(entities)
    }

    /// Fetch one record, archived or not.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no live record has this id.
    pub async fn get(&self, id: &str) -> Result<Entity, StoreError> {
        self.find(id)
            .await?
            .ok_or_else(|| StoreError::not_found(self.domain(), id))
    }

    /// Without the archive feature every record reads as active, including
    /// rows archived while an earlier descriptor had it on.
    fn decode(&self, row: &libsql::Row) -> Result<Entity, StoreError> {
        let mut entity = row_to_entity(row)?;
        entity.archived &= self.schema.schema.features.archive;
        Ok(entity)
    }

    async fn find(&self, id: &str) -> Result<Option<Entity>, StoreError> {
        let mut rows = self
            .db
            .conn()
            .query(
                &format!(r#"SELECT {SELECT_COLS} FROM "{}" WHERE id = ?1"#, self.table),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(self.decode(&row)?)),
            None => Ok(None),
        }
    }

    /// Number of records; archived ones only when `include_archived`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails.
    pub async fn count(&self, include_archived: bool) -> Result<u64, StoreError> {
        let filter = ListFilter {
            include_archived,
            archived_only: false,
        };
        let sql = format!(
            r#"SELECT COUNT(*) FROM "{}"{}"#,
            self.table,
            filter.where_clause(self.schema.schema.features.archive)
        );
        let mut rows = self.db.conn().query(&sql, ()).await?;
        let row = rows.next().await?.ok_or(StoreError::NoResult)?;
        let n = row.get::<i64>(0)?;
        u64::try_from(n).map_err(|_| StoreError::InvalidState(format!("negative count {n}")))
    }

    /// Whether the collection holds no records at all.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails.
    pub async fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.count(true).await? == 0)
    }

    async fn latest_update(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        let mut rows = self
            .db
            .conn()
            .query(
                &format!(r#"SELECT MAX(updated_at) FROM "{}""#, self.table),
                (),
            )
            .await?;
        let Some(row) = rows.next().await? else {
            return Ok(None);
        };
        row.get::<Option<String>>(0)?
            .map(|s| parse_datetime(&s))
            .transpose()
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Validate `payload` in create mode and store a new record.
    ///
    /// # Errors
    ///
    /// Returns `FeatureDisabled` if creation is off, `Validation` with every
    /// violation found, or a store failure.
    pub async fn insert(&self, payload: &Value) -> Result<Entity, StoreError> {
        self.ensure(Operation::Create)?;
        let (fields, _) = ideate_schema::validate(&self.schema.compiled, payload, ValidateMode::Create)
            .into_result()
            .map_err(StoreError::validation)?;

        let id = self.fresh_id().await?;
        let now = self.clock.now();
        let stamp = format_timestamp(&now);

        self.db
            .conn()
            .execute(
                &format!(
                    r#"INSERT INTO "{}" (id, data, archived, created_at, updated_at, schema_version)
                     VALUES (?1, ?2, 0, ?3, ?3, ?4)"#,
                    self.table
                ),
                libsql::params![
                    id.as_str(),
                    serde_json::to_string(&fields)?,
                    stamp,
                    self.version_param()?
                ],
            )
            .await?;

        tracing::info!(domain = self.domain(), id = %id, "entity created");
        Ok(Entity {
            id,
            archived: false,
            created_date: now,
            updated_date: now,
            schema_version: self.version,
            fields,
        })
    }

    /// Validate `patch` in update mode and merge it into an existing record.
    ///
    /// Supplied fields overwrite, `null` clears an optional field, everything
    /// else is kept. `updated_date` always advances.
    ///
    /// # Errors
    ///
    /// Returns `FeatureDisabled` if updates are off, `NotFound` for an
    /// unknown id, `Validation` if the patch is rejected, or a store failure.
    pub async fn update(&self, id: &str, patch: &Value) -> Result<Entity, StoreError> {
        self.ensure(Operation::Update)?;
        let _guard = self.locks.lock(id).await;
        let current = self.get(id).await?;

        let (set, cleared) =
            ideate_schema::validate(&self.schema.compiled, patch, ValidateMode::Update)
                .into_result()
                .map_err(StoreError::validation)?;

        let mut fields = current.fields.clone();
        fields.merge(&set, &cleared);
        let fields = self.in_schema_order(fields);
        let now = self.clock.now();

        let changed = self
            .db
            .conn()
            .execute(
                &format!(
                    r#"UPDATE "{}" SET data = ?1, updated_at = ?2 WHERE id = ?3"#,
                    self.table
                ),
                libsql::params![serde_json::to_string(&fields)?, format_timestamp(&now), id],
            )
            .await?;
        if changed == 0 {
            return Err(StoreError::not_found(self.domain(), id));
        }

        tracing::info!(
            domain = self.domain(),
            id,
            set = set.len(),
            cleared = cleared.len(),
            "entity updated"
        );
        Ok(Entity {
            updated_date: now,
            fields,
            ..current
        })
    }

    /// Mark a record archived. Idempotent; `updated_date` still advances.
    ///
    /// # Errors
    ///
    /// Returns `FeatureDisabled` if the domain has no archive feature,
    /// `NotFound` for an unknown id, or a store failure.
    pub async fn archive(&self, id: &str) -> Result<Entity, StoreError> {
        self.set_archived(id, true, Operation::Archive).await
    }

    /// Clear the archived flag. Idempotent; `updated_date` still advances.
    ///
    /// # Errors
    ///
    /// Same as [`archive`](Self::archive).
    pub async fn restore(&self, id: &str) -> Result<Entity, StoreError> {
        self.set_archived(id, false, Operation::Restore).await
    }

    async fn set_archived(
        &self,
        id: &str,
        archived: bool,
        operation: Operation,
    ) -> Result<Entity, StoreError> {
        self.ensure(operation)?;
        let _guard = self.locks.lock(id).await;
        let current = self.get(id).await?;
        let now = self.clock.now();

        let changed = self
            .db
            .conn()
            .execute(
                &format!(
                    r#"UPDATE "{}" SET archived = ?1, updated_at = ?2 WHERE id = ?3"#,
                    self.table
                ),
                libsql::params![i64::from(archived), format_timestamp(&now), id],
            )
            .await?;
        if changed == 0 {
            return Err(StoreError::not_found(self.domain(), id));
        }

        tracing::info!(domain = self.domain(), id, operation = %operation, "entity {operation}d");
        Ok(Entity {
            archived,
            updated_date: now,
            ..current
        })
    }

    /// Remove a record permanently. Its id is retired and never reissued.
    ///
    /// # Errors
    ///
    /// Returns `FeatureDisabled` if deletion is off, `NotFound` for an
    /// unknown or already deleted id, or a store failure.
    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.ensure(Operation::Delete)?;
        let _guard = self.locks.lock(id).await;

        // The collection's AFTER DELETE trigger records the tombstone in the
        // same statement.
        let changed = self
            .db
            .conn()
            .execute(
                &format!(r#"DELETE FROM "{}" WHERE id = ?1"#, self.table),
                [id],
            )
            .await?;
        if changed == 0 {
            return Err(StoreError::not_found(self.domain(), id));
        }

        tracing::info!(domain = self.domain(), id, "entity deleted");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Draw an id that is neither live nor retired.
    async fn fresh_id(&self) -> Result<String, StoreError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.db.generate_id(self.domain()).await?;
            if !self.id_taken(&id).await? {
                return Ok(id);
            }
            tracing::warn!(domain = self.domain(), id = %id, "generated id collided, drawing again");
        }
        Err(StoreError::InvalidState(format!(
            "no unused id after {MAX_ID_ATTEMPTS} attempts"
        )))
    }

    async fn id_taken(&self, id: &str) -> Result<bool, StoreError> {
        let mut rows = self
            .db
            .conn()
            .query(
                &format!(
                    r#"SELECT EXISTS(SELECT 1 FROM "{}" WHERE id = ?1)
                        OR EXISTS(SELECT 1 FROM ideate_retired_ids WHERE id = ?1)"#,
                    self.table
                ),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(StoreError::NoResult)?;
        Ok(row.get::<i64>(0)? != 0)
    }

    /// Reorder fields to schema order. Keys the schema no longer knows keep
    /// their relative order at the end.
    fn in_schema_order(&self, mut fields: FieldMap) -> FieldMap {
        let mut ordered = FieldMap::new();
        for constraint in self.schema.compiled.iter() {
            if let Some(value) = fields.remove(&constraint.key) {
                ordered.insert(constraint.key.clone(), value);
            }
        }
        for (key, value) in fields.iter() {
            ordered.insert(key, value.clone());
        }
        ordered
    }

    fn version_param(&self) -> Result<i64, StoreError> {
        i64::try_from(self.version)
            .map_err(|_| StoreError::InvalidState(format!("schema version {} too large", self.version)))
    }
}

/// Record the descriptor in the version history and return its version.
async fn register_version(db: &StoreDb, loaded: &LoadedSchema) -> Result<u64, StoreError> {
    let domain = loaded.domain();
    let descriptor = serde_json::to_string(&loaded.schema)?;

    let mut rows = db
        .conn()
        .query(
            "SELECT version, descriptor FROM ideate_schema_versions
             WHERE domain = ?1 ORDER BY version DESC LIMIT 1",
            [domain],
        )
        .await?;
    let latest = match rows.next().await? {
        Some(row) => Some((row.get::<i64>(0)?, row.get::<String>(1)?)),
        None => None,
    };

    let next = match latest {
        Some((version, stored)) if stored == descriptor => return parse_version(version),
        Some((version, _)) => version + 1,
        None => 1,
    };

    db.conn()
        .execute(
            "INSERT INTO ideate_schema_versions (domain, version, descriptor, registered_at)
             VALUES (?1, ?2, ?3, ?4)",
            libsql::params![domain, next, descriptor, format_timestamp(&Utc::now())],
        )
        .await?;
    tracing::info!(domain, version = next, "registered schema version");
    parse_version(next)
}
