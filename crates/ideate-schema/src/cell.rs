//! Holder for the active schema of one domain.
//!
//! There is no process-wide instance: callers construct a `SchemaCell` and
//! hand out `Arc<LoadedSchema>` snapshots. A snapshot never changes, so a
//! component keeps the schema it was built with until it is rebuilt.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use ideate_core::DomainSchema;

use crate::constraint::{self, CompiledSchema};
use crate::error::SchemaError;

/// A schema together with its compiled constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSchema {
    pub schema: DomainSchema,
    pub compiled: CompiledSchema,
    /// Cell generation, starting at 1 and bumped on every reload.
    pub generation: u64,
}

impl LoadedSchema {
    /// Compile a schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::InvalidDefault` if a default fails its field rule.
    pub fn new(schema: DomainSchema, generation: u64) -> Result<Self, SchemaError> {
        let compiled = constraint::compile(&schema)?;
        Ok(Self {
            schema,
            compiled,
            generation,
        })
    }

    /// Domain slug.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.schema.domain
    }
}

/// First-success-wins holder with operator-triggered reload.
#[derive(Debug, Default)]
pub struct SchemaCell {
    init: Mutex<()>,
    current: RwLock<Option<Arc<LoadedSchema>>>,
}

impl SchemaCell {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            init: Mutex::new(()),
            current: RwLock::new(None),
        }
    }

    /// The active schema, if one has loaded.
    #[must_use]
    pub fn current(&self) -> Option<Arc<LoadedSchema>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Return the active schema, loading it on first use.
    ///
    /// Concurrent first calls are serialized; only one runs `loader`. A failed
    /// load leaves the cell empty so a later call can retry.
    ///
    /// # Errors
    ///
    /// Returns whatever `loader` or compilation returns.
    pub fn get_or_load<F>(&self, loader: F) -> Result<Arc<LoadedSchema>, SchemaError>
    where
        F: FnOnce() -> Result<DomainSchema, SchemaError>,
    {
        if let Some(loaded) = self.current() {
            return Ok(loaded);
        }

        let _guard = self.init.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(loaded) = self.current() {
            return Ok(loaded);
        }

        let loaded = Arc::new(LoadedSchema::new(loader()?, 1)?);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&loaded));
        tracing::info!(domain = %loaded.domain(), "schema loaded");
        Ok(loaded)
    }

    /// Replace the active schema.
    ///
    /// The domain slug may not change. In-flight requests keep their snapshot.
    ///
    /// # Errors
    ///
    /// Returns the loader's error, `SchemaError::DomainChanged`, or a compile
    /// error. On error the previous schema stays active.
    pub fn reload<F>(&self, loader: F) -> Result<Arc<LoadedSchema>, SchemaError>
    where
        F: FnOnce() -> Result<DomainSchema, SchemaError>,
    {
        let _guard = self.init.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = self.current();
        let schema = loader()?;

        if let Some(prev) = &previous
            && prev.schema.domain != schema.domain
        {
            tracing::warn!(
                from = %prev.schema.domain,
                to = %schema.domain,
                "rejected schema reload"
            );
            return Err(SchemaError::DomainChanged {
                from: prev.schema.domain.clone(),
                to: schema.domain,
            });
        }

        let generation = previous.map_or(1, |p| p.generation + 1);
        let loaded = Arc::new(LoadedSchema::new(schema, generation)?);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&loaded));
        tracing::info!(domain = %loaded.domain(), generation, "schema reloaded");
        Ok(loaded)
    }
}
