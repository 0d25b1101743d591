use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use ideate_api::EntityApi;
use ideate_config::IdeateConfig;
use ideate_db::{DocumentStore, StoreDb};
use ideate_schema::{LoadedSchema, SchemaCell};

use crate::cli::GlobalFlags;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub schemas: SchemaCell,
    pub api: Arc<EntityApi>,
    pub db_path: String,
}

impl AppContext {
    /// Load the descriptor, open the store, and seed it when configured to.
    pub async fn init(config: &IdeateConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        let descriptor = resolve_descriptor(config, flags.descriptor.as_deref())?;
        let schemas = SchemaCell::new();
        let schema = schemas
            .get_or_load(|| ideate_schema::load_file(&descriptor))
            .with_context(|| format!("failed to load descriptor {}", descriptor.display()))?;

        let db_path = flags
            .db
            .clone()
            .unwrap_or_else(|| config.store.resolve_path(schema.domain()));
        ensure_parent_dir(&db_path)?;

        let db = StoreDb::open_local(&db_path)
            .await
            .with_context(|| format!("failed to open store at {db_path}"))?;
        let store = DocumentStore::open(Arc::new(db), schema)
            .await
            .context("failed to open document collection")?;
        let api = Arc::new(EntityApi::new(Arc::new(store)));

        if config.domain.seed_sample_data {
            let report = ideate_api::seed::seed_if_empty(&api)
                .await
                .context("failed to seed sample data")?;
            tracing::debug!(
                inserted = report.inserted,
                skipped = report.skipped,
                "startup seed finished"
            );
        }

        Ok(Self {
            schemas,
            api,
            db_path,
        })
    }

    /// The schema active in this process.
    pub fn schema(&self) -> anyhow::Result<Arc<LoadedSchema>> {
        self.schemas
            .current()
            .context("domain schema has not been loaded")
    }
}

/// `--descriptor` wins over `domain.descriptor`.
fn resolve_descriptor(config: &IdeateConfig, flag: Option<&str>) -> anyhow::Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(PathBuf::from(path));
    }
    config.domain.descriptor_path().context(
        "no domain descriptor configured; pass --descriptor or set IDEATE_DOMAIN__DESCRIPTOR",
    )
}

fn ensure_parent_dir(db_path: &str) -> anyhow::Result<()> {
    if db_path == ":memory:" {
        return Ok(());
    }
    if let Some(parent) = Path::new(db_path).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create store directory {}", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use ideate_config::DomainConfig;

    use super::*;

    #[test]
    fn flag_overrides_configured_descriptor() {
        let config = IdeateConfig {
            domain: DomainConfig {
                descriptor: "from-config.json".into(),
                seed_sample_data: false,
            },
            ..IdeateConfig::default()
        };
        let path = resolve_descriptor(&config, Some("from-flag.json")).unwrap();
        assert_eq!(path, PathBuf::from("from-flag.json"));
    }

    #[test]
    fn missing_descriptor_explains_how_to_set_it() {
        let error = resolve_descriptor(&IdeateConfig::default(), None).unwrap_err();
        assert!(format!("{error:#}").contains("--descriptor"));
    }

    #[test]
    fn parent_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested/store/products.db");
        ensure_parent_dir(&db_path.to_string_lossy()).unwrap();
        assert!(dir.path().join("nested/store").is_dir());
    }

    #[tokio::test]
    async fn startup_loads_schema_once_into_the_cell() {
        let dir = tempfile::tempdir().unwrap();
        let descriptor = dir.path().join("notes.json");
        std::fs::write(
            &descriptor,
            r#"{"domain": "notes", "label": "Note", "labelPlural": "Notes",
                "fields": [{"key": "body", "label": "Body", "type": "text"}]}"#,
        )
        .unwrap();
        let flags = GlobalFlags {
            format: crate::cli::OutputFormat::Json,
            color: crate::cli::ColorMode::Never,
            quiet: true,
            descriptor: Some(descriptor.to_string_lossy().into_owned()),
            db: Some(":memory:".into()),
        };

        let ctx = AppContext::init(&IdeateConfig::default(), &flags).await.unwrap();
        let active = ctx.schema().unwrap();
        assert_eq!(active.domain(), "notes");
        assert_eq!(active.generation, 1);
        assert_eq!(ctx.api.describe().domain, "notes");
        assert!(Arc::ptr_eq(&active, &ctx.schema().unwrap()));
    }

    #[test]
    fn memory_store_needs_no_directory() {
        ensure_parent_dir(":memory:").unwrap();
    }
}
