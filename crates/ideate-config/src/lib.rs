//! # ideate-config
//!
//! Layered configuration loading for Ideate using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`IDEATE_*` prefix, `__` as separator)
//! 2. `DOMAIN_CONFIG` (descriptor path, kept for older deployments)
//! 3. Project-level `.ideate/config.toml`
//! 4. User-level `~/.config/ideate/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `IDEATE_DOMAIN__DESCRIPTOR` -> `domain.descriptor`,
//! `IDEATE_STORE__PATH` -> `store.path`, etc. The `__` (double underscore)
//! separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use ideate_config::IdeateConfig;
//!
//! let config = IdeateConfig::load_with_dotenv().expect("config");
//! if config.domain.is_configured() {
//!     println!("descriptor: {}", config.domain.descriptor);
//! }
//! ```

mod domain;
mod error;
mod general;
mod store;

pub use domain::DomainConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use store::StoreConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming the descriptor file, read as `domain.descriptor`.
pub const LEGACY_DESCRIPTOR_ENV: &str = "DOMAIN_CONFIG";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct IdeateConfig {
    #[serde(default)]
    pub domain: DomainConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl IdeateConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source fails to parse, or
    /// `ConfigError::InvalidValue` if a value is out of its allowed set.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.general.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Loads `.env` from the current directory (if present) before building
    /// the figment. This is the typical entry point for the CLI.
    ///
    /// # Errors
    ///
    /// As [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".ideate/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Legacy descriptor variable
        figment = figment.merge(
            Env::raw()
                .only(&[LEGACY_DESCRIPTOR_ENV])
                .map(|_| "domain.descriptor".into()),
        );

        // Layer 4: Environment variables (highest priority)
        figment.merge(Env::prefixed("IDEATE_").split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ideate").join("config.toml"))
    }
}
