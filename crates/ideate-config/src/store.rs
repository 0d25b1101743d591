//! Document store configuration.

use serde::{Deserialize, Serialize};

/// Directory used for per-domain database files when no path is set.
const DEFAULT_STORE_DIR: &str = ".ideate";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StoreConfig {
    /// libSQL database path. `":memory:"` keeps everything in process.
    /// Empty means `.ideate/{domain}.db`.
    #[serde(default)]
    pub path: String,
}

impl StoreConfig {
    /// Database path for a domain.
    #[must_use]
    pub fn resolve_path(&self, domain: &str) -> String {
        if self.path.is_empty() {
            format!("{DEFAULT_STORE_DIR}/{domain}.db")
        } else {
            self.path.clone()
        }
    }

    /// Whether the store lives only in memory.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_is_per_domain() {
        let config = StoreConfig::default();
        assert_eq!(config.resolve_path("products"), ".ideate/products.db");
        assert!(!config.is_in_memory());
    }

    #[test]
    fn explicit_path_wins() {
        let config = StoreConfig {
            path: ":memory:".into(),
        };
        assert_eq!(config.resolve_path("products"), ":memory:");
        assert!(config.is_in_memory());
    }
}
