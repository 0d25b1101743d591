//! Domain descriptor configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DomainConfig {
    /// Path to the JSON domain descriptor.
    #[serde(default)]
    pub descriptor: String,

    /// Insert sample records when the store is empty at startup.
    #[serde(default)]
    pub seed_sample_data: bool,
}

impl DomainConfig {
    /// Returns `true` if a descriptor path is set.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        !self.descriptor.is_empty()
    }

    /// The descriptor path.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingDescriptor` if no path is set.
    pub fn descriptor_path(&self) -> Result<PathBuf, ConfigError> {
        if self.is_configured() {
            Ok(PathBuf::from(&self.descriptor))
        } else {
            Err(ConfigError::MissingDescriptor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_by_default() {
        let config = DomainConfig::default();
        assert!(!config.is_configured());
        assert!(!config.seed_sample_data);
        assert!(matches!(
            config.descriptor_path(),
            Err(ConfigError::MissingDescriptor)
        ));
    }

    #[test]
    fn descriptor_path_when_set() {
        let config = DomainConfig {
            descriptor: "domains/products.json".into(),
            seed_sample_data: false,
        };
        assert_eq!(
            config.descriptor_path().unwrap(),
            PathBuf::from("domains/products.json")
        );
    }
}
