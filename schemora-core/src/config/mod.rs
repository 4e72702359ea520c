//! Configuration for Schemora
//!
//! Values are resolved in the following order (highest priority wins):
//!
//! 1. **Code** - builder methods on [`ExtractOptions`](crate::schema::ExtractOptions)
//! 2. **Environment Variables** - `SCHEMORA_*`
//! 3. **Config File** - `schemora.toml`, `[extract]` table
//! 4. **Defaults**
//!
//! # Example
//!
//! ```no_run
//! use schemora_core::config::SchemoraConfig;
//!
//! let config = SchemoraConfig::load()?;
//! config.validate()?;
//! let options = config.extract.into_options();
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod extract;

pub use extract::ExtractConfig;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name, resolved against the working directory
pub const DEFAULT_CONFIG_FILE: &str = "schemora.toml";

/// Complete Schemora configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemoraConfig {
    pub extract: ExtractConfig,
}

impl SchemoraConfig {
    /// Load configuration with full supersedence chain
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load configuration from a specific file; a missing file means defaults
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut config = Self::default();

        if path.exists() {
            let file_config = Self::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            config.merge(file_config);
            log::debug!("Loaded schemora config from {}", path.display());
        }

        config.apply_env_vars();

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.as_ref().display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Self) {
        self.extract.merge(other.extract);
    }

    pub fn apply_env_vars(&mut self) {
        self.extract.apply_env_vars();
    }

    pub fn validate(&self) -> Result<()> {
        self.extract.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = SchemoraConfig::default();
        assert_eq!(config.extract.tag_priority, vec!["json", "bun", "crud"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[extract]\norm_namespace = \"gorm\"\ninclude_type_metadata = true").unwrap();

        let config = SchemoraConfig::from_file(file.path()).unwrap();
        assert_eq!(config.extract.orm_namespace, "gorm");
        assert!(config.extract.include_type_metadata);
        assert_eq!(config.extract.local_namespace, "crud");
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[extract\nbroken").unwrap();

        let err = SchemoraConfig::from_file(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse TOML config"));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SchemoraConfig::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.extract.orm_namespace, "bun");
        assert!(!config.extract.include_original_types);
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schemora.toml");
        std::fs::write(&path, "[extract]\ntag_priority = [\"json\"]\nskip_anonymous_fields = true\n")
            .unwrap();

        std::env::set_var("SCHEMORA_TAG_PRIORITY", "crud, json");
        std::env::set_var("SCHEMORA_SKIP_ANONYMOUS", "false");
        let config = SchemoraConfig::load_from(&path);
        std::env::remove_var("SCHEMORA_TAG_PRIORITY");
        std::env::remove_var("SCHEMORA_SKIP_ANONYMOUS");

        let config = config.unwrap();
        assert_eq!(config.extract.tag_priority, vec!["crud", "json"]);
        assert!(!config.extract.skip_anonymous_fields);
    }
}
