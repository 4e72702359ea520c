//! Extraction configuration

use crate::schema::options::ExtractOptions;
use crate::schema::tags::default_tag_priority;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::path::Path;

/// Serializable subset of [`ExtractOptions`]
///
/// Closures (name transformer, field filter, type mapper, tag handlers) and
/// special-type overrides can only be set in code, on the options returned by
/// [`ExtractConfig::into_options`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Namespaces consulted for display names, in order
    /// Env: SCHEMORA_TAG_PRIORITY (comma-separated)
    /// Default: ["json", "bun", "crud"]
    pub tag_priority: Vec<String>,

    /// Namespace holding ORM modifiers and relation declarations
    /// Default: "bun"
    pub orm_namespace: String,

    /// Namespace holding `readonly` / `writeonly`
    /// Default: "crud"
    pub local_namespace: String,

    /// Env: SCHEMORA_SKIP_UNEXPORTED
    /// Default: true
    pub skip_unexported_fields: bool,

    /// Env: SCHEMORA_SKIP_ANONYMOUS
    /// Default: true
    pub skip_anonymous_fields: bool,

    // Env: SCHEMORA_INCLUDE_METADATA sets all four
    pub include_original_names: bool,
    pub include_original_types: bool,
    pub include_tag_metadata: bool,
    pub include_type_metadata: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            tag_priority: default_tag_priority(),
            orm_namespace: "bun".to_string(),
            local_namespace: "crud".to_string(),
            skip_unexported_fields: true,
            skip_anonymous_fields: true,
            include_original_names: false,
            include_original_types: false,
            include_tag_metadata: false,
            include_type_metadata: false,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl ExtractConfig {
    /// Load from `schemora.toml` (if present) and the environment
    pub fn load() -> Result<Self> {
        Ok(super::SchemoraConfig::load()?.extract)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Ok(super::SchemoraConfig::load_from(path)?.extract)
    }

    /// Parse a bare extraction table (no `[extract]` header)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    /// Apply environment variables
    pub fn apply_env_vars(&mut self) {
        if let Ok(priority) = env::var("SCHEMORA_TAG_PRIORITY") {
            self.tag_priority = priority
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Some(skip) = env::var("SCHEMORA_SKIP_UNEXPORTED").ok().and_then(|v| parse_flag(&v)) {
            self.skip_unexported_fields = skip;
        }

        if let Some(skip) = env::var("SCHEMORA_SKIP_ANONYMOUS").ok().and_then(|v| parse_flag(&v)) {
            self.skip_anonymous_fields = skip;
        }

        if let Some(include) = env::var("SCHEMORA_INCLUDE_METADATA").ok().and_then(|v| parse_flag(&v))
        {
            self.include_original_names = include;
            self.include_original_types = include;
            self.include_tag_metadata = include;
            self.include_type_metadata = include;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.orm_namespace.trim().is_empty() {
            bail!("Invalid orm_namespace: namespace cannot be empty");
        }

        if self.local_namespace.trim().is_empty() {
            bail!("Invalid local_namespace: namespace cannot be empty");
        }

        let mut seen = HashSet::new();
        for namespace in &self.tag_priority {
            if namespace.trim().is_empty() {
                bail!("Invalid tag_priority: namespace cannot be empty");
            }
            if !seen.insert(namespace.as_str()) {
                bail!("Invalid tag_priority: '{}' is listed more than once", namespace);
            }
        }

        Ok(())
    }

    /// Build extraction options; closures stay unset
    pub fn into_options(self) -> ExtractOptions {
        ExtractOptions::default()
            .with_tag_priority(self.tag_priority)
            .with_orm_namespace(self.orm_namespace)
            .with_local_namespace(self.local_namespace)
            .skip_unexported(self.skip_unexported_fields)
            .skip_anonymous(self.skip_anonymous_fields)
            .include_original_names(self.include_original_names)
            .include_original_types(self.include_original_types)
            .include_tag_metadata(self.include_tag_metadata)
            .include_type_metadata(self.include_type_metadata)
    }
}
