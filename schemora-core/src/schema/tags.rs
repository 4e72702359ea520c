//! Tag reading
//!
//! A field carries raw annotation strings keyed by namespace (`json`, `bun`,
//! `crud`, `validate`, ...). Each raw value is a comma-separated list whose
//! first segment is a name and whose remaining segments are modifiers.
//! The effective name comes from the first namespace in the priority list
//! that is present on the field.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Literal that excludes a field when it is the whole winning value
pub const SKIP_MARKER: &str = "-";
/// Modifier that makes a property optional
pub const OMIT_EMPTY: &str = "omitempty";
/// ORM modifier that makes a property required
pub const NOT_NULL: &str = "notnull";
/// Local-namespace modifiers
pub const READ_ONLY: &str = "readonly";
pub const WRITE_ONLY: &str = "writeonly";

/// Data-interchange, ORM and local namespaces, in that order
pub fn default_tag_priority() -> Vec<String> {
    vec!["json".to_string(), "bun".to_string(), "crud".to_string()]
}

/// Namespace → raw annotation map of one field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(BTreeMap<String, String>);

impl Tags {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, namespace: impl Into<String>, raw: impl Into<String>) {
        self.0.insert(namespace.into(), raw.into());
    }

    pub fn with(mut self, namespace: impl Into<String>, raw: impl Into<String>) -> Self {
        self.insert(namespace, raw);
        self
    }

    pub fn get(&self, namespace: &str) -> Option<&str> {
        self.0.get(namespace).map(String::as_str)
    }

    pub fn contains(&self, namespace: &str) -> bool {
        self.0.contains_key(namespace)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if any segment of the namespace's value equals `modifier`
    pub fn has_modifier(&self, namespace: &str, modifier: &str) -> bool {
        self.get(namespace)
            .map(|raw| raw.split(',').any(|segment| segment.trim() == modifier))
            .unwrap_or(false)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Outcome of walking the priority list for one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    /// Display name before any transformer runs
    pub raw: String,
    /// The winning value carries `omitempty`
    pub omit_empty: bool,
    /// The winning value is the skip marker
    pub skip: bool,
    /// Namespace that supplied the name, `None` on fallback
    pub source: Option<String>,
}

/// Resolve the display name and omit flag for a field
///
/// The first namespace of `priority` present in `tags` wins, even when its
/// value is empty. An empty name segment falls back to the field
/// identifier, as does a `key:value` option such as `rel:has-many` when the
/// ORM namespace wins. Other namespaces keep colons in names.
pub fn resolve_name(
    field_name: &str,
    tags: &Tags,
    priority: &[String],
    orm_namespace: &str,
) -> ResolvedName {
    for namespace in priority {
        let Some(raw) = tags.get(namespace) else {
            continue;
        };

        let mut segments = raw.split(',');
        let first = segments.next().unwrap_or("").trim();
        let omit_empty = segments.any(|segment| segment.trim() == OMIT_EMPTY);
        let skip = raw.trim() == SKIP_MARKER;

        let orm_option = namespace == orm_namespace && first.contains(':');
        let raw_name = if first.is_empty() || orm_option {
            field_name.to_string()
        } else {
            first.to_string()
        };

        return ResolvedName { raw: raw_name, omit_empty, skip, source: Some(namespace.clone()) };
    }

    ResolvedName { raw: field_name.to_string(), omit_empty: false, skip: false, source: None }
}

/// A field is required when the ORM namespace declares `notnull` and the
/// winning namespace carries no `omitempty`
pub fn is_required(tags: &Tags, orm_namespace: &str, resolved: &ResolvedName) -> bool {
    !resolved.omit_empty && tags.has_modifier(orm_namespace, NOT_NULL)
}
