//! Field policy
//!
//! Decides whether a field participates in a schema and which property key
//! it ends up under. Rules apply in order:
//!
//! 1. an ORM-namespace value of `-` excludes the field;
//! 2. unexported fields are excluded when `skip_unexported_fields` is set;
//! 3. embedded fields are excluded when `skip_anonymous_fields` is set
//!    (their own fields are never promoted);
//! 4. a custom field filter, when configured, replaces the verdict of 1-3;
//! 5. a winning name value of `-` excludes the field.

use super::options::ExtractOptions;
use super::tags::{self, ResolvedName, SKIP_MARKER};
use crate::introspect::FieldInfo;
use std::fmt;

/// Why a field was left out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    OrmExcluded,
    Unexported,
    Anonymous,
    Filtered,
    SkipMarker,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Exclusion::OrmExcluded => "excluded in ORM namespace",
            Exclusion::Unexported => "unexported",
            Exclusion::Anonymous => "embedded",
            Exclusion::Filtered => "rejected by field filter",
            Exclusion::SkipMarker => "skip marker",
        };
        f.write_str(reason)
    }
}

/// Policy decision for one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldVerdict {
    pub excluded: Option<Exclusion>,
    pub resolved: ResolvedName,
    /// Property key after the name transformer
    pub key: String,
}

impl FieldVerdict {
    pub fn participates(&self) -> bool {
        self.excluded.is_none()
    }
}

fn structural_exclusion(field: &FieldInfo, options: &ExtractOptions) -> Option<Exclusion> {
    if field.tags.get(&options.orm_namespace).map(str::trim) == Some(SKIP_MARKER) {
        return Some(Exclusion::OrmExcluded);
    }
    if options.skip_unexported_fields && !field.exported {
        return Some(Exclusion::Unexported);
    }
    if options.skip_anonymous_fields && field.anonymous {
        return Some(Exclusion::Anonymous);
    }
    None
}

/// Evaluate the policy for `field`
pub fn evaluate(field: &FieldInfo, options: &ExtractOptions) -> FieldVerdict {
    let mut excluded = structural_exclusion(field, options);

    if let Some(filter) = &options.custom_field_filter {
        excluded = if filter(field) { None } else { Some(Exclusion::Filtered) };
    }

    let resolved =
        tags::resolve_name(&field.name, &field.tags, &options.tag_priority, &options.orm_namespace);
    if excluded.is_none() && resolved.skip {
        excluded = Some(Exclusion::SkipMarker);
    }

    let key = options.transform_name(&resolved.raw);
    FieldVerdict { excluded, resolved, key }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::Introspect;

    fn field(name: &str) -> FieldInfo {
        FieldInfo::new(name, String::type_info())
    }

    #[test]
    fn test_orm_exclusion() {
        let verdict = evaluate(&field("Cache").with_tag("bun", "-"), &ExtractOptions::default());
        assert_eq!(verdict.excluded, Some(Exclusion::OrmExcluded));
    }

    #[test]
    fn test_visibility_rules_follow_options() {
        let private = field("secret").with_exported(false);
        let embedded = field("Base").with_anonymous(true);
        let defaults = ExtractOptions::default();

        assert_eq!(evaluate(&private, &defaults).excluded, Some(Exclusion::Unexported));
        assert_eq!(evaluate(&embedded, &defaults).excluded, Some(Exclusion::Anonymous));

        let relaxed = ExtractOptions::default().skip_unexported(false).skip_anonymous(false);
        assert!(evaluate(&private, &relaxed).participates());
        assert!(evaluate(&embedded, &relaxed).participates());
    }

    #[test]
    fn test_filter_overrides_structural_rules() {
        let private = field("secret").with_exported(false).with_tag("bun", "-");
        let options = ExtractOptions::default().with_field_filter(|f: &FieldInfo| f.name == "secret");
        assert!(evaluate(&private, &options).participates());

        let options = ExtractOptions::default().with_field_filter(|_: &FieldInfo| false);
        assert_eq!(evaluate(&field("Name"), &options).excluded, Some(Exclusion::Filtered));
    }

    #[test]
    fn test_skip_marker_applies_after_filter() {
        let skipped = field("Password").with_tag("json", "-");
        let options = ExtractOptions::default().with_field_filter(|_: &FieldInfo| true);
        assert_eq!(evaluate(&skipped, &options).excluded, Some(Exclusion::SkipMarker));
    }

    #[test]
    fn test_skip_marker_only_counts_when_winning() {
        let f = field("Password").with_tag("json", "password").with_tag("crud", "-");
        assert!(evaluate(&f, &ExtractOptions::default()).participates());
    }

    #[test]
    fn test_colon_in_json_name_is_kept() {
        let verdict = evaluate(&field("Urn").with_tag("json", "urn:id"), &ExtractOptions::default());
        assert!(verdict.participates());
        assert_eq!(verdict.key, "urn:id");
    }

    #[test]
    fn test_key_uses_transformer() {
        let options = ExtractOptions::default().with_name_transformer(|n: &str| n.to_uppercase());
        let verdict = evaluate(&field("Name").with_tag("json", "name"), &options);
        assert_eq!(verdict.resolved.raw, "name");
        assert_eq!(verdict.key, "NAME");
    }
}
