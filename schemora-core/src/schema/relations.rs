//! Relation detection from ORM annotations
//!
//! Relations are declared in the ORM namespace:
//!
//! - `rel:has-one`, `rel:has-many`, `rel:belongs-to`
//! - `m2m:<pivot_table>` (or `rel:m2m` / `rel:many-to-many`)
//! - an optional `join:<expr>` suffix
//!
//! The related type is taken from the field type: the element type for
//! sequence fields, the pointer-unwrapped type otherwise.

use crate::introspect::{FieldInfo, TypeInfo};
use serde::{Deserialize, Serialize};
use std::fmt;

const REL_PREFIX: &str = "rel:";
const M2M_PREFIX: &str = "m2m:";
const JOIN_MARKER: &str = "join:";

/// Supported relation types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationType {
    HasOne,
    HasMany,
    BelongsTo,
    ManyToMany,
}

impl RelationType {
    /// Map a declaration keyword to a relation type
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.trim() {
            "has-one" => Some(RelationType::HasOne),
            "has-many" => Some(RelationType::HasMany),
            "belongs-to" => Some(RelationType::BelongsTo),
            "m2m" | "many-to-many" => Some(RelationType::ManyToMany),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::HasOne => "has-one",
            RelationType::HasMany => "has-many",
            RelationType::BelongsTo => "belongs-to",
            RelationType::ManyToMany => "many-to-many",
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One relation edge of a record schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipInfo {
    pub relation_type: RelationType,
    pub related_type_name: String,
    pub is_slice: bool,
    /// Pivot table, many-to-many only
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pivot_table: String,
    /// Pivot join expression, many-to-many only
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pivot_join: String,
}

/// Parsed relation declaration, before the field type is consulted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDeclaration {
    pub relation_type: RelationType,
    pub pivot_table: String,
    pub pivot_join: String,
}

/// Parse a raw ORM annotation into a relation declaration
///
/// Returns `None` for plain column annotations such as `",notnull"`.
pub fn parse_relation_tag(raw: &str) -> Option<RelationDeclaration> {
    // The first segment opening with `join:` starts the join expression,
    // which runs to the end of the value, commas and `=` included
    let mut declaration = raw;
    let mut join = "";
    let mut offset = 0;
    for segment in raw.split(',') {
        if let Some(expr) = segment.trim_start().strip_prefix(JOIN_MARKER) {
            declaration = &raw[..offset];
            let start = offset + segment.len() - expr.len();
            join = raw[start..].trim();
            break;
        }
        offset += segment.len() + 1;
    }

    let mut relation_type = None;
    let mut pivot_table = None;
    for segment in declaration.split(',').map(str::trim) {
        if let Some(keyword) = segment.strip_prefix(REL_PREFIX) {
            relation_type = RelationType::from_keyword(keyword).or(relation_type);
        } else if let Some(table) = segment.strip_prefix(M2M_PREFIX) {
            relation_type = Some(RelationType::ManyToMany);
            pivot_table = Some(table.trim().to_string());
        }
    }

    let relation_type = relation_type?;
    let (pivot_table, pivot_join) = if relation_type == RelationType::ManyToMany {
        (pivot_table.unwrap_or_default(), join.to_string())
    } else {
        (String::new(), String::new())
    };

    Some(RelationDeclaration { relation_type, pivot_table, pivot_join })
}

/// Type a relation field points at
pub fn related_type(ty: &TypeInfo) -> &TypeInfo {
    let ty = ty.deref_pointers();
    match ty.element() {
        Some(elem) => elem.deref_pointers(),
        None => ty,
    }
}

/// Detect a relation declared on `field` in the ORM namespace
pub fn detect_relationship(field: &FieldInfo, orm_namespace: &str) -> Option<RelationshipInfo> {
    let raw = field.tags.get(orm_namespace)?;
    let declaration = parse_relation_tag(raw)?;

    Some(RelationshipInfo {
        relation_type: declaration.relation_type,
        related_type_name: related_type(&field.ty).name().to_string(),
        is_slice: field.ty.deref_pointers().is_sequence(),
        pivot_table: declaration.pivot_table,
        pivot_join: declaration.pivot_join,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::Introspect;

    fn book_fields() -> Vec<FieldInfo> {
        Vec::new()
    }

    struct Book;

    impl Introspect for Book {
        fn type_info() -> TypeInfo {
            TypeInfo::record("Book", "library", book_fields)
        }
    }

    #[test]
    fn test_relation_keywords() {
        assert_eq!(
            parse_relation_tag("rel:has-one,join:id=profile_id").map(|d| d.relation_type),
            Some(RelationType::HasOne)
        );
        assert_eq!(
            parse_relation_tag("rel:has-many").map(|d| d.relation_type),
            Some(RelationType::HasMany)
        );
        assert_eq!(
            parse_relation_tag("rel:belongs-to,join:author_id=id").map(|d| d.relation_type),
            Some(RelationType::BelongsTo)
        );
        assert_eq!(
            parse_relation_tag("rel:many-to-many").map(|d| d.relation_type),
            Some(RelationType::ManyToMany)
        );
        assert!(parse_relation_tag(",notnull").is_none());
        assert!(parse_relation_tag("rel:unknown").is_none());
    }

    #[test]
    fn test_pivot_without_join() {
        let decl = parse_relation_tag("m2m:pivotname").unwrap();
        assert_eq!(decl.relation_type, RelationType::ManyToMany);
        assert_eq!(decl.pivot_table, "pivotname");
        assert_eq!(decl.pivot_join, "");
    }

    #[test]
    fn test_pivot_with_join_keeps_expression_verbatim() {
        let decl = parse_relation_tag("m2m:pivotname,join:a=b").unwrap();
        assert_eq!(decl.pivot_table, "pivotname");
        assert_eq!(decl.pivot_join, "a=b");

        let decl = parse_relation_tag("m2m:book_tags,join:Book=Tag").unwrap();
        assert_eq!(decl.pivot_join, "Book=Tag");

        let decl = parse_relation_tag("m2m:links, join:a=b,c=d").unwrap();
        assert_eq!(decl.pivot_table, "links");
        assert_eq!(decl.pivot_join, "a=b,c=d");
    }

    #[test]
    fn test_join_only_at_segment_start() {
        let decl = parse_relation_tag("m2m:rejoin:x").unwrap();
        assert_eq!(decl.pivot_table, "rejoin:x");
        assert!(decl.pivot_join.is_empty());

        let decl = parse_relation_tag("m2m:rejoin,join:a=b").unwrap();
        assert_eq!(decl.pivot_table, "rejoin");
        assert_eq!(decl.pivot_join, "a=b");
    }

    #[test]
    fn test_non_m2m_has_no_pivot() {
        let decl = parse_relation_tag("rel:has-many,join:id=author_id").unwrap();
        assert!(decl.pivot_table.is_empty());
        assert!(decl.pivot_join.is_empty());
    }

    #[test]
    fn test_detect_uses_element_type() {
        let field = FieldInfo::new("books", Vec::<Book>::type_info())
            .with_tag("bun", "rel:has-many,join:id=author_id");
        let info = detect_relationship(&field, "bun").unwrap();
        assert_eq!(info.related_type_name, "Book");
        assert!(info.is_slice);

        let field = FieldInfo::new("book", Option::<Box<Book>>::type_info())
            .with_tag("bun", "rel:belongs-to");
        let info = detect_relationship(&field, "bun").unwrap();
        assert_eq!(info.related_type_name, "Book");
        assert!(!info.is_slice);
    }

    #[test]
    fn test_detect_ignores_other_namespaces() {
        let field = FieldInfo::new("books", Vec::<Book>::type_info()).with_tag("json", "rel:has-many");
        assert!(detect_relationship(&field, "bun").is_none());
    }
}
