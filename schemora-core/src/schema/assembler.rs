//! Schema assembly
//!
//! Iterates a record's fields once and runs each through the field policy,
//! tag reader, classifier, relation detector and metadata enricher.

use super::classify;
use super::error::SchemaError;
use super::metadata;
use super::options::ExtractOptions;
use super::policy;
use super::property::{PropertyInfo, SchemaMetadata, TagValue};
use super::relations;
use super::tags::{self, READ_ONLY, WRITE_ONLY};
use crate::introspect::{FieldInfo, Introspect, TypeInfo};
use std::collections::HashMap;

/// Namespace whose raw value becomes the property example
pub const EXAMPLE_NAMESPACE: &str = "example";

/// Extracts [`SchemaMetadata`] from type descriptors
#[derive(Debug, Clone, Default)]
pub struct SchemaExtractor {
    options: ExtractOptions,
}

impl SchemaExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ExtractOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract a schema; colliding property keys keep the last field
    pub fn extract(&self, ty: &TypeInfo) -> SchemaMetadata {
        self.assemble(ty).0
    }

    /// Extract a schema, failing when two fields map to the same key
    pub fn try_extract(&self, ty: &TypeInfo) -> crate::Result<SchemaMetadata> {
        match self.assemble(ty) {
            (schema, None) => Ok(schema),
            (_, Some(collision)) => Err(collision),
        }
    }

    pub fn extract_for<T: Introspect>(&self) -> SchemaMetadata {
        self.extract(&T::type_info())
    }

    /// Build the schema last-write-wins, reporting the first key collision
    fn assemble(&self, ty: &TypeInfo) -> (SchemaMetadata, Option<SchemaError>) {
        let record = ty.underlying_record().unwrap_or_else(|| ty.deref_pointers());
        let options = &self.options;

        let mut schema = SchemaMetadata::new(record.name());
        schema.description = match record.doc() {
            Some(doc) => doc.trim().to_string(),
            None => format!("Schema for {}", record.name()),
        };

        log::debug!("Extracting schema for {}", record.qualified_name());

        // Property key → declaring field identifier
        let mut origins: HashMap<String, String> = HashMap::new();
        let mut collision = None;

        for field in record.fields() {
            let verdict = policy::evaluate(&field, options);
            if let Some(reason) = verdict.excluded {
                log::trace!("{}.{} skipped: {}", record.name(), field.name, reason);
                continue;
            }
            let key = verdict.key.clone();

            if let Some(previous) = origins.insert(key.clone(), field.name.clone()) {
                log::warn!(
                    "{}: property {:?} from {} replaces the one from {}",
                    record.name(),
                    key,
                    field.name,
                    previous
                );
                schema.required.retain(|name| *name != key);
                schema.relationships.remove(&key);
                collision.get_or_insert_with(|| SchemaError::PropertyCollision {
                    record: record.name().to_string(),
                    key: key.clone(),
                    first: previous,
                    second: field.name.clone(),
                });
            }

            let required = tags::is_required(&field.tags, &options.orm_namespace, &verdict.resolved);
            let property = self.build_property(&field, required);

            if let Some(relationship) = relations::detect_relationship(&field, &options.orm_namespace) {
                schema.relationships.insert(key.clone(), relationship);
            }
            if required {
                schema.required.push(key.clone());
            }
            schema.properties.insert(key, property);
        }

        (schema, collision)
    }

    fn build_property(&self, field: &FieldInfo, required: bool) -> PropertyInfo {
        let options = &self.options;
        let mut property = classify::classify(&field.ty, options);

        property.required = required;
        if field.ty.is_nullable() {
            property.nullable = true;
        }
        if let Some(doc) = &field.doc {
            property.description = doc.trim().to_string();
        }
        if let Some(raw) = field.tags.get(EXAMPLE_NAMESPACE) {
            property.example = Some(TagValue::parse_literal(raw));
        }
        if field.tags.has_modifier(&options.local_namespace, READ_ONLY) {
            property.read_only = true;
        }
        if field.tags.has_modifier(&options.local_namespace, WRITE_ONLY) {
            property.write_only = true;
        }

        metadata::enrich(&mut property, field, options);
        property
    }
}

/// Extract the schema of `ty`
pub fn extract_schema(ty: &TypeInfo, options: &ExtractOptions) -> SchemaMetadata {
    SchemaExtractor::with_options(options.clone()).extract(ty)
}

/// Extract the schema of `T`
pub fn extract_schema_for<T: Introspect>(options: &ExtractOptions) -> SchemaMetadata {
    extract_schema(&T::type_info(), options)
}

/// Extract the schema of `ty`, rejecting property key collisions
pub fn try_extract_schema(ty: &TypeInfo, options: &ExtractOptions) -> crate::Result<SchemaMetadata> {
    SchemaExtractor::with_options(options.clone()).try_extract(ty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::property::SchemaType;
    use crate::schema::relations::RelationType;

    fn user_fields() -> Vec<FieldInfo> {
        vec![
            FieldInfo::new("ID", i64::type_info())
                .with_tag("json", "id")
                .with_tag("bun", ",pk,notnull")
                .with_tag("crud", "readonly"),
            FieldInfo::new("Email", String::type_info())
                .with_tag("json", "email")
                .with_tag("bun", ",notnull")
                .with_tag("example", "jane@example.com")
                .with_doc(" Login address "),
            FieldInfo::new("Nickname", Option::<String>::type_info())
                .with_tag("json", "nickname,omitempty")
                .with_tag("bun", ",notnull"),
            FieldInfo::new("password", String::type_info()).with_exported(false),
            FieldInfo::new("Groups", Vec::<Group>::type_info())
                .with_tag("json", "groups")
                .with_tag("bun", "m2m:user_groups,join:User=Group"),
        ]
    }

    fn group_fields() -> Vec<FieldInfo> {
        vec![FieldInfo::new("Name", String::type_info())]
    }

    struct User;
    struct Group;

    impl Introspect for User {
        fn type_info() -> TypeInfo {
            TypeInfo::record("User", "accounts", user_fields).with_doc("An account holder")
        }
    }

    impl Introspect for Group {
        fn type_info() -> TypeInfo {
            TypeInfo::record("Group", "accounts", group_fields)
        }
    }

    #[test]
    fn test_extract_user() {
        let schema = extract_schema_for::<User>(&ExtractOptions::default());

        assert_eq!(schema.name, "User");
        assert_eq!(schema.description, "An account holder");
        assert_eq!(schema.required, vec!["id", "email"]);

        let keys: Vec<&String> = schema.properties.keys().collect();
        assert_eq!(keys, vec!["email", "groups", "id", "nickname"]);

        let id = schema.property("id").unwrap();
        assert_eq!(id.schema_type, SchemaType::Integer);
        assert_eq!(id.format, "int64");
        assert!(id.required);
        assert!(id.read_only);

        let email = schema.property("email").unwrap();
        assert_eq!(email.description, "Login address");
        assert_eq!(email.example, Some(TagValue::from("jane@example.com")));

        let nickname = schema.property("nickname").unwrap();
        assert!(nickname.nullable);
        assert!(!nickname.required);
    }

    #[test]
    fn test_relation_field_stays_a_property() {
        let schema = extract_schema_for::<User>(&ExtractOptions::default());

        let groups = schema.relationships.get("groups").unwrap();
        assert_eq!(groups.relation_type, RelationType::ManyToMany);
        assert_eq!(groups.related_type_name, "Group");
        assert!(groups.is_slice);
        assert_eq!(groups.pivot_table, "user_groups");
        assert_eq!(groups.pivot_join, "User=Group");

        let property = schema.property("groups").unwrap();
        assert_eq!(property.schema_type, SchemaType::Array);
        assert_eq!(property.items.as_ref().unwrap().schema_type, SchemaType::Object);
    }

    #[test]
    fn test_default_description() {
        let schema = extract_schema_for::<Group>(&ExtractOptions::default());
        assert_eq!(schema.description, "Schema for Group");
        assert!(schema.relationships.is_empty());
        assert!(schema.required.is_empty());
    }

    #[test]
    fn test_collisions() {
        let options = ExtractOptions::default().with_name_transformer(|_: &str| String::new());

        let schema = extract_schema_for::<User>(&options);
        assert_eq!(schema.properties.len(), 1);
        assert!(schema.properties.contains_key(""));
        // The last field (Groups) wins, along with its relation
        assert!(schema.required.is_empty());
        assert!(schema.relationships.contains_key(""));

        let err = try_extract_schema(&User::type_info(), &options).unwrap_err();
        assert_eq!(
            err,
            SchemaError::PropertyCollision {
                record: "User".to_string(),
                key: String::new(),
                first: "ID".to_string(),
                second: "Email".to_string(),
            }
        );
    }

    fn holder_fields() -> Vec<FieldInfo> {
        vec![
            FieldInfo::new("Child", Box::<Group>::type_info()).with_tag("json", "child"),
            FieldInfo::new("Shared", std::sync::Arc::<String>::type_info()).with_tag("json", "shared"),
            FieldInfo::new("Maybe", Box::<Option<i32>>::type_info()).with_tag("json", "maybe"),
        ]
    }

    struct Holder;

    impl Introspect for Holder {
        fn type_info() -> TypeInfo {
            TypeInfo::record("Holder", "accounts", holder_fields)
        }
    }

    #[test]
    fn test_indirect_wrappers_are_not_nullable() {
        let schema = extract_schema_for::<Holder>(&ExtractOptions::default().include_type_metadata(true));

        let child = schema.property("child").unwrap();
        assert!(!child.nullable);
        assert_eq!(child.schema_type, SchemaType::Object);
        assert_eq!(child.transform_path, vec!["pointer", "Group"]);

        assert!(!schema.property("shared").unwrap().nullable);
        assert!(schema.property("maybe").unwrap().nullable);
    }

    #[test]
    fn test_strict_and_lenient_agree_without_collisions() {
        let options = ExtractOptions::default();
        let strict = try_extract_schema(&User::type_info(), &options).unwrap();
        assert_eq!(strict, extract_schema(&User::type_info(), &options));
    }

    #[test]
    fn test_non_record_type_has_no_properties() {
        let schema = extract_schema(&Option::<i32>::type_info(), &ExtractOptions::default());
        assert_eq!(schema.name, "i32");
        assert!(schema.properties.is_empty());
    }
}
