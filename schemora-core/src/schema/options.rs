//! Extraction options
//!
//! Every option is independent: toggling one never changes what another does.
//! Unset callbacks are no-ops.

use super::classify::SpecialTypes;
use super::property::{PropertyInfo, SchemaType, TagValue};
use super::tags::default_tag_priority;
use crate::introspect::{FieldInfo, TypeInfo};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Rewrites a resolved property name
pub type NameTransformer = Arc<dyn Fn(&str) -> String + Send + Sync>;
/// Decides whether a field participates; authoritative when set
pub type FieldFilter = Arc<dyn Fn(&FieldInfo) -> bool + Send + Sync>;
/// Overrides classification for a type when it returns `Some`
pub type TypeMapper = Arc<dyn Fn(&TypeInfo) -> Option<PropertyInfo> + Send + Sync>;
/// Turns a raw annotation into structured data
pub type TagHandler = Arc<dyn Fn(&str) -> Option<TagValue> + Send + Sync>;

/// Configuration for schema extraction and relation tree building
#[derive(Clone)]
pub struct ExtractOptions {
    pub field_name_transformer: Option<NameTransformer>,
    /// Namespaces consulted for the display name, highest priority first
    pub tag_priority: Vec<String>,
    pub custom_tag_handlers: HashMap<String, TagHandler>,
    pub skip_unexported_fields: bool,
    pub skip_anonymous_fields: bool,
    pub custom_field_filter: Option<FieldFilter>,
    pub property_type_mapper: Option<TypeMapper>,
    pub include_original_names: bool,
    pub include_original_types: bool,
    pub include_tag_metadata: bool,
    pub include_type_metadata: bool,
    /// Namespace holding exclusion, `notnull` and relation declarations
    pub orm_namespace: String,
    /// Namespace holding `readonly` / `writeonly`
    pub local_namespace: String,
    pub special_types: SpecialTypes,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            field_name_transformer: None,
            tag_priority: default_tag_priority(),
            custom_tag_handlers: HashMap::new(),
            skip_unexported_fields: true,
            skip_anonymous_fields: true,
            custom_field_filter: None,
            property_type_mapper: None,
            include_original_names: false,
            include_original_types: false,
            include_tag_metadata: false,
            include_type_metadata: false,
            orm_namespace: "bun".to_string(),
            local_namespace: "crud".to_string(),
            special_types: SpecialTypes::default(),
        }
    }
}

impl fmt::Debug for ExtractOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut handlers: Vec<&String> = self.custom_tag_handlers.keys().collect();
        handlers.sort();
        f.debug_struct("ExtractOptions")
            .field("field_name_transformer", &self.field_name_transformer.is_some())
            .field("tag_priority", &self.tag_priority)
            .field("custom_tag_handlers", &handlers)
            .field("skip_unexported_fields", &self.skip_unexported_fields)
            .field("skip_anonymous_fields", &self.skip_anonymous_fields)
            .field("custom_field_filter", &self.custom_field_filter.is_some())
            .field("property_type_mapper", &self.property_type_mapper.is_some())
            .field("include_original_names", &self.include_original_names)
            .field("include_original_types", &self.include_original_types)
            .field("include_tag_metadata", &self.include_tag_metadata)
            .field("include_type_metadata", &self.include_type_metadata)
            .field("orm_namespace", &self.orm_namespace)
            .field("local_namespace", &self.local_namespace)
            .field("special_types", &self.special_types.len())
            .finish()
    }
}

impl ExtractOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name_transformer<F>(mut self, transformer: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.field_name_transformer = Some(Arc::new(transformer));
        self
    }

    pub fn with_tag_priority<I, S>(mut self, priority: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tag_priority = priority.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tag_handler<F>(mut self, namespace: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&str) -> Option<TagValue> + Send + Sync + 'static,
    {
        self.custom_tag_handlers.insert(namespace.into(), Arc::new(handler));
        self
    }

    pub fn skip_unexported(mut self, skip: bool) -> Self {
        self.skip_unexported_fields = skip;
        self
    }

    pub fn skip_anonymous(mut self, skip: bool) -> Self {
        self.skip_anonymous_fields = skip;
        self
    }

    pub fn with_field_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&FieldInfo) -> bool + Send + Sync + 'static,
    {
        self.custom_field_filter = Some(Arc::new(filter));
        self
    }

    pub fn with_type_mapper<F>(mut self, mapper: F) -> Self
    where
        F: Fn(&TypeInfo) -> Option<PropertyInfo> + Send + Sync + 'static,
    {
        self.property_type_mapper = Some(Arc::new(mapper));
        self
    }

    pub fn include_original_names(mut self, include: bool) -> Self {
        self.include_original_names = include;
        self
    }

    pub fn include_original_types(mut self, include: bool) -> Self {
        self.include_original_types = include;
        self
    }

    pub fn include_tag_metadata(mut self, include: bool) -> Self {
        self.include_tag_metadata = include;
        self
    }

    pub fn include_type_metadata(mut self, include: bool) -> Self {
        self.include_type_metadata = include;
        self
    }

    /// Turn on every metadata category
    pub fn include_all_metadata(self) -> Self {
        self.include_original_names(true)
            .include_original_types(true)
            .include_tag_metadata(true)
            .include_type_metadata(true)
    }

    pub fn with_orm_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.orm_namespace = namespace.into();
        self
    }

    pub fn with_local_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.local_namespace = namespace.into();
        self
    }

    pub fn with_special_types(mut self, special_types: SpecialTypes) -> Self {
        self.special_types = special_types;
        self
    }

    pub fn with_special_type(
        mut self,
        qualified_name: impl Into<String>,
        schema_type: SchemaType,
        format: impl Into<String>,
    ) -> Self {
        self.special_types.insert(qualified_name, schema_type, format);
        self
    }

    /// Apply the name transformer, if any
    pub fn transform_name(&self, raw: &str) -> String {
        match &self.field_name_transformer {
            Some(transform) => transform(raw),
            None => raw.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ExtractOptions::default();
        assert_eq!(options.tag_priority, vec!["json", "bun", "crud"]);
        assert!(options.skip_unexported_fields);
        assert!(options.skip_anonymous_fields);
        assert!(!options.include_original_names);
        assert!(!options.include_type_metadata);
        assert_eq!(options.orm_namespace, "bun");
        assert_eq!(options.special_types.len(), 4);
    }

    #[test]
    fn test_transform_name() {
        let options = ExtractOptions::default();
        assert_eq!(options.transform_name("UserName"), "UserName");

        let options = options.with_name_transformer(|name: &str| name.to_lowercase());
        assert_eq!(options.transform_name("UserName"), "username");
    }

    #[test]
    fn test_debug_hides_callbacks() {
        let options = ExtractOptions::default().with_tag_handler("validate", |_: &str| None);
        let debug = format!("{:?}", options);
        assert!(debug.contains("custom_tag_handlers: [\"validate\"]"));
        assert!(debug.contains("field_name_transformer: false"));
    }
}
