//! Schema value objects: properties, record schemas and tag values

use super::relations::RelationshipInfo;
use super::tags::Tags;
use crate::introspect::TypeKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Semantic type of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl SchemaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::Boolean => "boolean",
            SchemaType::Integer => "integer",
            SchemaType::Number => "number",
            SchemaType::String => "string",
            SchemaType::Array => "array",
            SchemaType::Object => "object",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured value for examples and custom tag data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Bool(bool),
    Integer(i64),
    Number(f64),
    String(String),
    List(Vec<TagValue>),
    Map(BTreeMap<String, TagValue>),
}

impl TagValue {
    /// Interpret a raw annotation literal: bool, integer, float, JSON list or
    /// object, otherwise the string itself
    pub fn parse_literal(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed {
            "true" => return TagValue::Bool(true),
            "false" => return TagValue::Bool(false),
            _ => {}
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return TagValue::Integer(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() {
                return TagValue::Number(f);
            }
        }
        if trimmed.starts_with('[') || trimmed.starts_with('{') {
            if let Ok(value) = serde_json::from_str::<TagValue>(trimmed) {
                return value;
            }
        }
        TagValue::String(raw.to_string())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, TagValue>> {
        match self {
            TagValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        TagValue::String(value.to_string())
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        TagValue::String(value)
    }
}

impl From<bool> for TagValue {
    fn from(value: bool) -> Self {
        TagValue::Bool(value)
    }
}

impl From<i64> for TagValue {
    fn from(value: i64) -> Self {
        TagValue::Integer(value)
    }
}

impl From<f64> for TagValue {
    fn from(value: f64) -> Self {
        TagValue::Number(value)
    }
}

impl From<Vec<TagValue>> for TagValue {
    fn from(value: Vec<TagValue>) -> Self {
        TagValue::List(value)
    }
}

impl From<BTreeMap<String, TagValue>> for TagValue {
    fn from(value: BTreeMap<String, TagValue>) -> Self {
        TagValue::Map(value)
    }
}

/// One schema property
///
/// `type`, `format`, `required`, `nullable`, `readOnly` and `writeOnly` are
/// always serialized; everything else is omitted while empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyInfo {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    #[serde(default)]
    pub format: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub write_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<TagValue>,
    /// Element shape; present iff `schema_type` is `Array`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<PropertyInfo>>,
    /// Nested properties for caller-assembled objects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, PropertyInfo>>,

    // Metadata captured from the declaring field
    #[serde(rename = "original_name", default, skip_serializing_if = "String::is_empty")]
    pub original_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub original_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_kind: Option<TypeKind>,
    #[serde(default, skip_serializing_if = "Tags::is_empty")]
    pub all_tags: Tags,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transform_path: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub package_qualifier: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_tag_data: BTreeMap<String, TagValue>,
}

impl PropertyInfo {
    pub fn new(schema_type: SchemaType) -> Self {
        Self {
            schema_type,
            format: String::new(),
            description: String::new(),
            required: false,
            nullable: false,
            read_only: false,
            write_only: false,
            example: None,
            items: None,
            properties: None,
            original_name: String::new(),
            original_type: String::new(),
            original_kind: None,
            all_tags: Tags::new(),
            transform_path: Vec::new(),
            package_qualifier: String::new(),
            custom_tag_data: BTreeMap::new(),
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Array property over `items`
    pub fn array_of(items: PropertyInfo) -> Self {
        let mut property = Self::new(SchemaType::Array);
        property.items = Some(Box::new(items));
        property
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Full schema of one record type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaMetadata {
    pub name: String,
    pub properties: BTreeMap<String, PropertyInfo>,
    /// Required property names, in field order
    pub required: Vec<String>,
    #[serde(default)]
    pub relationships: BTreeMap<String, RelationshipInfo>,
    #[serde(default)]
    pub description: String,
}

impl SchemaMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
            required: Vec::new(),
            relationships: BTreeMap::new(),
            description: String::new(),
        }
    }

    pub fn property(&self, key: &str) -> Option<&PropertyInfo> {
        self.properties.get(key)
    }

    pub fn is_required(&self, key: &str) -> bool {
        self.required.iter().any(|name| name == key)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
