//! Type classification
//!
//! Maps a type descriptor to a property shell (type and format only). Nested
//! records classify as `object` without expanding their fields; sequences
//! classify as `array` with their element classified recursively.

use super::options::ExtractOptions;
use super::property::{PropertyInfo, SchemaType};
use crate::introspect::{IntWidth, TypeInfo, TypeShape};

pub const FORMAT_INT32: &str = "int32";
pub const FORMAT_INT64: &str = "int64";
pub const FORMAT_FLOAT: &str = "float";
pub const FORMAT_DOUBLE: &str = "double";
pub const FORMAT_DATE_TIME: &str = "date-time";
pub const FORMAT_DATE: &str = "date";
pub const FORMAT_UUID: &str = "uuid";

/// Well-known value types keyed by qualified name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialTypes {
    entries: Vec<(String, SchemaType, String)>,
}

impl Default for SpecialTypes {
    fn default() -> Self {
        Self::empty()
            .with("chrono::DateTime", SchemaType::String, FORMAT_DATE_TIME)
            .with("chrono::NaiveDateTime", SchemaType::String, FORMAT_DATE_TIME)
            .with("chrono::NaiveDate", SchemaType::String, FORMAT_DATE)
            .with("uuid::Uuid", SchemaType::String, FORMAT_UUID)
    }
}

impl SpecialTypes {
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// Add or replace an entry
    pub fn with(
        mut self,
        qualified_name: impl Into<String>,
        schema_type: SchemaType,
        format: impl Into<String>,
    ) -> Self {
        self.insert(qualified_name, schema_type, format);
        self
    }

    pub fn insert(
        &mut self,
        qualified_name: impl Into<String>,
        schema_type: SchemaType,
        format: impl Into<String>,
    ) {
        let qualified_name = qualified_name.into();
        let format = format.into();
        match self.entries.iter_mut().find(|(name, _, _)| *name == qualified_name) {
            Some(entry) => {
                entry.1 = schema_type;
                entry.2 = format;
            }
            None => self.entries.push((qualified_name, schema_type, format)),
        }
    }

    pub fn lookup(&self, ty: &TypeInfo) -> Option<PropertyInfo> {
        let qualified = ty.qualified_name();
        self.entries
            .iter()
            .find(|(name, _, _)| *name == qualified)
            .map(|(_, schema_type, format)| PropertyInfo::new(*schema_type).with_format(format))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Classify a (possibly pointer-wrapped) type
///
/// The custom mapper wins outright when it returns a property; the special
/// types table is consulted next, then the built-in dispatch.
pub fn classify(ty: &TypeInfo, options: &ExtractOptions) -> PropertyInfo {
    let ty = ty.deref_pointers();

    if let Some(mapper) = &options.property_type_mapper {
        if let Some(property) = mapper(ty) {
            return property;
        }
    }
    if let Some(property) = options.special_types.lookup(ty) {
        return property;
    }

    match ty.shape() {
        TypeShape::Bool => PropertyInfo::new(SchemaType::Boolean),
        TypeShape::Int(width) | TypeShape::Uint(width) => {
            let format = match width {
                IntWidth::W64 => FORMAT_INT64,
                IntWidth::W8 | IntWidth::W16 | IntWidth::W32 | IntWidth::Size => FORMAT_INT32,
            };
            PropertyInfo::new(SchemaType::Integer).with_format(format)
        }
        TypeShape::Float32 => PropertyInfo::new(SchemaType::Number).with_format(FORMAT_FLOAT),
        TypeShape::Float64 => PropertyInfo::new(SchemaType::Number).with_format(FORMAT_DOUBLE),
        TypeShape::String => PropertyInfo::new(SchemaType::String),
        TypeShape::Slice(elem) | TypeShape::Array(elem, _) => {
            PropertyInfo::array_of(classify(elem, options))
        }
        TypeShape::Record(_) | TypeShape::Map(_, _) => PropertyInfo::new(SchemaType::Object),
        // deref_pointers leaves no pointer behind
        TypeShape::Pointer(_, inner) => classify(inner, options),
    }
}
