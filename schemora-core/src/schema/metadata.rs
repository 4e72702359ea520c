//! Metadata enrichment
//!
//! Adds optional provenance to an already classified property. Never touches
//! `type`, `format`, `required` or `nullable`.

use super::options::ExtractOptions;
use super::property::PropertyInfo;
use crate::introspect::{FieldInfo, TypeInfo, TypeShape};

pub const TOKEN_POINTER: &str = "pointer";
pub const TOKEN_SLICE: &str = "slice";
pub const TOKEN_ARRAY: &str = "array";
pub const TOKEN_MAP: &str = "map";

/// Container path of a type and the package of its terminal type
///
/// Each pointer, sequence or map level adds one token (maps continue with
/// their value type). A terminal record adds its name; built-in terminals add
/// nothing and have no package.
pub fn transform_path(ty: &TypeInfo) -> (Vec<String>, String) {
    let mut path = Vec::new();
    let mut current = ty;

    loop {
        match current.shape() {
            TypeShape::Pointer(_, inner) => {
                path.push(TOKEN_POINTER.to_string());
                current = inner;
            }
            TypeShape::Slice(elem) => {
                path.push(TOKEN_SLICE.to_string());
                current = elem;
            }
            TypeShape::Array(elem, _) => {
                path.push(TOKEN_ARRAY.to_string());
                current = elem;
            }
            TypeShape::Map(_, value) => {
                path.push(TOKEN_MAP.to_string());
                current = value;
            }
            TypeShape::Record(_) => {
                path.push(current.name().to_string());
                return (path, current.package().to_string());
            }
            _ => return (path, String::new()),
        }
    }
}

/// Populate the enabled metadata categories and custom tag data
pub fn enrich(property: &mut PropertyInfo, field: &FieldInfo, options: &ExtractOptions) {
    if options.include_original_names {
        property.original_name = field.name.clone();
    }

    if options.include_original_types {
        property.original_type = field.ty.name().to_string();
        property.original_kind = Some(field.ty.kind());
    }

    if options.include_tag_metadata {
        property.all_tags = field.tags.clone();
    }

    if options.include_type_metadata {
        let (path, package) = transform_path(&field.ty);
        property.transform_path = path;
        property.package_qualifier = package;
    }

    for (namespace, raw) in field.tags.iter() {
        let Some(handler) = options.custom_tag_handlers.get(namespace) else {
            continue;
        };
        if let Some(value) = handler(raw) {
            property.custom_tag_data.insert(namespace.to_string(), value);
        }
    }
}
