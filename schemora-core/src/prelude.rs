//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use schemora_core::prelude::*;
//! ```

// === Record trait (and its derive when the `macros` feature is on) ===
pub use crate::Record;

// === Introspection ===
pub use crate::introspect::{FieldInfo, Introspect, TypeInfo, TypeKind, TypeShape};

// === Schema extraction ===
pub use crate::schema::{
    extract_schema, extract_schema_for, try_extract_schema, ExtractOptions, PropertyInfo,
    SchemaExtractor, SchemaMetadata, SchemaType, TagValue, Tags,
};

// === Relations ===
pub use crate::schema::{
    apply_relation_filters, build_relation_descriptor, register_relation_filter,
    reset_relation_filters, RelationDescriptor, RelationFilterRegistry, RelationNode,
    RelationTreeBuilder, RelationType, RelationshipInfo,
};

// === Configuration ===
pub use crate::config::ExtractConfig;

// === Errors ===
pub use crate::schema::SchemaError;
