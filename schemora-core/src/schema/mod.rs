//! Schema synthesis
//!
//! Turns record type descriptors into [`SchemaMetadata`] and relation trees.
//!
//! - [`tags`]: annotation lookup and name resolution
//! - [`classify`]: semantic type and format of a field type
//! - [`relations`]: relation detection from ORM annotations
//! - [`tree`]: relation trees and include paths
//! - [`filters`]: post-processing of relation descriptors
//! - [`metadata`]: optional provenance on properties
//! - [`policy`]: field participation
//! - [`assembler`]: the per-record extraction pass

pub mod assembler;
pub mod classify;
pub mod error;
pub mod filters;
pub mod metadata;
pub mod options;
pub mod policy;
pub mod property;
pub mod relations;
pub mod tags;
pub mod tree;

pub use assembler::{extract_schema, extract_schema_for, try_extract_schema, SchemaExtractor};
pub use classify::{classify, SpecialTypes};
pub use error::SchemaError;
pub use filters::{
    apply_relation_filters, global_relation_filters, register_relation_filter,
    reset_relation_filters, RelationFilter, RelationFilterRegistry,
};
pub use metadata::transform_path;
pub use options::{ExtractOptions, FieldFilter, NameTransformer, TagHandler, TypeMapper};
pub use policy::{Exclusion, FieldVerdict};
pub use property::{PropertyInfo, SchemaMetadata, SchemaType, TagValue};
pub use relations::{detect_relationship, parse_relation_tag, RelationType, RelationshipInfo};
pub use tags::{resolve_name, ResolvedName, Tags};
pub use tree::{build_relation_descriptor, RelationDescriptor, RelationNode, RelationTreeBuilder};
