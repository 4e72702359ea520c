//! Schemora - Core
//!
//! Schema and relationship metadata derived from annotated Rust record types.
//!
//! # Overview
//!
//! Schemora walks a record type one level deep and produces two things:
//!
//! - a [`SchemaMetadata`]: property types and formats, required-ness,
//!   nullability and optional metadata about where each property came from;
//! - a [`RelationDescriptor`]: the tree of has-one / has-many / belongs-to /
//!   many-to-many links to other record types plus the flattened include paths.
//!
//! Nested record types are never expanded inline. They become independently
//! addressable schemas referenced by name.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use schemora_core::prelude::*;
//!
//! #[derive(Record)]
//! pub struct Author {
//!     #[tag(json = "id", bun = ",pk,notnull")]
//!     pub id: i64,
//!     #[tag(json = "name", bun = ",notnull")]
//!     pub name: String,
//!     #[tag(json = "books,omitempty", bun = "rel:has-many,join:id=author_id")]
//!     pub books: Vec<Book>,
//! }
//!
//! let schema = extract_schema_for::<Author>(&ExtractOptions::default());
//! assert_eq!(schema.required, vec!["id", "name"]);
//!
//! let relations = RelationTreeBuilder::new().build_for::<Author>()?;
//! assert_eq!(relations.includes, vec!["books"]);
//! ```
//!
//! # Architecture
//!
//! - [`introspect`] - type descriptors (`TypeInfo`, `FieldInfo`) and the
//!   `Introspect` / `Record` traits implemented by `#[derive(Record)]`
//! - [`schema`] - tag reading, field policy, type classification, relation
//!   detection, metadata enrichment and the schema assembler
//! - [`config`] - TOML and environment driven extraction settings
//!
//! # Logging
//!
//! The crate logs through the standard `log` facade and never installs a
//! logger of its own.

// Lets the derive macro refer to `::schemora_core` from inside this crate's tests.
extern crate self as schemora_core;

pub mod config; // Extraction settings with TOML and environment support
pub mod introspect; // Type descriptors produced by the Record derive
pub mod prelude;
pub mod schema; // Schema and relation extraction engine

// Re-export the derive macro so users only need one crate
#[cfg(feature = "macros")]
pub use schemora_macros::Record;

pub use config::{ExtractConfig, SchemoraConfig};
pub use introspect::{
    FieldInfo, Introspect, IntWidth, PointerKind, Record, TypeInfo, TypeKind, TypeShape,
};
pub use schema::{
    apply_relation_filters, build_relation_descriptor, extract_schema, extract_schema_for,
    register_relation_filter, reset_relation_filters, try_extract_schema, ExtractOptions,
    PropertyInfo, RelationDescriptor, RelationFilterRegistry, RelationNode, RelationTreeBuilder,
    RelationType, RelationshipInfo, SchemaError, SchemaExtractor, SchemaMetadata, SchemaType,
    SpecialTypes, TagValue, Tags,
};

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;
