//! Schema extraction errors

/// Error type for schema and relation extraction
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Relation tree requested for a nil type")]
    NilType,
    #[error("Type {type_name} is not a record type")]
    NotARecord { type_name: String },
    #[error("Property key {key:?} of {record} is produced by both {first} and {second}")]
    PropertyCollision { record: String, key: String, first: String, second: String },
}
