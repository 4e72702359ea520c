//! Procedural macros for Schemora
//!
//! Provides `#[derive(Record)]`, which describes a named-field struct to the
//! schema engine in `schemora-core`.

use proc_macro::TokenStream;

mod record;

/// Derive macro implementing `Introspect` and `Record`
///
/// Field annotations are written as `#[tag(namespace = "value", ...)]`; each
/// namespace becomes one raw annotation string. `pub` fields are exported,
/// `#[record(embed)]` or `#[serde(flatten)]` marks an embedded field,
/// `#[record(skip)]` leaves a field out of the descriptor entirely, and doc
/// comments become descriptions.
///
/// # Example
///
/// ```rust,ignore
/// use schemora_core::Record;
///
/// /// A published book
/// #[derive(Record)]
/// pub struct Book {
///     #[tag(json = "id", bun = ",pk,notnull")]
///     pub id: i64,
///     #[tag(json = "author", bun = "rel:belongs-to,join:author_id=id")]
///     pub author: Option<Box<Author>>,
///     #[record(embed)]
///     pub audit: Audit,
/// }
/// ```
///
/// Struct-level `#[record(rename = "...", package = "...")]` overrides the
/// type name and the module path used to qualify it.
#[proc_macro_derive(Record, attributes(tag, record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive_record(input.into()).into()
}
