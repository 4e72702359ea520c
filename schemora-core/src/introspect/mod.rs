//! Type descriptors for record introspection
//!
//! Rust has no runtime reflection, so every type the engine looks at is first
//! turned into a [`TypeInfo`] by the [`Introspect`] trait. Scalars, wrappers and
//! containers are implemented in [`impls`]; record types get their
//! implementation from `#[derive(Record)]` or are described by hand.
//!
//! Record descriptors carry a thunk for their fields instead of the fields
//! themselves, so describing a self-referential type never recurses.

pub mod impls;

use crate::schema::tags::Tags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse type-kind tag of a descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    String,
    Pointer,
    Slice,
    Array,
    Map,
    Struct,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Bool => "bool",
            TypeKind::Int => "int",
            TypeKind::Int8 => "int8",
            TypeKind::Int16 => "int16",
            TypeKind::Int32 => "int32",
            TypeKind::Int64 => "int64",
            TypeKind::Uint => "uint",
            TypeKind::Uint8 => "uint8",
            TypeKind::Uint16 => "uint16",
            TypeKind::Uint32 => "uint32",
            TypeKind::Uint64 => "uint64",
            TypeKind::Float32 => "float32",
            TypeKind::Float64 => "float64",
            TypeKind::String => "string",
            TypeKind::Pointer => "pointer",
            TypeKind::Slice => "slice",
            TypeKind::Array => "array",
            TypeKind::Map => "map",
            TypeKind::Struct => "struct",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bit width of an integer shape (`Size` is the platform word)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
    Size,
}

/// What a pointer wrapper adds on top of its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// May be absent (`Option`)
    Nullable,
    /// Always present (`Box`, `Rc`, `Arc`)
    Indirect,
}

/// Structural shape of a type
#[derive(Debug, Clone)]
pub enum TypeShape {
    Bool,
    Int(IntWidth),
    Uint(IntWidth),
    Float32,
    Float64,
    String,
    Pointer(PointerKind, Box<TypeInfo>),
    Slice(Box<TypeInfo>),
    Array(Box<TypeInfo>, usize),
    Map(Box<TypeInfo>, Box<TypeInfo>),
    /// Named record; fields are produced on demand
    Record(fn() -> Vec<FieldInfo>),
}

impl TypeShape {
    pub fn kind(&self) -> TypeKind {
        match self {
            TypeShape::Bool => TypeKind::Bool,
            TypeShape::Int(width) => match width {
                IntWidth::W8 => TypeKind::Int8,
                IntWidth::W16 => TypeKind::Int16,
                IntWidth::W32 => TypeKind::Int32,
                IntWidth::W64 => TypeKind::Int64,
                IntWidth::Size => TypeKind::Int,
            },
            TypeShape::Uint(width) => match width {
                IntWidth::W8 => TypeKind::Uint8,
                IntWidth::W16 => TypeKind::Uint16,
                IntWidth::W32 => TypeKind::Uint32,
                IntWidth::W64 => TypeKind::Uint64,
                IntWidth::Size => TypeKind::Uint,
            },
            TypeShape::Float32 => TypeKind::Float32,
            TypeShape::Float64 => TypeKind::Float64,
            TypeShape::String => TypeKind::String,
            TypeShape::Pointer(_, _) => TypeKind::Pointer,
            TypeShape::Slice(_) => TypeKind::Slice,
            TypeShape::Array(_, _) => TypeKind::Array,
            TypeShape::Map(_, _) => TypeKind::Map,
            TypeShape::Record(_) => TypeKind::Struct,
        }
    }
}

/// Descriptor of a static type
#[derive(Debug, Clone)]
pub struct TypeInfo {
    name: String,
    package: String,
    doc: Option<String>,
    shape: TypeShape,
}

impl TypeInfo {
    /// Describe a built-in type (no package qualifier)
    pub fn new(name: impl Into<String>, shape: TypeShape) -> Self {
        Self { name: name.into(), package: String::new(), doc: None, shape }
    }

    /// Describe a named record type
    pub fn record(
        name: impl Into<String>,
        package: impl Into<String>,
        fields: fn() -> Vec<FieldInfo>,
    ) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            doc: None,
            shape: TypeShape::Record(fields),
        }
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        let doc = doc.into();
        self.doc = if doc.trim().is_empty() { None } else { Some(doc) };
        self
    }

    /// Display name as written in source (`User`, `Option<Vec<Book>>`)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Module path of a named type, empty for built-ins
    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    pub fn shape(&self) -> &TypeShape {
        &self.shape
    }

    pub fn kind(&self) -> TypeKind {
        self.shape.kind()
    }

    /// Identity used for cycle detection: `package::Name`
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}::{}", self.package, self.name)
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self.shape, TypeShape::Record(_))
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self.shape, TypeShape::Pointer(_, _))
    }

    /// True when some pointer level is nullable (`Box<Option<T>>` is,
    /// `Box<T>` is not)
    pub fn is_nullable(&self) -> bool {
        let mut current = self;
        while let TypeShape::Pointer(kind, inner) = &current.shape {
            if *kind == PointerKind::Nullable {
                return true;
            }
            current = inner;
        }
        false
    }

    /// True for slices and fixed-size arrays
    pub fn is_sequence(&self) -> bool {
        matches!(self.shape, TypeShape::Slice(_) | TypeShape::Array(_, _))
    }

    /// Strip every pointer level
    pub fn deref_pointers(&self) -> &TypeInfo {
        let mut current = self;
        while let TypeShape::Pointer(_, inner) = &current.shape {
            current = inner;
        }
        current
    }

    /// Element type of a slice or array
    pub fn element(&self) -> Option<&TypeInfo> {
        match &self.shape {
            TypeShape::Slice(elem) | TypeShape::Array(elem, _) => Some(elem.as_ref()),
            _ => None,
        }
    }

    /// Fields of a record type; empty for anything else
    pub fn fields(&self) -> Vec<FieldInfo> {
        match &self.shape {
            TypeShape::Record(fields) => fields(),
            _ => Vec::new(),
        }
    }

    /// Find the record a root type stands for, looking through pointers and
    /// sequences (`Option<Vec<Box<User>>>` resolves to `User`)
    pub fn underlying_record(&self) -> Option<&TypeInfo> {
        let mut current = self.deref_pointers();
        loop {
            match &current.shape {
                TypeShape::Record(_) => return Some(current),
                TypeShape::Slice(elem) | TypeShape::Array(elem, _) => {
                    current = elem.deref_pointers();
                }
                _ => return None,
            }
        }
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Descriptor of one record field
#[derive(Debug, Clone)]
pub struct FieldInfo {
    /// Declared identifier
    pub name: String,
    pub ty: TypeInfo,
    /// `pub` field
    pub exported: bool,
    /// Embedded field (`#[serde(flatten)]` or `#[record(embed)]`)
    pub anonymous: bool,
    pub tags: Tags,
    pub doc: Option<String>,
}

impl FieldInfo {
    /// New exported, non-embedded field without tags
    pub fn new(name: impl Into<String>, ty: TypeInfo) -> Self {
        Self {
            name: name.into(),
            ty,
            exported: true,
            anonymous: false,
            tags: Tags::new(),
            doc: None,
        }
    }

    pub fn with_exported(mut self, exported: bool) -> Self {
        self.exported = exported;
        self
    }

    pub fn with_anonymous(mut self, anonymous: bool) -> Self {
        self.anonymous = anonymous;
        self
    }

    /// Attach a raw annotation; a repeated namespace replaces the earlier value
    pub fn with_tag(mut self, namespace: impl Into<String>, raw: impl Into<String>) -> Self {
        self.tags.insert(namespace, raw);
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        let doc = doc.into();
        if !doc.trim().is_empty() {
            self.doc = Some(doc);
        }
        self
    }
}

/// Types that can describe themselves as a [`TypeInfo`]
pub trait Introspect {
    fn type_info() -> TypeInfo;
}

/// Named-field record types; implemented by `#[derive(Record)]`
pub trait Record: Introspect {
    fn fields() -> Vec<FieldInfo>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_fields() -> Vec<FieldInfo> {
        vec![
            FieldInfo::new("value", i64::type_info()),
            FieldInfo::new("next", Option::<Box<Node>>::type_info()),
        ]
    }

    struct Node;

    impl Introspect for Node {
        fn type_info() -> TypeInfo {
            TypeInfo::record("Node", "tests", node_fields)
        }
    }

    #[test]
    fn test_self_referential_descriptor_is_lazy() {
        let info = Node::type_info();
        assert!(info.is_record());
        assert_eq!(info.qualified_name(), "tests::Node");

        let fields = info.fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].ty.name(), "Option<Box<Node>>");
        assert_eq!(fields[1].ty.deref_pointers().name(), "Node");
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!(i8::type_info().kind(), TypeKind::Int8);
        assert_eq!(u64::type_info().kind(), TypeKind::Uint64);
        assert_eq!(usize::type_info().kind(), TypeKind::Uint);
        assert_eq!(Vec::<String>::type_info().kind(), TypeKind::Slice);
        assert_eq!(<[u8; 4]>::type_info().kind(), TypeKind::Array);
        assert_eq!(Node::type_info().kind().to_string(), "struct");
    }

    #[test]
    fn test_underlying_record_looks_through_wrappers() {
        let info = Option::<Vec<Box<Node>>>::type_info();
        assert_eq!(info.underlying_record().map(|t| t.name()), Some("Node"));
        assert!(String::type_info().underlying_record().is_none());
    }

    #[test]
    fn test_only_option_is_nullable() {
        assert!(Option::<i64>::type_info().is_nullable());
        assert!(Box::<Option<Node>>::type_info().is_nullable());
        assert!(!Box::<Node>::type_info().is_nullable());
        assert!(!std::sync::Arc::<String>::type_info().is_nullable());
        assert!(!i64::type_info().is_nullable());
        assert!(std::rc::Rc::<Node>::type_info().is_pointer());
    }

    #[test]
    fn test_field_builder_defaults() {
        let field = FieldInfo::new("id", u32::type_info()).with_tag("json", "id").with_doc("  ");
        assert!(field.exported);
        assert!(!field.anonymous);
        assert_eq!(field.tags.get("json"), Some("id"));
        assert!(field.doc.is_none());
    }
}
