//! `Introspect` implementations for std, chrono and uuid types

use super::{FieldInfo, IntWidth, Introspect, PointerKind, TypeInfo, TypeShape};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

macro_rules! impl_builtin {
    ($($ty:ty => $name:literal, $shape:expr;)*) => {
        $(
            impl Introspect for $ty {
                fn type_info() -> TypeInfo {
                    TypeInfo::new($name, $shape)
                }
            }
        )*
    };
}

impl_builtin! {
    bool => "bool", TypeShape::Bool;
    i8 => "i8", TypeShape::Int(IntWidth::W8);
    i16 => "i16", TypeShape::Int(IntWidth::W16);
    i32 => "i32", TypeShape::Int(IntWidth::W32);
    i64 => "i64", TypeShape::Int(IntWidth::W64);
    isize => "isize", TypeShape::Int(IntWidth::Size);
    u8 => "u8", TypeShape::Uint(IntWidth::W8);
    u16 => "u16", TypeShape::Uint(IntWidth::W16);
    u32 => "u32", TypeShape::Uint(IntWidth::W32);
    u64 => "u64", TypeShape::Uint(IntWidth::W64);
    usize => "usize", TypeShape::Uint(IntWidth::Size);
    f32 => "f32", TypeShape::Float32;
    f64 => "f64", TypeShape::Float64;
    char => "char", TypeShape::String;
    String => "String", TypeShape::String;
}

impl Introspect for &str {
    fn type_info() -> TypeInfo {
        TypeInfo::new("&str", TypeShape::String)
    }
}

macro_rules! impl_pointer {
    ($($wrapper:ident => $kind:expr),*) => {
        $(
            impl<T: Introspect> Introspect for $wrapper<T> {
                fn type_info() -> TypeInfo {
                    let inner = T::type_info();
                    TypeInfo::new(
                        format!("{}<{}>", stringify!($wrapper), inner.name()),
                        TypeShape::Pointer($kind, Box::new(inner)),
                    )
                }
            }
        )*
    };
}

impl_pointer!(
    Option => PointerKind::Nullable,
    Box => PointerKind::Indirect,
    Rc => PointerKind::Indirect,
    Arc => PointerKind::Indirect
);

impl<T: Introspect> Introspect for Vec<T> {
    fn type_info() -> TypeInfo {
        let elem = T::type_info();
        TypeInfo::new(format!("Vec<{}>", elem.name()), TypeShape::Slice(Box::new(elem)))
    }
}

impl<T: Introspect> Introspect for VecDeque<T> {
    fn type_info() -> TypeInfo {
        let elem = T::type_info();
        TypeInfo::new(format!("VecDeque<{}>", elem.name()), TypeShape::Slice(Box::new(elem)))
    }
}

impl<T: Introspect, const N: usize> Introspect for [T; N] {
    fn type_info() -> TypeInfo {
        let elem = T::type_info();
        TypeInfo::new(format!("[{}; {}]", elem.name(), N), TypeShape::Array(Box::new(elem), N))
    }
}

impl<K: Introspect, V: Introspect, S> Introspect for HashMap<K, V, S> {
    fn type_info() -> TypeInfo {
        let (key, value) = (K::type_info(), V::type_info());
        TypeInfo::new(
            format!("HashMap<{}, {}>", key.name(), value.name()),
            TypeShape::Map(Box::new(key), Box::new(value)),
        )
    }
}

impl<K: Introspect, V: Introspect> Introspect for BTreeMap<K, V> {
    fn type_info() -> TypeInfo {
        let (key, value) = (K::type_info(), V::type_info());
        TypeInfo::new(
            format!("BTreeMap<{}, {}>", key.name(), value.name()),
            TypeShape::Map(Box::new(key), Box::new(value)),
        )
    }
}

// Well-known value types are opaque records; the classifier maps them
// through its special-types table.
fn no_fields() -> Vec<FieldInfo> {
    Vec::new()
}

impl<Tz: chrono::TimeZone> Introspect for chrono::DateTime<Tz> {
    fn type_info() -> TypeInfo {
        TypeInfo::record("DateTime", "chrono", no_fields)
    }
}

impl Introspect for chrono::NaiveDateTime {
    fn type_info() -> TypeInfo {
        TypeInfo::record("NaiveDateTime", "chrono", no_fields)
    }
}

impl Introspect for chrono::NaiveDate {
    fn type_info() -> TypeInfo {
        TypeInfo::record("NaiveDate", "chrono", no_fields)
    }
}

impl Introspect for uuid::Uuid {
    fn type_info() -> TypeInfo {
        TypeInfo::record("Uuid", "uuid", no_fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::TypeKind;

    #[test]
    fn test_container_names() {
        assert_eq!(Option::<Vec<i64>>::type_info().name(), "Option<Vec<i64>>");
        assert_eq!(HashMap::<String, u8>::type_info().name(), "HashMap<String, u8>");
        assert_eq!(<[f32; 3]>::type_info().name(), "[f32; 3]");
        assert_eq!(Arc::<String>::type_info().kind(), TypeKind::Pointer);
    }

    #[test]
    fn test_well_known_types_are_qualified_records() {
        let ts = chrono::DateTime::<chrono::Utc>::type_info();
        assert!(ts.is_record());
        assert_eq!(ts.qualified_name(), "chrono::DateTime");
        assert!(ts.fields().is_empty());

        assert_eq!(uuid::Uuid::type_info().qualified_name(), "uuid::Uuid");
    }
}
