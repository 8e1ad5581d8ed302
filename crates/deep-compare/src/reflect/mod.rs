//! Runtime introspection for comparable values.
//!
//! Rust has no runtime reflection, so every comparable type describes itself
//! through [`Reflect::view`]: a borrowed [`View`] carrying the value's kind and
//! accessors for its members. The comparison engine only ever walks views, so
//! traversal stays generic over any type that implements the trait.
//!
//! Implementations for primitives, std collections, smart pointers, queues and
//! `chrono` timestamps live in `std_impls`. User structs get one through
//! [`reflect_struct!`](crate::reflect_struct).

mod dynamic;
mod macros;
mod std_impls;

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, FixedOffset};

pub use dynamic::Dyn;

/// A value that can be inspected by the comparison engine.
pub trait Reflect: Any {
    /// Describe this value's kind and members.
    fn view(&self) -> View<'_>;

    /// Fully qualified name of the concrete type.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Borrowed, kind-tagged view of a reflected value.
pub enum View<'a> {
    /// Numbers, booleans, characters and the unit value.
    Scalar(Scalar),
    /// UTF-8 text.
    Str(&'a str),
    /// Fixed-length sequence.
    Array(&'a dyn Sequence),
    /// Dynamic-length sequence.
    Slice(&'a dyn Sequence),
    /// Associative container.
    Map(&'a dyn Mapping),
    /// Record with named fields, optionally an enum variant.
    Struct(Record<'a>),
    /// Calendar timestamp compared as an instant.
    Timestamp(DateTime<FixedOffset>),
    /// Nullable indirection to another value.
    Pointer(Pointer<'a>),
    /// Container holding a value of any concrete type.
    Dynamic(Dynamic<'a>),
    /// Callable. Never comparable unless both sides are nil.
    Func { is_nil: bool },
    /// Channel-like queue. Comparing it drains it.
    Chan(&'a dyn Queue),
}

impl<'a> View<'a> {
    /// The kind tag of this view.
    pub fn kind(&self) -> Kind {
        match self {
            View::Scalar(_) => Kind::Scalar,
            View::Str(_) => Kind::String,
            View::Array(_) => Kind::Array,
            View::Slice(_) => Kind::Slice,
            View::Map(_) => Kind::Map,
            View::Struct(_) => Kind::Struct,
            View::Timestamp(_) => Kind::Timestamp,
            View::Pointer(_) => Kind::Pointer,
            View::Dynamic(_) => Kind::Dynamic,
            View::Func { .. } => Kind::Func,
            View::Chan(_) => Kind::Chan,
        }
    }

    /// Storage identity for identity-bearing kinds.
    ///
    /// Only maps, dynamic sequences, pointers and polymorphic containers have
    /// one; every other kind is compared by value on each visit.
    pub fn identity(&self) -> Option<Identity> {
        match self {
            View::Slice(seq) => seq.identity(),
            View::Map(map) => map.identity(),
            View::Pointer(ptr) => ptr.identity,
            View::Dynamic(dynamic) => dynamic.identity,
            _ => None,
        }
    }

    /// Whether the value is its type's zero value.
    ///
    /// Queues report their buffered count without receiving anything.
    pub fn is_zero(&self) -> bool {
        match self {
            View::Scalar(scalar) => scalar.is_zero(),
            View::Str(s) => s.is_empty(),
            View::Array(seq) => (0..seq.len())
                .all(|i| seq.get(i).is_none_or(|item| item.view().is_zero())),
            View::Slice(seq) => seq.is_nil() || seq.len() == 0,
            View::Map(map) => map.is_nil() || map.len() == 0,
            View::Struct(record) => record
                .fields()
                .iter()
                .all(|field| field.value.view().is_zero()),
            View::Timestamp(ts) => ts.timestamp() == 0 && ts.timestamp_subsec_nanos() == 0,
            View::Pointer(ptr) => ptr.target.is_none(),
            View::Dynamic(dynamic) => dynamic.inner.is_none(),
            View::Func { is_nil } => *is_nil,
            View::Chan(queue) => queue.len() == 0,
        }
    }
}

/// Kind tag of a [`View`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Scalar,
    String,
    Array,
    Slice,
    Map,
    Struct,
    Timestamp,
    Pointer,
    Dynamic,
    Func,
    Chan,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Scalar => "scalar",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Slice => "slice",
            Kind::Map => "map",
            Kind::Struct => "struct",
            Kind::Timestamp => "timestamp",
            Kind::Pointer => "pointer",
            Kind::Dynamic => "dynamic",
            Kind::Func => "func",
            Kind::Chan => "chan",
        };
        f.write_str(name)
    }
}

/// Canonical comparable form of a primitive value.
///
/// Equality is the built-in one, so `F64(NAN) != F64(NAN)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Unit,
    Bool(bool),
    Int(i128),
    Uint(u128),
    F32(f32),
    F64(f64),
    Char(char),
}

impl Scalar {
    /// Negative zero is not the zero value, matching a bitwise zero check.
    pub fn is_zero(&self) -> bool {
        match *self {
            Scalar::Unit => true,
            Scalar::Bool(b) => !b,
            Scalar::Int(i) => i == 0,
            Scalar::Uint(u) => u == 0,
            Scalar::F32(f) => f.to_bits() == 0,
            Scalar::F64(f) => f.to_bits() == 0,
            Scalar::Char(c) => c == '\0',
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Unit => f.write_str("()"),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Uint(u) => write!(f, "{u}"),
            Scalar::F32(v) => write!(f, "{v}"),
            Scalar::F64(v) => write!(f, "{v}"),
            Scalar::Char(c) => write!(f, "{c:?}"),
        }
    }
}

/// Ordered, indexable members of an array or slice.
pub trait Sequence {
    fn len(&self) -> usize;

    fn get(&self, index: usize) -> Option<&dyn Reflect>;

    /// A nil sequence differs from an empty one.
    fn is_nil(&self) -> bool {
        false
    }

    /// Identity of the backing buffer, if it has one.
    fn identity(&self) -> Option<Identity> {
        None
    }
}

/// Keyed members of an associative container.
pub trait Mapping {
    fn len(&self) -> usize;

    /// Keys in the container's iteration order.
    fn keys(&self) -> Vec<&dyn Reflect>;

    /// Look up the value stored under `key`.
    ///
    /// Returns `None` when the key is absent or is not of the map's key type.
    fn get(&self, key: &dyn Reflect) -> Option<&dyn Reflect>;

    fn is_nil(&self) -> bool {
        false
    }

    fn identity(&self) -> Option<Identity> {
        None
    }
}

/// Channel-like queue with a buffered count and destructive receive.
pub trait Queue {
    /// Number of buffered elements.
    fn len(&self) -> usize;

    /// Receive the next buffered element, if any.
    fn recv(&self) -> Option<Box<dyn Reflect>>;
}

/// Nullable indirection (references, smart pointers, `Option`).
#[derive(Clone, Copy)]
pub struct Pointer<'a> {
    pub identity: Option<Identity>,
    pub target: Option<&'a dyn Reflect>,
}

impl<'a> Pointer<'a> {
    /// Non-null pointer whose identity is the pointee's address.
    pub fn to<T: Reflect>(target: &'a T) -> Self {
        Self {
            identity: Identity::of(target),
            target: Some(target),
        }
    }
}

/// Polymorphic container holding a value of any concrete type.
#[derive(Clone, Copy)]
pub struct Dynamic<'a> {
    pub identity: Option<Identity>,
    pub inner: Option<&'a dyn Reflect>,
}

/// Ordered fields of a struct, or of an enum variant.
#[derive(Default)]
pub struct Record<'a> {
    variant: Option<&'static str>,
    fields: Vec<Field<'a>>,
}

impl<'a> Record<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record describing the given enum variant.
    ///
    /// Two records with different variants never compare field by field.
    pub fn variant(name: &'static str) -> Self {
        Self {
            variant: Some(name),
            fields: Vec::new(),
        }
    }

    /// Append an untagged field.
    pub fn field(self, name: &'static str, value: &'a dyn Reflect) -> Self {
        self.tagged_field(name, value, &[])
    }

    /// Append a field carrying `(tag name, tag value)` annotations.
    pub fn tagged_field(
        mut self,
        name: &'static str,
        value: &'a dyn Reflect,
        tags: &'static [(&'static str, &'static str)],
    ) -> Self {
        self.fields.push(Field { name, value, tags });
        self
    }

    pub fn variant_name(&self) -> Option<&'static str> {
        self.variant
    }

    pub fn fields(&self) -> &[Field<'a>] {
        &self.fields
    }
}

/// A named member of a [`Record`].
#[derive(Clone, Copy)]
pub struct Field<'a> {
    pub name: &'static str,
    pub value: &'a dyn Reflect,
    tags: &'static [(&'static str, &'static str)],
}

impl Field<'_> {
    /// Value of the annotation named `key`, if present.
    pub fn tag(&self, key: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| *value)
    }
}

/// Runtime type of a reflected value.
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    id: TypeId,
    name: &'static str,
}

impl TypeInfo {
    pub fn of(value: &dyn Reflect) -> Self {
        let any: &dyn Any = value;
        Self {
            id: any.type_id(),
            name: value.type_name(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name with module paths stripped, e.g. `Vec<Book>`.
    pub fn short_name(&self) -> String {
        short_type_name(self.name)
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Stable token for the storage backing a value.
///
/// Two views referring to the same allocation yield equal identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identity(usize);

impl Identity {
    /// Identity of the storage `value` lives in.
    ///
    /// Zero-sized storage shares dangling addresses and has no identity.
    pub fn of<T: ?Sized>(value: &T) -> Option<Self> {
        if std::mem::size_of_val(value) == 0 {
            return None;
        }
        Some(Self(value as *const T as *const () as usize))
    }
}

pub(crate) fn short_type_name(name: &str) -> String {
    fn last_segment(path: &str) -> &str {
        path.rsplit("::").next().unwrap_or(path)
    }

    let mut short = String::with_capacity(name.len());
    let mut path = String::new();
    for c in name.chars() {
        if c.is_alphanumeric() || c == '_' || c == ':' {
            path.push(c);
        } else {
            short.push_str(last_segment(&path));
            path.clear();
            short.push(c);
        }
    }
    short.push_str(last_segment(&path));
    short
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_short_type_name_strips_paths() {
        assert_eq!(short_type_name("alloc::vec::Vec<my_crate::Book>"), "Vec<Book>");
        assert_eq!(
            short_type_name("std::collections::hash::map::HashMap<i32, alloc::string::String>"),
            "HashMap<i32, String>"
        );
        assert_eq!(short_type_name("&str"), "&str");
        assert_eq!(short_type_name("[u8; 3]"), "[u8; 3]");
    }

    #[test]
    fn test_type_info_is_dynamic() {
        let a: Box<dyn Reflect> = Box::new(1i32);
        let b: &dyn Reflect = &2i32;
        let c: &dyn Reflect = &2i64;
        assert_eq!(TypeInfo::of(a.as_ref()), TypeInfo::of(b));
        assert_ne!(TypeInfo::of(b), TypeInfo::of(c));
        assert_eq!(TypeInfo::of(b).short_name(), "i32");
    }

    #[test]
    fn test_identity_of_zero_sized_storage() {
        let empty: Vec<i32> = Vec::new();
        assert_eq!(Identity::of(empty.as_slice()), None);
        assert!(Identity::of(&()).is_none());

        let value = 7u64;
        assert_eq!(Identity::of(&value), Identity::of(&value));
    }

    #[test]
    fn test_scalar_zero() {
        assert!(Scalar::Int(0).is_zero());
        assert!(Scalar::F64(0.0).is_zero());
        assert!(!Scalar::F64(-0.0).is_zero());
        assert!(!Scalar::Bool(true).is_zero());
        assert!(Scalar::Char('\0').is_zero());
        assert_ne!(Scalar::F64(f64::NAN), Scalar::F64(f64::NAN));
    }

    #[test]
    fn test_view_zero_values() {
        assert!("".view().is_zero());
        assert!(Vec::<i32>::new().view().is_zero());
        assert!(!vec![0].view().is_zero());
        assert!([0u8; 3].view().is_zero());
        assert!(HashMap::<String, i32>::new().view().is_zero());
        assert!(None::<i32>.view().is_zero());
        assert!(!Some(0).view().is_zero());
    }

    #[test]
    fn test_field_tags() {
        let value = 3;
        let record = Record::new().tagged_field("f", &value, &[("cmp", "+"), ("json", "f")]);
        let field = record.fields()[0];
        assert_eq!(field.tag("cmp"), Some("+"));
        assert_eq!(field.tag("json"), Some("f"));
        assert_eq!(field.tag("yaml"), None);
    }

    #[test]
    fn test_view_kind_display() {
        assert_eq!(1u8.view().kind().to_string(), "scalar");
        assert_eq!(vec![1u8].view().kind().to_string(), "slice");
        assert_eq!([1u8].view().kind().to_string(), "array");
    }
}
