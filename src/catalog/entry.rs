use super::storage::{SharedCell, TextValue};
use super::types::ValueType;

/// Typed reference to the host-owned storage behind a property.
///
/// The variant fixes both the value type and the cell shape, so a property
/// cannot be declared with storage of the wrong width.
#[derive(Clone, Copy)]
pub enum PropertyBinding<'a> {
    Logical(&'a SharedCell<bool>),
    Integer(&'a SharedCell<i32>),
    Real(&'a SharedCell<f32>),
    TimeSpan(&'a SharedCell<f32>),
    DateTime(&'a SharedCell<TextValue>),
    Text(&'a SharedCell<TextValue>),
    Link(&'a SharedCell<TextValue>),
    ResourceUrl(&'a SharedCell<TextValue>),
}

impl<'a> PropertyBinding<'a> {
    pub const fn value_type(&self) -> ValueType {
        match self {
            PropertyBinding::Logical(_) => ValueType::Logical,
            PropertyBinding::Integer(_) => ValueType::Integer,
            PropertyBinding::Real(_) => ValueType::Real,
            PropertyBinding::TimeSpan(_) => ValueType::TimeSpan,
            PropertyBinding::DateTime(_) => ValueType::DateTime,
            PropertyBinding::Text(_) => ValueType::Text,
            PropertyBinding::Link(_) => ValueType::Link,
            PropertyBinding::ResourceUrl(_) => ValueType::ResourceUrl,
        }
    }

}

/// Borrowed nullary callable behind a method. The shape carries the
/// return-type discipline: value emission is a single match on the thunk.
#[derive(Clone, Copy)]
pub enum MethodThunk<'a> {
    Void(&'a (dyn Fn() + Sync)),
    Integer(&'a (dyn Fn() -> i32 + Sync)),
    Real(&'a (dyn Fn() -> f32 + Sync)),
    Text(&'a (dyn Fn() -> String + Sync)),
}

pub struct Property<'a> {
    pub name: &'a str,
    pub binding: PropertyBinding<'a>,
    pub read_only: bool,
}

pub struct Method<'a> {
    pub name: &'a str,
    pub return_type: ValueType,
    pub thunk: MethodThunk<'a>,
}

/// One catalog row: a property bound to host storage or a method bound to
/// a host callable.
pub enum Entry<'a> {
    Property(Property<'a>),
    Method(Method<'a>),
}

impl<'a> Entry<'a> {
    pub const fn property(name: &'a str, binding: PropertyBinding<'a>) -> Self {
        Entry::Property(Property {
            name,
            binding,
            read_only: false,
        })
    }

    pub const fn property_read_only(name: &'a str, binding: PropertyBinding<'a>) -> Self {
        Entry::Property(Property {
            name,
            binding,
            read_only: true,
        })
    }

    /// Declare a method with a typed return. The declared type must agree
    /// with the thunk's shape; a mismatch is a catalog declaration error
    /// and fails at construction.
    pub const fn method(name: &'a str, return_type: ValueType, thunk: MethodThunk<'a>) -> Self {
        let agrees = match (return_type, &thunk) {
            (ValueType::Null, MethodThunk::Void(_)) => true,
            (ValueType::Integer, MethodThunk::Integer(_)) => true,
            (ValueType::Real | ValueType::TimeSpan, MethodThunk::Real(_)) => true,
            (
                ValueType::DateTime | ValueType::Text | ValueType::Link | ValueType::ResourceUrl,
                MethodThunk::Text(_),
            ) => true,
            _ => false,
        };
        assert!(agrees, "method thunk does not match its declared return type");
        Entry::Method(Method {
            name,
            return_type,
            thunk,
        })
    }

    pub const fn void_method(name: &'a str, f: &'a (dyn Fn() + Sync)) -> Self {
        Entry::Method(Method {
            name,
            return_type: ValueType::Null,
            thunk: MethodThunk::Void(f),
        })
    }

    pub fn name(&self) -> &'a str {
        match self {
            Entry::Property(p) => p.name,
            Entry::Method(m) => m.name,
        }
    }
}
