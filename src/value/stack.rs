//! Execution-stack values
//!
//! Scalar kinds are plain values and are copied on clone. Array, Struct and Map
//! live in a [`Shared`] cell, so cloning one of them produces a second reference
//! to the same object. This is how the VM aliases compound values, and it is
//! what makes diamond-shaped and self-referential graphs possible.

use num_bigint::BigInt;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::errors::CodecError;
use crate::value::kind::StackValueType;

/// Reference-counted, interior-mutable cell with identity comparison
pub struct Shared<T>(Rc<RefCell<T>>);

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    /// Borrow the contents
    ///
    /// Panics if the cell is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// True if both handles point at the same object
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Identity of the underlying object, stable while any handle is alive
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

/// The subset of stack values legal as map keys
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PrimitiveValue {
    Boolean(bool),
    Integer(BigInt),
    ByteString(Vec<u8>),
    Buffer(Vec<u8>),
}

impl PrimitiveValue {
    pub fn kind(&self) -> StackValueType {
        match self {
            PrimitiveValue::Boolean(_) => StackValueType::Boolean,
            PrimitiveValue::Integer(_) => StackValueType::Integer,
            PrimitiveValue::ByteString(_) => StackValueType::ByteString,
            PrimitiveValue::Buffer(_) => StackValueType::Buffer,
        }
    }
}

impl TryFrom<StackValue> for PrimitiveValue {
    type Error = CodecError;

    fn try_from(value: StackValue) -> Result<Self, Self::Error> {
        match value {
            StackValue::Boolean(b) => Ok(PrimitiveValue::Boolean(b)),
            StackValue::Integer(i) => Ok(PrimitiveValue::Integer(i)),
            StackValue::ByteString(bytes) => Ok(PrimitiveValue::ByteString(bytes)),
            StackValue::Buffer(bytes) => Ok(PrimitiveValue::Buffer(bytes)),
            other => Err(CodecError::InvalidMapKey {
                kind: other.kind().name().to_string(),
            }),
        }
    }
}

impl From<PrimitiveValue> for StackValue {
    fn from(value: PrimitiveValue) -> Self {
        match value {
            PrimitiveValue::Boolean(b) => StackValue::Boolean(b),
            PrimitiveValue::Integer(i) => StackValue::Integer(i),
            PrimitiveValue::ByteString(bytes) => StackValue::ByteString(bytes),
            PrimitiveValue::Buffer(bytes) => StackValue::Buffer(bytes),
        }
    }
}

/// Insertion-ordered key/value pairs with unique keys
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapEntries {
    entries: Vec<(PrimitiveValue, StackValue)>,
}

impl MapEntries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair, replacing the value of an equal key in place
    ///
    /// Returns the replaced value, if any.
    pub fn insert(&mut self, key: PrimitiveValue, value: StackValue) -> Option<StackValue> {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &PrimitiveValue) -> Option<&StackValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PrimitiveValue, &StackValue)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl FromIterator<(PrimitiveValue, StackValue)> for MapEntries {
    fn from_iter<I: IntoIterator<Item = (PrimitiveValue, StackValue)>>(iter: I) -> Self {
        let mut entries = MapEntries::new();
        for (key, value) in iter {
            entries.insert(key, value);
        }
        entries
    }
}

/// A value on the VM's execution stack
#[derive(Clone)]
pub enum StackValue {
    Null,
    Boolean(bool),
    Integer(BigInt),
    /// Immutable byte string
    ByteString(Vec<u8>),
    /// Mutable byte buffer
    Buffer(Vec<u8>),
    /// Reference-type list
    Array(Shared<Vec<StackValue>>),
    /// Value-type grouping, same layout as `Array`
    Struct(Shared<Vec<StackValue>>),
    Map(Shared<MapEntries>),
    /// Opaque payload standing in for a host-side handle
    InteropInterface(Vec<u8>),
    /// Instruction offset
    Pointer(i32),
}

impl StackValue {
    pub fn array(items: Vec<StackValue>) -> Self {
        StackValue::Array(Shared::new(items))
    }

    pub fn structure(items: Vec<StackValue>) -> Self {
        StackValue::Struct(Shared::new(items))
    }

    pub fn map(entries: MapEntries) -> Self {
        StackValue::Map(Shared::new(entries))
    }

    pub fn kind(&self) -> StackValueType {
        match self {
            StackValue::Null => StackValueType::Any,
            StackValue::Boolean(_) => StackValueType::Boolean,
            StackValue::Integer(_) => StackValueType::Integer,
            StackValue::ByteString(_) => StackValueType::ByteString,
            StackValue::Buffer(_) => StackValueType::Buffer,
            StackValue::Array(_) => StackValueType::Array,
            StackValue::Struct(_) => StackValueType::Struct,
            StackValue::Map(_) => StackValueType::Map,
            StackValue::InteropInterface(_) => StackValueType::InteropInterface,
            StackValue::Pointer(_) => StackValueType::Pointer,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, StackValue::Null)
    }

    /// Identity of a compound value; `None` for value-like kinds
    pub fn identity(&self) -> Option<usize> {
        match self {
            StackValue::Array(items) | StackValue::Struct(items) => Some(items.id()),
            StackValue::Map(entries) => Some(entries.id()),
            _ => None,
        }
    }

    /// True if both are the same compound object, not merely equal ones
    pub fn same_object(&self, other: &StackValue) -> bool {
        match (self.identity(), other.identity()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Append to an Array or Struct; returns false for other kinds
    pub fn push(&self, item: StackValue) -> bool {
        match self {
            StackValue::Array(items) | StackValue::Struct(items) => {
                items.borrow_mut().push(item);
                true
            }
            _ => false,
        }
    }

    /// Element count of a compound value
    pub fn len(&self) -> Option<usize> {
        match self {
            StackValue::Array(items) | StackValue::Struct(items) => Some(items.borrow().len()),
            StackValue::Map(entries) => Some(entries.borrow().len()),
            _ => None,
        }
    }
}

impl PartialEq for StackValue {
    /// Structural equality; Array and Struct never compare equal to each other
    ///
    /// Two distinct but isomorphic cyclic graphs are not comparable: the
    /// comparison only terminates when the cycle closes on a shared object.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (StackValue::Null, StackValue::Null) => true,
            (StackValue::Boolean(a), StackValue::Boolean(b)) => a == b,
            (StackValue::Integer(a), StackValue::Integer(b)) => a == b,
            (StackValue::ByteString(a), StackValue::ByteString(b)) => a == b,
            (StackValue::Buffer(a), StackValue::Buffer(b)) => a == b,
            (StackValue::Array(a), StackValue::Array(b))
            | (StackValue::Struct(a), StackValue::Struct(b)) => {
                a.ptr_eq(b) || *a.borrow() == *b.borrow()
            }
            (StackValue::Map(a), StackValue::Map(b)) => a.ptr_eq(b) || *a.borrow() == *b.borrow(),
            (StackValue::InteropInterface(a), StackValue::InteropInterface(b)) => a == b,
            (StackValue::Pointer(a), StackValue::Pointer(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for StackValue {
    fn from(value: bool) -> Self {
        StackValue::Boolean(value)
    }
}

impl From<i64> for StackValue {
    fn from(value: i64) -> Self {
        StackValue::Integer(BigInt::from(value))
    }
}

impl From<BigInt> for StackValue {
    fn from(value: BigInt) -> Self {
        StackValue::Integer(value)
    }
}

impl From<&str> for StackValue {
    fn from(value: &str) -> Self {
        StackValue::ByteString(value.as_bytes().to_vec())
    }
}

impl fmt::Debug for StackValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ancestors = RefCell::new(Vec::new());
        DebugNode {
            value: self,
            ancestors: &ancestors,
        }
        .fmt(f)
    }
}

/// Debug view that prints `<cycle>` instead of re-entering an ancestor
struct DebugNode<'a> {
    value: &'a StackValue,
    ancestors: &'a RefCell<Vec<usize>>,
}

impl DebugNode<'_> {
    fn child<'b>(&'b self, value: &'b StackValue) -> DebugNode<'b> {
        DebugNode {
            value,
            ancestors: self.ancestors,
        }
    }

    fn enter(&self, f: &mut fmt::Formatter<'_>, id: usize) -> Result<bool, fmt::Error> {
        if self.ancestors.borrow().contains(&id) {
            write!(f, "{}(<cycle>)", self.value.kind())?;
            return Ok(false);
        }
        self.ancestors.borrow_mut().push(id);
        Ok(true)
    }
}

impl fmt::Debug for DebugNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            StackValue::Null => f.write_str("Null"),
            StackValue::Boolean(b) => write!(f, "Boolean({})", b),
            StackValue::Integer(i) => write!(f, "Integer({})", i),
            StackValue::ByteString(bytes) => write!(f, "ByteString(0x{})", hex::encode(bytes)),
            StackValue::Buffer(bytes) => write!(f, "Buffer(0x{})", hex::encode(bytes)),
            StackValue::InteropInterface(bytes) => {
                write!(f, "InteropInterface(0x{})", hex::encode(bytes))
            }
            StackValue::Pointer(offset) => write!(f, "Pointer({})", offset),
            StackValue::Array(items) | StackValue::Struct(items) => {
                if !self.enter(f, items.id())? {
                    return Ok(());
                }
                let items = items.borrow();
                let result = f
                    .write_str(self.value.kind().name())
                    .and_then(|_| {
                        f.debug_list()
                            .entries(items.iter().map(|item| self.child(item)))
                            .finish()
                    });
                self.ancestors.borrow_mut().pop();
                result
            }
            StackValue::Map(entries) => {
                if !self.enter(f, entries.id())? {
                    return Ok(());
                }
                let entries = entries.borrow();
                let result = f.write_str("Map").and_then(|_| {
                    f.debug_map()
                        .entries(entries.iter().map(|(k, v)| (k, self.child(v))))
                        .finish()
                });
                self.ancestors.borrow_mut().pop();
                result
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_compound_identity() {
        let a = StackValue::array(vec![StackValue::from(1)]);
        let b = a.clone();
        assert!(a.same_object(&b));

        b.push(StackValue::from(2));
        assert_eq!(a.len(), Some(2));
    }

    #[test]
    fn test_equal_but_not_same() {
        let a = StackValue::array(vec![StackValue::from(true)]);
        let b = StackValue::array(vec![StackValue::from(true)]);
        assert_eq!(a, b);
        assert!(!a.same_object(&b));
        assert!(!StackValue::from(1).same_object(&StackValue::from(1)));
    }

    #[test]
    fn test_array_and_struct_differ() {
        let a = StackValue::array(vec![]);
        let s = StackValue::structure(vec![]);
        assert_ne!(a, s);
        assert_ne!(
            StackValue::ByteString(vec![1]),
            StackValue::Buffer(vec![1])
        );
    }

    #[test]
    fn test_map_insert_overwrites() {
        let mut entries = MapEntries::new();
        let key = PrimitiveValue::Integer(BigInt::from(1));
        assert!(entries.insert(key.clone(), StackValue::from(10)).is_none());
        assert_eq!(
            entries.insert(key.clone(), StackValue::from(20)),
            Some(StackValue::from(10))
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(entries.get(&key), Some(&StackValue::from(20)));
    }

    #[test]
    fn test_primitive_conversion() {
        let key = PrimitiveValue::try_from(StackValue::from("abc")).unwrap();
        assert_eq!(key.kind(), StackValueType::ByteString);

        let err = PrimitiveValue::try_from(StackValue::array(vec![])).unwrap_err();
        assert_eq!(
            err,
            CodecError::InvalidMapKey {
                kind: "Array".to_string()
            }
        );
        assert!(PrimitiveValue::try_from(StackValue::Null).is_err());
    }

    #[test]
    fn test_self_reference_equality_and_debug_terminate() {
        let a = StackValue::array(vec![StackValue::from(1)]);
        a.push(a.clone());

        assert_eq!(a, a.clone());
        let rendered = format!("{:?}", a);
        assert_eq!(rendered, "Array[Integer(1), Array(<cycle>)]");
    }

    #[test]
    fn test_debug_diamond_is_expanded() {
        let a = StackValue::array(vec![StackValue::from(true)]);
        let s = StackValue::structure(vec![a.clone(), a]);
        assert_eq!(
            format!("{:?}", s),
            "Struct[Array[Boolean(true)], Array[Boolean(true)]]"
        );
    }
}
