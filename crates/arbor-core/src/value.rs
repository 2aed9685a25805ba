use ordered_float::OrderedFloat;
use std::fmt;
use std::slice;

/// The tag of a [`Value`], in the fixed order used by [`Value::compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Object,
    Array,
    String,
    Integer,
    Real,
    Boolean,
    Null,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::Object => "object",
            Kind::Array => "array",
            Kind::String => "string",
            Kind::Integer => "integer",
            Kind::Real => "real",
            Kind::Boolean => "boolean",
            Kind::Null => "null",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single node of a JSON document tree.
///
/// Objects own their members as ordered `(key, value)` pairs and arrays own
/// their elements; a node's key therefore lives in its parent, and a root has
/// none. `Integer` and `Real` both store an IEEE 754 double — the split
/// records whether the producing syntax had a fractional part or an exponent,
/// so that serialisation can reproduce it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Value {
    Object(Vec<(String, Value)>),
    Array(Vec<Value>),
    String(String),
    Integer(OrderedFloat<f64>),
    Real(OrderedFloat<f64>),
    Boolean(bool),
    #[default]
    Null,
}

/// A borrowed view of a node together with the key it is stored under,
/// if any. This is what tree traversals and comparators operate on.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    pub key: Option<&'a str>,
    pub value: &'a Value,
}

/// Returned when a structural operation is applied to the wrong kind of node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StructureError {
    #[error("node is not an array")]
    NotAnArray,
    #[error("node is not an object")]
    NotAnObject,
}

/// Iterator over the direct children of a node, scalars yielding nothing.
#[derive(Debug, Clone)]
pub enum Children<'a> {
    Members(slice::Iter<'a, (String, Value)>),
    Elements(slice::Iter<'a, Value>),
    Empty,
}

impl<'a> Iterator for Children<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<NodeRef<'a>> {
        match self {
            Children::Members(iter) => iter.next().map(|(key, value)| NodeRef {
                key: Some(key.as_str()),
                value,
            }),
            Children::Elements(iter) => iter.next().map(|value| NodeRef { key: None, value }),
            Children::Empty => None,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Children::Members(iter) => iter.size_hint(),
            Children::Elements(iter) => iter.size_hint(),
            Children::Empty => (0, Some(0)),
        }
    }
}

impl ExactSizeIterator for Children<'_> {}

// Constructors.
impl Value {
    pub fn object() -> Self {
        Value::Object(Vec::new())
    }

    pub fn array() -> Self {
        Value::Array(Vec::new())
    }

    pub fn string(text: impl Into<String>) -> Self {
        Value::String(text.into())
    }

    /// A number carrying the integer tag. The argument is truncated.
    pub fn integer(number: f64) -> Self {
        Value::Integer(OrderedFloat(number.trunc()))
    }

    /// A number carrying the real tag. Non-finite values serialise as `null`.
    pub fn real(number: f64) -> Self {
        Value::Real(OrderedFloat(number))
    }

    pub fn boolean(value: bool) -> Self {
        Value::Boolean(value)
    }

    pub fn null() -> Self {
        Value::Null
    }

    /// A string node built from format arguments:
    /// `Value::format(format_args!("{n} items"))`.
    pub fn format(args: fmt::Arguments<'_>) -> Self {
        Value::String(fmt::format(args))
    }
}

// Predicates, mirroring the tag taxonomy.
impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Object(_) => Kind::Object,
            Value::Array(_) => Kind::Array,
            Value::String(_) => Kind::String,
            Value::Integer(_) => Kind::Integer,
            Value::Real(_) => Kind::Real,
            Value::Boolean(_) => Kind::Boolean,
            Value::Null => Kind::Null,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_iterable(&self) -> bool {
        matches!(self, Value::Object(_) | Value::Array(_))
    }

    pub fn is_scalar(&self) -> bool {
        !self.is_iterable()
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    /// An integer that is not negative.
    pub fn is_unsigned(&self) -> bool {
        matches!(self, Value::Integer(n) if n.0 >= 0.0)
    }

    pub fn is_real(&self) -> bool {
        matches!(self, Value::Real(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Real(_))
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Value::Boolean(_))
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Value::Boolean(true))
    }

    pub fn is_false(&self) -> bool {
        matches!(self, Value::Boolean(false))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether a double can represent the integer exactly: `|x| < 2^53`.
    pub fn is_safe_integer(number: f64) -> bool {
        number.abs() < 9_007_199_254_740_992.0
    }
}

// Accessors.
impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(text) => Some(text),
            _ => None,
        }
    }

    /// The numeric payload of an integer or real node.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Integer(n) | Value::Real(n) => Some(n.0),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Number of direct children; 0 for scalars.
    pub fn size(&self) -> usize {
        match self {
            Value::Object(members) => members.len(),
            Value::Array(elements) => elements.len(),
            _ => 0,
        }
    }

    /// UTF-8 code point count of a string node; 0 otherwise.
    pub fn char_len(&self) -> usize {
        match self {
            Value::String(text) => text.chars().count(),
            _ => 0,
        }
    }

    pub fn members(&self) -> Option<&Vec<(String, Value)>> {
        match self {
            Value::Object(members) => Some(members),
            _ => None,
        }
    }

    pub fn members_mut(&mut self) -> Option<&mut Vec<(String, Value)>> {
        match self {
            Value::Object(members) => Some(members),
            _ => None,
        }
    }

    pub fn elements(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(elements) => Some(elements),
            _ => None,
        }
    }

    pub fn elements_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(elements) => Some(elements),
            _ => None,
        }
    }

    /// Child at a position, for objects and arrays alike.
    pub fn at(&self, index: usize) -> Option<&Value> {
        match self {
            Value::Object(members) => members.get(index).map(|(_, value)| value),
            Value::Array(elements) => elements.get(index),
            _ => None,
        }
    }

    pub fn at_mut(&mut self, index: usize) -> Option<&mut Value> {
        match self {
            Value::Object(members) => members.get_mut(index).map(|(_, value)| value),
            Value::Array(elements) => elements.get_mut(index),
            _ => None,
        }
    }

    /// Key of the object member at a position.
    pub fn key_at(&self, index: usize) -> Option<&str> {
        match self {
            Value::Object(members) => members.get(index).map(|(key, _)| key.as_str()),
            _ => None,
        }
    }

    /// First object member with the given key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(members) => members
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        match self {
            Value::Object(members) => members
                .iter_mut()
                .find(|(k, _)| k == key)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// Every object member with the given key, in insertion order.
    /// Duplicate keys are legal, so this may yield more than one node.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.members()
            .into_iter()
            .flat_map(|members| members.iter())
            .filter(move |(k, _)| k == key)
            .map(|(_, value)| value)
    }

    /// Position of the first member with the given key.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.members()?.iter().position(|(k, _)| k == key)
    }

    /// Whether any member has the given key.
    pub fn has(&self, key: &str) -> bool {
        self.index_of(key).is_some()
    }

    pub fn children(&self) -> Children<'_> {
        match self {
            Value::Object(members) => Children::Members(members.iter()),
            Value::Array(elements) => Children::Elements(elements.iter()),
            _ => Children::Empty,
        }
    }

    /// First child that is deep-equal to `what`, by value regardless of key.
    pub fn locate(&self, what: &Value) -> Option<&Value> {
        self.children()
            .map(|child| child.value)
            .find(|child| *child == what)
    }
}

// Structural mutation. Attaching a child moves it into the container;
// detaching moves it back out as a new root.
impl Value {
    pub fn push(&mut self, value: Value) -> Result<(), StructureError> {
        self.elements_checked()?.push(value);
        Ok(())
    }

    pub fn push_front(&mut self, value: Value) -> Result<(), StructureError> {
        self.elements_checked()?.insert(0, value);
        Ok(())
    }

    /// Insert at a position; an out-of-range index appends.
    pub fn insert(&mut self, index: usize, value: Value) -> Result<(), StructureError> {
        let elements = self.elements_checked()?;
        let index = index.min(elements.len());
        elements.insert(index, value);
        Ok(())
    }

    pub fn pop_back(&mut self) -> Option<Value> {
        match self {
            Value::Array(elements) => elements.pop(),
            _ => None,
        }
    }

    pub fn pop_front(&mut self) -> Option<Value> {
        match self {
            Value::Array(elements) if !elements.is_empty() => Some(elements.remove(0)),
            _ => None,
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<Value> {
        match self {
            Value::Array(elements) if index < elements.len() => Some(elements.remove(index)),
            _ => None,
        }
    }

    pub fn push_entry(
        &mut self,
        key: impl Into<String>,
        value: Value,
    ) -> Result<(), StructureError> {
        self.members_checked()?.push((key.into(), value));
        Ok(())
    }

    pub fn push_entry_front(
        &mut self,
        key: impl Into<String>,
        value: Value,
    ) -> Result<(), StructureError> {
        self.members_checked()?.insert(0, (key.into(), value));
        Ok(())
    }

    /// Insert a member at a position; an out-of-range index appends.
    pub fn insert_entry(
        &mut self,
        index: usize,
        key: impl Into<String>,
        value: Value,
    ) -> Result<(), StructureError> {
        let members = self.members_checked()?;
        let index = index.min(members.len());
        members.insert(index, (key.into(), value));
        Ok(())
    }

    pub fn pop_entry_back(&mut self) -> Option<(String, Value)> {
        match self {
            Value::Object(members) => members.pop(),
            _ => None,
        }
    }

    pub fn pop_entry_front(&mut self) -> Option<(String, Value)> {
        match self {
            Value::Object(members) if !members.is_empty() => Some(members.remove(0)),
            _ => None,
        }
    }

    pub fn remove_entry_at(&mut self, index: usize) -> Option<(String, Value)> {
        match self {
            Value::Object(members) if index < members.len() => Some(members.remove(index)),
            _ => None,
        }
    }

    /// Detach the first member with the given key.
    pub fn remove_entry(&mut self, key: &str) -> Option<Value> {
        let index = self.index_of(key)?;
        self.remove_entry_at(index).map(|(_, value)| value)
    }

    /// Rename the member at a position.
    pub fn set_key(&mut self, index: usize, key: impl Into<String>) -> bool {
        match self {
            Value::Object(members) => match members.get_mut(index) {
                Some(member) => {
                    member.0 = key.into();
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Replace this node with `Null` and return the previous payload.
    pub fn take(&mut self) -> Value {
        std::mem::take(self)
    }

    fn elements_checked(&mut self) -> Result<&mut Vec<Value>, StructureError> {
        self.elements_mut().ok_or(StructureError::NotAnArray)
    }

    fn members_checked(&mut self) -> Result<&mut Vec<(String, Value)>, StructureError> {
        self.members_mut().ok_or(StructureError::NotAnObject)
    }
}

impl Value {
    /// Total order over nodes: by tag first (the [`Kind`] declaration order),
    /// then by payload — numerically for numbers and booleans, bytewise for
    /// strings. Two iterables of the same tag compare equal, so this is a
    /// sort key rather than an `Ord` implementation.
    pub fn compare(&self, other: &Value) -> std::cmp::Ordering {
        let order = self.kind().cmp(&other.kind());
        if order != std::cmp::Ordering::Equal {
            return order;
        }
        match (self, other) {
            (Value::String(a), Value::String(b)) => a.as_bytes().cmp(b.as_bytes()),
            (Value::Integer(a), Value::Integer(b)) | (Value::Real(a), Value::Real(b)) => a.cmp(b),
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::String(text.to_owned())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::String(text)
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Value::real(number)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

macro_rules! impl_from_int {
    ($($ty: ty)+) => {
        $(
            impl From<$ty> for Value {
                fn from(number: $ty) -> Self {
                    Value::Integer(OrderedFloat(number as f64))
                }
            }
        )+
    }
}

impl_from_int! { i8 i16 i32 i64 u8 u16 u32 u64 }
