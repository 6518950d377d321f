//! Decoded values.
//!
//! A [`Value`] is the in-memory form of data described by a
//! [`Schema`][crate::schema::Schema]. Tags are not part of values: a value
//! of an implicitly or explicitly tagged type is simply the value of the
//! inner type. Values of SEQUENCE and SET types keep their fields in
//! [`Fields`], values of CHOICE types name their alternative in a
//! [`Chosen`].

use std::fmt;
use crate::captured::Captured;
use crate::int::Integer;
use crate::oid::Oid;
use crate::ostring::OctetString;


//------------ Value ---------------------------------------------------------

/// A value of some ASN.1 type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    Integer(Integer),
    OctetString(OctetString),
    Oid(Oid),
    Null,
    Any(Captured),
    Sequence(Fields),
    Set(Fields),
    SequenceOf(Vec<Value>),
    SetOf(Vec<Value>),
    Choice(Box<Chosen>),
}

impl Value {
    /// Creates the value of a CHOICE.
    pub fn choice(name: &'static str, value: Value) -> Self {
        Value::Choice(Box::new(Chosen::new(name, value)))
    }

    /// Returns the kind of value for use in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::OctetString(_) => "OCTET STRING",
            Value::Oid(_) => "OBJECT IDENTIFIER",
            Value::Null => "NULL",
            Value::Any(_) => "ANY",
            Value::Sequence(_) => "SEQUENCE",
            Value::Set(_) => "SET",
            Value::SequenceOf(_) => "SEQUENCE OF",
            Value::SetOf(_) => "SET OF",
            Value::Choice(_) => "CHOICE",
        }
    }

    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            Value::Integer(inner) => Some(inner),
            _ => None
        }
    }

    pub fn as_octet_string(&self) -> Option<&OctetString> {
        match self {
            Value::OctetString(inner) => Some(inner),
            _ => None
        }
    }

    pub fn as_oid(&self) -> Option<&Oid> {
        match self {
            Value::Oid(inner) => Some(inner),
            _ => None
        }
    }

    pub fn as_captured(&self) -> Option<&Captured> {
        match self {
            Value::Any(inner) => Some(inner),
            _ => None
        }
    }

    /// Returns the fields of a SEQUENCE or SET value.
    pub fn as_fields(&self) -> Option<&Fields> {
        match self {
            Value::Sequence(inner) | Value::Set(inner) => Some(inner),
            _ => None
        }
    }

    /// Returns the fields of a SEQUENCE or SET value for modification.
    pub fn as_fields_mut(&mut self) -> Option<&mut Fields> {
        match self {
            Value::Sequence(inner) | Value::Set(inner) => Some(inner),
            _ => None
        }
    }

    /// Returns the elements of a SEQUENCE OF or SET OF value.
    pub fn as_elements(&self) -> Option<&[Value]> {
        match self {
            Value::SequenceOf(inner) | Value::SetOf(inner) => Some(inner),
            _ => None
        }
    }

    pub fn as_chosen(&self) -> Option<&Chosen> {
        match self {
            Value::Choice(inner) => Some(inner),
            _ => None
        }
    }

    /// Returns the field with the given name of a SEQUENCE or SET value.
    ///
    /// Returns `None` if the value isn’t a SEQUENCE or SET or if the field
    /// is absent.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.as_fields().and_then(|fields| fields.get(name))
    }

    /// Returns the field with the given name for modification.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.as_fields_mut().and_then(|fields| fields.get_mut(name))
    }
}


//--- From

impl From<Integer> for Value {
    fn from(src: Integer) -> Self {
        Value::Integer(src)
    }
}

macro_rules! from_native_int {
    ( $( $type:ident ),* ) => {
        $(
            impl From<$type> for Value {
                fn from(src: $type) -> Self {
                    Value::Integer(src.into())
                }
            }
        )*
    }
}

from_native_int!(i32, i64, u32, u64);

impl From<OctetString> for Value {
    fn from(src: OctetString) -> Self {
        Value::OctetString(src)
    }
}

impl From<Oid> for Value {
    fn from(src: Oid) -> Self {
        Value::Oid(src)
    }
}

impl From<Captured> for Value {
    fn from(src: Captured) -> Self {
        Value::Any(src)
    }
}


//------------ Fields --------------------------------------------------------

/// The fields present in a SEQUENCE or SET value.
///
/// Fields are identified by name. Absent optional fields are simply not
/// there. The order in which fields are inserted is kept but it doesn’t
/// matter: the encoder uses the order of the schema and two field sets
/// are equal if they contain the same fields with equal values.
#[derive(Clone, Default)]
pub struct Fields {
    entries: Vec<(&'static str, Value)>,
}

impl Fields {
    /// Creates an empty set of fields.
    pub fn new() -> Self {
        Fields::default()
    }

    /// Adds a field and returns the set.
    ///
    /// This is a convenient way to build up values.
    pub fn with(mut self, name: &'static str, value: impl Into<Value>) -> Self {
        self.insert(name, value.into());
        self
    }

    /// Inserts a field, returning its previous value if present.
    pub fn insert(
        &mut self, name: &'static str, value: Value
    ) -> Option<Value> {
        match self.get_mut(name) {
            Some(item) => Some(std::mem::replace(item, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Returns the value of the named field if it is present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|item| item.0 == name).map(|item| &item.1)
    }

    /// Returns the value of the named field for modification.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.entries.iter_mut().find(|item| item.0 == name).map(|item| {
            &mut item.1
        })
    }

    /// Removes the named field, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let idx = self.entries.iter().position(|item| item.0 == name)?;
        Some(self.entries.remove(idx).1)
    }

    /// Returns whether the named field is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the number of fields present.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no fields are present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the names and values of all fields.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.entries.iter().map(|item| (item.0, &item.1))
    }
}

impl PartialEq for Fields {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(name, value)| {
            other.get(name) == Some(value)
        })
    }
}

impl Eq for Fields { }

impl fmt::Debug for Fields {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}


//------------ Chosen --------------------------------------------------------

/// The value of a CHOICE type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Chosen {
    /// The name of the alternative.
    name: &'static str,

    /// The value of the alternative.
    value: Value,
}

impl Chosen {
    pub fn new(name: &'static str, value: Value) -> Self {
        Chosen { name, value }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fields_ignore_order() {
        let left = Fields::new().with("a", 1).with("b", 2);
        let right = Fields::new().with("b", 2).with("a", 1);
        assert_eq!(left, right);
        assert_ne!(left, Fields::new().with("a", 1));
        assert_ne!(left, Fields::new().with("a", 1).with("b", 3));
    }

    #[test]
    fn fields_insert_and_remove() {
        let mut fields = Fields::new().with("a", 1);
        assert_eq!(fields.insert("a", Value::from(2)), Some(Value::from(1)));
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("a"), Some(&Value::from(2)));
        assert!(fields.contains("a"));
        assert_eq!(fields.remove("a"), Some(Value::from(2)));
        assert_eq!(fields.remove("a"), None);
        assert!(fields.is_empty());
    }

    #[test]
    fn accessors() {
        let value = Value::Sequence(
            Fields::new().with("inner", Value::Set(Fields::new().with("x", 5)))
        );
        assert_eq!(
            value.field("inner").and_then(|v| v.field("x")),
            Some(&Value::from(5))
        );
        assert!(value.field("x").is_none());
        assert!(Value::Null.field("x").is_none());
        let chosen = Value::choice("n", Value::Null);
        assert_eq!(chosen.as_chosen().map(Chosen::name), Some("n"));
        assert_eq!(chosen.type_name(), "CHOICE");
    }
}
