//! Describing the structure of encoded data.
//!
//! A [`Schema`] describes the ASN.1 type of a value: which universal type
//! it is, which fields a SEQUENCE or SET has, which alternatives a CHOICE
//! offers, and how values are tagged. Schemas are ordinary values built by
//! composing the constructor functions of this module, typically once per
//! type in a function of their own:
//!
//! ```
//! use berschema::Tag;
//! use berschema::schema::{Field, Schema};
//! use berschema::value::Value;
//!
//! fn record() -> Schema {
//!     Schema::sequence([
//!         Field::new("version", Schema::Integer).default(Value::from(0)),
//!         Field::new("name", Schema::OctetString),
//!         Field::new("extra", Schema::Any.explicit(Tag::ctx(0)))
//!             .optional(),
//!     ])
//! }
//! # let _ = record();
//! ```
//!
//! The same schema drives both the [encoder][crate::encode] and the
//! [decoder][crate::decode].

use std::fmt;
use crate::ident::Tag;
use crate::value::Value;


//------------ Schema --------------------------------------------------------

/// The description of an ASN.1 type.
#[derive(Clone, Debug)]
pub enum Schema {
    /// An INTEGER of arbitrary size.
    Integer,

    /// An OCTET STRING.
    OctetString,

    /// An OBJECT IDENTIFIER.
    Oid,

    /// The NULL type.
    Null,

    /// Any single value, kept in its encoded form.
    Any,

    /// A SEQUENCE with the given fields in order.
    Sequence(Vec<Field>),

    /// A SET with the given fields.
    ///
    /// Fields are encoded in declaration order and must appear in that order
    /// when decoding.
    Set(Vec<Field>),

    /// A SEQUENCE OF values of the given type.
    SequenceOf(Box<Schema>),

    /// A SET OF values of the given type.
    SetOf(Box<Schema>),

    /// A CHOICE between alternatives.
    Choice(Choice),

    /// A type with its tag replaced.
    ///
    /// If the inner type is a CHOICE or ANY, the tag is explicit instead
    /// since the inner tag is needed to determine the value.
    Implicit(Tag, Box<Schema>),

    /// A type wrapped into a constructed value with the given tag.
    Explicit(Tag, Box<Schema>),
}

impl Schema {
    /// Creates a SEQUENCE type from a list of fields.
    pub fn sequence(fields: impl IntoIterator<Item = Field>) -> Self {
        Schema::Sequence(fields.into_iter().collect())
    }

    /// Creates a SET type from a list of fields.
    pub fn set(fields: impl IntoIterator<Item = Field>) -> Self {
        Schema::Set(fields.into_iter().collect())
    }

    /// Creates a SEQUENCE OF type.
    pub fn sequence_of(element: Schema) -> Self {
        Schema::SequenceOf(Box::new(element))
    }

    /// Creates a SET OF type.
    pub fn set_of(element: Schema) -> Self {
        Schema::SetOf(Box::new(element))
    }

    /// Creates a CHOICE type from a list of alternatives.
    pub fn choice(
        alternatives: impl IntoIterator<Item = Alternative>
    ) -> Self {
        Schema::Choice(Choice::new(alternatives))
    }

    /// Converts the type into one with an implicit tag.
    pub fn implicit(self, tag: Tag) -> Self {
        Schema::Implicit(tag, Box::new(self))
    }

    /// Converts the type into one with an explicit tag.
    pub fn explicit(self, tag: Tag) -> Self {
        Schema::Explicit(tag, Box::new(self))
    }

    /// Returns the tag a value of this type is encoded with.
    ///
    /// Returns `None` for CHOICE and ANY as their tag depends on the value.
    pub fn tag(&self) -> Option<Tag> {
        match *self {
            Schema::Integer => Some(Tag::INTEGER),
            Schema::OctetString => Some(Tag::OCTET_STRING),
            Schema::Oid => Some(Tag::OID),
            Schema::Null => Some(Tag::NULL),
            Schema::Sequence(_) | Schema::SequenceOf(_) => {
                Some(Tag::SEQUENCE)
            }
            Schema::Set(_) | Schema::SetOf(_) => Some(Tag::SET),
            Schema::Implicit(tag, _) | Schema::Explicit(tag, _) => Some(tag),
            Schema::Any | Schema::Choice(_) => None,
        }
    }

    /// Returns whether a value with the given tag can be of this type.
    pub fn matches(&self, tag: Tag) -> bool {
        match self {
            Schema::Any => true,
            Schema::Choice(choice) => choice.lookup(tag).is_some(),
            _ => self.tag() == Some(tag),
        }
    }

    /// Returns the name of the type for use in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Schema::Integer => "INTEGER",
            Schema::OctetString => "OCTET STRING",
            Schema::Oid => "OBJECT IDENTIFIER",
            Schema::Null => "NULL",
            Schema::Any => "ANY",
            Schema::Sequence(_) => "SEQUENCE",
            Schema::Set(_) => "SET",
            Schema::SequenceOf(_) => "SEQUENCE OF",
            Schema::SetOf(_) => "SET OF",
            Schema::Choice(_) => "CHOICE",
            Schema::Implicit(_, inner) | Schema::Explicit(_, inner) => {
                inner.type_name()
            }
        }
    }
}


//------------ Field ---------------------------------------------------------

/// A named field of a SEQUENCE or SET.
#[derive(Clone, Debug)]
pub struct Field {
    /// The name of the field.
    name: &'static str,

    /// The type of the field.
    schema: Schema,

    /// Whether and how the field may be absent.
    presence: Presence,
}

/// Whether a field has to be present.
#[derive(Clone, Debug, PartialEq)]
pub enum Presence {
    /// The field must always be present.
    Required,

    /// The field may be absent.
    Optional,

    /// The field may be absent in which case it has the given value.
    ///
    /// The encoder omits the field if its value equals the default.
    Default(Value),
}

impl Field {
    /// Creates a new required field.
    pub fn new(name: &'static str, schema: Schema) -> Self {
        Field { name, schema, presence: Presence::Required }
    }

    /// Makes the field optional.
    pub fn optional(mut self) -> Self {
        self.presence = Presence::Optional;
        self
    }

    /// Gives the field a default value.
    pub fn default(mut self, value: Value) -> Self {
        self.presence = Presence::Default(value);
        self
    }

    /// Returns the name of the field.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the type of the field.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns whether and how the field may be absent.
    pub fn presence(&self) -> &Presence {
        &self.presence
    }
}


//------------ Alternative ---------------------------------------------------

/// A named alternative of a CHOICE.
#[derive(Clone, Debug)]
pub struct Alternative {
    name: &'static str,
    schema: Schema,
}

impl Alternative {
    /// Creates a new alternative.
    pub fn new(name: &'static str, schema: Schema) -> Self {
        Alternative { name, schema }
    }

    /// Returns the name of the alternative.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the type of the alternative.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}


//------------ Choice --------------------------------------------------------

/// The alternatives of a CHOICE type.
///
/// When a choice is created, a dispatch table is built that maps the tags
/// of the alternatives to their index. Alternatives that are themselves
/// untagged choices contribute all the tags of their own alternatives. An
/// ANY alternative matches all tags. The table is searched in declaration
/// order, so an ANY alternative should come last.
#[derive(Clone, Debug)]
pub struct Choice {
    /// The alternatives in declaration order.
    alternatives: Vec<Alternative>,

    /// The dispatch table.
    ///
    /// A tag of `None` matches everything.
    table: Vec<(Option<Tag>, usize)>,
}

impl Choice {
    /// Creates a new choice from its alternatives.
    pub fn new(alternatives: impl IntoIterator<Item = Alternative>) -> Self {
        let alternatives: Vec<_> = alternatives.into_iter().collect();
        let mut table = Vec::new();
        for (idx, alternative) in alternatives.iter().enumerate() {
            Self::collect_tags(&alternative.schema, idx, &mut table);
        }
        Choice { alternatives, table }
    }

    fn collect_tags(
        schema: &Schema, idx: usize, table: &mut Vec<(Option<Tag>, usize)>
    ) {
        match schema {
            Schema::Choice(choice) => {
                table.extend(choice.table.iter().map(|item| (item.0, idx)))
            }
            Schema::Any => table.push((None, idx)),
            _ => table.push((schema.tag(), idx)),
        }
    }

    /// Returns the alternatives of the choice.
    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }

    /// Returns the alternative a value with the given tag belongs to.
    pub fn lookup(&self, tag: Tag) -> Option<&Alternative> {
        self.table.iter().find(|item| {
            item.0.map(|item| item == tag).unwrap_or(true)
        }).and_then(|item| self.alternatives.get(item.1))
    }

    /// Returns the alternative with the given name.
    pub fn get(&self, name: &str) -> Option<&Alternative> {
        self.alternatives.iter().find(|alt| alt.name == name)
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("CHOICE {")?;
        for (idx, alternative) in self.alternatives.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, " {}", alternative.name)?;
        }
        f.write_str(" }")
    }
}


//============ Tests =========================================================
