//! Encoding values according to a schema.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{fmt, io};
use bytes::{Bytes, BytesMut};
use crate::error::ErrorKind;
use crate::ident::Tag;
use crate::schema::{Field, Presence, Schema};
use crate::value::{Fields, Value};
use super::error::EncodeError;
use super::target::{IoTarget, Target, infallible};
use super::values::{Values, total_len, write_header};


//------------ Encoder -------------------------------------------------------

/// The default limit for the nesting depth of value trees.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// An encoder for values described by a schema.
///
/// Encoding happens in two steps. First, the value is checked against the
/// schema and an encoder tree is built that knows the length of every
/// value. Only then is the data written into a target. All problems with
/// the value are found in the first step, so if encoding fails nothing
/// has been written.
///
/// Encoding always produces DER as long as the captured values of ANY types
/// are DER themselves: lengths use the shortest form, integers are kept
/// minimal, and fields equal to their default are omitted.
#[derive(Clone, Copy, Debug)]
pub struct Encoder {
    /// The maximum nesting depth of constructed values.
    max_depth: usize,
}

impl Default for Encoder {
    fn default() -> Self {
        Encoder { max_depth: DEFAULT_MAX_DEPTH }
    }
}

impl Encoder {
    /// Creates an encoder with the default depth limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum nesting depth of constructed values.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Checks a value against a schema and prepares it for encoding.
    ///
    /// The returned value encoder can be written to any target. It borrows
    /// from both the schema and the value.
    pub fn prepare<'a>(
        &self, schema: &'a Schema, value: &'a Value
    ) -> Result<Encoded<'a>, EncodeError> {
        self.node(schema, value, &Path::Root, 0).map(Encoded)
    }

    /// Encodes a value into a bytes value.
    pub fn encode(
        &self, schema: &Schema, value: &Value
    ) -> Result<Bytes, EncodeError> {
        let encoded = self.prepare(schema, value)?;
        let mut target = BytesMut::with_capacity(encoded.encoded_len());
        infallible(encoded.write_encoded(&mut target));
        log::trace!("encoded {} octets", target.len());
        Ok(target.freeze())
    }

    /// Encodes a value into a new vec.
    pub fn encode_to_vec(
        &self, schema: &Schema, value: &Value
    ) -> Result<Vec<u8>, EncodeError> {
        let encoded = self.prepare(schema, value)?.to_vec();
        log::trace!("encoded {} octets", encoded.len());
        Ok(encoded)
    }

    /// Encodes a value and writes it to an IO writer.
    ///
    /// A value that doesn’t fit the schema is reported as an error of kind
    /// `InvalidInput` wrapping the encode error. Nothing is written in this
    /// case.
    pub fn encode_to_writer<W: io::Write>(
        &self, schema: &Schema, value: &Value, writer: W
    ) -> Result<(), io::Error> {
        let encoded = self.prepare(schema, value)?;
        encoded.write_encoded(&mut IoTarget::new(writer))
    }

    fn node<'a>(
        &self,
        schema: &'a Schema,
        value: &'a Value,
        path: &Path,
        depth: usize,
    ) -> Result<Node<'a>, EncodeError> {
        if depth > self.max_depth {
            return Err(path.error(ErrorKind::NestingTooDeep(self.max_depth)))
        }
        match (schema, value) {
            (Schema::Integer, Value::Integer(int)) => {
                Ok(Node::primitive(Tag::INTEGER, int.as_slice()))
            }
            (Schema::OctetString, Value::OctetString(octets)) => {
                Ok(Node::primitive(Tag::OCTET_STRING, octets.as_slice()))
            }
            (Schema::Oid, Value::Oid(oid)) => {
                Ok(Node::primitive(Tag::OID, oid.as_slice()))
            }
            (Schema::Null, Value::Null) => {
                Ok(Node::primitive(Tag::NULL, b""))
            }
            (Schema::Any, Value::Any(captured)) => {
                Ok(Node::Captured(captured.as_slice()))
            }
            (Schema::Sequence(fields), Value::Sequence(values)) => {
                self.fields(fields, values, path, depth + 1).map(|children| {
                    Node::constructed(Tag::SEQUENCE, children)
                })
            }
            (Schema::Set(fields), Value::Set(values)) => {
                self.fields(fields, values, path, depth + 1).map(|children| {
                    Node::constructed(Tag::SET, children)
                })
            }
            (Schema::SequenceOf(element), Value::SequenceOf(values)) => {
                self.elements(element, values, path, depth + 1).map(|nodes| {
                    Node::constructed(Tag::SEQUENCE, nodes)
                })
            }
            (Schema::SetOf(element), Value::SetOf(values)) => {
                self.elements(element, values, path, depth + 1).map(|nodes| {
                    Node::constructed(Tag::SET, nodes)
                })
            }
            (Schema::Choice(choice), Value::Choice(chosen)) => {
                let alternative = choice.get(chosen.name()).ok_or_else(|| {
                    path.error(ErrorKind::TypeMismatch(format!(
                        "unknown alternative '{}' of {}",
                        chosen.name(), choice
                    )))
                })?;
                self.node(
                    alternative.schema(), chosen.value(),
                    &Path::Field(path, chosen.name()), depth
                )
            }
            (Schema::Implicit(tag, inner), value) => match **inner {
                // The chosen alternative keeps its tag.
                Schema::Choice(_) => {
                    self.node(inner, value, path, depth + 1).map(|node| {
                        Node::constructed(*tag, vec![node])
                    })
                }
                Schema::Any => {
                    self.node(inner, value, path, depth + 1).map(|node| {
                        node.retag(*tag)
                    })
                }
                _ => {
                    self.node(inner, value, path, depth).map(|node| {
                        node.retag(*tag)
                    })
                }
            },
            (Schema::Explicit(tag, inner), value) => {
                self.node(inner, value, path, depth + 1).map(|node| {
                    Node::constructed(*tag, vec![node])
                })
            }
            (schema, value) => {
                Err(path.error(ErrorKind::mismatch(
                    schema.type_name(), value.type_name()
                )))
            }
        }
    }

    /// Creates the nodes for the fields of a SEQUENCE or SET.
    fn fields<'a>(
        &self,
        fields: &'a [Field],
        values: &'a Fields,
        path: &Path,
        depth: usize,
    ) -> Result<Vec<Node<'a>>, EncodeError> {
        if let Some((name, _)) = values.iter().find(|(name, _)| {
            !fields.iter().any(|field| field.name() == *name)
        }) {
            return Err(path.error(ErrorKind::TypeMismatch(
                format!("unknown field '{}'", name)
            )))
        }

        let mut res = Vec::with_capacity(fields.len());
        for field in fields {
            let value = match (values.get(field.name()), field.presence()) {
                (None, Presence::Required) => {
                    return Err(path.error(
                        ErrorKind::MissingRequiredField(field.name())
                    ))
                }
                (None, _) => continue,
                (Some(value), Presence::Default(default))
                    if value == default => continue,
                (Some(value), _) => value,
            };
            res.push(self.node(
                field.schema(), value, &Path::Field(path, field.name()), depth
            )?);
        }
        Ok(res)
    }

    /// Creates the nodes for the elements of a SEQUENCE OF or SET OF.
    fn elements<'a>(
        &self,
        element: &'a Schema,
        values: &'a [Value],
        path: &Path,
        depth: usize,
    ) -> Result<Vec<Node<'a>>, EncodeError> {
        values.iter().enumerate().map(|(idx, value)| {
            self.node(element, value, &Path::Index(path, idx), depth)
        }).collect()
    }
}


//------------ Encoded -------------------------------------------------------

/// A value prepared for encoding.
///
/// Values of this type are returned by [`Encoder::prepare`]. They can be
/// written to any [`Target`] via the [`Values`] trait.
pub struct Encoded<'a>(Node<'a>);

impl Values for Encoded<'_> {
    fn encoded_len(&self) -> usize {
        self.0.encoded_len()
    }

    fn write_encoded<T: Target>(
        &self, target: &mut T
    ) -> Result<(), T::Error> {
        self.0.write_encoded(target)
    }
}


//------------ Node ----------------------------------------------------------

/// A node of the encoder tree.
enum Node<'a> {
    /// A primitive value.
    Primitive {
        tag: Tag,
        content: &'a [u8],
    },

    /// A constructed value.
    Constructed {
        tag: Tag,

        /// The length of the encoded children.
        content_len: usize,

        children: Vec<Node<'a>>,
    },

    /// A value that is encoded already.
    Captured(&'a [u8]),
}

impl<'a> Node<'a> {
    fn primitive(tag: Tag, content: &'a [u8]) -> Self {
        Node::Primitive { tag, content }
    }

    fn constructed(tag: Tag, children: Vec<Node<'a>>) -> Self {
        Node::Constructed {
            tag,
            content_len: children.encoded_len(),
            children
        }
    }

    /// Replaces the tag of the node.
    ///
    /// Captured data keeps its own tag and is wrapped instead.
    fn retag(self, tag: Tag) -> Self {
        match self {
            Node::Primitive { content, .. } => {
                Node::Primitive { tag, content }
            }
            Node::Constructed { content_len, children, .. } => {
                Node::Constructed { tag, content_len, children }
            }
            Node::Captured(data) => {
                Node::constructed(tag, vec![Node::Captured(data)])
            }
        }
    }
}

impl Values for Node<'_> {
    fn encoded_len(&self) -> usize {
        match *self {
            Node::Primitive { tag, content } => total_len(tag, content.len()),
            Node::Constructed { tag, content_len, .. } => {
                total_len(tag, content_len)
            }
            Node::Captured(data) => data.len(),
        }
    }

    fn write_encoded<T: Target>(
        &self, target: &mut T
    ) -> Result<(), T::Error> {
        match self {
            Node::Primitive { tag, content } => {
                write_header(target, *tag, false, content.len())?;
                target.write_all(content)
            }
            Node::Constructed { tag, content_len, children } => {
                write_header(target, *tag, true, *content_len)?;
                children.write_encoded(target)
            }
            Node::Captured(data) => target.write_all(data),
        }
    }
}


//------------ Path ----------------------------------------------------------

/// The path to a value in the value tree.
#[derive(Clone, Copy)]
enum Path<'p> {
    Root,
    Field(&'p Path<'p>, &'static str),
    Index(&'p Path<'p>, usize),
}

impl Path<'_> {
    fn error(&self, kind: ErrorKind) -> EncodeError {
        EncodeError::new(kind, self.to_string())
    }
}

impl fmt::Display for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Path::Root => Ok(()),
            Path::Field(Path::Root, name) => f.write_str(name),
            Path::Field(parent, name) => write!(f, "{}.{}", parent, name),
            Path::Index(parent, idx) => write!(f, "{}[{}]", parent, idx),
        }
    }
}


//--- From

impl From<EncodeError> for io::Error {
    fn from(err: EncodeError) -> Self {
        io::Error::new(io::ErrorKind::InvalidInput, err)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use crate::captured::Captured;
    use crate::encode::raw::{dcons, prim};
    use crate::ostring::OctetString;
    use crate::schema::Alternative;

    fn record() -> Schema {
        Schema::sequence([
            Field::new("version", Schema::Integer).default(Value::from(0)),
            Field::new("data", Schema::OctetString),
            Field::new("note", Schema::OctetString.implicit(Tag::ctx(1)))
                .optional(),
        ])
    }

    fn data(octets: &'static [u8]) -> Value {
        Value::OctetString(OctetString::from(octets))
    }

    #[test]
    fn default_omission() {
        let schema = record();
        let value = Value::Sequence(
            Fields::new().with("version", 0).with("data", data(b"ab"))
        );
        assert_eq!(
            Encoder::new().encode(&schema, &value).unwrap().as_ref(),
            b"\x30\x04\x04\x02ab"
        );

        let value = Value::Sequence(
            Fields::new().with("version", 2).with("data", data(b"ab"))
        );
        assert_eq!(
            Encoder::new().encode(&schema, &value).unwrap().as_ref(),
            b"\x30\x07\x02\x01\x02\x04\x02ab"
        );
    }

    #[test]
    fn implicit_and_explicit() {
        let schema = record();
        let value = Value::Sequence(
            Fields::new().with("data", data(b"")).with("note", data(b"x"))
        );
        assert_eq!(
            Encoder::new().encode_to_vec(&schema, &value).unwrap(),
            b"\x30\x05\x04\x00\x81\x01x"
        );

        let schema = Schema::Integer.explicit(Tag::ctx(0));
        assert_eq!(
            Encoder::new().encode_to_vec(&schema, &Value::from(5)).unwrap(),
            b"\xa0\x03\x02\x01\x05"
        );

        let schema = Schema::sequence([
            Field::new("a", Schema::Null),
        ]).implicit(Tag::application(3));
        let value = Value::Sequence(Fields::new().with("a", Value::Null));
        assert_eq!(
            Encoder::new().encode_to_vec(&schema, &value).unwrap(),
            b"\x63\x02\x05\x00"
        );
    }

    #[test]
    fn implicit_choice_is_explicit() {
        let schema = Schema::choice([
            Alternative::new("number", Schema::Integer),
            Alternative::new("null", Schema::Null),
        ]).implicit(Tag::ctx(2));
        let value = Value::choice("null", Value::Null);
        assert_eq!(
            Encoder::new().encode_to_vec(&schema, &value).unwrap(),
            b"\xa2\x02\x05\x00"
        );

        let schema = Schema::Any.implicit(Tag::ctx(0));
        let value = Value::Any(Captured::new(&b"\x02\x01\x07"[..]));
        assert_eq!(
            Encoder::new().encode_to_vec(&schema, &value).unwrap(),
            b"\xa0\x03\x02\x01\x07"
        );
    }

    #[test]
    fn sequence_of() {
        let schema = Schema::set_of(Schema::Integer);
        let value = Value::SetOf(vec![Value::from(3), Value::from(1)]);
        // Elements keep their order.
        assert_eq!(
            Encoder::new().encode_to_vec(&schema, &value).unwrap(),
            (dcons(Tag::SET, (
                prim(Tag::INTEGER, b"\x03"), prim(Tag::INTEGER, b"\x01")
            ))).to_vec()
        );
    }

    #[test]
    fn errors() {
        let schema = Schema::sequence([
            Field::new("items", Schema::sequence_of(record())),
        ]);
        let value = Value::Sequence(Fields::new().with(
            "items", Value::SequenceOf(vec![
                Value::Sequence(Fields::new().with("data", data(b""))),
                Value::Sequence(Fields::new().with("version", 1)),
            ])
        ));
        let err = Encoder::new().encode(&schema, &value).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MissingRequiredField("data"));
        assert_eq!(err.path(), "items[1]");

        let value = Value::Sequence(Fields::new().with(
            "items", Value::SequenceOf(vec![
                Value::Sequence(
                    Fields::new().with("data", data(b"")).with("version", data(b""))
                ),
            ])
        ));
        let err = Encoder::new().encode(&schema, &value).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::TypeMismatch(_)));
        assert_eq!(err.path(), "items[0].version");

        let value = Value::Sequence(
            Fields::new().with("data", data(b"")).with("bogus", Value::Null)
        );
        let err = Encoder::new().encode(&record(), &value).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::TypeMismatch(_)));
        assert_eq!(err.path(), "");

        let schema = Schema::choice([
            Alternative::new("number", Schema::Integer),
        ]);
        let err = Encoder::new().encode(
            &schema, &Value::choice("text", Value::Null)
        ).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::TypeMismatch(_)));
    }

    #[test]
    fn nesting_limit() {
        let mut schema = Schema::Null;
        let mut value = Value::Null;
        for _ in 0..10 {
            schema = Schema::sequence_of(schema);
            value = Value::SequenceOf(vec![value]);
        }
        assert!(Encoder::new().with_max_depth(10).encode(
            &schema, &value
        ).is_ok());
        assert_eq!(
            Encoder::new().with_max_depth(9).encode(
                &schema, &value
            ).unwrap_err().kind(),
            &ErrorKind::NestingTooDeep(9)
        );
    }

    #[test]
    fn encode_to_writer() {
        let mut target = Vec::new();
        Encoder::new().encode_to_writer(
            &Schema::Integer, &Value::from(-1), &mut target
        ).unwrap();
        assert_eq!(target, b"\x02\x01\xff");

        let mut target = Vec::new();
        let err = Encoder::new().encode_to_writer(
            &Schema::Integer, &Value::Null, &mut target
        ).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(target.is_empty());
    }
}
