//! Decoding values according to a schema.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::Bytes;
use crate::captured::Captured;
use crate::encode::DEFAULT_MAX_DEPTH;
use crate::error::ErrorKind;
use crate::ident::{Ident, Tag};
use crate::int::Integer;
use crate::length::Length;
use crate::mode::Mode;
use crate::oid::Oid;
use crate::ostring::OctetString;
use crate::schema::{Field, Presence, Schema};
use crate::value::{Fields, Value};
use super::error::DecodeError;
use super::source::{BytesSource, Pos};


//------------ DecodeConfig --------------------------------------------------

/// The settings of a decoder.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DecodeConfig {
    /// The rules to decode by.
    mode: Mode,

    /// The maximum nesting depth of constructed values.
    max_depth: usize,

    /// Whether data after the top-level value is an error.
    strict: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        DecodeConfig {
            mode: Mode::Ber,
            max_depth: DEFAULT_MAX_DEPTH,
            strict: true,
        }
    }
}

impl DecodeConfig {
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the maximum nesting depth.
    ///
    /// The top-level value has depth 0. Content of a constructed value is
    /// one level deeper than the value itself.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets whether data after the top-level value is an error.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn strict(&self) -> bool {
        self.strict
    }
}


//------------ Decoder -------------------------------------------------------

/// A decoder for values described by a schema.
///
/// The decoder walks the encoded data and the schema in parallel. Octet
/// strings and captured values taken from the data share the underlying
/// bytes value rather than copy it.
#[derive(Clone, Copy, Debug, Default)]
pub struct Decoder {
    config: DecodeConfig,
}

impl Decoder {
    pub fn new(config: DecodeConfig) -> Self {
        Decoder { config }
    }

    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Decodes a value from a slice.
    ///
    /// The data is copied once so that decoded values can own their
    /// octets. In strict mode, the data must contain exactly one value.
    pub fn decode(
        &self, schema: &Schema, data: &[u8]
    ) -> Result<Value, DecodeError> {
        self.decode_bytes(schema, Bytes::copy_from_slice(data))
    }

    /// Decodes a value from a bytes value.
    ///
    /// In strict mode, the data must contain exactly one value.
    pub fn decode_bytes(
        &self, schema: &Schema, data: Bytes
    ) -> Result<Value, DecodeError> {
        let mut source = BytesSource::new(data);
        let res = self.take_value(schema, &mut source, 0)?;
        if self.config.strict && !source.is_exhausted() {
            return Err(source.content_err(ErrorKind::TrailingData))
        }
        Ok(res)
    }

    /// Decodes a value starting at `offset`.
    ///
    /// Returns the value and the offset right after it. Data following the
    /// value is left alone even in strict mode.
    pub fn decode_at(
        &self, schema: &Schema, data: &[u8], offset: usize
    ) -> Result<(Value, usize), DecodeError> {
        let mut source = BytesSource::from_slice(data);
        source.seek(offset)?;
        let res = self.take_value(schema, &mut source, 0)?;
        Ok((res, source.pos().to_usize()))
    }

    /// Checks that data contains a single complete value and captures it.
    pub fn capture(
        &self, data: impl Into<Bytes>
    ) -> Result<Captured, DecodeError> {
        match self.decode_bytes(&Schema::Any, data.into())? {
            Value::Any(captured) => Ok(captured),
            _ => Err(DecodeError::new(
                ErrorKind::UnsupportedFeature("capture"), 0usize
            ))
        }
    }

    /// Takes a complete value from the beginning of a source.
    fn take_value(
        &self, schema: &Schema, source: &mut BytesSource, depth: usize
    ) -> Result<Value, DecodeError> {
        let (start, ident, mut content) = self.take_header(source, depth)?;
        let tlv = source.captured_since(start);
        self.take_content(schema, ident, &mut content, tlv, start, depth)
    }

    /// Takes the identifier and length octets of a value.
    ///
    /// Returns the start of the value, the identifier, and a source for the
    /// content. The source is advanced past the content.
    fn take_header(
        &self, source: &mut BytesSource, depth: usize
    ) -> Result<(Pos, Ident, BytesSource), DecodeError> {
        if depth > self.config.max_depth {
            return Err(source.content_err(
                ErrorKind::NestingTooDeep(self.config.max_depth)
            ))
        }
        let start = source.pos();
        let ident = Ident::take_from(source, self.config.mode.is_restricted())?;
        let len = Length::take_from(source, self.config.mode)?;
        log::trace!(
            "offset {}: {} with {} content octets", start, ident, len.to_usize()
        );
        let content = source.split_off(len.to_usize())?;
        Ok((start, ident, content))
    }

    /// Decodes the content of a value whose header has been read.
    fn take_content(
        &self,
        schema: &Schema,
        ident: Ident,
        content: &mut BytesSource,
        tlv: Bytes,
        start: Pos,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        match schema {
            Schema::Any => {
                self.skip_content(ident, content, depth)?;
                Ok(Value::Any(Captured::new(tlv)))
            }
            Schema::Choice(choice) => {
                let alternative = choice.lookup(ident.tag()).ok_or_else(|| {
                    DecodeError::new(
                        ErrorKind::NoMatchingAlternative(ident.tag()), start
                    )
                })?;
                log::debug!(
                    "offset {}: tag {} selects alternative '{}'",
                    start, ident.tag(), alternative.name()
                );
                let value = self.take_content(
                    alternative.schema(), ident, content, tlv, start, depth
                )?;
                Ok(Value::choice(alternative.name(), value))
            }
            _ => {
                if let Some(expected) = schema.tag() {
                    if expected != ident.tag() {
                        return Err(DecodeError::new(
                            ErrorKind::mismatch(expected, ident.tag()), start
                        ))
                    }
                }
                self.take_body(
                    schema, ident.is_constructed(), content, start, depth
                )
            }
        }
    }

    /// Decodes the content of a value regardless of its tag.
    fn take_body(
        &self,
        schema: &Schema,
        constructed: bool,
        content: &mut BytesSource,
        start: Pos,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        let mode = self.config.mode;
        match schema {
            Schema::Integer => {
                let octets = Self::primitive(
                    constructed, "constructed INTEGER", content, start
                )?;
                Integer::from_content(octets, mode).map(Value::Integer)
                    .map_err(|kind| DecodeError::new(kind, start))
            }
            Schema::OctetString => {
                if !constructed {
                    let octets = content.take_bytes(content.remaining())?;
                    return Ok(Value::OctetString(octets.into()))
                }
                if !mode.allow_constructed_strings() {
                    return Err(DecodeError::new(
                        ErrorKind::UnsupportedFeature(
                            "constructed OCTET STRING in DER"
                        ),
                        start
                    ))
                }
                let mut segments = Vec::new();
                self.take_segments(content, &mut segments, depth + 1)?;
                Ok(Value::OctetString(OctetString::from_segments(segments)))
            }
            Schema::Oid => {
                let octets = Self::primitive(
                    constructed, "constructed OBJECT IDENTIFIER", content,
                    start
                )?;
                Oid::from_content(octets, mode).map(Value::Oid)
                    .map_err(|kind| DecodeError::new(kind, start))
            }
            Schema::Null => {
                let octets = Self::primitive(
                    constructed, "constructed NULL", content, start
                )?;
                if !octets.is_empty() {
                    return Err(DecodeError::new(
                        ErrorKind::InvalidValue("non-empty NULL"), start
                    ))
                }
                Ok(Value::Null)
            }
            Schema::Sequence(fields) => {
                Self::constructed(constructed, "primitive SEQUENCE", start)?;
                self.take_fields(fields, content, depth + 1)
                    .map(Value::Sequence)
            }
            Schema::Set(fields) => {
                Self::constructed(constructed, "primitive SET", start)?;
                self.take_fields(fields, content, depth + 1).map(Value::Set)
            }
            Schema::SequenceOf(element) => {
                Self::constructed(
                    constructed, "primitive SEQUENCE OF", start
                )?;
                self.take_elements(element, content, depth + 1)
                    .map(Value::SequenceOf)
            }
            Schema::SetOf(element) => {
                Self::constructed(constructed, "primitive SET OF", start)?;
                self.take_elements(element, content, depth + 1)
                    .map(Value::SetOf)
            }
            Schema::Implicit(_, inner) => {
                self.take_body(inner, constructed, content, start, depth)
            }
            Schema::Explicit(_, inner) => {
                self.take_explicit(inner, constructed, content, start, depth)
            }
            // Only reached below an implicit tag which, for types without
            // a tag of their own, wraps the complete value.
            Schema::Any | Schema::Choice(_) => {
                self.take_explicit(schema, constructed, content, start, depth)
            }
        }
    }

    /// Decodes the content of an explicitly tagged value.
    fn take_explicit(
        &self,
        inner: &Schema,
        constructed: bool,
        content: &mut BytesSource,
        start: Pos,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        Self::constructed(constructed, "primitive explicit tag", start)?;
        let res = self.take_value(inner, content, depth + 1)?;
        if !content.is_exhausted() {
            return Err(content.content_err(ErrorKind::TrailingData))
        }
        Ok(res)
    }

    /// Decodes the fields of a SEQUENCE or SET.
    ///
    /// A field is present if the next value fits its schema. Missing
    /// defaulted fields are filled in with their default.
    fn take_fields(
        &self, fields: &[Field], content: &mut BytesSource, depth: usize
    ) -> Result<Fields, DecodeError> {
        let mut res = Fields::new();
        for field in fields {
            if !content.is_exhausted()
                && field.schema().matches(self.peek_tag(content)?)
            {
                let value = self.take_value(field.schema(), content, depth)?;
                res.insert(field.name(), value);
                continue
            }
            match field.presence() {
                Presence::Required => {
                    if let Schema::Choice(_) = field.schema() {
                        if !content.is_exhausted() {
                            return Err(content.content_err(
                                ErrorKind::NoMatchingAlternative(
                                    self.peek_tag(content)?
                                )
                            ))
                        }
                    }
                    return Err(content.content_err(
                        ErrorKind::MissingRequiredField(field.name())
                    ))
                }
                Presence::Optional => { }
                Presence::Default(value) => {
                    log::debug!(
                        "offset {}: using default for field '{}'",
                        content.pos(), field.name()
                    );
                    res.insert(field.name(), value.clone());
                }
            }
        }
        if !content.is_exhausted() {
            return Err(content.content_err(ErrorKind::TrailingData))
        }
        Ok(res)
    }

    /// Decodes the elements of a SEQUENCE OF or SET OF.
    fn take_elements(
        &self, element: &Schema, content: &mut BytesSource, depth: usize
    ) -> Result<Vec<Value>, DecodeError> {
        let mut res = Vec::new();
        while !content.is_exhausted() {
            res.push(self.take_value(element, content, depth)?);
        }
        Ok(res)
    }

    /// Collects the primitive segments of a constructed octet string.
    fn take_segments(
        &self,
        content: &mut BytesSource,
        segments: &mut Vec<Bytes>,
        depth: usize,
    ) -> Result<(), DecodeError> {
        while !content.is_exhausted() {
            let (start, ident, mut inner) = self.take_header(content, depth)?;
            if ident.tag() != Tag::OCTET_STRING {
                return Err(DecodeError::new(
                    ErrorKind::mismatch(Tag::OCTET_STRING, ident.tag()),
                    start
                ))
            }
            if ident.is_constructed() {
                self.take_segments(&mut inner, segments, depth + 1)?;
            }
            else {
                segments.push(inner.take_bytes(inner.remaining())?);
            }
        }
        Ok(())
    }

    /// Checks that the content of a value is well-formed.
    ///
    /// This walks all values nested in constructed values.
    fn skip_content(
        &self, ident: Ident, content: &mut BytesSource, depth: usize
    ) -> Result<(), DecodeError> {
        if ident.is_constructed() {
            while !content.is_exhausted() {
                let (_, ident, mut inner) = self.take_header(
                    content, depth + 1
                )?;
                self.skip_content(ident, &mut inner, depth + 1)?;
            }
        }
        Ok(())
    }

    /// Returns the tag of the next value without taking it.
    fn peek_tag(&self, source: &BytesSource) -> Result<Tag, DecodeError> {
        Ident::take_from(
            &mut source.clone(), self.config.mode.is_restricted()
        ).map(Ident::tag)
    }

    /// Takes the content of a value that must be primitive.
    fn primitive(
        constructed: bool,
        err: &'static str,
        content: &mut BytesSource,
        start: Pos,
    ) -> Result<Bytes, DecodeError> {
        if constructed {
            return Err(DecodeError::new(
                ErrorKind::UnsupportedFeature(err), start
            ))
        }
        content.take_bytes(content.remaining())
    }

    /// Checks that a value is constructed.
    fn constructed(
        constructed: bool, err: &'static str, start: Pos
    ) -> Result<(), DecodeError> {
        if constructed {
            Ok(())
        }
        else {
            Err(DecodeError::new(ErrorKind::UnsupportedFeature(err), start))
        }
    }
}
