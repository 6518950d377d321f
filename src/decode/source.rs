//! The source of data to decode.
//!
//! This is a private module. The relevant items are re-exported by the
//! parent.

use std::{fmt, ops};
use bytes::Bytes;
use crate::error::ErrorKind;
use super::error::DecodeError;


//------------ BytesSource ---------------------------------------------------

/// A source of encoded data atop a [`Bytes`] value.
///
/// The source keeps the complete underlying data and a window into it. All
/// octets taken from the source are handed out as cheap clones of the
/// underlying data, so decoded octet strings and captured values share the
/// input rather than copy it.
///
/// The position reported by the source is always relative to the start of
/// the complete data, even for sources limited to the content of a nested
/// value, so errors can point to the exact offset in the input.
#[derive(Clone, Debug)]
pub struct BytesSource {
    /// The complete data.
    data: Bytes,

    /// The index of the next octet to take.
    pos: usize,

    /// The index one past the last octet available to this source.
    end: usize,
}

impl BytesSource {
    /// Creates a source for all of `data`.
    pub fn new(data: Bytes) -> Self {
        let end = data.len();
        BytesSource { data, pos: 0, end }
    }

    /// Creates a source from a copy of a slice.
    pub fn from_slice(data: &[u8]) -> Self {
        Self::new(Bytes::copy_from_slice(data))
    }

    /// Returns the current position in the data.
    pub fn pos(&self) -> Pos {
        self.pos.into()
    }

    /// Moves the current position to `pos`.
    ///
    /// Returns a truncated input error if `pos` is beyond the end of the
    /// source.
    pub fn seek(&mut self, pos: usize) -> Result<(), DecodeError> {
        if pos > self.end {
            Err(DecodeError::new(ErrorKind::TruncatedInput, self.end))
        }
        else {
            self.pos = pos;
            Ok(())
        }
    }

    /// Returns the number of octets left in the source.
    pub fn remaining(&self) -> usize {
        self.end - self.pos
    }

    /// Returns whether all octets have been taken.
    pub fn is_exhausted(&self) -> bool {
        self.pos == self.end
    }

    /// Returns the octets left in the source without taking them.
    pub fn slice(&self) -> &[u8] {
        &self.data[self.pos..self.end]
    }

    /// Returns the n-th octet without taking anything.
    pub fn peek_nth(&self, n: usize) -> Result<u8, DecodeError> {
        self.slice().get(n).copied().ok_or_else(|| self.short_err(n + 1))
    }

    /// Takes a single octet from the source.
    pub fn take_u8(&mut self) -> Result<u8, DecodeError> {
        let res = self.peek_nth(0)?;
        self.pos += 1;
        Ok(res)
    }

    /// Takes exactly `len` octets from the source.
    pub fn take_bytes(&mut self, len: usize) -> Result<Bytes, DecodeError> {
        if len > self.remaining() {
            return Err(self.short_err(len))
        }
        let res = self.data.slice(self.pos..self.pos + len);
        self.pos += len;
        Ok(res)
    }

    /// Returns the octets between `start` and the current position.
    ///
    /// This is used to capture complete values after they have been parsed.
    pub fn captured_since(&self, start: Pos) -> Bytes {
        self.data.slice(start.0..self.pos)
    }

    /// Splits off a source for the next `len` octets.
    ///
    /// The returned source covers the next `len` octets. The current source
    /// is advanced past them.
    pub fn split_off(&mut self, len: usize) -> Result<Self, DecodeError> {
        if len > self.remaining() {
            return Err(self.short_err(len))
        }
        let res = BytesSource {
            data: self.data.clone(),
            pos: self.pos,
            end: self.pos + len,
        };
        self.pos += len;
        Ok(res)
    }

    /// Returns the error for needing `len` octets when fewer are left.
    ///
    /// If the complete data still has the octets, a nested value claims
    /// more than its enclosing value holds and the length is invalid.
    /// Otherwise the input really ended.
    pub fn short_err(&self, len: usize) -> DecodeError {
        if self.pos.saturating_add(len) <= self.data.len() {
            self.content_err(
                ErrorKind::InvalidLength("value exceeds enclosing value")
            )
        }
        else {
            self.content_err(ErrorKind::TruncatedInput)
        }
    }

    /// Returns a content error at the current position of the source.
    pub fn content_err(&self, kind: ErrorKind) -> DecodeError {
        DecodeError::new(kind, self.pos)
    }
}


//------------ Pos -----------------------------------------------------------

/// The logical position within a source.
///
/// Values of this type can only be used for diagnostics. They can not be used
/// to determine how far a source has been advanced since it was created. This
/// is why we used a newtype.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
pub struct Pos(usize);

impl Pos {
    /// Returns the position as an offset into the input.
    pub fn to_usize(self) -> usize {
        self.0
    }
}

impl From<usize> for Pos {
    fn from(pos: usize) -> Pos {
        Pos(pos)
    }
}

impl ops::Add for Pos {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Pos(self.0 + rhs.0)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn split_off_keeps_positions() {
        let mut source = BytesSource::from_slice(b"abcdefgh");
        assert_eq!(source.take_u8().unwrap(), b'a');
        let mut inner = source.split_off(3).unwrap();
        assert_eq!(source.pos().to_usize(), 4);
        assert_eq!(inner.pos().to_usize(), 1);
        assert_eq!(inner.take_bytes(2).unwrap().as_ref(), b"bc");
        assert_eq!(inner.remaining(), 1);
        let err = inner.take_bytes(2).unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::InvalidLength("value exceeds enclosing value")
        );
        assert_eq!(err.pos().to_usize(), 3);
        assert_eq!(source.slice(), b"efgh");
        let err = source.take_bytes(5).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::TruncatedInput);
        assert_eq!(err.pos().to_usize(), 4);
    }

    #[test]
    fn captured_since() {
        let mut source = BytesSource::from_slice(b"abcdef");
        source.take_u8().unwrap();
        let start = source.pos();
        source.take_bytes(3).unwrap();
        assert_eq!(source.captured_since(start).as_ref(), b"bcd");
    }
}
