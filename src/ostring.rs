//! A BER-encoded OCTET STRING.
//!
//! This is an internal module. It’s public types are re-exported by the
//! parent.

use std::fmt;
use bytes::{Bytes, BytesMut};


//------------ OctetString ---------------------------------------------------

/// An OCTET STRING value.
///
/// An octet string is a sequence of octets, i.e., a glorified `[u8]`. The
/// octets are kept in a `Bytes` value so that strings taken from decoded
/// data share the input rather than copy it.
///
/// # BER Encoding
///
/// Octet strings are either encoded as a primitive or a constructed value.
/// In the primitive form, the content octets are the string’s octets. In a
/// constructed form, the content is a sequence of encoded octets strings
/// which in turn may be primitive or constructed. In this case, the string’s
/// octets are the concatenation of all the content octets of the primitive
/// forms in the order as encountered. The decoder assembles such strings
/// into a single value via [`from_segments`][Self::from_segments].
///
/// In DER, only the primitive form is allowed. The encoder always uses the
/// primitive form.
#[derive(Clone, Default, Eq, Hash, PartialEq)]
pub struct OctetString(Bytes);

impl OctetString {
    /// Creates a new octet string from the given octets.
    pub fn new(octets: impl Into<Bytes>) -> Self {
        OctetString(octets.into())
    }

    /// Creates an octet string from the segments of a constructed value.
    ///
    /// A single segment is used as is, more than one are concatenated.
    pub fn from_segments(mut segments: Vec<Bytes>) -> Self {
        if segments.len() == 1 {
            return OctetString(segments.remove(0))
        }
        let len = segments.iter().map(Bytes::len).sum();
        let mut res = BytesMut::with_capacity(len);
        for segment in segments {
            res.extend_from_slice(&segment);
        }
        OctetString(res.freeze())
    }

    /// Returns the octets of the string.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Returns the length of the string in octets.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the string is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts the string into the underlying bytes value.
    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}


//--- From

impl From<Bytes> for OctetString {
    fn from(src: Bytes) -> Self {
        OctetString(src)
    }
}

impl From<Vec<u8>> for OctetString {
    fn from(src: Vec<u8>) -> Self {
        OctetString(src.into())
    }
}

impl From<&'static [u8]> for OctetString {
    fn from(src: &'static [u8]) -> Self {
        OctetString(Bytes::from_static(src))
    }
}


//--- AsRef

impl AsRef<[u8]> for OctetString {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}


//--- Debug

impl fmt::Debug for OctetString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("OctetString(")?;
        for octet in self.0.iter() {
            write!(f, "{:02x}", octet)?;
        }
        f.write_str(")")
    }
}


//============ Tests =========================================================
