//! Captured encoded data.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use bytes::Bytes;
use crate::encode::{Target, Values};


//------------ Captured ------------------------------------------------------

/// A complete encoded value kept as is.
///
/// Captured values are what the ANY type decodes into. The data contains
/// the complete value including its identifier and length octets. Because
/// captured data is written out unchanged when encoding, a captured value
/// re-encodes to exactly the octets it was decoded from.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct Captured(Bytes);

impl Captured {
    /// Creates a captured value from already encoded data.
    ///
    /// The data is not checked. It should contain exactly one complete
    /// encoded value. Use [`Decoder::capture`] for untrusted data.
    ///
    /// [`Decoder::capture`]: crate::decode::Decoder::capture
    pub fn new(data: impl Into<Bytes>) -> Self {
        Captured(data.into())
    }

    /// Captures the output of a value encoder.
    pub fn from_values<V: Values>(values: &V) -> Self {
        Captured(values.to_vec().into())
    }

    /// Returns a bytes slice with the raw data of the captured value.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Converts the captured value into the underlying bytes value.
    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}


//--- AsRef

impl AsRef<[u8]> for Captured {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}


//--- Values

impl Values for Captured {
    fn encoded_len(&self) -> usize {
        self.0.len()
    }

    fn write_encoded<T: Target>(
        &self, target: &mut T
    ) -> Result<(), T::Error> {
        target.write_all(self.0.as_ref())
    }
}


//--- Debug

impl fmt::Debug for Captured {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Captured(")?;
        for octet in self.0.iter() {
            write!(f, "{:02x}", octet)?;
        }
        f.write_str(")")
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::encode::raw::{dcons, prim};
    use crate::ident::Tag;

    #[test]
    fn from_values() {
        let captured = Captured::from_values(
            &dcons(Tag::SEQUENCE, prim(Tag::INTEGER, b"\x07"))
        );
        assert_eq!(captured.as_slice(), b"\x30\x03\x02\x01\x07");
        assert_eq!(captured.to_vec(), captured.as_slice());
        assert_eq!(format!("{:?}", captured), "Captured(3003020107)");
    }
}
