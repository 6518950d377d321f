//! The length octets.
//!
//! This is a private module. The [`Length`] defined herein is re-exported by
//! the parent.

use crate::decode::{BytesSource, DecodeError};
use crate::encode::Target;
use crate::error::ErrorKind;
use crate::mode::Mode;


//------------ Length -------------------------------------------------------

/// The length octets of an encoded value.
///
/// Only definite lengths are represented. The indefinite form is recognized
/// when decoding but rejected as unsupported.
///
/// # BER Encoding
///
/// The length can be encoded in one of two basic ways. Which one is used is
/// determined by the most significant bit of the first octet. If it is not
/// set, the length octets is one octet long and the remaining bits of this
/// first octet provide the definite length. Thus, if the first octet is
/// less than 128, it provides the definite length already.
///
/// If the most significant bit is set, the remaining bits of the first
/// octet specify the number of octets that follow to encode the actual
/// length. If they specify that there are zero more octets, i.e., the
/// value of the first octet is 128, the length is indefinite. Otherwise,
/// those following octets give the big-endian encoding of the definite
/// length of the content octets.
///
/// Under DER rules, a definite length must be encoded in the minimum number
/// of octets. This is what the encoder always produces and what the decoder
/// insists on in [`Mode::Der`].
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Length(usize);

impl Length {
    /// The length of a value without content.
    pub const ZERO: Self = Length(0);

    /// Creates a new definite length.
    pub const fn new(len: usize) -> Self {
        Length(len)
    }

    /// Returns the length as a `usize`.
    pub const fn to_usize(self) -> usize {
        self.0
    }

    /// Takes the length octets from the beginning of a source.
    ///
    /// The returned length is only checked against the data left in the
    /// source. If the source doesn’t have enough octets left, a truncated
    /// input error is returned when the input has ended and an invalid
    /// length error when only the enclosing value has.
    pub fn take_from(
        source: &mut BytesSource, mode: Mode,
    ) -> Result<Self, DecodeError> {
        let start = source.pos();
        let first = source.take_u8()?;
        let count = match first {
            // Bit 7 clear: single.
            n if n & 0x80 == 0 => {
                return Self::checked(usize::from(n), source)
            }

            // 0x80: indefinite.
            0x80 => {
                return Err(DecodeError::new(
                    ErrorKind::UnsupportedFeature("indefinite length"),
                    start
                ))
            }

            // 0xFF: illegal.
            0xFF => {
                return Err(DecodeError::new(
                    ErrorKind::InvalidLength("reserved length octet"),
                    start
                ))
            }

            // anything else: clear left bit, number of octets.
            n => usize::from(n & 0x7F),
        };

        let octets = source.take_bytes(count)?;
        if mode.is_restricted() {
            // The first octet can’t be zero and a single octet can’t be less
            // than 0x80. In both cases, there is a shorter encoding.
            let first = octets.first().copied().unwrap_or(0);
            if first == 0 || (first < 0x80 && count == 1) {
                return Err(DecodeError::new(
                    ErrorKind::InvalidLength("non-minimal length in DER"),
                    start
                ))
            }
        }

        let mut res = 0usize;
        for &octet in octets.iter() {
            if res > (usize::MAX >> 8) {
                return Err(DecodeError::new(
                    ErrorKind::InvalidLength("excessive length"), start
                ))
            }
            res = (res << 8) | usize::from(octet);
        }
        Self::checked(res, source)
    }

    /// Makes sure the source has at least `len` more octets.
    ///
    /// A length running past the end of the enclosing value while the
    /// input continues is an invalid length rather than truncated input.
    fn checked(
        len: usize, source: &BytesSource
    ) -> Result<Self, DecodeError> {
        if len > source.remaining() {
            Err(source.short_err(len))
        }
        else {
            Ok(Length(len))
        }
    }

    /// Returns the length of the encoded representation of the value.
    pub fn encoded_len(self) -> usize {
        if self.0 > 0x7F {
            self.octet_count() + 1
        }
        else {
            1
        }
    }

    /// Writes the encoded length to a target.
    pub fn write_encoded<T: Target>(
        self, target: &mut T
    ) -> Result<(), T::Error> {
        if self.0 > 0x7F {
            let count = self.octet_count();
            // A usize has at most 16 octets, well below 127.
            target.write_all(&[(count as u8) | 0x80])?;
            let bytes = self.0.to_be_bytes();
            target.write_all(&bytes[bytes.len() - count..])
        }
        else {
            target.write_all(&[self.0 as u8])
        }
    }

    /// Returns the number of octets needed for the long form.
    fn octet_count(self) -> usize {
        let bits = usize::BITS - self.0.leading_zeros();
        bits.div_ceil(8) as usize
    }
}

impl From<usize> for Length {
    fn from(len: usize) -> Self {
        Length(len)
    }
}

impl From<Length> for usize {
    fn from(len: Length) -> Self {
        len.0
    }
}


//============ Tests =========================================================
