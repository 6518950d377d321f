//! BER encoded integers.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use bytes::Bytes;
use crate::error::ErrorKind;
use crate::mode::Mode;


//------------ Integer -------------------------------------------------------

/// A BER encoded integer.
///
/// As integers are variable length in BER, this type is just a simple wrapper
/// atop the underlying `Bytes` value containing the content octets. Values
/// of this type are always kept in the shortest possible form, so two
/// integers are equal exactly if their content octets are equal. There is
/// no limit on the size of the integer.
///
/// Conversions from all the native integer types are available via `From`.
/// Conversions into native types are available via methods such as
/// [`to_i64`][Self::to_i64] that return `None` if the value doesn’t fit.
///
/// # BER Encoding
///
/// In BER, an INTEGER is encoded as a primitive value with the content octets
/// providing a variable-length, big-endian, two‘s complement byte sequence of
/// that integer. Thus, the most-significant bit of the first octet serves as
/// the sign bit. The content must be at least one octet long.
///
/// DER additionally requires that the first nine bits of a multi-octet
/// integer are not all the same since then the first octet could be dropped
/// without changing the value.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct Integer(Bytes);

impl Integer {
    /// Creates an integer from its big-endian two’s complement octets.
    ///
    /// Redundant leading octets are removed. Returns an error if `octets`
    /// is empty.
    pub fn from_signed_be(octets: &[u8]) -> Result<Self, ErrorKind> {
        if octets.is_empty() {
            return Err(ErrorKind::InvalidValue("empty integer"))
        }
        let start = Self::redundant_octets(octets);
        Ok(Integer(Bytes::copy_from_slice(&octets[start..])))
    }

    /// Creates a non-negative integer from its big-endian octets.
    ///
    /// An empty slice is zero. A leading zero octet is added if necessary
    /// to keep the integer positive.
    pub fn from_unsigned_be(octets: &[u8]) -> Self {
        let start = octets.iter().position(|&x| x != 0).unwrap_or(
            octets.len()
        );
        let octets = &octets[start..];
        match octets.first() {
            None => Integer(Bytes::from_static(b"\x00")),
            Some(first) if first & 0x80 != 0 => {
                let mut res = Vec::with_capacity(octets.len() + 1);
                res.push(0);
                res.extend_from_slice(octets);
                Integer(res.into())
            }
            Some(_) => Integer(Bytes::copy_from_slice(octets))
        }
    }

    /// Creates an integer from the content octets of an encoded value.
    ///
    /// In DER mode, the content has to be in the shortest form already. In
    /// BER mode, it is shortened if necessary.
    pub fn from_content(
        content: Bytes, mode: Mode
    ) -> Result<Self, ErrorKind> {
        if content.is_empty() {
            return Err(ErrorKind::InvalidValue("empty integer"))
        }
        let start = Self::redundant_octets(&content);
        if start == 0 {
            Ok(Integer(content))
        }
        else if mode.is_restricted() {
            Err(ErrorKind::InvalidValue("non-minimal integer in DER"))
        }
        else {
            Ok(Integer(content.slice(start..)))
        }
    }

    /// Returns the number of leading octets that can be dropped.
    fn redundant_octets(octets: &[u8]) -> usize {
        let mut start = 0;
        while start + 1 < octets.len() {
            let (first, second) = (octets[start], octets[start + 1]);
            let redundant = (first == 0x00 && second & 0x80 == 0)
                || (first == 0xFF && second & 0x80 != 0);
            if !redundant {
                break
            }
            start += 1;
        }
        start
    }

    /// Returns the content octets of the integer.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Returns whether the integer is negative.
    pub fn is_negative(&self) -> bool {
        self.0.first().map(|x| x & 0x80 != 0).unwrap_or(false)
    }

    /// Returns whether the integer is zero.
    pub fn is_zero(&self) -> bool {
        self.0.as_ref() == b"\x00"
    }

    /// Returns the value as an `i128` if it fits.
    pub fn to_i128(&self) -> Option<i128> {
        if self.0.len() > 16 {
            return None
        }
        let mut res: i128 = if self.is_negative() { -1 } else { 0 };
        for &octet in self.0.iter() {
            res = (res << 8) | i128::from(octet);
        }
        Some(res)
    }

    /// Returns the value as an `i64` if it fits.
    pub fn to_i64(&self) -> Option<i64> {
        self.to_i128().and_then(|x| i64::try_from(x).ok())
    }

    /// Returns the value as a `u64` if it fits.
    pub fn to_u64(&self) -> Option<u64> {
        self.to_i128().and_then(|x| u64::try_from(x).ok())
    }
}


//--- From

macro_rules! from_signed {
    ( $( $type:ident ),* ) => {
        $(
            impl From<$type> for Integer {
                fn from(value: $type) -> Self {
                    let octets = value.to_be_bytes();
                    let start = Self::redundant_octets(&octets);
                    Integer(Bytes::copy_from_slice(&octets[start..]))
                }
            }
        )*
    }
}

macro_rules! from_unsigned {
    ( $( $type:ident ),* ) => {
        $(
            impl From<$type> for Integer {
                fn from(value: $type) -> Self {
                    Self::from_unsigned_be(&value.to_be_bytes())
                }
            }
        )*
    }
}

from_signed!(i8, i16, i32, i64, i128, isize);
from_unsigned!(u8, u16, u32, u64, u128, usize);


//--- Display and Debug

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.to_i128() {
            Some(value) => write!(f, "{}", value),
            None => {
                write!(f, "0x")?;
                for octet in self.0.iter() {
                    write!(f, "{:02x}", octet)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Debug for Integer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Integer({})", self)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn minimal_encoding() {
        assert_eq!(Integer::from(0).as_slice(), b"\x00");
        assert_eq!(Integer::from(127).as_slice(), b"\x7f");
        assert_eq!(Integer::from(128).as_slice(), b"\x00\x80");
        assert_eq!(Integer::from(256).as_slice(), b"\x01\x00");
        assert_eq!(Integer::from(-1).as_slice(), b"\xff");
        assert_eq!(Integer::from(-128).as_slice(), b"\x80");
        assert_eq!(Integer::from(-129).as_slice(), b"\xff\x7f");
        assert_eq!(Integer::from(255u8).as_slice(), b"\x00\xff");
        assert_eq!(
            Integer::from(u64::MAX).as_slice(),
            b"\x00\xff\xff\xff\xff\xff\xff\xff\xff"
        );
        assert!(Integer::from(0).is_zero());
        assert!(Integer::from_unsigned_be(b"").is_zero());
        assert!(!Integer::from(-1).is_zero());
    }

    #[test]
    fn native_round_trip() {
        for value in [
            0i128, 1, -1, 127, 128, -128, -129, 255, 256, 65535, -65536,
            i64::MAX.into(), i64::MIN.into(), i128::MAX, i128::MIN
        ] {
            assert_eq!(Integer::from(value).to_i128(), Some(value));
        }
        assert_eq!(Integer::from(u64::MAX).to_u64(), Some(u64::MAX));
        assert_eq!(Integer::from(u64::MAX).to_i64(), None);
        assert_eq!(Integer::from(-1).to_u64(), None);
        assert_eq!(Integer::from(u128::MAX).to_i128(), None);
    }

    #[test]
    fn from_octets() {
        assert_eq!(
            Integer::from_signed_be(b"\x00\x00\x7f").unwrap(),
            Integer::from(127)
        );
        assert_eq!(
            Integer::from_signed_be(b"\xff\xff\x80").unwrap(),
            Integer::from(-128)
        );
        assert!(Integer::from_signed_be(b"").is_err());
        assert_eq!(Integer::from_unsigned_be(b""), Integer::from(0));
        assert_eq!(Integer::from_unsigned_be(b"\x00\x80"), Integer::from(128));
        assert_eq!(Integer::from_unsigned_be(b"\xff"), Integer::from(255));
    }

    #[test]
    fn from_content() {
        let ber = Mode::Ber;
        let der = Mode::Der;
        let content = |x: &'static [u8]| Bytes::from_static(x);

        assert_eq!(
            Integer::from_content(content(b"\x00\x80"), der).unwrap(),
            Integer::from(128)
        );
        assert!(Integer::from_content(content(b"\x00\x7f"), der).is_err());
        assert!(Integer::from_content(content(b"\xff\x80"), der).is_err());
        assert_eq!(
            Integer::from_content(content(b"\x00\x7f"), ber).unwrap(),
            Integer::from(127)
        );
        assert_eq!(
            Integer::from_content(content(b"\xff\xff\x80"), ber).unwrap(),
            Integer::from(-128)
        );
        assert!(Integer::from_content(content(b""), ber).is_err());
    }

    #[test]
    fn big_integers() {
        let octets = [0x01u8; 40];
        let int = Integer::from_signed_be(&octets).unwrap();
        assert_eq!(int.as_slice(), octets.as_ref());
        assert_eq!(int.to_i128(), None);
        assert!(int.to_string().starts_with("0x0101"));
        assert!(!int.is_negative());
    }
}
