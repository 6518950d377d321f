//! ASN.1 Object Identifiers.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use bytes::Bytes;
use crate::error::ErrorKind;
use crate::mode::Mode;


//------------ Oid -----------------------------------------------------------

/// An object identifer.
///
/// Object identifiers are globally unique, hierarchical values that are used
/// to identify objects or their type. When written, they are presented as a
/// sequence of integers separated by dots such as ‘1.2.840.113549.1.7.2’.
///
/// Values of this type keep a single object identifer in its BER encoding,
/// i.e., the content octets of an OBJECT IDENTIFIER value. Each arc beyond
/// the first two is encoded as a base-128 number with the most significant
/// bit set in all but the last octet. The first two arcs are combined into
/// a single sub-identifier `40 * first + second`.
///
/// Well-known identifiers can be declared as constants via
/// [`from_static`][Self::from_static]. For all other purposes, use
/// [`from_arcs`][Self::from_arcs] or [`from_content`][Self::from_content]
/// which check that the octets are a valid identifier.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct Oid(Bytes);

impl Oid {
    /// Creates an identifier from static encoded octets.
    ///
    /// The octets are not checked. This function is intended for declaring
    /// constants of well-known identifiers.
    pub const fn from_static(octets: &'static [u8]) -> Self {
        Oid(Bytes::from_static(octets))
    }

    /// Creates an identifier from its arcs.
    ///
    /// There have to be at least two arcs. The first must be 0, 1, or 2 and
    /// if it is 0 or 1, the second must be less than 40.
    pub fn from_arcs(arcs: &[u64]) -> Result<Self, ErrorKind> {
        let (first, second, tail) = match arcs {
            [first, second, tail @ ..] => (*first, *second, tail),
            _ => return Err(ErrorKind::InvalidValue("too few arcs in OID"))
        };
        if first > 2 || (first < 2 && second >= 40) {
            return Err(ErrorKind::InvalidValue("illegal OID arc"))
        }
        let combined = second.checked_add(first * 40).ok_or(
            ErrorKind::InvalidValue("illegal OID arc")
        )?;
        let mut res = Vec::new();
        push_subidentifier(&mut res, combined);
        for &arc in tail {
            push_subidentifier(&mut res, arc);
        }
        Ok(Oid(res.into()))
    }

    /// Creates an identifier from the content octets of an encoded value.
    ///
    /// The content must not be empty and the last octet must not have its
    /// continuation bit set. In DER mode, sub-identifiers must not start
    /// with a padding octet of 0x80.
    pub fn from_content(
        content: Bytes, mode: Mode
    ) -> Result<Self, ErrorKind> {
        match content.last() {
            None => return Err(ErrorKind::InvalidValue("empty OID")),
            Some(last) if last & 0x80 != 0 => {
                return Err(ErrorKind::InvalidValue("truncated OID"))
            }
            _ => { }
        }
        if mode.is_restricted() {
            let mut start = true;
            for &octet in content.iter() {
                if start && octet == 0x80 {
                    return Err(ErrorKind::InvalidValue(
                        "non-minimal OID sub-identifier"
                    ))
                }
                start = octet & 0x80 == 0;
            }
        }
        Ok(Oid(content))
    }

    /// Returns the content octets of the identifier.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Returns an iterator over the arcs of the identifier.
    ///
    /// Arcs that don’t fit into a `u64` are returned as `None`.
    pub fn iter(&self) -> Iter {
        Iter::new(self.0.as_ref())
    }
}

/// Appends the base-128 encoding of a sub-identifier.
fn push_subidentifier(target: &mut Vec<u8>, value: u64) {
    let bits = 64 - value.leading_zeros() as usize;
    let groups = bits.div_ceil(7).max(1);
    for idx in (1..groups).rev() {
        target.push(0x80 | ((value >> (idx * 7)) & 0x7F) as u8);
    }
    target.push((value & 0x7F) as u8);
}


//--- AsRef

impl AsRef<[u8]> for Oid {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}


//--- Display and Debug

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (idx, arc) in self.iter().enumerate() {
            if idx > 0 {
                f.write_str(".")?;
            }
            match arc {
                Some(arc) => write!(f, "{}", arc)?,
                None => f.write_str("(overflow)")?,
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Oid({})", self)
    }
}


//------------ Iter ----------------------------------------------------------

/// An iterator over the arcs of an object identifier.
pub struct Iter<'a> {
    /// The remainder of the object identifier’s encoded octets.
    slice: &'a [u8],

    /// Whether the first sub-identifier has been taken.
    started: bool,

    /// The second arc once the first sub-identifier has been split.
    second: Option<Option<u64>>,
}

impl<'a> Iter<'a> {
    fn new(slice: &'a [u8]) -> Self {
        Iter { slice, started: false, second: None }
    }

    /// Takes the next sub-identifier off the slice.
    fn take_subidentifier(&mut self) -> Option<Option<u64>> {
        if self.slice.is_empty() {
            return None
        }
        let end = self.slice.iter().position(|x| x & 0x80 == 0).map(|x| {
            x + 1
        }).unwrap_or(self.slice.len());
        let (head, tail) = self.slice.split_at(end);
        self.slice = tail;
        let mut res = 0u64;
        for &octet in head {
            if res.leading_zeros() < 7 {
                return Some(None)
            }
            res = res << 7 | u64::from(octet & 0x7F);
        }
        Some(Some(res))
    }
}

impl Iterator for Iter<'_> {
    type Item = Option<u64>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(second) = self.second.take() {
            return Some(second)
        }
        let sub = self.take_subidentifier()?;
        if self.started {
            return Some(sub)
        }
        self.started = true;

        // The first two arcs share a sub-identifier. If it overflows, the
        // first arc can only be 2.
        let (first, second) = match sub {
            Some(value) if value < 40 => (0, Some(value)),
            Some(value) if value < 80 => (1, Some(value - 40)),
            Some(value) => (2, Some(value - 80)),
            None => (2, None),
        };
        self.second = Some(second);
        Some(Some(first))
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    const SIGNED_DATA: &[u8] = b"\x2a\x86\x48\x86\xf7\x0d\x01\x07\x02";

    #[test]
    fn from_arcs() {
        assert_eq!(
            Oid::from_arcs(&[1, 2, 840, 113549, 1, 7, 2]).unwrap().as_slice(),
            SIGNED_DATA
        );
        assert_eq!(
            Oid::from_arcs(&[2, 999, 3]).unwrap().as_slice(),
            b"\x88\x37\x03"
        );
        assert_eq!(Oid::from_arcs(&[0, 0]).unwrap().as_slice(), b"\x00");
        assert!(Oid::from_arcs(&[1]).is_err());
        assert!(Oid::from_arcs(&[3, 1]).is_err());
        assert!(Oid::from_arcs(&[1, 40]).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(
            Oid::from_static(SIGNED_DATA).to_string(),
            "1.2.840.113549.1.7.2"
        );
        assert_eq!(
            Oid::from_arcs(&[2, 999, 3]).unwrap().to_string(),
            "2.999.3"
        );
        assert_eq!(
            Oid::from_arcs(&[1, 3, u64::MAX]).unwrap().to_string(),
            format!("1.3.{}", u64::MAX)
        );
    }

    #[test]
    fn from_content() {
        let content = |x: &'static [u8]| Bytes::from_static(x);
        assert!(Oid::from_content(content(SIGNED_DATA), Mode::Der).is_ok());
        assert!(Oid::from_content(content(b""), Mode::Ber).is_err());
        assert!(Oid::from_content(content(b"\x2a\x86"), Mode::Ber).is_err());
        assert!(Oid::from_content(content(b"\x2a\x80\x01"), Mode::Ber).is_ok());
        assert!(
            Oid::from_content(content(b"\x2a\x80\x01"), Mode::Der).is_err()
        );
    }
}
