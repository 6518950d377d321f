//! The identifier octets of a BER encoded value.
//!
//! This is a private module. The relevant items are re-exported by the
//! parent.

use std::fmt;
use smallvec::SmallVec;
use crate::decode::{BytesSource, DecodeError};
use crate::encode::Target;
use crate::error::ErrorKind;


//------------ Tag -----------------------------------------------------------

/// The tag of a value.
///
/// In ASN.1, tags are used to identify the type of a value. Tags consist of
/// one of four classes, represented by the [`Class`] enum, and a number
/// within this class. The number is an unsigned integer.
///
/// In BER encoding, the tag becomes part of the identifier octets by
/// combining it with a bit indicating whether a value is primitive or
/// constructed. This combination is represented by [`Ident`].
///
/// # Limitations
///
/// We only support tag numbers that fit into a `u32`. This should be more
/// than enough in practice.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Tag {
    class: Class,
    number: u32,
}

impl Tag {
    /// Creates a tag from a class and number.
    pub const fn new(class: Class, number: u32) -> Self {
        Tag { class, number }
    }

    /// Creates a new tag in the universal class with the given number.
    pub const fn universal(number: u32) -> Self {
        Self::new(Class::Universal, number)
    }

    /// Creates a new tag in the application class with the given number.
    pub const fn application(number: u32) -> Self {
        Self::new(Class::Application, number)
    }

    /// Creates a new tag in class “context specific” with the given number.
    pub const fn ctx(number: u32) -> Self {
        Self::new(Class::Context, number)
    }

    /// Creates a new tag in the private class with the given number.
    pub const fn private(number: u32) -> Self {
        Self::new(Class::Private, number)
    }

    /// Returns the class of the tag.
    pub const fn class(self) -> Class {
        self.class
    }

    /// Returns the number of the tag.
    pub const fn number(self) -> u32 {
        self.number
    }
}

/// # Constants for universal tags.
///
/// See clause 8.4 of ITU Recommendation X.690. Only the tags that show up
/// in messages we care about are listed.
///
impl Tag {
    /// The tag marking the end-of-contents in an indefinite length value.
    pub const END_OF_CONTENTS: Self = Self::universal(0);

    /// The tag for the BOOLEAN type, UNIVERSAL 1.
    pub const BOOLEAN: Self = Self::universal(1);

    /// The tag for the INTEGER type, UNIVERSAL 2.
    pub const INTEGER: Self = Self::universal(2);

    /// The tag for the BIT STRING type, UNIVERSAL 3.
    pub const BIT_STRING: Self = Self::universal(3);

    /// The tag for the OCTET STRING type, UNIVERSAL 4.
    pub const OCTET_STRING: Self = Self::universal(4);

    /// The tag for the NULL type, UNIVERSAL 5.
    pub const NULL: Self = Self::universal(5);

    /// The tag for the OBJECT IDENTIFIER type, UNIVERSAL 6.
    pub const OID: Self = Self::universal(6);

    /// The tag for the UTF8String type, UNIVERSAL 12
    pub const UTF8_STRING: Self = Self::universal(12);

    /// The tag for the SEQUENCE and SEQUENCE OF types, UNIVERSAL 16.
    pub const SEQUENCE: Self = Self::universal(16);

    /// The tag for the SET and SET OF types, UNIVERSAL 17.
    pub const SET: Self = Self::universal(17);

    /// The tag for the PrintableString type, UNIVERSAL 19.
    pub const PRINTABLE_STRING: Self = Self::universal(19);

    /// The tag for the IA5String type, UNIVERSAL 22.
    pub const IA5_STRING: Self = Self::universal(22);

    /// The tag for the UTCTime type, UNIVERSAL 23.
    pub const UTC_TIME: Self = Self::universal(23);

    /// The tag for the GeneralizedType type, UNIVERSAL 24.
    pub const GENERALIZED_TIME: Self = Self::universal(24);
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Tag::END_OF_CONTENTS => write!(f, "END-OF-CONTENTS"),
            Tag::BOOLEAN => write!(f, "BOOLEAN"),
            Tag::INTEGER => write!(f, "INTEGER"),
            Tag::BIT_STRING => write!(f, "BIT STRING"),
            Tag::OCTET_STRING => write!(f, "OCTET STRING"),
            Tag::NULL => write!(f, "NULL"),
            Tag::OID => write!(f, "OBJECT IDENTIFIER"),
            Tag::UTF8_STRING => write!(f, "UTF8String"),
            Tag::SEQUENCE => write!(f, "SEQUENCE"),
            Tag::SET => write!(f, "SET"),
            Tag::PRINTABLE_STRING => write!(f, "PrintableString"),
            Tag::IA5_STRING => write!(f, "IA5String"),
            Tag::UTC_TIME => write!(f, "UTCTime"),
            Tag::GENERALIZED_TIME => write!(f, "GeneralizedTime"),
            tag => {
                match tag.class() {
                    Class::Universal => write!(f, "[UNIVERSAL ")?,
                    Class::Application => write!(f, "[APPLICATION ")?,
                    Class::Context => write!(f, "[")?,
                    Class::Private => write!(f, "[PRIVATE ")?,
                }
                write!(f, "{}]", tag.number())
            }
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({})", self)
    }
}


//------------ Ident ---------------------------------------------------------

/// The identifier octets of an encoded value.
///
/// These are the tag of the value plus the bit that says whether the value
/// uses primitive or constructed encoding.
///
/// # BER Encoding
///
/// There are two forms:
///
/// * low tag number (for tag numbers between 0 and 30):
///     One octet. Bits 8 and 7 specify the class, bit 6 indicates whether
///     the encoding is constructed, and bits 5-1 give the tag number.
/// * high tag number (for tag numbers 31 and greater):
///     Two or more octets. First octet is as in low-tag-number form,
///     except that bits 5-1 all have value 1. Second and following octets
///     give the tag number, base 128, most significant digit first, with
///     as few digits as possible, and with the bit 8 of each octet except
///     the last set to 1.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Ident {
    tag: Tag,
    constructed: bool,
}

impl Ident {
    /// The mask for the constructed bit in the first octet.
    const CONSTRUCTED_MASK: u8 = 0x20;

    /// The bits 5-1 of the first octet all set, marking a high tag number.
    const HIGH_TAG: u8 = 0x1f;

    /// The mask for the continuation bit in subsequent octets.
    const MORE_MASK: u8 = 0x80;

    /// Creates identifier octets from a tag.
    pub const fn new(tag: Tag, constructed: bool) -> Self {
        Ident { tag, constructed }
    }

    /// Returns the tag for the identifier octets.
    pub const fn tag(self) -> Tag {
        self.tag
    }

    /// Returns whether the value is to be a constructed value.
    pub const fn is_constructed(self) -> bool {
        self.constructed
    }

    /// Returns the encoded identifier octets.
    ///
    /// Six octets are enough for any `u32` tag number, so this never
    /// allocates.
    pub fn to_octets(self) -> SmallVec<[u8; 6]> {
        let mut first = self.tag.class.into_u8();
        if self.constructed {
            first |= Self::CONSTRUCTED_MASK
        }
        let number = self.tag.number;
        let mut res = SmallVec::new();
        if number < u32::from(Self::HIGH_TAG) {
            res.push(first | number as u8);
            return res
        }
        res.push(first | Self::HIGH_TAG);

        // Number of seven bit groups needed, at least one.
        let bits = 32 - number.leading_zeros();
        let groups = bits.div_ceil(7);
        for i in (0..groups).rev() {
            let group = ((number >> (i * 7)) & 0x7f) as u8;
            if i == 0 {
                res.push(group)
            }
            else {
                res.push(group | Self::MORE_MASK)
            }
        }
        res
    }

    /// Returns the number of octets of the encoded form.
    pub fn encoded_len(self) -> usize {
        let number = self.tag.number;
        if number < u32::from(Self::HIGH_TAG) {
            1
        }
        else {
            let bits = 32 - number.leading_zeros();
            1 + bits.div_ceil(7) as usize
        }
    }

    /// Writes the identifier octets to a target.
    pub fn write_encoded<T: Target>(
        self, target: &mut T
    ) -> Result<(), T::Error> {
        target.write_all(&self.to_octets())
    }

    /// Takes identifier octets from the beginning of a source.
    ///
    /// In restricted mode, high tag numbers that could have been encoded
    /// shorter are rejected.
    pub fn take_from(
        source: &mut BytesSource, restricted: bool,
    ) -> Result<Self, DecodeError> {
        let start = source.pos();
        let first = source.take_u8()?;
        let class = Class::from_u8(first);
        let constructed = first & Self::CONSTRUCTED_MASK != 0;

        // If we have a single octet tag, we can already return.
        if first & Self::HIGH_TAG != Self::HIGH_TAG {
            return Ok(Ident::new(
                Tag::new(class, u32::from(first & Self::HIGH_TAG)),
                constructed
            ))
        }

        let mut number = 0u32;
        let mut count = 0usize;
        loop {
            let octet = source.take_u8()?;
            if count == 0 && octet == Self::MORE_MASK && restricted {
                return Err(DecodeError::new(
                    ErrorKind::InvalidValue("non-minimal tag number"), start
                ))
            }
            if number > (u32::MAX >> 7) {
                return Err(DecodeError::new(
                    ErrorKind::UnsupportedFeature(
                        "tag number does not fit 32 bits"
                    ),
                    start
                ))
            }
            number = (number << 7) | u32::from(octet & 0x7f);
            count += 1;
            if octet & Self::MORE_MASK == 0 {
                break
            }
        }
        if restricted && number < u32::from(Self::HIGH_TAG) {
            return Err(DecodeError::new(
                ErrorKind::InvalidValue("non-minimal tag number"), start
            ))
        }
        Ok(Ident::new(Tag::new(class, number), constructed))
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.constructed {
            write!(f, "{} (constructed)", self.tag)
        }
        else {
            write!(f, "{}", self.tag)
        }
    }
}


//------------ Class ---------------------------------------------------------

/// The class of a tag.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Class {
    Universal,
    Application,
    Context,
    Private,
}

impl Class {
    const fn from_u8(octet: u8) -> Self {
        match octet {
            0x00..=0x3F => Self::Universal,
            0x40..=0x7F => Self::Application,
            0x80..=0xBF => Self::Context,
            0xC0..=0xFF => Self::Private
        }
    }

    const fn into_u8(self) -> u8 {
        match self {
            Self::Universal => 0x00,
            Self::Application => 0x40,
            Self::Context => 0x80,
            Self::Private => 0xC0,
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    const CLASSES: &[Class] = &[
        Class::Universal, Class::Application, Class::Context, Class::Private
    ];

    fn round_trip(ident: Ident, restricted: bool) -> Ident {
        let octets = ident.to_octets();
        assert_eq!(octets.len(), ident.encoded_len());
        let mut source = BytesSource::from_slice(&octets);
        let res = Ident::take_from(&mut source, restricted).unwrap();
        assert!(source.is_exhausted());
        res
    }

    #[test]
    fn tags_round_trip() {
        for &class in CLASSES {
            for constructed in [false, true] {
                for number in [0, 1, 30, 31, 127, 128, 16383, u32::MAX] {
                    let ident = Ident::new(Tag::new(class, number), constructed);
                    assert_eq!(round_trip(ident, true), ident);
                    assert_eq!(round_trip(ident, false), ident);
                }
            }
        }
    }

    #[test]
    fn encoded_forms() {
        assert_eq!(
            Ident::new(Tag::SEQUENCE, true).to_octets().as_slice(), b"\x30"
        );
        assert_eq!(
            Ident::new(Tag::ctx(0), true).to_octets().as_slice(), b"\xa0"
        );
        assert_eq!(
            Ident::new(Tag::ctx(30), false).to_octets().as_slice(), b"\x9e"
        );
        assert_eq!(
            Ident::new(Tag::ctx(31), false).to_octets().as_slice(),
            b"\x9f\x1f"
        );
        assert_eq!(
            Ident::new(Tag::application(128), true).to_octets().as_slice(),
            b"\x7f\x81\x00"
        );
        assert_eq!(
            Ident::new(Tag::private(16383), false).to_octets().as_slice(),
            b"\xdf\xff\x7f"
        );
    }

    #[test]
    fn truncated_tags() {
        for data in [b"".as_ref(), b"\x1f", b"\x1f\x81", b"\x1f\x81\x80"] {
            let mut source = BytesSource::from_slice(data);
            assert_eq!(
                Ident::take_from(&mut source, false).unwrap_err().kind(),
                &ErrorKind::TruncatedInput
            );
        }
    }

    #[test]
    fn non_minimal_tags() {
        // Tag number 5 in high tag form and a leading zero group.
        for data in [b"\x1f\x05".as_ref(), b"\x1f\x80\x7f"] {
            let mut source = BytesSource::from_slice(data);
            assert!(Ident::take_from(&mut source, false).is_ok());
            let mut source = BytesSource::from_slice(data);
            assert!(matches!(
                Ident::take_from(&mut source, true).unwrap_err().kind(),
                ErrorKind::InvalidValue(_)
            ));
        }
    }

    #[test]
    fn oversized_tags() {
        let mut source = BytesSource::from_slice(
            b"\x1f\x90\x80\x80\x80\x00"
        );
        assert!(matches!(
            Ident::take_from(&mut source, false).unwrap_err().kind(),
            ErrorKind::UnsupportedFeature(_)
        ));
    }

    #[test]
    fn display() {
        assert_eq!(Tag::SEQUENCE.to_string(), "SEQUENCE");
        assert_eq!(Tag::ctx(3).to_string(), "[3]");
        assert_eq!(Tag::application(7).to_string(), "[APPLICATION 7]");
        assert_eq!(Tag::universal(99).to_string(), "[UNIVERSAL 99]");
    }
}
