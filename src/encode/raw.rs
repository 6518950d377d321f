//! Encoding raw data.
//!
//! The encoders in this module write values without any schema behind them.
//! They are useful for building test data and for wrapping data that has
//! been prepared elsewhere.

use crate::ident::{Ident, Tag};
use crate::length::Length;
use super::target::Target;
use super::values::{Values, total_len, write_header};


/// Encodes the given data as a primitive value with the given tag.
pub fn primitive<'s>(
    tag: Tag, data: &'s (impl AsRef<[u8]> + ?Sized),
) -> impl Values + 's {
    Primitive { tag, data: data.as_ref() }
}

pub use self::primitive as prim;


struct Primitive<'s> {
    tag: Tag,
    data: &'s [u8],
}

impl Values for Primitive<'_> {
    fn encoded_len(&self) -> usize {
        total_len(self.tag, self.data.len())
    }

    fn write_encoded<T: Target>(
        &self, target: &mut T
    ) -> Result<(), T::Error> {
        write_header(target, self.tag, false, self.data.len())?;
        target.write_all(self.data)
    }
}


/// Encodes content as a constructed value using the definite length form.
pub fn definite_constructed<V: Values>(
    tag: Tag, content: V
) -> impl Values {
    super::values::Constructed::new(tag, content)
}

pub use self::definite_constructed as dcons;


/// Encodes content as a constructed value using the indefinite length form.
///
/// The decoder doesn’t support this form. The encoder is here so that this
/// can be tested.
pub fn indefinite_constructed<V: Values>(
    tag: Tag, content: V
) -> impl Values {
    IndefiniteConstructed { tag, content }
}

pub use self::indefinite_constructed as icons;


struct IndefiniteConstructed<V> {
    tag: Tag,
    content: V,
}

impl<V: Values> Values for IndefiniteConstructed<V> {
    fn encoded_len(&self) -> usize {
        // Identifier, 0x80, content, and two octets of end-of-contents.
        Ident::new(self.tag, true).encoded_len()
        + 1 + self.content.encoded_len() + 2
    }

    fn write_encoded<T: Target>(
        &self, target: &mut T
    ) -> Result<(), T::Error> {
        Ident::new(self.tag, true).write_encoded(target)?;
        target.write_all(&[0x80])?;
        self.content.write_encoded(target)?;
        Ident::new(Tag::END_OF_CONTENTS, false).write_encoded(target)?;
        Length::ZERO.write_encoded(target)
    }
}


/// Writes already encoded data unchanged.
pub fn encoded(data: &(impl AsRef<[u8]> + ?Sized)) -> impl Values + '_ {
    Encoded(data.as_ref())
}


struct Encoded<'s>(&'s [u8]);

impl Values for Encoded<'_> {
    fn encoded_len(&self) -> usize {
        self.0.len()
    }

    fn write_encoded<T: Target>(
        &self, target: &mut T
    ) -> Result<(), T::Error> {
        target.write_all(self.0)
    }
}
