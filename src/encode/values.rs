//! Everything related to the `Values` trait.
//!
//! This is an internal module. The relevant items are re-exported by the
//! parent.

use crate::ident::{Ident, Tag};
use crate::length::Length;
use super::target::{Target, infallible};


//------------ Values --------------------------------------------------------

/// A type that is a value encoder.
///
/// Value encoders know how to encode themselves into a sequence of BER
/// encoded values. Encoding happens in two steps: first the overall length
/// is determined via [`encoded_len`][Self::encoded_len], then the data is
/// written via [`write_encoded`][Self::write_encoded]. Because a
/// constructed value needs to know the length of its content before it can
/// write its header, encoders should determine their length cheaply, which
/// typically means computing it once when the encoder is created.
///
/// A type implementing this trait should encode itself into one or more
/// BER values. That is, the type becomes the content or part of the content
/// of a constructed value.
pub trait Values {
    /// Returns the length of the encoded values.
    fn encoded_len(&self) -> usize;

    /// Encodes the values and writes them to `target`.
    fn write_encoded<T: Target>(
        &self, target: &mut T
    ) -> Result<(), T::Error>;


    //--- Provided methods

    /// Converts the encoder into one with an explicit tag.
    ///
    /// For an explicit tag, the value is wrapped in a constructed value with
    /// the given tag.
    fn explicit(self, tag: Tag) -> Constructed<Self>
    where Self: Sized {
        Constructed::new(tag, self)
    }

    /// Writes the encoded values into a new vec.
    fn to_vec(&self) -> Vec<u8> {
        let mut target = Vec::with_capacity(self.encoded_len());
        infallible(self.write_encoded(&mut target));
        target
    }
}


//--- Blanket impls

impl<V: Values> Values for &'_ V {
    fn encoded_len(&self) -> usize {
        (*self).encoded_len()
    }

    fn write_encoded<T: Target>(
        &self,
        target: &mut T
    ) -> Result<(), T::Error> {
        (*self).write_encoded(target)
    }
}


//--- Impls for Tuples

/// Macro for implementing `Values` for tuples.
///
/// This macro implements `Values` for all tuples up to a certain degree.
/// It needs to be invoked as below. All the `Tx`s are the type parameters
/// of the elements the tuple, the numbers are the tuple element numbers.
/// The number need to be provided backwards ending in 0.
///
/// The `tuple` bit of the macro does the actual impl and invokes itself with
/// one less tuple element. The `write` bit below is to implement
/// `write_encoded` backwards (i.e., starting with the smallest number).
macro_rules! tupl_impl {
    // Termination: empty lists, do nothing.
    ( tuple > ) => { };

    // Impl values for the complete lists, then recurse to the lists without
    // their heads.
    ( tuple $t:ident $( $ttail:ident )* > $i:tt $( $itail:tt )* ) => {
        impl<$t: Values, $( $ttail: Values ),*> Values
                for ($t, $( $ttail ),*) {
            fn encoded_len(&self) -> usize {
                self.$i.encoded_len()
                $(
                    + self.$itail.encoded_len()
                )*
            }

            fn write_encoded<T: Target>(
                &self,
                target: &mut T
            ) -> Result<(), T::Error> {
                tupl_impl!( write self, target, $i $( $itail )* );
                Ok(())
            }
        }

        tupl_impl!(
             tuple $($ttail)* > $($itail)*
        );
    };

    // Termination: empty lists, do nothing.
    ( write $self:expr, $target:expr, ) => { };

    // Write all elements of tuple $self to $target in order.
    ( write $self:expr, $target:expr, $i:tt $($itail:tt)*) => {
        tupl_impl!( write $self, $target, $($itail)* );
        $self.$i.write_encoded($target)?
    }
}

// The standard library implements things for tuples up to twelve elements,
// so we do the same.
tupl_impl!(
    tuple T11 T10 T9 T8 T7 T6 T5 T4 T3 T2 T1 T0 > 11 10 9 8 7 6 5 4 3 2 1 0
);


impl Values for () {
    fn encoded_len(&self) -> usize {
        0
    }

    fn write_encoded<T: Target>(
        &self, _: &mut T
    ) -> Result<(), T::Error> {
        Ok(())
    }
}


//--- Impl for Option

/// Encoding of an optional value.
///
/// This implementation encodes `None` as nothing, i.e., as an OPTIONAL
/// in ASN.1 parlance.
impl<V: Values> Values for Option<V> {
    fn encoded_len(&self) -> usize {
        match self {
            Some(v) => v.encoded_len(),
            None => 0,
        }
    }

    fn write_encoded<T: Target>(
        &self,
        target: &mut T
    ) -> Result<(), T::Error> {
        match self {
            Some(v) => v.write_encoded(target),
            None => Ok(())
        }
    }
}


//--- Impl for slice and Vec

impl<V: Values> Values for [V] {
    fn encoded_len(&self) -> usize {
        self.iter().map(Values::encoded_len).sum()
    }

    fn write_encoded<T: Target>(
        &self, target: &mut T
    ) -> Result<(), T::Error> {
        self.iter().try_for_each(|v| v.write_encoded(target))
    }
}

impl<V: Values> Values for Vec<V> {
    fn encoded_len(&self) -> usize {
        self.as_slice().encoded_len()
    }

    fn write_encoded<T: Target>(
        &self, target: &mut T
    ) -> Result<(), T::Error> {
        self.as_slice().write_encoded(target)
    }
}


//------------ Constructed ---------------------------------------------------

/// A value encoder for a single constructed value.
///
/// The encoder always uses the definite length form.
pub struct Constructed<V> {
    /// The tag of the value.
    tag: Tag,

    /// A value encoder for the content of the value.
    inner: V,
}

impl<V> Constructed<V> {
    /// Creates a new constructed value encoder from a tag and content.
    ///
    /// The returned value will encode as a single constructed value with
    /// the given tag and whatever `inner` encodes to as its content.
    pub fn new(tag: Tag, inner: V) -> Self {
        Constructed { tag, inner }
    }
}

impl<V: Values> Values for Constructed<V> {
    fn encoded_len(&self) -> usize {
        total_len(self.tag, self.inner.encoded_len())
    }

    fn write_encoded<T: Target>(
        &self, target: &mut T
    ) -> Result<(), T::Error> {
        write_header(target, self.tag, true, self.inner.encoded_len())?;
        self.inner.write_encoded(target)
    }
}


//------------ Helper Functions ----------------------------------------------

/// Returns the length for a value of the given tag and content length.
pub fn total_len(tag: Tag, content_len: usize) -> usize {
    Ident::new(tag, false).encoded_len()
    + Length::new(content_len).encoded_len()
    + content_len
}

/// Writes the header of a value.
pub fn write_header<T: Target>(
    target: &mut T, tag: Tag, constructed: bool, content_len: usize,
) -> Result<(), T::Error> {
    Ident::new(tag, constructed).write_encoded(target)?;
    Length::new(content_len).write_encoded(target)
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::encode::raw::prim;

    #[test]
    fn encode_2_tuple() {
        let res = (
            prim(Tag::INTEGER, b"\x01"),
            prim(Tag::INTEGER, b"\x02"),
        ).to_vec();
        assert_eq!(res, b"\x02\x01\x01\x02\x01\x02");
    }

    #[test]
    fn encode_explicit() {
        let res = prim(Tag::INTEGER, b"\x05").explicit(Tag::ctx(0)).to_vec();
        assert_eq!(res, b"\xa0\x03\x02\x01\x05");
    }

    #[test]
    fn encode_options_and_slices() {
        let none: Option<Constructed<()>> = None;
        assert_eq!(none.to_vec(), b"");
        let items = vec![prim(Tag::NULL, b""), prim(Tag::NULL, b"")];
        assert_eq!(items.encoded_len(), 4);
        assert_eq!(
            Constructed::new(Tag::SET, items).to_vec(),
            b"\x31\x04\x05\x00\x05\x00"
        );
    }
}
