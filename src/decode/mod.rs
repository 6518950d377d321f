//! Decoding data in BER.
//!
//! This modules provides the means to decode BER encoded data according to
//! a [`Schema`]. The main entry point is the [`Decoder`] whose behaviour is
//! controlled by a [`DecodeConfig`]. The functions [`decode`] and
//! [`decode_at`] are shortcuts for a decoder with the default settings,
//! i.e., BER, a nesting limit of 64 levels, and no data allowed after the
//! value.
//!
//! Decoding never panics on malformed input. Any problem is reported as a
//! [`DecodeError`] that contains the kind of problem and the offset in the
//! input where it was detected.
//!
//! The decoder supports definite length values only. Values using the
//! indefinite length form are rejected as unsupported.

pub use self::decoder::{DecodeConfig, Decoder};
pub use self::error::DecodeError;
pub use self::source::{BytesSource, Pos};

mod decoder;
mod error;
mod source;
mod test;


use crate::schema::Schema;
use crate::value::Value;

/// Decodes a value that has to fill all of `data`.
pub fn decode(schema: &Schema, data: &[u8]) -> Result<Value, DecodeError> {
    Decoder::default().decode(schema, data)
}

/// Decodes a value starting at `offset` into `data`.
///
/// Returns the value and the offset of the first octet after it.
pub fn decode_at(
    schema: &Schema, data: &[u8], offset: usize
) -> Result<(Value, usize), DecodeError> {
    Decoder::default().decode_at(schema, data, offset)
}
