//! Encoding data in BER.
//!
//! This modules provides means to encode values in DER, the strictest form
//! of BER.
//!
//! The main entry point is the [`Encoder`] which encodes a
//! [`Value`][crate::value::Value] according to its
//! [`Schema`][crate::schema::Schema]. The functions [`encode`] and
//! [`encode_to_vec`] are shortcuts for an encoder with the default
//! settings.
//!
//! Internally, encoding is done using helper types called _encoders_ that
//! represent the structure of the BER encoding. These types implement the
//! trait [`Values`]. Encoders determine their encoded length before
//! anything is written, so every constructed value can write its header
//! right away. The encoder for a value and its schema is available through
//! [`Encoder::prepare`].
//!
//! The [`raw`] module provides encoders that write data without a schema.

pub use self::encoder::{DEFAULT_MAX_DEPTH, Encoded, Encoder};
pub use self::error::EncodeError;
pub use self::target::{IoTarget, Target, infallible};
pub use self::values::{Constructed, Values, total_len, write_header};

pub mod raw;

mod encoder;
mod error;
mod target;
mod values;


use bytes::Bytes;
use crate::schema::Schema;
use crate::value::Value;

/// Encodes a value according to its schema.
pub fn encode(schema: &Schema, value: &Value) -> Result<Bytes, EncodeError> {
    Encoder::new().encode(schema, value)
}

/// Encodes a value according to its schema into a new vec.
pub fn encode_to_vec(
    schema: &Schema, value: &Value
) -> Result<Vec<u8>, EncodeError> {
    Encoder::new().encode_to_vec(schema, value)
}
