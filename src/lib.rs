//! Schema-driven handling of data in Basic Encoding Rules.
//!
//! This crate encodes and decodes data in the Basic Encoding Rules (BER) and
//! their stricter sibling, the Distinguished Encoding Rules (DER), of
//! ASN.1. Rather than generating types from an ASN.1 module, the structure
//! of the data is described at runtime by a [`Schema`][schema::Schema]
//! built from ordinary function calls. The same schema drives both the
//! [encoder][encode] and the [decoder][decode]. Decoded data is kept in
//! a tree of [`Value`][value::Value]s.
//!
//! ```
//! use berschema::{Tag, decode, encode};
//! use berschema::schema::{Field, Schema};
//! use berschema::value::{Fields, Value};
//!
//! let schema = Schema::sequence([
//!     Field::new("version", Schema::Integer).default(Value::from(0)),
//!     Field::new("serial", Schema::Integer.implicit(Tag::ctx(1))),
//! ]);
//! let value = Value::Sequence(
//!     Fields::new().with("version", 0).with("serial", 4711)
//! );
//!
//! let data = encode::encode(&schema, &value).unwrap();
//! assert_eq!(data.as_ref(), b"\x30\x04\x81\x02\x12\x67");
//! assert_eq!(decode::decode(&schema, &data).unwrap(), value);
//! ```
//!
//! Supported are INTEGER, OCTET STRING, OBJECT IDENTIFIER, NULL, SEQUENCE,
//! SET, SEQUENCE OF, SET OF, CHOICE, and ANY for everything else, plus
//! implicit and explicit tagging, OPTIONAL, and DEFAULT. The encoder always
//! produces DER. The decoder accepts BER or, if asked to, only DER. Values
//! of indefinite length are not supported.
//!
//! The [`pkcs7`] module contains schemas for PKCS#7 signed data.
//!
//! The crate logs through the `log` facade: TLV headers at trace level,
//! choice dispatch, default filling, and errors at debug level.

pub use self::captured::Captured;
pub use self::error::ErrorKind;
pub use self::ident::{Class, Ident, Tag};
pub use self::int::Integer;
pub use self::length::Length;
pub use self::mode::Mode;
pub use self::oid::Oid;
pub use self::ostring::OctetString;

pub mod decode;
pub mod encode;
pub mod error;
pub mod pkcs7;
pub mod schema;
pub mod value;

mod captured;
mod ident;
mod int;
mod length;
mod mode;
mod oid;
mod ostring;
