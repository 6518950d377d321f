//! PKCS#7 signed data.
//!
//! This module declares the schemas for the signed-data content type of
//! PKCS#7 as defined in RFC 2315 together with a few helpers for working
//! with decoded messages. Certificates, CRLs, distinguished names, and
//! attribute values are kept as captured values.
//!
//! ```text
//! ContentInfo ::= SEQUENCE {
//!     contentType  ContentType,
//!     content      [0] EXPLICIT SignedData OPTIONAL }
//!
//! SignedData ::= SEQUENCE {
//!     version           Version,
//!     digestAlgorithms  DigestAlgorithmIdentifiers,
//!     contentInfo       ContentInfo,
//!     certificates      [0] IMPLICIT SET OF Certificate OPTIONAL,
//!     crls              [1] IMPLICIT SET OF CertificateRevocationList
//!                           OPTIONAL,
//!     signerInfos       SET OF SignerInfo }
//!
//! SignerInfo ::= SEQUENCE {
//!     version                    Version,
//!     issuerAndSerialNumber      IssuerAndSerialNumber,
//!     digestAlgorithm            DigestAlgorithmIdentifier,
//!     authenticatedAttributes    [0] IMPLICIT Attributes OPTIONAL,
//!     digestEncryptionAlgorithm  DigestEncryptionAlgorithmIdentifier,
//!     encryptedDigest            EncryptedDigest,
//!     unauthenticatedAttributes  [1] IMPLICIT Attributes OPTIONAL }
//! ```
//!
//! The inner content info of signed data carries its content as an
//! explicitly tagged OCTET STRING. If the content is detached, the field is
//! absent.

use bytes::Bytes;
use crate::encode::{EncodeError, Encoder};
use crate::error::ErrorKind;
use crate::ident::Tag;
use crate::oid::Oid;
use crate::schema::{Field, Schema};
use crate::value::Value;


//------------ Object Identifiers --------------------------------------------

/// The content type of plain data, 1.2.840.113549.1.7.1.
pub const DATA: Oid = Oid::from_static(
    &[42, 134, 72, 134, 247, 13, 1, 7, 1]
);

/// The content type of signed data, 1.2.840.113549.1.7.2.
pub const SIGNED_DATA: Oid = Oid::from_static(
    &[42, 134, 72, 134, 247, 13, 1, 7, 2]
);

/// The content type attribute, 1.2.840.113549.1.9.3.
pub const CONTENT_TYPE: Oid = Oid::from_static(
    &[42, 134, 72, 134, 247, 13, 1, 9, 3]
);

/// The message digest attribute, 1.2.840.113549.1.9.4.
pub const MESSAGE_DIGEST: Oid = Oid::from_static(
    &[42, 134, 72, 134, 247, 13, 1, 9, 4]
);

/// The signing time attribute, 1.2.840.113549.1.9.5.
pub const SIGNING_TIME: Oid = Oid::from_static(
    &[42, 134, 72, 134, 247, 13, 1, 9, 5]
);


//------------ Schemas -------------------------------------------------------

/// The outer content info wrapping signed data.
pub fn content_info() -> Schema {
    Schema::sequence([
        Field::new("contentType", Schema::Oid),
        Field::new("content", signed_data().explicit(Tag::ctx(0)))
            .optional(),
    ])
}

pub fn signed_data() -> Schema {
    Schema::sequence([
        Field::new("version", Schema::Integer),
        Field::new("digestAlgorithms", Schema::set_of(algorithm_identifier())),
        Field::new("contentInfo", inner_content_info()),
        Field::new(
            "certificates",
            Schema::set_of(Schema::Any).implicit(Tag::ctx(0))
        ).optional(),
        Field::new(
            "crls",
            Schema::set_of(Schema::Any).implicit(Tag::ctx(1))
        ).optional(),
        Field::new("signerInfos", Schema::set_of(signer_info())),
    ])
}

/// The content info inside signed data.
pub fn inner_content_info() -> Schema {
    Schema::sequence([
        Field::new("contentType", Schema::Oid),
        Field::new("content", Schema::OctetString.explicit(Tag::ctx(0)))
            .optional(),
    ])
}

pub fn signer_info() -> Schema {
    Schema::sequence([
        Field::new("version", Schema::Integer),
        Field::new("issuerAndSerialNumber", issuer_and_serial_number()),
        Field::new("digestAlgorithm", algorithm_identifier()),
        Field::new(
            "authenticatedAttributes", attributes().implicit(Tag::ctx(0))
        ).optional(),
        Field::new("digestEncryptionAlgorithm", algorithm_identifier()),
        Field::new("encryptedDigest", Schema::OctetString),
        Field::new(
            "unauthenticatedAttributes", attributes().implicit(Tag::ctx(1))
        ).optional(),
    ])
}

pub fn issuer_and_serial_number() -> Schema {
    Schema::sequence([
        Field::new("issuer", Schema::Any),
        Field::new("serialNumber", Schema::Integer),
    ])
}

pub fn algorithm_identifier() -> Schema {
    Schema::sequence([
        Field::new("algorithm", Schema::Oid),
        Field::new("parameters", Schema::Any).optional(),
    ])
}

/// A set of attributes under the universal SET tag.
pub fn attributes() -> Schema {
    Schema::set_of(attribute())
}

pub fn attribute() -> Schema {
    Schema::sequence([
        Field::new("type", Schema::Oid),
        Field::new("values", Schema::set_of(Schema::Any)),
    ])
}


//------------ Helpers -------------------------------------------------------

/// Removes the signed content from a decoded content info.
///
/// Returns the content if it was present. Afterwards the message has
/// detached content: encoding it leaves out the inner content while all
/// other fields stay the same. Calling this function again returns `None`.
pub fn detach_content(
    message: &mut Value
) -> Result<Option<Value>, ErrorKind> {
    let inner = message.field_mut("content")
        .and_then(|content| content.field_mut("contentInfo"))
        .and_then(Value::as_fields_mut)
        .ok_or_else(|| ErrorKind::TypeMismatch(
            "expected content info with signed data".into()
        ))?;
    Ok(inner.remove("content"))
}

/// Returns the signer infos of a decoded content info.
pub fn signer_infos(message: &Value) -> Option<&[Value]> {
    message.field("content")?.field("signerInfos")?.as_elements()
}

/// Returns the certificates of a decoded content info.
///
/// Returns an empty slice if there are none.
pub fn certificates(message: &Value) -> &[Value] {
    message.field("content").and_then(|content| {
        content.field("certificates")
    }).and_then(Value::as_elements).unwrap_or_default()
}

/// Returns the encoded authenticated attributes of a signer info.
///
/// The attributes are encoded under the universal SET tag rather than the
/// implicit tag used inside the signer info. These are the octets the
/// signature is calculated over. Returns `Ok(None)` if the signer info
/// has no authenticated attributes.
pub fn signed_attributes_der(
    signer_info: &Value
) -> Result<Option<Bytes>, EncodeError> {
    match signer_info.field("authenticatedAttributes") {
        Some(attrs) => Encoder::new().encode(&attributes(), attrs).map(Some),
        None => Ok(None)
    }
}


//============ Tests =========================================================
