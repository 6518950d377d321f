#![cfg(test)]

use bytes::Bytes;
use hex_literal::hex;
use pretty_assertions::assert_eq;
use crate::encode::{self, Values};
use crate::encode::raw::{dcons, encoded, icons, prim};
use crate::error::ErrorKind;
use crate::ident::Tag;
use crate::mode::Mode;
use crate::ostring::OctetString;
use crate::schema::{Alternative, Field, Schema};
use crate::value::{Fields, Value};
use super::*;

fn record() -> Schema {
    Schema::sequence([
        Field::new("version", Schema::Integer).default(Value::from(0)),
        Field::new("data", Schema::OctetString),
        Field::new("note", Schema::OctetString.implicit(Tag::ctx(1)))
            .optional(),
    ])
}

fn octets(data: &'static [u8]) -> Value {
    Value::OctetString(OctetString::from(data))
}

fn der() -> Decoder {
    Decoder::new(DecodeConfig::default().with_mode(Mode::Der))
}

fn kind(res: Result<Value, DecodeError>) -> ErrorKind {
    res.unwrap_err().kind().clone()
}

#[test]
fn defaults_and_optionals() {
    let value = decode(&record(), &hex!("30 04 04 02 ab cd")).unwrap();
    assert_eq!(
        value,
        Value::Sequence(
            Fields::new().with("version", 0).with("data", octets(b"\xab\xcd"))
        )
    );

    let value = decode(
        &record(), &hex!("30 0a 02 01 03 04 02 ab cd 81 01 ff")
    ).unwrap();
    assert_eq!(
        value,
        Value::Sequence(
            Fields::new()
                .with("version", 3)
                .with("data", octets(b"\xab\xcd"))
                .with("note", octets(b"\xff"))
        )
    );
}

#[test]
fn round_trip() {
    let value = Value::Sequence(
        Fields::new()
            .with("version", 0)
            .with("data", octets(b"foo"))
            .with("note", octets(b""))
    );
    let data = encode::encode(&record(), &value).unwrap();
    assert_eq!(data.as_ref(), hex!("30 07 04 03 66 6f 6f 81 00"));
    assert_eq!(decode(&record(), &data).unwrap(), value);
    assert_eq!(der().decode_bytes(&record(), data).unwrap(), value);
}

#[test]
fn missing_and_trailing() {
    let schema = Schema::sequence([
        Field::new("a", Schema::Integer),
        Field::new("b", Schema::Integer),
    ]);
    let err = decode(&schema, &hex!("30 03 02 01 01")).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::MissingRequiredField("b"));
    assert_eq!(err.pos().to_usize(), 5);

    let err = decode(
        &schema, &hex!("30 09 02 01 01 02 01 02 02 01 03")
    ).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::TrailingData);
    assert_eq!(err.pos().to_usize(), 8);

    let data = hex!("02 01 01 05 00");
    assert_eq!(
        kind(decode(&Schema::Integer, &data)), ErrorKind::TrailingData
    );
    assert_eq!(
        Decoder::new(DecodeConfig::default().with_strict(false)).decode(
            &Schema::Integer, &data
        ).unwrap(),
        Value::from(1)
    );
}

#[test]
fn length_exceeds_enclosing_value() {
    let schema = Schema::sequence([Field::new("a", Schema::Integer)]);
    let lenient = Decoder::new(DecodeConfig::default().with_strict(false));
    let err = lenient.decode(
        &schema, &hex!("30 03 02 05 01 02 03 04 05")
    ).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidLength(_)));
    assert_eq!(err.pos().to_usize(), 4);

    // The same header at the end of the input is truncated.
    assert_eq!(
        kind(lenient.decode(&schema, &hex!("30 03 02 05 01"))),
        ErrorKind::TruncatedInput
    );
}

#[test]
fn type_mismatch() {
    let err = decode(&Schema::Integer, &hex!("04 00")).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::TypeMismatch(_)));
    assert_eq!(err.pos().to_usize(), 0);

    assert_eq!(
        kind(decode(&Schema::Integer, &hex!("22 00"))),
        ErrorKind::UnsupportedFeature("constructed INTEGER")
    );
    assert_eq!(
        kind(decode(&Schema::Null, &hex!("05 01 00"))),
        ErrorKind::InvalidValue("non-empty NULL")
    );
    assert_eq!(
        kind(decode(&Schema::Integer, &hex!("02 00"))),
        ErrorKind::InvalidValue("empty integer")
    );
}

#[test]
fn choices() {
    let schema = Schema::choice([
        Alternative::new("number", Schema::Integer),
        Alternative::new("tagged", Schema::Null.implicit(Tag::ctx(0))),
    ]);
    assert_eq!(
        decode(&schema, &hex!("02 01 07")).unwrap(),
        Value::choice("number", Value::from(7))
    );
    assert_eq!(
        decode(&schema, &hex!("80 00")).unwrap(),
        Value::choice("tagged", Value::Null)
    );
    assert_eq!(
        kind(decode(&schema, &hex!("04 00"))),
        ErrorKind::NoMatchingAlternative(Tag::OCTET_STRING)
    );

    // A required choice field reports the unmatched tag.
    let record = Schema::sequence([Field::new("value", schema.clone())]);
    let err = decode(&record, &hex!("30 02 04 00")).unwrap_err();
    assert_eq!(
        err.kind(), &ErrorKind::NoMatchingAlternative(Tag::OCTET_STRING)
    );
    assert_eq!(err.pos().to_usize(), 2);
    assert_eq!(
        kind(decode(&record, &hex!("30 00"))),
        ErrorKind::MissingRequiredField("value")
    );

    // An implicitly tagged choice keeps its inner tag.
    let tagged = schema.clone().implicit(Tag::ctx(5));
    let value = decode(&tagged, &hex!("a5 03 02 01 07")).unwrap();
    assert_eq!(value, Value::choice("number", Value::from(7)));
    assert_eq!(
        encode::encode(&tagged, &value).unwrap().as_ref(),
        hex!("a5 03 02 01 07")
    );
}

#[test]
fn explicit_tags() {
    let schema = Schema::Integer.explicit(Tag::ctx(0));
    assert_eq!(
        decode(&schema, &hex!("a0 03 02 01 05")).unwrap(), Value::from(5)
    );
    assert_eq!(
        kind(decode(&schema, &hex!("80 03 02 01 05"))),
        ErrorKind::UnsupportedFeature("primitive explicit tag")
    );
    assert_eq!(
        kind(decode(&schema, &hex!("a0 05 02 01 05 05 00"))),
        ErrorKind::TrailingData
    );
}

#[test]
fn truncated_input() {
    let data = encode::encode(&record(), &Value::Sequence(
        Fields::new()
            .with("version", 1000)
            .with("data", Value::OctetString(vec![0u8; 200].into()))
            .with("note", octets(b"xyz"))
    )).unwrap();
    for len in 0..data.len() {
        assert_eq!(
            kind(decode(&record(), &data[..len])),
            ErrorKind::TruncatedInput,
            "prefix of {} octets", len
        );
    }
    assert!(decode(&record(), &data).is_ok());
}

#[test]
fn indefinite_length() {
    let data = icons(Tag::SEQUENCE, prim(Tag::INTEGER, b"\x01")).to_vec();
    assert_eq!(
        kind(decode(&Schema::sequence_of(Schema::Integer), &data)),
        ErrorKind::UnsupportedFeature("indefinite length")
    );
    assert_eq!(
        kind(decode(&Schema::Any, &data)),
        ErrorKind::UnsupportedFeature("indefinite length")
    );
}

#[test]
fn nesting_limit() {
    let mut data = prim(Tag::NULL, b"").to_vec();
    for _ in 0..200 {
        let next = dcons(Tag::SEQUENCE, encoded(&data)).to_vec();
        data = next;
    }
    assert_eq!(
        kind(decode(&Schema::Any, &data)), ErrorKind::NestingTooDeep(64)
    );

    let decoder = Decoder::new(DecodeConfig::default().with_max_depth(200));
    let value = decoder.decode(&Schema::Any, &data).unwrap();
    assert_eq!(value.as_captured().unwrap().as_slice(), data.as_slice());

    let mut schema = Schema::Null;
    for _ in 0..200 {
        schema = Schema::sequence_of(schema);
    }
    assert_eq!(
        kind(decode(&schema, &data)), ErrorKind::NestingTooDeep(64)
    );
    assert!(decoder.decode(&schema, &data).is_ok());
}

#[test]
fn ber_and_der() {
    // Non-minimal length.
    let data = hex!("02 81 01 05");
    assert_eq!(decode(&Schema::Integer, &data).unwrap(), Value::from(5));
    assert!(matches!(
        kind(der().decode(&Schema::Integer, &data)),
        ErrorKind::InvalidLength(_)
    ));

    // Non-minimal integer.
    let data = hex!("02 02 00 05");
    assert_eq!(decode(&Schema::Integer, &data).unwrap(), Value::from(5));
    assert!(matches!(
        kind(der().decode(&Schema::Integer, &data)),
        ErrorKind::InvalidValue(_)
    ));

    // Constructed octet string.
    let data = dcons(Tag::OCTET_STRING, (
        prim(Tag::OCTET_STRING, b"ab"),
        dcons(Tag::OCTET_STRING, prim(Tag::OCTET_STRING, b"cd")),
    )).to_vec();
    assert_eq!(
        decode(&Schema::OctetString, &data).unwrap(), octets(b"abcd")
    );
    assert!(matches!(
        kind(der().decode(&Schema::OctetString, &data)),
        ErrorKind::UnsupportedFeature(_)
    ));
    let data = dcons(Tag::OCTET_STRING, prim(Tag::INTEGER, b"\x01")).to_vec();
    assert!(matches!(
        kind(decode(&Schema::OctetString, &data)),
        ErrorKind::TypeMismatch(_)
    ));
}

#[test]
fn decode_at_offset() {
    let data = hex!("02 01 01 02 01 02");
    assert_eq!(
        decode_at(&Schema::Integer, &data, 3).unwrap(),
        (Value::from(2), 6)
    );
    assert_eq!(
        decode_at(&Schema::Integer, &data, 0).unwrap(),
        (Value::from(1), 3)
    );
    assert_eq!(
        decode_at(&Schema::Integer, &data, 7).unwrap_err().kind(),
        &ErrorKind::TruncatedInput
    );
}

#[test]
fn capture() {
    let data = Bytes::copy_from_slice(&hex!("30 03 02 01 01"));
    let captured = Decoder::default().capture(data.clone()).unwrap();
    assert_eq!(captured.as_slice(), data.as_ref());
    assert_eq!(
        Decoder::default().capture(
            Bytes::copy_from_slice(&hex!("30 03 02 01 01 00"))
        )
            .unwrap_err().kind(),
        &ErrorKind::TrailingData
    );
    assert_eq!(
        Decoder::default().capture(
            Bytes::copy_from_slice(&hex!("30 03 02 02 01"))
        )
            .unwrap_err().kind(),
        &ErrorKind::TruncatedInput
    );
}
