//! End-to-end scenarios: one schema per concrete encoding shape, asserted
//! against exact byte output rather than a mechanical round-trip grid.

use std::sync::Arc;

use pducodec::PduCodec;
use pducodec_core::{Endianness, Record, Value};
use pducodec_schema::{FieldSpec, PduTypeBuilder};
use pducodec_version::{Version, VersionPredicate};

#[test]
fn basic_fixed_layout_with_subrecord_and_constant() {
    let sub_type = Arc::new(
        PduTypeBuilder::new("SomeSub")
            .field(FieldSpec::integer("some_field", 8).with_default(Value::Integer(15)))
            .build()
            .unwrap(),
    );
    let mut sub_default = Record::new("SomeSub");
    sub_default.set("some_field", Value::Integer(15));

    let pdu = PduTypeBuilder::new("Basic")
        .field(FieldSpec::integer("test_field", 12).with_default(Value::Integer(1)))
        .field(FieldSpec::integer("other_test_field", 24))
        .field(FieldSpec::subrecord("sub", sub_type, sub_default))
        .field(FieldSpec::constant("const_field", 28, 10))
        .build()
        .unwrap();

    let mut record = Record::new("Basic");
    record.set("other_test_field", Value::Integer(100));

    let bytes = pdu.encode(&record, None).unwrap();
    assert_eq!(bytes, vec![0x00, 0x10, 0x00, 0x06, 0x40, 0xF0, 0x00, 0x00, 0x0A]);

    let (decoded, rest) = pdu.decode(&bytes, None).unwrap();
    assert!(rest.is_empty());
    assert_eq!(decoded.get("test_field"), Some(&Value::Integer(1)));
    assert_eq!(decoded.get("other_test_field"), Some(&Value::Integer(100)));

    let mut expected_sub = Record::new("SomeSub");
    expected_sub.set("some_field", Value::Integer(15));
    assert_eq!(decoded.get("sub"), Some(&Value::Sub(expected_sub)));
}

fn double_value(value: &Value) -> Value {
    Value::Integer(value.as_integer().unwrap_or(0) * 2)
}

fn halve_value(value: Value) -> Value {
    Value::Integer(value.as_integer().unwrap_or(0) / 2)
}

#[test]
fn versioned_fields_with_custom_encoder() {
    let pdu = PduTypeBuilder::new("VersionedMsg")
        .field(FieldSpec::integer("old_field", 16).with_default(Value::Integer(10)))
        .field(FieldSpec::integer("newer_field", 8).with_version(VersionPredicate::parse(">= 2.0.0").unwrap()))
        .field(
            FieldSpec::integer("even_newer_field", 8)
                .with_version(VersionPredicate::parse(">= 2.1.0").unwrap())
                .with_custom_codec(double_value, halve_value),
        )
        .build()
        .unwrap();

    let mut record = Record::new("VersionedMsg");
    record.set("newer_field", Value::Integer(111));
    record.set("even_newer_field", Value::Integer(7));

    let v1 = Version::parse("1.0.0").unwrap();
    let v2 = Version::parse("2.0.0").unwrap();
    let v21 = Version::parse("2.1.0").unwrap();

    assert_eq!(pdu.encode(&record, Some(&v1)).unwrap(), vec![0x00, 0x0A]);
    assert_eq!(pdu.encode(&record, Some(&v2)).unwrap(), vec![0x00, 0x0A, 0x6F]);
    assert_eq!(pdu.encode(&record, Some(&v21)).unwrap(), vec![0x00, 0x0A, 0x6F, 0x0E]);
    assert_eq!(pdu.encode(&record, None).unwrap(), vec![0x00, 0x0A, 0x6F, 0x0E]);

    let (decoded, rest) = pdu.decode(&[0x00, 0x0A, 0x6F, 0x0E], Some(&v21)).unwrap();
    assert!(rest.is_empty());
    assert_eq!(decoded.get("even_newer_field"), Some(&Value::Integer(7)));

    let (decoded_old, rest) = pdu.decode(&[0x00, 0x0A], Some(&v1)).unwrap();
    assert!(rest.is_empty());
    assert!(decoded_old.get("newer_field").is_none());
}

#[test]
fn mixed_endianness_on_byte_aligned_fields() {
    let pdu = PduTypeBuilder::new("Endianness")
        .field(FieldSpec::integer("field_a", 32).with_default(Value::Integer(15)))
        .field(
            FieldSpec::integer("field_b", 32)
                .with_default(Value::Integer(15))
                .with_endianness(Endianness::Little),
        )
        .build()
        .unwrap();

    let record = Record::new("Endianness");
    let bytes = pdu.encode(&record, None).unwrap();
    assert_eq!(bytes, vec![0x00, 0x00, 0x00, 0x0F, 0x0F, 0x00, 0x00, 0x00]);

    let (decoded, rest) = pdu.decode(&bytes, None).unwrap();
    assert!(rest.is_empty());
    assert_eq!(decoded.get("field_a"), Some(&Value::Integer(15)));
    assert_eq!(decoded.get("field_b"), Some(&Value::Integer(15)));
}

#[test]
fn string_field_pads_on_encode_and_strips_on_decode() {
    let pdu = PduTypeBuilder::new("Padded")
        .field(FieldSpec::integer("some_header", 8).with_default(Value::Integer(10)))
        .field(FieldSpec::string("string_field", 16))
        .build()
        .unwrap();

    let mut record = Record::new("Padded");
    record.set("string_field", Value::Text("Too short".to_owned()));

    let bytes = pdu.encode(&record, None).unwrap();
    let mut expected = vec![0x0A];
    expected.extend_from_slice(b"Too short");
    expected.extend(std::iter::repeat(0u8).take(7));
    assert_eq!(bytes, expected);

    let (decoded, rest) = pdu.decode(&bytes, None).unwrap();
    assert!(rest.is_empty());
    assert_eq!(decoded.get("string_field"), Some(&Value::Text("Too short".to_owned())));
}

#[test]
fn variable_length_field_driven_by_sibling_length() {
    let pdu = PduTypeBuilder::new("VariablePdu")
        .field(FieldSpec::integer("some_field", 16))
        .field(FieldSpec::integer("size_field", 16))
        .field(FieldSpec::variable("variable_field", "size_field"))
        .build()
        .unwrap();

    let mut record = Record::new("VariablePdu");
    record.set("some_field", Value::Integer(52));
    record.set("size_field", Value::Integer(2));
    record.set("variable_field", Value::Bytes(b"AB".to_vec()));

    let bytes = pdu.encode(&record, None).unwrap();
    assert_eq!(bytes, vec![0x00, 0x34, 0x00, 0x02, 0x41, 0x42]);

    let (decoded, rest) = pdu.decode(&bytes, None).unwrap();
    assert!(rest.is_empty());
    assert_eq!(decoded.get("variable_field"), Some(&Value::Bytes(b"AB".to_vec())));
}

#[test]
fn offset_to_fields_zero_out_when_target_is_absent() {
    let pdu = PduTypeBuilder::new("OffsetPdu")
        .field(FieldSpec::integer("offset_a", 16).with_offset_to("field_a"))
        .field(FieldSpec::integer("offset_b", 16).with_offset_to("field_b"))
        .field(FieldSpec::integer("offset_c", 16).with_offset_to("field_c"))
        .field(FieldSpec::integer("field_a", 8).with_default(Value::Integer(0x0E)))
        .field(FieldSpec::integer("size_field", 16))
        .field(FieldSpec::variable("variable_field", "size_field"))
        .field(FieldSpec::integer("field_b", 8).with_default(Value::Integer(0x0F)))
        .field(FieldSpec::integer("field_c_flag", 8).with_default(Value::Integer(0)))
        .field(FieldSpec::integer("field_c", 8).with_conditional("field_c_flag"))
        .build()
        .unwrap();

    let mut record = Record::new("OffsetPdu");
    record.set("size_field", Value::Integer(4));
    record.set("variable_field", Value::Bytes(b"test".to_vec()));

    let bytes = pdu.encode(&record, None).unwrap();
    assert_eq!(
        bytes,
        vec![0x00, 0x06, 0x00, 0x0D, 0x00, 0x00, 0x0E, 0x00, 0x04, b't', b'e', b's', b't', 0x0F, 0x00]
    );

    let (decoded, rest) = pdu.decode(&bytes, None).unwrap();
    assert!(rest.is_empty());
    assert_eq!(decoded.get("offset_a"), Some(&Value::Integer(6)));
    assert_eq!(decoded.get("offset_b"), Some(&Value::Integer(13)));
    assert_eq!(decoded.get("offset_c"), Some(&Value::Integer(0)));
    assert!(decoded.get("field_c").map(Value::is_absent).unwrap_or(true));
}
