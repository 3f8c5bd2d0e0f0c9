use pducodec_core::{BitReader, BitWriter, NotEnoughBitsError, Record, Value};
use pducodec_schema::{FieldSize, FieldSpec, FieldType, PduType};
use pducodec_version::Version;

use crate::error::{DecodeError, DecodeErrorExt, DecodeResult, EncodeError, EncodeErrorExt, EncodeResult};
use crate::gating::field_active;

const CONTEXT: &str = "pducodec::codec";

/// Builds the empty prototype record for `pdu_type`: every field carrying
/// a declared default gets that default, except `constant` and `skip`
/// fields, which never occupy a record slot (see `SPEC_FULL.md` and
/// spec.md §3.2).
pub(crate) fn default_record(pdu_type: &PduType) -> Record {
    let mut record = Record::new(pdu_type.name());
    for field in pdu_type.fields() {
        if matches!(field.field_type(), FieldType::Constant | FieldType::Skip) {
            continue;
        }
        if let Some(default) = field.default() {
            record.set(field.name(), default.clone());
        }
    }
    record
}

pub(crate) fn encode_into(
    pdu_type: &PduType,
    record: &Record,
    version: Option<&Version>,
    writer: &mut BitWriter<'_>,
) -> EncodeResult<()> {
    for field in pdu_type.fields() {
        if !field_active(field, record, version) {
            continue;
        }
        encode_field(pdu_type, field, record, version, writer)?;
    }
    Ok(())
}

pub(crate) fn decode_from(pdu_type: &PduType, reader: &mut BitReader<'_>, version: Option<&Version>) -> DecodeResult<Record> {
    let mut record = default_record(pdu_type);
    for field in pdu_type.fields() {
        if !field_active(field, &record, version) {
            continue;
        }
        decode_field(pdu_type, field, &mut record, version, reader)?;
    }
    Ok(record)
}

fn apply_custom_encode(field: &FieldSpec, value: Value) -> Value {
    field.custom_codec().map_or(value, |codec| (codec.encode)(&value))
}

fn apply_custom_decode(field: &FieldSpec, value: Value) -> Value {
    field.custom_codec().map_or(value, |codec| (codec.decode)(value))
}

pub(crate) fn field_width_bits(field: &FieldSpec) -> u32 {
    match field.size() {
        FieldSize::Bits(width) => width,
        FieldSize::Sibling(_) | FieldSize::None => {
            unreachable!("validated schemas only call field_width_bits on fixed-width field types")
        }
    }
}

fn field_width_bytes(field: &FieldSpec) -> usize {
    usize::try_from(field_width_bits(field) / 8).unwrap_or(usize::MAX)
}

fn short_input_err(pdu_name: &'static str, field_name: &'static str, err: NotEnoughBitsError) -> DecodeError {
    DecodeError::short_input(
        CONTEXT,
        pdu_name,
        field_name,
        u64::try_from(err.expected()).unwrap_or(u64::MAX),
        u64::try_from(err.received()).unwrap_or(u64::MAX),
    )
}

fn resolve_integer(pdu_name: &'static str, field: &FieldSpec, record: &Record) -> EncodeResult<u128> {
    record
        .get(field.name())
        .and_then(Value::as_integer)
        .or_else(|| field.default().and_then(Value::as_integer))
        .ok_or_else(|| EncodeError::missing_value(CONTEXT, pdu_name, field.name()))
}

fn resolve_bytes_like(field: &FieldSpec, record: &Record) -> Value {
    record
        .get(field.name())
        .cloned()
        .or_else(|| field.default().cloned())
        .unwrap_or_else(|| Value::Bytes(alloc_vec_new()))
}

fn alloc_vec_new() -> Vec<u8> {
    Vec::new()
}

fn encode_field(
    pdu_type: &PduType,
    field: &FieldSpec,
    record: &Record,
    version: Option<&Version>,
    writer: &mut BitWriter<'_>,
) -> EncodeResult<()> {
    let pdu_name = pdu_type.name();

    match field.field_type() {
        FieldType::Integer | FieldType::Float => {
            let raw = resolve_integer(pdu_name, field, record)?;
            let transformed = apply_custom_encode(field, Value::Integer(raw));
            let value = transformed.as_integer().unwrap_or(raw);
            write_bits(writer, pdu_name, field, value)
        }
        FieldType::Binary => encode_binary(pdu_name, field, record, writer),
        FieldType::String => encode_string(pdu_name, field, record, writer),
        FieldType::Constant | FieldType::Skip => {
            let value = field.default().and_then(Value::as_integer).unwrap_or(0);
            write_bits(writer, pdu_name, field, value)
        }
        FieldType::Subrecord => encode_subrecord(field, record, version, writer),
        FieldType::Virtual => Ok(()),
        FieldType::Variable => encode_variable(pdu_name, field, record, writer),
    }
}

fn write_bits(writer: &mut BitWriter<'_>, pdu_name: &'static str, field: &FieldSpec, value: u128) -> EncodeResult<()> {
    writer
        .write_bits(value, field_width_bits(field), field.endianness())
        .map_err(|_| EncodeError::other(CONTEXT, "destination buffer is smaller than the size computed by sizeof_pdu"))
        .map_err(|e| {
            tracing::error!(pdu = pdu_name, field = field.name(), "bit-writer overrun");
            e
        })
}

fn encode_binary(pdu_name: &'static str, field: &FieldSpec, record: &Record, writer: &mut BitWriter<'_>) -> EncodeResult<()> {
    let width_bytes = field_width_bytes(field);
    let value = apply_custom_encode(field, resolve_bytes_like(field, record));
    let bytes = value.as_bytes().unwrap_or(&[]);

    if bytes.len() < width_bytes {
        return Err(EncodeError::binary_too_short(
            CONTEXT,
            pdu_name,
            field.name(),
            u32::try_from(width_bytes).unwrap_or(u32::MAX),
            bytes.len(),
        ));
    }

    writer
        .write_byte_slice(&bytes[..width_bytes])
        .map_err(|_| EncodeError::other(CONTEXT, "destination buffer is smaller than the size computed by sizeof_pdu"))
}

fn encode_string(pdu_name: &'static str, field: &FieldSpec, record: &Record, writer: &mut BitWriter<'_>) -> EncodeResult<()> {
    let width_bytes = field_width_bytes(field);
    let value = apply_custom_encode(field, resolve_bytes_like_text(field, record));
    let text = value.as_text().unwrap_or("");

    let mut bytes = text.as_bytes().to_vec();
    bytes.resize(width_bytes, 0);

    writer
        .write_byte_slice(&bytes)
        .map_err(|_| EncodeError::other(CONTEXT, pdu_name))
}

fn resolve_bytes_like_text(field: &FieldSpec, record: &Record) -> Value {
    record
        .get(field.name())
        .cloned()
        .or_else(|| field.default().cloned())
        .unwrap_or_else(|| Value::Text(String::new()))
}

fn encode_variable(pdu_name: &'static str, field: &FieldSpec, record: &Record, writer: &mut BitWriter<'_>) -> EncodeResult<()> {
    let FieldSize::Sibling(sibling) = field.size() else {
        unreachable!("validated schemas only give `variable` fields a sibling-named size")
    };

    let sibling_len = usize::try_from(record.get(sibling).and_then(Value::as_integer).unwrap_or(0)).unwrap_or(usize::MAX);
    let value = apply_custom_encode(field, resolve_bytes_like(field, record));
    let bytes = value.as_bytes().unwrap_or(&[]);

    if bytes.len() < sibling_len {
        return Err(EncodeError::binary_too_short(
            CONTEXT,
            pdu_name,
            field.name(),
            u32::try_from(sibling_len).unwrap_or(u32::MAX),
            bytes.len(),
        ));
    }

    writer
        .write_byte_slice(&bytes[..sibling_len])
        .map_err(|_| EncodeError::other(CONTEXT, "destination buffer is smaller than the size computed by sizeof_pdu"))
}

fn encode_subrecord(field: &FieldSpec, record: &Record, version: Option<&Version>, writer: &mut BitWriter<'_>) -> EncodeResult<()> {
    let nested_type = field
        .subrecord_type()
        .expect("validated: every `subrecord` field carries a nested PduType");
    let nested_record = record
        .get(field.name())
        .and_then(Value::as_sub)
        .or_else(|| field.default().and_then(Value::as_sub))
        .ok_or_else(|| EncodeError::missing_value(CONTEXT, nested_type.name(), field.name()))?;

    encode_into(nested_type, nested_record, version, writer)
}

fn decode_field(
    pdu_type: &PduType,
    field: &FieldSpec,
    record: &mut Record,
    version: Option<&Version>,
    reader: &mut BitReader<'_>,
) -> DecodeResult<()> {
    let pdu_name = pdu_type.name();

    match field.field_type() {
        FieldType::Integer | FieldType::Float => {
            let width = field_width_bits(field);
            let bits = read_bits(reader, pdu_name, field, width)?;
            let value = apply_custom_decode(field, Value::Integer(bits));
            record.set(field.name(), value);
            Ok(())
        }
        FieldType::Binary => decode_binary(pdu_name, field, record, reader),
        FieldType::String => decode_string(pdu_name, field, record, reader),
        FieldType::Constant => decode_constant(pdu_name, field, reader),
        FieldType::Skip => {
            let width = usize::try_from(field_width_bits(field)).unwrap_or(usize::MAX);
            reader.skip_bits(width).map_err(|e| short_input_err(pdu_name, field.name(), e))
        }
        FieldType::Subrecord => decode_subrecord(field, record, version, reader),
        FieldType::Virtual => Ok(()),
        FieldType::Variable => decode_variable(pdu_name, field, record, reader),
    }
}

fn read_bits(reader: &mut BitReader<'_>, pdu_name: &'static str, field: &FieldSpec, width: u32) -> DecodeResult<u128> {
    reader
        .read_bits(width, field.endianness())
        .map_err(|e| short_input_err(pdu_name, field.name(), e))
}

fn decode_binary(pdu_name: &'static str, field: &FieldSpec, record: &mut Record, reader: &mut BitReader<'_>) -> DecodeResult<()> {
    let width_bytes = field_width_bytes(field);
    let bytes = reader
        .read_byte_vec(width_bytes)
        .map_err(|e| short_input_err(pdu_name, field.name(), e))?;
    let value = apply_custom_decode(field, Value::Bytes(bytes));
    record.set(field.name(), value);
    Ok(())
}

fn decode_string(pdu_name: &'static str, field: &FieldSpec, record: &mut Record, reader: &mut BitReader<'_>) -> DecodeResult<()> {
    let width_bytes = field_width_bytes(field);
    let bytes = reader
        .read_byte_vec(width_bytes)
        .map_err(|e| short_input_err(pdu_name, field.name(), e))?;

    let trimmed_len = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    let text = String::from_utf8_lossy(&bytes[..trimmed_len]).into_owned();

    let value = apply_custom_decode(field, Value::Text(text));
    record.set(field.name(), value);
    Ok(())
}

fn decode_constant(pdu_name: &'static str, field: &FieldSpec, reader: &mut BitReader<'_>) -> DecodeResult<()> {
    let width = field_width_bits(field);
    let expected = field.default().and_then(Value::as_integer).unwrap_or(0);
    let got = read_bits(reader, pdu_name, field, width)?;

    if got != expected {
        tracing::warn!(pdu = pdu_name, field = field.name(), %got, %expected, "constant field mismatch");
        return Err(DecodeError::constant_mismatch(CONTEXT, pdu_name, field.name(), expected, got));
    }
    Ok(())
}

fn decode_variable(pdu_name: &'static str, field: &FieldSpec, record: &mut Record, reader: &mut BitReader<'_>) -> DecodeResult<()> {
    let FieldSize::Sibling(sibling) = field.size() else {
        unreachable!("validated schemas only give `variable` fields a sibling-named size")
    };

    let sibling_len = usize::try_from(record.get(sibling).and_then(Value::as_integer).unwrap_or(0)).unwrap_or(usize::MAX);
    let bytes = reader
        .read_byte_vec(sibling_len)
        .map_err(|e| short_input_err(pdu_name, field.name(), e))?;

    let value = apply_custom_decode(field, Value::Bytes(bytes));
    record.set(field.name(), value);
    Ok(())
}

fn decode_subrecord(field: &FieldSpec, record: &mut Record, version: Option<&Version>, reader: &mut BitReader<'_>) -> DecodeResult<()> {
    let nested_type = field
        .subrecord_type()
        .expect("validated: every `subrecord` field carries a nested PduType");
    let nested_record = decode_from(nested_type, reader, version)?;
    record.set(field.name(), Value::Sub(nested_record));
    Ok(())
}
