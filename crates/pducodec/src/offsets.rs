use pducodec_core::{Record, Value};
use pducodec_schema::{FieldType, PduType};
use pducodec_version::Version;

use crate::error::EncodeResult;
use crate::gating::field_active;
use crate::sizeof::field_bits;

/// Fixes up every `offset_to` field throughout `record`'s entire tree (its
/// own fields and, recursively, every `subrecord` field's nested record) in
/// a single top-level pass, run once before any bits are written.
///
/// An `offset_to` field's value is the byte offset, from the start of the
/// record it belongs to, of the field it targets — summing the runtime
/// size of every preceding field that survives version/conditional gating.
/// When the target itself is elided, the offset is `0` (spec.md §8
/// scenario 6).
pub(crate) fn set_offsets(pdu_type: &PduType, mut record: Record, version: Option<&Version>) -> EncodeResult<Record> {
    for field in pdu_type.fields() {
        if let Some(target) = field.offset_to() {
            let offset = offset_to_target(pdu_type, &record, version, target);
            record.set(field.name(), Value::Integer(u128::from(offset)));
        }
    }

    recurse_into_subrecords(pdu_type, &mut record, version)?;
    Ok(record)
}

fn offset_to_target(pdu_type: &PduType, record: &Record, version: Option<&Version>, target: &str) -> u64 {
    let Some(target_index) = pdu_type.field_index(target) else {
        unreachable!("validated: every `offset_to` target names an existing field")
    };
    let target_field = &pdu_type.fields()[target_index];

    if !field_active(target_field, record, version) {
        return 0;
    }

    let bits_before: u64 = pdu_type.fields()[..target_index].iter().map(|f| field_bits(f, record, version)).sum();
    bits_before / 8
}

fn recurse_into_subrecords(pdu_type: &PduType, record: &mut Record, version: Option<&Version>) -> EncodeResult<()> {
    for field in pdu_type.fields() {
        if field.field_type() != FieldType::Subrecord {
            continue;
        }
        if !field_active(field, record, version) {
            continue;
        }

        let nested_type = field
            .subrecord_type()
            .expect("validated: every `subrecord` field carries a nested PduType");
        let Some(nested_record) = record.get(field.name()).and_then(Value::as_sub).cloned() else {
            continue;
        };

        let fixed = set_offsets(nested_type, nested_record, version)?;
        record.set(field.name(), Value::Sub(fixed));
    }
    Ok(())
}
