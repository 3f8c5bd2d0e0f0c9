use pducodec_core::{Record, Value};
use pducodec_schema::{FieldSize, FieldSpec, FieldType, PduType, SchemaErrorExt, SchemaResult};
use pducodec_version::Version;

use crate::codec::field_width_bits;
use crate::gating::field_active;

const CONTEXT: &str = "pducodec::sizeof";

/// Unit requested from [`sizeof_pdu`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeUnit {
    Bits,
    Bytes,
}

/// Runtime size, in bits, of a single named field for this record.
///
/// Ignores any `version` predicate on the field (there is no version
/// parameter on this call per spec.md §4.4/§6) but still honors
/// `conditional` elision, which `sizeof_pdu` below shares the same logic
/// for.
pub(crate) fn sizeof(pdu_type: &PduType, record: &Record, field_name: &str) -> SchemaResult<u64> {
    let field = pdu_type
        .field(field_name)
        .ok_or_else(|| SchemaErrorExt::unknown_field(CONTEXT, pdu_type.name(), field_name))?;
    Ok(field_bits(field, record, None))
}

/// Sums the runtime size of every field that survives version/conditional
/// gating, recursing into `subrecord` fields. Always passes `unit` through
/// the recursion rather than hard-coding bits and dividing partway (the
/// discipline chosen in `SPEC_FULL.md` §9 point 1).
pub(crate) fn sizeof_pdu(pdu_type: &PduType, record: &Record, version: Option<&Version>, unit: SizeUnit) -> u64 {
    let total_bits: u64 = pdu_type.fields().iter().map(|field| field_bits(field, record, version)).sum();

    match unit {
        SizeUnit::Bits => total_bits,
        SizeUnit::Bytes => total_bits / 8,
    }
}

pub(crate) fn field_bits(field: &FieldSpec, record: &Record, version: Option<&Version>) -> u64 {
    if !field_active(field, record, version) {
        return 0;
    }

    match field.field_type() {
        FieldType::Virtual => 0,
        FieldType::Variable => {
            let FieldSize::Sibling(sibling) = field.size() else {
                unreachable!("validated schemas only give `variable` fields a sibling-named size")
            };
            let len = record.get(sibling).and_then(Value::as_integer).unwrap_or(0);
            (len as u64) * 8
        }
        FieldType::Subrecord => {
            let nested_type = field
                .subrecord_type()
                .expect("validated: every `subrecord` field carries a nested PduType");
            let nested_record = record
                .get(field.name())
                .and_then(Value::as_sub)
                .or_else(|| field.default().and_then(Value::as_sub))
                .expect("validated: every `subrecord` field carries a default record");
            sizeof_pdu(nested_type, nested_record, version, SizeUnit::Bits)
        }
        FieldType::Integer | FieldType::Float | FieldType::Binary | FieldType::String | FieldType::Constant | FieldType::Skip => {
            u64::from(field_width_bits(field))
        }
    }
}
