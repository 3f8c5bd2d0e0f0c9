use pducodec_core::Record;
use pducodec_schema::FieldSpec;
use pducodec_version::Version;

/// Whether `field` contributes/consumes bits at all, for this record and
/// runtime version. Both the version predicate and the conditional gate
/// must allow the field; either one excluding it elides the field
/// entirely (see spec.md §4.2/§4.3).
pub(crate) fn field_active(field: &FieldSpec, record: &Record, version: Option<&Version>) -> bool {
    version_allows(field, version) && conditional_allows(field, record)
}

/// A `nil` runtime version (`None`) matches every predicate (spec.md §3.2).
fn version_allows(field: &FieldSpec, version: Option<&Version>) -> bool {
    match (field.version(), version) {
        (None, _) => true,
        (Some(_), None) => true,
        (Some(predicate), Some(v)) => predicate.matches(v),
    }
}

/// A missing `conditional` gate means the field is unconditional.
/// Otherwise the gate's current slot must be present, by the
/// three-valued test in [`pducodec_core::Value::is_absent`].
fn conditional_allows(field: &FieldSpec, record: &Record) -> bool {
    match field.conditional() {
        None => true,
        Some(gate) => !record.is_absent(gate),
    }
}
