use core::fmt;

use pducodec_error::Error;

/// Error produced while building or validating a PDU type. Always a
/// definition-time failure: if this is returned, the PDU type was never
/// constructed.
pub type SchemaError = Error<SchemaErrorKind>;

pub type SchemaResult<T> = Result<T, SchemaError>;

#[non_exhaustive]
#[derive(Clone, Debug)]
pub enum SchemaErrorKind {
    NotByteAligned {
        pdu_name: &'static str,
        total_bits: u64,
    },
    MissingDefault {
        pdu_name: &'static str,
        field_name: &'static str,
    },
    IllegalFloatSize {
        pdu_name: &'static str,
        field_name: &'static str,
        size_bits: u32,
    },
    UnknownSiblingLength {
        pdu_name: &'static str,
        field_name: &'static str,
        sibling: &'static str,
    },
    SiblingLengthNotInteger {
        pdu_name: &'static str,
        field_name: &'static str,
        sibling: &'static str,
    },
    ForwardSiblingReference {
        pdu_name: &'static str,
        field_name: &'static str,
        sibling: &'static str,
    },
    UnknownOffsetTarget {
        pdu_name: &'static str,
        field_name: &'static str,
        target: &'static str,
    },
    OffsetTargetNotInteger {
        pdu_name: &'static str,
        field_name: &'static str,
        target: &'static str,
    },
    OffsetTargetIsSelf {
        pdu_name: &'static str,
        field_name: &'static str,
    },
    UnknownConditionalTarget {
        pdu_name: &'static str,
        field_name: &'static str,
        target: &'static str,
    },
    DuplicateFieldName {
        pdu_name: &'static str,
        field_name: &'static str,
    },
    /// Raised at runtime, not definition time: a caller asked `sizeof` for
    /// a field name that doesn't exist on this PDU type.
    UnknownField { pdu_name: &'static str, field_name: String },
}

impl std::error::Error for SchemaErrorKind {}

impl fmt::Display for SchemaErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotByteAligned { pdu_name, total_bits } => write!(
                f,
                "`{pdu_name}`'s fixed fields sum to {total_bits} bits, which isn't a multiple of 8"
            ),
            Self::MissingDefault { pdu_name, field_name } => {
                write!(f, "`{pdu_name}.{field_name}` requires a default value")
            }
            Self::IllegalFloatSize {
                pdu_name,
                field_name,
                size_bits,
            } => write!(
                f,
                "`{pdu_name}.{field_name}` declares a float of {size_bits} bits; only 32 or 64 are valid"
            ),
            Self::UnknownSiblingLength {
                pdu_name,
                field_name,
                sibling,
            } => write!(
                f,
                "`{pdu_name}.{field_name}` names unknown sibling length field `{sibling}`"
            ),
            Self::SiblingLengthNotInteger {
                pdu_name,
                field_name,
                sibling,
            } => write!(
                f,
                "`{pdu_name}.{field_name}` names sibling `{sibling}` as its length field, but `{sibling}` isn't an integer field"
            ),
            Self::ForwardSiblingReference {
                pdu_name,
                field_name,
                sibling,
            } => write!(
                f,
                "`{pdu_name}.{field_name}` references sibling `{sibling}`, which is declared later in field order"
            ),
            Self::UnknownOffsetTarget {
                pdu_name,
                field_name,
                target,
            } => write!(f, "`{pdu_name}.{field_name}` offset target `{target}` doesn't exist"),
            Self::OffsetTargetNotInteger {
                pdu_name,
                field_name,
                target,
            } => write!(
                f,
                "`{pdu_name}.{field_name}` offset target `{target}` must itself be a plain `integer` field"
            ),
            Self::OffsetTargetIsSelf { pdu_name, field_name } => {
                write!(f, "`{pdu_name}.{field_name}` can't be its own offset target")
            }
            Self::UnknownConditionalTarget {
                pdu_name,
                field_name,
                target,
            } => write!(
                f,
                "`{pdu_name}.{field_name}` conditional gate `{target}` doesn't exist"
            ),
            Self::DuplicateFieldName { pdu_name, field_name } => {
                write!(f, "`{pdu_name}` declares field `{field_name}` more than once")
            }
            Self::UnknownField { pdu_name, field_name } => {
                write!(f, "`{pdu_name}` has no field named `{field_name}`")
            }
        }
    }
}

pub trait SchemaErrorExt {
    fn not_byte_aligned(context: &'static str, pdu_name: &'static str, total_bits: u64) -> Self;
    fn missing_default(context: &'static str, pdu_name: &'static str, field_name: &'static str) -> Self;
    fn illegal_float_size(context: &'static str, pdu_name: &'static str, field_name: &'static str, size_bits: u32) -> Self;
    fn unknown_sibling_length(context: &'static str, pdu_name: &'static str, field_name: &'static str, sibling: &'static str) -> Self;
    fn sibling_length_not_integer(context: &'static str, pdu_name: &'static str, field_name: &'static str, sibling: &'static str) -> Self;
    fn forward_sibling_reference(context: &'static str, pdu_name: &'static str, field_name: &'static str, sibling: &'static str) -> Self;
    fn unknown_offset_target(context: &'static str, pdu_name: &'static str, field_name: &'static str, target: &'static str) -> Self;
    fn offset_target_not_integer(context: &'static str, pdu_name: &'static str, field_name: &'static str, target: &'static str) -> Self;
    fn offset_target_is_self(context: &'static str, pdu_name: &'static str, field_name: &'static str) -> Self;
    fn unknown_conditional_target(context: &'static str, pdu_name: &'static str, field_name: &'static str, target: &'static str) -> Self;
    fn duplicate_field_name(context: &'static str, pdu_name: &'static str, field_name: &'static str) -> Self;
    fn unknown_field(context: &'static str, pdu_name: &'static str, field_name: impl Into<String>) -> Self;
}

impl SchemaErrorExt for SchemaError {
    fn not_byte_aligned(context: &'static str, pdu_name: &'static str, total_bits: u64) -> Self {
        Self::new(context, SchemaErrorKind::NotByteAligned { pdu_name, total_bits })
    }

    fn missing_default(context: &'static str, pdu_name: &'static str, field_name: &'static str) -> Self {
        Self::new(context, SchemaErrorKind::MissingDefault { pdu_name, field_name })
    }

    fn illegal_float_size(context: &'static str, pdu_name: &'static str, field_name: &'static str, size_bits: u32) -> Self {
        Self::new(
            context,
            SchemaErrorKind::IllegalFloatSize {
                pdu_name,
                field_name,
                size_bits,
            },
        )
    }

    fn unknown_sibling_length(context: &'static str, pdu_name: &'static str, field_name: &'static str, sibling: &'static str) -> Self {
        Self::new(
            context,
            SchemaErrorKind::UnknownSiblingLength {
                pdu_name,
                field_name,
                sibling,
            },
        )
    }

    fn sibling_length_not_integer(context: &'static str, pdu_name: &'static str, field_name: &'static str, sibling: &'static str) -> Self {
        Self::new(
            context,
            SchemaErrorKind::SiblingLengthNotInteger {
                pdu_name,
                field_name,
                sibling,
            },
        )
    }

    fn forward_sibling_reference(context: &'static str, pdu_name: &'static str, field_name: &'static str, sibling: &'static str) -> Self {
        Self::new(
            context,
            SchemaErrorKind::ForwardSiblingReference {
                pdu_name,
                field_name,
                sibling,
            },
        )
    }

    fn unknown_offset_target(context: &'static str, pdu_name: &'static str, field_name: &'static str, target: &'static str) -> Self {
        Self::new(
            context,
            SchemaErrorKind::UnknownOffsetTarget {
                pdu_name,
                field_name,
                target,
            },
        )
    }

    fn offset_target_not_integer(context: &'static str, pdu_name: &'static str, field_name: &'static str, target: &'static str) -> Self {
        Self::new(
            context,
            SchemaErrorKind::OffsetTargetNotInteger {
                pdu_name,
                field_name,
                target,
            },
        )
    }

    fn offset_target_is_self(context: &'static str, pdu_name: &'static str, field_name: &'static str) -> Self {
        Self::new(context, SchemaErrorKind::OffsetTargetIsSelf { pdu_name, field_name })
    }

    fn unknown_conditional_target(context: &'static str, pdu_name: &'static str, field_name: &'static str, target: &'static str) -> Self {
        Self::new(
            context,
            SchemaErrorKind::UnknownConditionalTarget {
                pdu_name,
                field_name,
                target,
            },
        )
    }

    fn duplicate_field_name(context: &'static str, pdu_name: &'static str, field_name: &'static str) -> Self {
        Self::new(context, SchemaErrorKind::DuplicateFieldName { pdu_name, field_name })
    }

    fn unknown_field(context: &'static str, pdu_name: &'static str, field_name: impl Into<String>) -> Self {
        Self::new(
            context,
            SchemaErrorKind::UnknownField {
                pdu_name,
                field_name: field_name.into(),
            },
        )
    }
}
