use core::fmt;

use pducodec_error::Error;

pub type EncodeError = Error<EncodeErrorKind>;
pub type EncodeResult<T> = Result<T, EncodeError>;

pub type DecodeError = Error<DecodeErrorKind>;
pub type DecodeResult<T> = Result<T, DecodeError>;

#[non_exhaustive]
#[derive(Clone, Debug)]
pub enum EncodeErrorKind {
    /// A `binary`-typed field's value has fewer bytes than its declared size.
    BinaryTooShort {
        pdu_name: &'static str,
        field_name: &'static str,
        expected_bytes: u32,
        actual_bytes: usize,
    },
    /// A non-conditional, non-defaulted field slot is empty.
    MissingValue {
        pdu_name: &'static str,
        field_name: &'static str,
    },
    Other {
        description: &'static str,
    },
}

impl std::error::Error for EncodeErrorKind {}

impl fmt::Display for EncodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BinaryTooShort {
                pdu_name,
                field_name,
                expected_bytes,
                actual_bytes,
            } => write!(
                f,
                "`{pdu_name}.{field_name}` needs {expected_bytes} bytes to encode, value has {actual_bytes}"
            ),
            Self::MissingValue { pdu_name, field_name } => {
                write!(f, "`{pdu_name}.{field_name}` has no value and no default")
            }
            Self::Other { description } => write!(f, "{description}"),
        }
    }
}

pub trait EncodeErrorExt {
    fn binary_too_short(
        context: &'static str,
        pdu_name: &'static str,
        field_name: &'static str,
        expected_bytes: u32,
        actual_bytes: usize,
    ) -> Self;
    fn missing_value(context: &'static str, pdu_name: &'static str, field_name: &'static str) -> Self;
    fn other(context: &'static str, description: &'static str) -> Self;
}

impl EncodeErrorExt for EncodeError {
    fn binary_too_short(
        context: &'static str,
        pdu_name: &'static str,
        field_name: &'static str,
        expected_bytes: u32,
        actual_bytes: usize,
    ) -> Self {
        Self::new(
            context,
            EncodeErrorKind::BinaryTooShort {
                pdu_name,
                field_name,
                expected_bytes,
                actual_bytes,
            },
        )
    }

    fn missing_value(context: &'static str, pdu_name: &'static str, field_name: &'static str) -> Self {
        Self::new(context, EncodeErrorKind::MissingValue { pdu_name, field_name })
    }

    fn other(context: &'static str, description: &'static str) -> Self {
        Self::new(context, EncodeErrorKind::Other { description })
    }
}

#[non_exhaustive]
#[derive(Clone, Debug)]
pub enum DecodeErrorKind {
    /// A `constant` field's wire bits differ from its declared default.
    /// The original implementation this port is based on surfaces this as
    /// an opaque pattern-match panic; this port always classifies it
    /// explicitly (see `SPEC_FULL.md` §9 point 2).
    ConstantMismatch {
        pdu_name: &'static str,
        field_name: &'static str,
        expected: u128,
        got: u128,
    },
    /// Fewer bits remain in the input than the next field demands.
    ShortInput {
        pdu_name: &'static str,
        field_name: &'static str,
        needed_bits: u64,
        remaining_bits: u64,
    },
    Other {
        description: &'static str,
    },
}

impl std::error::Error for DecodeErrorKind {}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConstantMismatch {
                pdu_name,
                field_name,
                expected,
                got,
            } => write!(
                f,
                "`{pdu_name}.{field_name}` expected constant bit pattern {expected:#x}, got {got:#x}"
            ),
            Self::ShortInput {
                pdu_name,
                field_name,
                needed_bits,
                remaining_bits,
            } => write!(
                f,
                "`{pdu_name}.{field_name}` needs {needed_bits} bits, only {remaining_bits} remain in the input"
            ),
            Self::Other { description } => write!(f, "{description}"),
        }
    }
}

pub trait DecodeErrorExt {
    fn constant_mismatch(
        context: &'static str,
        pdu_name: &'static str,
        field_name: &'static str,
        expected: u128,
        got: u128,
    ) -> Self;
    fn short_input(
        context: &'static str,
        pdu_name: &'static str,
        field_name: &'static str,
        needed_bits: u64,
        remaining_bits: u64,
    ) -> Self;
    fn other(context: &'static str, description: &'static str) -> Self;
}

impl DecodeErrorExt for DecodeError {
    fn constant_mismatch(
        context: &'static str,
        pdu_name: &'static str,
        field_name: &'static str,
        expected: u128,
        got: u128,
    ) -> Self {
        Self::new(
            context,
            DecodeErrorKind::ConstantMismatch {
                pdu_name,
                field_name,
                expected,
                got,
            },
        )
    }

    fn short_input(
        context: &'static str,
        pdu_name: &'static str,
        field_name: &'static str,
        needed_bits: u64,
        remaining_bits: u64,
    ) -> Self {
        Self::new(
            context,
            DecodeErrorKind::ShortInput {
                pdu_name,
                field_name,
                needed_bits,
                remaining_bits,
            },
        )
    }

    fn other(context: &'static str, description: &'static str) -> Self {
        Self::new(context, DecodeErrorKind::Other { description })
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use super::*;

    #[test]
    fn constant_mismatch_display() {
        let err = DecodeError::constant_mismatch("pducodec::codec", "Basic", "const_field", 10, 11);
        expect!["[pducodec::codec] `Basic.const_field` expected constant bit pattern 0xa, got 0xb"].assert_eq(&err.to_string());
    }

    #[test]
    fn short_input_display() {
        let err = DecodeError::short_input("pducodec::codec", "Basic", "other_test_field", 24, 8);
        expect!["[pducodec::codec] `Basic.other_test_field` needs 24 bits, only 8 remain in the input"].assert_eq(&err.to_string());
    }

    #[test]
    fn binary_too_short_display() {
        let err = EncodeError::binary_too_short("pducodec::codec", "Padded", "payload", 16, 4);
        expect!["[pducodec::codec] `Padded.payload` needs 16 bytes to encode, value has 4"].assert_eq(&err.to_string());
    }
}
