use std::sync::Arc;

use pducodec_core::{Endianness, Record, Value};
use pducodec_version::VersionPredicate;

use crate::pdu_type::PduType;

/// The kind of a field descriptor, per its wire/record behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    Float,
    Binary,
    String,
    Constant,
    Subrecord,
    Virtual,
    Variable,
    Skip,
}

/// A field's declared size, in the three shapes the format needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldSize {
    /// A fixed bit width (byte-typed fields store their width in bits too,
    /// i.e. a 4-byte `binary` field carries `Bits(32)`).
    Bits(u32),
    /// Named sibling integer field supplying the length, in bytes, for a
    /// `variable`/`skip` field.
    Sibling(&'static str),
    /// No declared size: `subrecord` and `virtual` fields ignore `size`.
    None,
}

/// A field-level value transform applied immediately around the ordinary
/// bit-level codec for that field's type/size/endianness. See
/// `SPEC_FULL.md` §9 point 4 for why this crate represents custom
/// overrides this way rather than as raw bit-string rewriters.
#[derive(Clone, Copy)]
pub struct CustomCodec {
    pub encode: fn(&Value) -> Value,
    pub decode: fn(Value) -> Value,
}

impl core::fmt::Debug for CustomCodec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CustomCodec").finish_non_exhaustive()
    }
}

/// An immutable field descriptor. Built via the `FieldSpec::integer`-style
/// constructors and the `with_*` chain, then handed to
/// [`crate::PduTypeBuilder::field`].
#[derive(Clone, Debug)]
pub struct FieldSpec {
    pub(crate) name: &'static str,
    pub(crate) ty: FieldType,
    pub(crate) size: FieldSize,
    pub(crate) default: Option<Value>,
    pub(crate) endianness: Endianness,
    pub(crate) version: Option<VersionPredicate>,
    pub(crate) conditional: Option<&'static str>,
    pub(crate) offset_to: Option<&'static str>,
    pub(crate) custom: Option<CustomCodec>,
    pub(crate) subrecord_type: Option<Arc<PduType>>,
}

impl FieldSpec {
    fn bare(name: &'static str, ty: FieldType, size: FieldSize) -> Self {
        Self {
            name,
            ty,
            size,
            default: None,
            endianness: Endianness::Big,
            version: None,
            conditional: None,
            offset_to: None,
            custom: None,
            subrecord_type: None,
        }
    }

    /// An unsigned bit-pattern field of exactly `width_bits` bits.
    #[must_use]
    pub fn integer(name: &'static str, width_bits: u32) -> Self {
        Self::bare(name, FieldType::Integer, FieldSize::Bits(width_bits))
    }

    /// An IEEE-754 field; `width_bits` must be 32 or 64 (checked at validation).
    #[must_use]
    pub fn float(name: &'static str, width_bits: u32) -> Self {
        Self::bare(name, FieldType::Float, FieldSize::Bits(width_bits))
    }

    /// A fixed-length byte field; short values fail to encode, long ones are truncated.
    #[must_use]
    pub fn binary(name: &'static str, width_bytes: u32) -> Self {
        Self::bare(name, FieldType::Binary, FieldSize::Bits(width_bytes * 8))
    }

    /// A fixed-length, zero-padded/zero-stripped text field.
    #[must_use]
    pub fn string(name: &'static str, width_bytes: u32) -> Self {
        Self::bare(name, FieldType::String, FieldSize::Bits(width_bytes * 8))
    }

    /// A field whose bits are always `default`; a decode mismatch is a
    /// `ConstantMismatch` error. Not present in the record.
    #[must_use]
    pub fn constant(name: &'static str, width_bits: u32, value: u128) -> Self {
        let mut field = Self::bare(name, FieldType::Constant, FieldSize::Bits(width_bits));
        field.default = Some(Value::Integer(value));
        field
    }

    /// A nested PDU, recursively encoded/decoded with the parent's version.
    #[must_use]
    pub fn subrecord(name: &'static str, nested: Arc<PduType>, default: Record) -> Self {
        let mut field = Self::bare(name, FieldType::Subrecord, FieldSize::None);
        field.default = Some(Value::Sub(default));
        field.subrecord_type = Some(nested);
        field
    }

    /// A record-only slot: zero bits on the wire in either direction.
    #[must_use]
    pub fn virtual_field(name: &'static str, default: Value) -> Self {
        let mut field = Self::bare(name, FieldType::Virtual, FieldSize::None);
        field.default = Some(default);
        field
    }

    /// A byte field whose length is read from the already-declared integer
    /// sibling `length_field`.
    #[must_use]
    pub fn variable(name: &'static str, length_field: &'static str) -> Self {
        Self::bare(name, FieldType::Variable, FieldSize::Sibling(length_field))
    }

    /// A reserved field: encoded from `default`, discarded on decode.
    #[must_use]
    pub fn skip(name: &'static str, width_bits: u32, default: u128) -> Self {
        let mut field = Self::bare(name, FieldType::Skip, FieldSize::Bits(width_bits));
        field.default = Some(Value::Integer(default));
        field
    }

    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    #[must_use]
    pub fn with_endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = endianness;
        self
    }

    #[must_use]
    pub fn with_version(mut self, predicate: VersionPredicate) -> Self {
        self.version = Some(predicate);
        self
    }

    /// `gate` is a sibling field name; this field is elided whenever
    /// `gate`'s value is absent (`0`, empty bytes/text, or not yet set).
    #[must_use]
    pub fn with_conditional(mut self, gate: &'static str) -> Self {
        self.conditional = Some(gate);
        self
    }

    /// Marks this (integer) field as holding the byte offset to `target`,
    /// populated by `set_offsets` before every encode.
    #[must_use]
    pub fn with_offset_to(mut self, target: &'static str) -> Self {
        self.offset_to = Some(target);
        self
    }

    #[must_use]
    pub fn with_custom_codec(mut self, encode: fn(&Value) -> Value, decode: fn(Value) -> Value) -> Self {
        self.custom = Some(CustomCodec { encode, decode });
        self
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn field_type(&self) -> FieldType {
        self.ty
    }

    #[must_use]
    pub fn size(&self) -> FieldSize {
        self.size
    }

    #[must_use]
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    #[must_use]
    pub fn version(&self) -> Option<&VersionPredicate> {
        self.version.as_ref()
    }

    #[must_use]
    pub fn conditional(&self) -> Option<&'static str> {
        self.conditional
    }

    #[must_use]
    pub fn offset_to(&self) -> Option<&'static str> {
        self.offset_to
    }

    #[must_use]
    pub fn custom_codec(&self) -> Option<&CustomCodec> {
        self.custom.as_ref()
    }

    #[must_use]
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    #[must_use]
    pub fn subrecord_type(&self) -> Option<&Arc<PduType>> {
        self.subrecord_type.as_ref()
    }
}
