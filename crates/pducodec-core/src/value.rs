use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

/// A dynamically-typed slot value for one field of a [`Record`].
///
/// The schema in `pducodec-schema` decides which variant a given field
/// name is allowed to hold; this type itself enforces nothing beyond what
/// each variant can represent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    /// Backing storage for `integer`, `float` (bit-reinterpreted), `constant`,
    /// `virtual`, `skip`, and `offset_to` fields.
    Integer(u128),
    /// Backing storage for `binary` and `variable` fields.
    Bytes(Vec<u8>),
    /// Backing storage for `string` fields.
    Text(String),
    /// Backing storage for `subrecord` fields.
    Sub(Record),
}

impl Value {
    /// Three-valued "absence" test used by conditional gates: `0`, an
    /// empty byte string, an empty text string, and (by the caller
    /// checking for a missing key) a missing slot are all "absent".
    ///
    /// This is preserved exactly as the source toolkit behaves, including
    /// the surprising case where `0` is a legitimate but absent-coded
    /// value for an integer flag field.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        match self {
            Self::Integer(0) => true,
            Self::Bytes(b) => b.is_empty(),
            Self::Text(s) => s.is_empty(),
            Self::Integer(_) | Self::Sub(_) => false,
        }
    }

    /// Returns the integer payload, if this is an [`Value::Integer`].
    #[must_use]
    pub const fn as_integer(&self) -> Option<u128> {
        match self {
            Self::Integer(v) => Some(*v),
            Self::Bytes(_) | Self::Text(_) | Self::Sub(_) => None,
        }
    }

    /// Returns the byte payload, if this is an [`Value::Bytes`].
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(v) => Some(v.as_slice()),
            Self::Integer(_) | Self::Text(_) | Self::Sub(_) => None,
        }
    }

    /// Returns the text payload, if this is an [`Value::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v.as_str()),
            Self::Integer(_) | Self::Bytes(_) | Self::Sub(_) => None,
        }
    }

    /// Returns the nested record, if this is a [`Value::Sub`].
    #[must_use]
    pub const fn as_sub(&self) -> Option<&Record> {
        match self {
            Self::Sub(v) => Some(v),
            Self::Integer(_) | Self::Bytes(_) | Self::Text(_) => None,
        }
    }
}

/// A PDU value: one slot per non-`constant` field of some PDU type.
///
/// `constant` fields never appear here — they exist only in the wire
/// encoding. `virtual` fields do appear, populated from their declared
/// default, but never touch the wire. Field order is carried by the
/// schema, not by this map; lookups are by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    name: &'static str,
    fields: BTreeMap<&'static str, Value>,
}

impl Record {
    /// Creates an empty record for the PDU type named `name`.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: BTreeMap::new(),
        }
    }

    /// The PDU type name this record was built for. Used in error context.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Reads a field's current value, if the slot has been populated.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Sets a field's value, returning the previous value if any.
    pub fn set(&mut self, field: &'static str, value: Value) -> Option<Value> {
        self.fields.insert(field, value)
    }

    /// `true` when the named field's slot is absent by the three-valued
    /// test in [`Value::is_absent`] (including a wholly missing slot).
    #[must_use]
    pub fn is_absent(&self, field: &str) -> bool {
        self.fields.get(field).map_or(true, Value::is_absent)
    }

    /// Iterates over the populated `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.fields.iter().map(|(&k, v)| (k, v))
    }
}
