use pducodec_core::{BitReader, BitWriter, Record};
use pducodec_schema::{PduType, SchemaResult};
use pducodec_version::Version;

use crate::codec;
use crate::error::{DecodeResult, EncodeResult};
use crate::offsets::set_offsets;
use crate::sizeof::{self, SizeUnit};

/// Runtime operations over a [`PduType`].
///
/// Defined as an extension trait rather than inherent methods on
/// `PduType` because the orphan rule forbids this crate from adding
/// inherent impls to a type it doesn't own — `PduType` lives in
/// `pducodec-schema` (see `SPEC_FULL.md` §6).
pub trait PduCodec {
    /// Runtime size, in bits, of a single named field for `record`.
    fn sizeof(&self, record: &Record, field_name: &str) -> SchemaResult<u64>;

    /// Total runtime size of `record`, in the requested unit, honoring
    /// version and conditional gating and recursing into subrecords.
    fn sizeof_pdu(&self, record: &Record, version: Option<&Version>, unit: SizeUnit) -> u64;

    /// Encodes `record` to a freshly allocated buffer.
    ///
    /// Runs `set_offsets` first so every `offset_to` field carries its
    /// correct byte offset before any bits are written, then allocates a
    /// buffer exactly `sizeof_pdu(..., SizeUnit::Bytes)` long.
    fn encode(&self, record: &Record, version: Option<&Version>) -> EncodeResult<Vec<u8>>;

    /// Decodes one `Self`-shaped record from the front of `bytes`,
    /// returning it along with whatever bytes follow it.
    fn decode<'a>(&self, bytes: &'a [u8], version: Option<&Version>) -> DecodeResult<(Record, &'a [u8])>;

    /// Returns a copy of `record` with every `offset_to` field (its own,
    /// and recursively every subrecord's) populated. Exposed separately
    /// from `encode` so callers can inspect computed offsets beforehand.
    fn set_offsets(&self, record: Record, version: Option<&Version>) -> EncodeResult<Record>;
}

impl PduCodec for PduType {
    fn sizeof(&self, record: &Record, field_name: &str) -> SchemaResult<u64> {
        sizeof::sizeof(self, record, field_name)
    }

    fn sizeof_pdu(&self, record: &Record, version: Option<&Version>, unit: SizeUnit) -> u64 {
        sizeof::sizeof_pdu(self, record, version, unit)
    }

    fn encode(&self, record: &Record, version: Option<&Version>) -> EncodeResult<Vec<u8>> {
        let record = set_offsets(self, record.clone(), version)?;

        let total_bytes = sizeof::sizeof_pdu(self, &record, version, SizeUnit::Bytes) as usize;
        let mut buf = vec![0u8; total_bytes];
        let mut writer = BitWriter::new(&mut buf);

        codec::encode_into(self, &record, version, &mut writer)?;
        tracing::debug!(pdu = self.name(), bytes = total_bytes, "encoded");
        Ok(buf)
    }

    fn decode<'a>(&self, bytes: &'a [u8], version: Option<&Version>) -> DecodeResult<(Record, &'a [u8])> {
        let mut reader = BitReader::new(bytes);
        let record = codec::decode_from(self, &mut reader, version)?;
        tracing::debug!(pdu = self.name(), consumed = reader.byte_pos(), "decoded");
        Ok((record, reader.remaining_bytes()))
    }

    fn set_offsets(&self, record: Record, version: Option<&Version>) -> EncodeResult<Record> {
        set_offsets(self, record, version)
    }
}

pducodec_core::assert_obj_safe!(PduCodec);
