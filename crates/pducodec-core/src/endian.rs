/// Byte order used to pack/unpack a fixed-width integer or float field.
///
/// Only meaningful for widths that are a multiple of 8 bits: a field
/// narrower than a byte (e.g. a 12-bit integer) has no well-defined byte
/// order to swap, so [`Endianness::resolved_is_little`] folds `Little`
/// and `Native` back to big-endian bit order in that case. See
/// `BitWriter::write_bits`/`BitReader::read_bits`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Endianness {
    /// Most significant byte first. The schema default.
    #[default]
    Big,
    /// Least significant byte first.
    Little,
    /// Whatever order the target platform's CPU uses natively.
    Native,
}

impl Endianness {
    /// Resolves `Native` against the build target, then reports whether the
    /// effective order is little-endian for a `width_bits`-wide field.
    ///
    /// Returns `false` (i.e. big-endian bit order) for any width that isn't
    /// a whole number of bytes, regardless of the declared endianness.
    #[must_use]
    pub const fn resolved_is_little(self, width_bits: u32) -> bool {
        if width_bits % 8 != 0 {
            return false;
        }

        match self {
            Self::Big => false,
            Self::Little => true,
            #[cfg(target_endian = "little")]
            Self::Native => true,
            #[cfg(target_endian = "big")]
            Self::Native => false,
        }
    }
}
