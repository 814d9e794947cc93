//! Address Decoder.
//!
//! The address space is split into two contiguous regions: the read-only
//! region `[0, rom_size)` served by the ROM and the general region
//! `[rom_size, 2^32)` served by main memory.

use std::fmt;

use serde::Serialize;

use crate::common::{AccessFault, AccessWidth};

/// Region classification for an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Region {
    /// Read-only program store.
    ReadOnly,
    /// General read/write store.
    General,
}

impl Region {
    /// Short name used in logs and statistics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ReadOnly => "ROM",
            Self::General => "RAM",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classifies addresses against the configured ROM size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressDecoder {
    rom_size: u32,
}

impl AddressDecoder {
    /// Creates a decoder for a ROM of `rom_size` bytes starting at address 0.
    pub const fn new(rom_size: u32) -> Self {
        Self { rom_size }
    }

    /// Size of the read-only region in bytes.
    pub const fn rom_size(&self) -> u32 {
        self.rom_size
    }

    /// Returns the region containing `addr`.
    pub const fn classify(&self, addr: u32) -> Region {
        if addr < self.rom_size {
            Region::ReadOnly
        } else {
            Region::General
        }
    }

    /// Returns the region of an access of `width` starting at `addr`.
    ///
    /// Regions are contiguous, so comparing the first and last touched byte
    /// is enough to detect an access spanning both.
    ///
    /// # Errors
    ///
    /// Returns [`AccessFault::BoundaryStraddle`] when the touched bytes lie in
    /// different regions or run past the end of the address space.
    pub fn classify_span(&self, addr: u32, width: AccessWidth) -> Result<Region, AccessFault> {
        let last = addr
            .checked_add(width.bytes() - 1)
            .ok_or(AccessFault::BoundaryStraddle { addr })?;
        let first = self.classify(addr);
        if self.classify(last) == first {
            Ok(first)
        } else {
            Err(AccessFault::BoundaryStraddle { addr })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AddressDecoder, Region};
    use crate::common::{AccessFault, AccessWidth};

    #[test]
    fn classify_is_correct_at_boundary() {
        let decoder = AddressDecoder::new(0x100);
        assert_eq!(decoder.classify(0), Region::ReadOnly);
        assert_eq!(decoder.classify(0xFF), Region::ReadOnly);
        assert_eq!(decoder.classify(0x100), Region::General);
        assert_eq!(decoder.classify(u32::MAX), Region::General);
    }

    #[test]
    fn span_detects_straddle_on_both_sides_of_boundary() {
        let decoder = AddressDecoder::new(0x100);
        assert_eq!(
            decoder.classify_span(0xFC, AccessWidth::Word),
            Ok(Region::ReadOnly)
        );
        for addr in 0xFD..=0xFF {
            assert_eq!(
                decoder.classify_span(addr, AccessWidth::Word),
                Err(AccessFault::BoundaryStraddle { addr })
            );
            assert_eq!(
                decoder.classify_span(addr, AccessWidth::Byte),
                Ok(Region::ReadOnly)
            );
        }
        assert_eq!(
            decoder.classify_span(0x100, AccessWidth::Word),
            Ok(Region::General)
        );
    }

    #[test]
    fn span_rejects_wraparound() {
        let decoder = AddressDecoder::new(0x100);
        assert_eq!(
            decoder.classify_span(0xFFFF_FFFC, AccessWidth::Word),
            Ok(Region::General)
        );
        assert_eq!(
            decoder.classify_span(0xFFFF_FFFD, AccessWidth::Word),
            Err(AccessFault::BoundaryStraddle { addr: 0xFFFF_FFFD })
        );
        assert_eq!(
            decoder.classify_span(u32::MAX, AccessWidth::Byte),
            Ok(Region::General)
        );
    }

    #[test]
    fn empty_rom_makes_everything_general() {
        let decoder = AddressDecoder::new(0);
        assert_eq!(decoder.classify(0), Region::General);
        assert_eq!(
            decoder.classify_span(0, AccessWidth::Word),
            Ok(Region::General)
        );
    }
}
