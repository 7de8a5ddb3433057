//! Byte-order classification for legacy queue.dat records.
//!
//! The legacy client wrote queue.dat as a raw memory dump, so x86 builds
//! produced little-endian records and PowerPC builds big-endian ones. Nothing
//! in the file says which; the byte order has to be inferred from the data.
//! Three distinct rules coexist:
//!
//! - Record-wide: the 4-byte version field, read with no reversal, exceeds
//!   65535 only when the record is big-endian (no supported client version is
//!   that large). This classification covers most integer fields.
//! - Per-field: machineId carries its own copy of the same >65535 test,
//!   independent of the record-wide result. The userId derivation and the
//!   assignment checksum follow machineId's flag, not the record's.
//! - Unconditional reversal: a handful of fields (benchmark, cpu/os type and
//!   species, flops, memory, SMP core count) were always written in network
//!   order, regardless of build platform.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Endianness {
    Little,
    Big,
}

impl Default for Endianness {
    fn default() -> Self {
        Endianness::Little
    }
}

/// Classifies four raw bytes using the legacy >65535 heuristic.
///
/// The bytes are interpreted as a little-endian u32 with no reversal; a value
/// above 65535 means the writer was a big-endian build.
pub fn classify(raw: [u8; 4]) -> Endianness {
    if u32::from_le_bytes(raw) > 65535 {
        Endianness::Big
    } else {
        Endianness::Little
    }
}

pub fn u32_from(raw: [u8; 4], order: Endianness) -> u32 {
    match order {
        Endianness::Little => u32::from_le_bytes(raw),
        Endianness::Big => u32::from_be_bytes(raw),
    }
}

pub fn u16_from(raw: [u8; 2], order: Endianness) -> u16 {
    match order {
        Endianness::Little => u16::from_le_bytes(raw),
        Endianness::Big => u16::from_be_bytes(raw),
    }
}

/// The unconditional rule: always network order, never classified.
pub fn u32_reversed(raw: [u8; 4]) -> u32 {
    u32::from_be_bytes(raw)
}

pub fn f32_from(raw: [u8; 4], order: Endianness) -> f32 {
    match order {
        Endianness::Little => f32::from_le_bytes(raw),
        Endianness::Big => f32::from_be_bytes(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_little_endian() {
        // Version 600 written by an x86 build
        assert_eq!(classify(600u32.to_le_bytes()), Endianness::Little);
        assert_eq!(classify(65535u32.to_le_bytes()), Endianness::Little);
    }

    #[test]
    fn test_classify_big_endian() {
        // Version 600 written by a PowerPC build reads as 0x58020000 raw
        assert_eq!(classify(600u32.to_be_bytes()), Endianness::Big);
        assert_eq!(classify([0x00, 0x01, 0x00, 0x00]), Endianness::Big);
    }

    #[test]
    fn test_u32_round_trips_classification() {
        let le = 600u32.to_le_bytes();
        assert_eq!(u32_from(le, classify(le)), 600);
        let be = 600u32.to_be_bytes();
        assert_eq!(u32_from(be, classify(be)), 600);
    }

    #[test]
    fn test_u32_reversed_ignores_platform() {
        assert_eq!(u32_reversed([0x00, 0x00, 0x00, 0x10]), 16);
        assert_eq!(u32_reversed(16u32.to_be_bytes()), 16);
    }

    #[test]
    fn test_u16_from() {
        assert_eq!(u16_from([0x65, 0x09], Endianness::Little), 2405);
        assert_eq!(u16_from([0x09, 0x65], Endianness::Big), 2405);
    }
}
