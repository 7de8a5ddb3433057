//! Fixed byte layout of the legacy queue.dat record.
//!
//! The file is a raw struct dump with no self-describing schema, so every
//! field is located by a hard offset. Decoding works over a plain byte buffer
//! with "read at offset X for length Y" accessors; no host struct layout is
//! involved.

use super::endian::{self, Endianness};

/// Total record length. Anything else is a different (unsupported) layout.
pub const QUEUE_LENGTH: usize = 7168;
pub const SLOT_COUNT: usize = 10;
pub const SLOT_LENGTH: usize = 712;

/// Record-level offsets, from the start of the file.
pub mod record {
    pub const VERSION: usize = 0;
    pub const CURRENT_INDEX: usize = 4;
    pub const ENTRIES: usize = 8;
    pub const PERFORMANCE_FRACTION: usize = 7128;
    pub const PERFORMANCE_FRACTION_WEIGHT: usize = 7132;
    pub const DOWNLOAD_RATE_AVERAGE: usize = 7136;
    pub const DOWNLOAD_RATE_WEIGHT: usize = 7140;
    pub const UPLOAD_RATE_AVERAGE: usize = 7144;
    pub const UPLOAD_RATE_WEIGHT: usize = 7148;
    pub const RESULTS_SENT: usize = 7152;
}

/// Slot-level offsets, relative to the start of a 712-byte slot.
pub mod slot {
    pub const STATUS: usize = 0;
    pub const USE_CORES: usize = 4;
    pub const TIME_DATA: usize = 8; // [u32; 8]
    pub const UPLOAD_STATUS: usize = 44;
    pub const CORE_DOWNLOAD_HOST: usize = 48;
    pub const CORE_DOWNLOAD_HOST_LEN: usize = 128;
    pub const MISC1A: usize = 176;
    pub const CORE_NUMBER: usize = 180;
    pub const MISC1B: usize = 184;
    pub const WU_DATA_FILE_SIZE: usize = 188;
    pub const PROJECT_ID: usize = 208;
    pub const PROJECT_RUN: usize = 210;
    pub const PROJECT_CLONE: usize = 212;
    pub const PROJECT_GEN: usize = 214;
    pub const PROJECT_ISSUED: usize = 216;
    pub const MACHINE_ID: usize = 260;
    pub const SERVER_IP: usize = 264;
    pub const SERVER_PORT: usize = 268;
    pub const WORK_UNIT_TYPE: usize = 272;
    pub const WORK_UNIT_TYPE_LEN: usize = 64;
    pub const FOLDING_ID: usize = 336;
    pub const FOLDING_ID_LEN: usize = 64;
    pub const TEAM: usize = 400;
    pub const TEAM_LEN: usize = 64;
    pub const USER_AND_MACHINE_ID: usize = 464;
    pub const BENCHMARK: usize = 476;
    pub const CPU_TYPE: usize = 480;
    pub const OS_TYPE: usize = 484;
    pub const CPU_SPECIES: usize = 488;
    pub const OS_SPECIES: usize = 492;
    pub const EXPIRATION_SECONDS: usize = 496;
    pub const ASSIGNMENT_INFO_PRESENT: usize = 508;
    pub const ASSIGNMENT_TIMESTAMP: usize = 512;
    pub const ASSIGNMENT_CHECKSUM: usize = 516;
    pub const COLLECTION_SERVER_IP: usize = 520;
    pub const NUMBER_OF_SMP_CORES: usize = 544;
    pub const WORK_UNIT_TAG: usize = 548;
    pub const WORK_UNIT_TAG_LEN: usize = 16;
    pub const PASSKEY: usize = 580;
    pub const PASSKEY_LEN: usize = 32;
    pub const FLOPS: usize = 612;
    pub const MEMORY_KB: usize = 616;
    pub const GPU_MEMORY_KB: usize = 620;
    pub const EXPIRATION_TIME: usize = 688; // [u32; 4]
    pub const PACKET_SIZE_LIMIT: usize = 704;
    pub const NUMBER_OF_UPLOAD_FAILURES: usize = 708;
}

/// A length-validated queue.dat buffer.
pub struct RawRecord<'a> {
    data: &'a [u8],
}

impl<'a> RawRecord<'a> {
    /// Returns `None` unless the buffer is exactly [`QUEUE_LENGTH`] bytes.
    pub fn new(data: &'a [u8]) -> Option<Self> {
        if data.len() == QUEUE_LENGTH {
            Some(RawRecord { data })
        } else {
            None
        }
    }

    pub fn array<const N: usize>(&self, offset: usize) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[offset..offset + N]);
        out
    }

    pub fn u32_at(&self, offset: usize, order: Endianness) -> u32 {
        endian::u32_from(self.array(offset), order)
    }

    pub fn f32_at(&self, offset: usize, order: Endianness) -> f32 {
        endian::f32_from(self.array(offset), order)
    }

    pub fn slot(&self, index: usize) -> RawSlot<'a> {
        let start = record::ENTRIES + index * SLOT_LENGTH;
        RawSlot {
            data: &self.data[start..start + SLOT_LENGTH],
        }
    }
}

/// One 712-byte slot view; all offsets are slot-relative.
pub struct RawSlot<'a> {
    data: &'a [u8],
}

impl RawSlot<'_> {
    pub fn array<const N: usize>(&self, offset: usize) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[offset..offset + N]);
        out
    }

    pub fn u32_at(&self, offset: usize, order: Endianness) -> u32 {
        endian::u32_from(self.array(offset), order)
    }

    pub fn u16_at(&self, offset: usize, order: Endianness) -> u16 {
        endian::u16_from(self.array(offset), order)
    }

    pub fn u32_reversed_at(&self, offset: usize) -> u32 {
        endian::u32_reversed(self.array(offset))
    }

    /// Reads a NUL-terminated string out of a fixed-length field.
    ///
    /// Bytes past the first NUL are ignored; a field with no NUL is taken
    /// whole. Non-UTF-8 bytes are replaced rather than rejected, since the
    /// decoder never fails on content.
    pub fn string_at(&self, offset: usize, len: usize) -> String {
        let bytes = &self.data[offset..offset + len];
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(len);
        String::from_utf8_lossy(&bytes[..end]).into_owned()
    }
}
