//! Decoder for the legacy client's queue.dat work queue snapshot.
//!
//! queue.dat is a 7168-byte raw memory dump describing up to ten work unit
//! slots. The layout predates any self-describing schema: byte order differs
//! between x86 and PowerPC builds of the client, several fields are always in
//! network order regardless of platform, and one field (machineId) carries an
//! endianness flag of its own. See the `endian` module for the inference
//! rules and `layout` for the byte-exact offset table.
//!
//! Decoding is total over content: a buffer of the wrong length or an
//! unsupported version yields the canonical empty snapshot with
//! `read_ok == false` rather than an error. Only I/O failures are errors.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::fs;
use std::net::Ipv4Addr;

pub mod endian;
pub mod layout;
pub mod mapper;
pub mod status;
pub mod tables;

use endian::Endianness;
use layout::{record, slot, RawRecord, RawSlot, SLOT_COUNT};
use status::EntryStatus;

/// Seconds between the Unix epoch and 2000-01-01T00:00:00Z, the epoch used
/// by every timestamp in the record except projectIssued.
const EPOCH_2000_OFFSET: i64 = 946_684_800;

/// Supported client version range. Versions below 5.00 used an incompatible
/// layout; versions above 6.99 are untested and not trusted.
const VERSION_MIN: u32 = 500;
const VERSION_MAX: u32 = 699;

fn from_epoch_2000(seconds: u32) -> DateTime<Utc> {
    DateTime::from_timestamp(EPOCH_2000_OFFSET + i64::from(seconds), 0)
        .unwrap_or(DateTime::UNIX_EPOCH)
}

fn from_epoch_unix(seconds: u32) -> DateTime<Utc> {
    DateTime::from_timestamp(i64::from(seconds), 0).unwrap_or(DateTime::UNIX_EPOCH)
}

/// The decoded, immutable view of one queue.dat file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueueSnapshot {
    /// True only if the buffer was exactly 7168 bytes and the version is
    /// inside the supported range. A false snapshot is the empty default.
    pub read_ok: bool,
    pub version: u32,
    pub current_index: u32,
    /// Record-wide byte order classification.
    pub order: Endianness,
    pub slots: Vec<QueueSlot>,
    pub performance_fraction: f32,
    pub performance_fraction_weight: f32,
    pub download_rate_average: f64,
    pub download_rate_weight: f32,
    pub upload_rate_average: f64,
    pub upload_rate_weight: f32,
    pub results_sent: u32,
}

impl QueueSnapshot {
    /// Decodes a raw buffer. Never fails: unexpected content degrades to the
    /// empty snapshot, and every call is independent and idempotent.
    pub fn decode(data: &[u8]) -> QueueSnapshot {
        let Some(raw) = RawRecord::new(data) else {
            return QueueSnapshot::default();
        };

        let version_raw: [u8; 4] = raw.array(record::VERSION);
        let order = endian::classify(version_raw);
        let version = endian::u32_from(version_raw, order);
        if !(VERSION_MIN..=VERSION_MAX).contains(&version) {
            return QueueSnapshot::default();
        }

        let current_index = raw.u32_at(record::CURRENT_INDEX, order);
        let slots = (0..SLOT_COUNT)
            .map(|i| decode_slot(&raw.slot(i), i as u32, current_index, order))
            .collect();

        QueueSnapshot {
            read_ok: true,
            version,
            current_index,
            order,
            slots,
            performance_fraction: raw.f32_at(record::PERFORMANCE_FRACTION, order),
            performance_fraction_weight: raw.f32_at(record::PERFORMANCE_FRACTION_WEIGHT, order),
            download_rate_average: f64::from(raw.u32_at(record::DOWNLOAD_RATE_AVERAGE, order))
                / 1000.0,
            download_rate_weight: raw.f32_at(record::DOWNLOAD_RATE_WEIGHT, order),
            upload_rate_average: f64::from(raw.u32_at(record::UPLOAD_RATE_AVERAGE, order)) / 1000.0,
            upload_rate_weight: raw.f32_at(record::UPLOAD_RATE_WEIGHT, order),
            // Written little-endian by every client build
            results_sent: raw.u32_at(record::RESULTS_SENT, Endianness::Little),
        }
    }
}

/// One decoded slot. Raw fields are stored as read; the derived fields
/// (status, user id, IPs) are computed once at decode time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueueSlot {
    pub index: u32,
    pub status: EntryStatus,
    pub raw_status: u32,
    pub use_cores: u32,
    pub time_data: [u32; 8],
    pub upload_status: u32,
    pub core_download_host: String,
    pub core_number: u32,
    pub misc1a: u32,
    pub misc1b: u32,
    pub wu_data_file_size: u32,
    pub project_id: u16,
    pub project_run: u16,
    pub project_clone: u16,
    pub project_gen: u16,
    pub project_issued_utc: DateTime<Utc>,
    pub machine_id: u32,
    /// machineId's own endianness flag, inferred from its raw bytes.
    pub machine_id_order: Endianness,
    pub server_ip: Option<Ipv4Addr>,
    pub server_port: u32,
    pub work_unit_type: String,
    pub folding_id: String,
    pub team: String,
    pub user_and_machine_id: [u8; 8],
    pub user_id: String,
    pub benchmark: u32,
    pub cpu_type: u32,
    pub cpu_species: u32,
    pub os_type: u32,
    pub os_species: u32,
    pub expiration_seconds: u32,
    pub assignment_info_present: bool,
    pub assignment_time_utc: DateTime<Utc>,
    pub assignment_checksum: String,
    pub collection_server_ip: Option<Ipv4Addr>,
    pub number_of_smp_cores: u32,
    pub work_unit_tag: String,
    pub passkey: String,
    pub flops: u32,
    pub memory_kb: u32,
    pub gpu_memory_kb: u32,
    pub begin_time_utc: DateTime<Utc>,
    pub end_time_utc: DateTime<Utc>,
    pub due_time_utc: DateTime<Utc>,
    pub expiration_time: [u32; 4],
    pub packet_size_limit: u32,
    pub number_of_upload_failures: u32,
}

impl QueueSlot {
    pub fn core_url(&self) -> String {
        format!(
            "http://{}/Core_{:x}.fah",
            self.core_download_host, self.core_number
        )
    }

    pub fn speed_factor(&self) -> f64 {
        status::speed_factor(
            self.status,
            self.expiration_seconds,
            self.begin_time_utc,
            self.end_time_utc,
        )
    }

    pub fn cpu_label(&self) -> &'static str {
        tables::cpu_label(self.cpu_type, self.cpu_species)
    }

    pub fn os_label(&self) -> &'static str {
        tables::os_label(self.os_type, self.os_species)
    }

    /// The team field as a number; non-numeric content counts as team 0.
    pub fn team_number(&self) -> u32 {
        self.team.parse().unwrap_or(0)
    }

    pub fn begin_time_local(&self) -> DateTime<Local> {
        self.begin_time_utc.with_timezone(&Local)
    }

    pub fn end_time_local(&self) -> DateTime<Local> {
        self.end_time_utc.with_timezone(&Local)
    }

    pub fn due_time_local(&self) -> DateTime<Local> {
        self.due_time_utc.with_timezone(&Local)
    }
}

fn decode_slot(raw: &RawSlot, index: u32, current_index: u32, order: Endianness) -> QueueSlot {
    let raw_status = raw.u32_at(slot::STATUS, order);
    let upload_status = raw.u32_at(slot::UPLOAD_STATUS, order);
    let project_id = raw.u16_at(slot::PROJECT_ID, order);
    let status = status::resolve(raw_status, index, current_index, project_id, upload_status);

    let mut time_data = [0u32; 8];
    for (i, value) in time_data.iter_mut().enumerate() {
        *value = raw.u32_at(slot::TIME_DATA + i * 4, order);
    }
    let mut expiration_time = [0u32; 4];
    for (i, value) in expiration_time.iter_mut().enumerate() {
        *value = raw.u32_at(slot::EXPIRATION_TIME + i * 4, order);
    }

    // PowerPC builds wrote the begin/end/due seconds one array element over.
    // Historical behavior, reproduced as-is.
    let (begin_idx, end_idx, due_idx) = match order {
        Endianness::Big => (1, 5, 1),
        Endianness::Little => (0, 4, 0),
    };

    let machine_id_raw: [u8; 4] = raw.array(slot::MACHINE_ID);
    let machine_id_order = endian::classify(machine_id_raw);
    let machine_id = endian::u32_from(machine_id_raw, machine_id_order);

    let user_and_machine_id: [u8; 8] = raw.array(slot::USER_AND_MACHINE_ID);
    let user_id = derive_user_id(user_and_machine_id, machine_id, machine_id_order);

    // Present when the 4 bytes hold 1 in either byte order.
    let assignment_present_raw: [u8; 4] = raw.array(slot::ASSIGNMENT_INFO_PRESENT);
    let assignment_info_present = u32::from_le_bytes(assignment_present_raw) == 1
        || u32::from_be_bytes(assignment_present_raw) == 1;

    // The checksum is reversed when the raw presence bytes do NOT classify as
    // big-endian. The negated test matches the legacy client byte for byte;
    // see DESIGN.md before "fixing" it.
    let mut checksum_bytes: [u8; 4] = raw.array(slot::ASSIGNMENT_CHECKSUM);
    if endian::classify(assignment_present_raw) != Endianness::Big {
        checksum_bytes.reverse();
    }
    let assignment_checksum = checksum_bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<String>();

    QueueSlot {
        index,
        status,
        raw_status,
        use_cores: raw.u32_at(slot::USE_CORES, order),
        time_data,
        upload_status,
        core_download_host: raw.string_at(slot::CORE_DOWNLOAD_HOST, slot::CORE_DOWNLOAD_HOST_LEN),
        core_number: raw.u32_at(slot::CORE_NUMBER, order),
        misc1a: raw.u32_at(slot::MISC1A, order),
        misc1b: raw.u32_at(slot::MISC1B, order),
        wu_data_file_size: raw.u32_at(slot::WU_DATA_FILE_SIZE, order),
        project_id,
        project_run: raw.u16_at(slot::PROJECT_RUN, order),
        project_clone: raw.u16_at(slot::PROJECT_CLONE, order),
        project_gen: raw.u16_at(slot::PROJECT_GEN, order),
        project_issued_utc: from_epoch_unix(raw.u32_at(slot::PROJECT_ISSUED, order)),
        machine_id,
        machine_id_order,
        server_ip: decode_ip(raw.array(slot::SERVER_IP), order),
        server_port: raw.u32_at(slot::SERVER_PORT, order),
        work_unit_type: raw.string_at(slot::WORK_UNIT_TYPE, slot::WORK_UNIT_TYPE_LEN),
        folding_id: raw.string_at(slot::FOLDING_ID, slot::FOLDING_ID_LEN),
        team: raw.string_at(slot::TEAM, slot::TEAM_LEN),
        user_and_machine_id,
        user_id,
        benchmark: raw.u32_reversed_at(slot::BENCHMARK),
        cpu_type: raw.u32_reversed_at(slot::CPU_TYPE),
        cpu_species: raw.u32_reversed_at(slot::CPU_SPECIES),
        os_type: raw.u32_reversed_at(slot::OS_TYPE),
        os_species: raw.u32_reversed_at(slot::OS_SPECIES),
        expiration_seconds: raw.u32_at(slot::EXPIRATION_SECONDS, order),
        assignment_info_present,
        assignment_time_utc: from_epoch_2000(raw.u32_at(slot::ASSIGNMENT_TIMESTAMP, order)),
        assignment_checksum,
        collection_server_ip: decode_ip(raw.array(slot::COLLECTION_SERVER_IP), order),
        number_of_smp_cores: raw.u32_reversed_at(slot::NUMBER_OF_SMP_CORES),
        work_unit_tag: raw.string_at(slot::WORK_UNIT_TAG, slot::WORK_UNIT_TAG_LEN),
        passkey: raw.string_at(slot::PASSKEY, slot::PASSKEY_LEN),
        flops: raw.u32_reversed_at(slot::FLOPS),
        memory_kb: raw.u32_reversed_at(slot::MEMORY_KB),
        gpu_memory_kb: raw.u32_at(slot::GPU_MEMORY_KB, order),
        begin_time_utc: from_epoch_2000(time_data[begin_idx]),
        end_time_utc: from_epoch_2000(time_data[end_idx]),
        due_time_utc: from_epoch_2000(expiration_time[due_idx]),
        expiration_time,
        packet_size_limit: raw.u32_at(slot::PACKET_SIZE_LIMIT, order),
        number_of_upload_failures: raw.u32_at(slot::NUMBER_OF_UPLOAD_FAILURES, order),
    }
}

/// IP fields store the four octets swapped on little-endian records and in
/// natural order on big-endian ones. A zero address decodes to `None`.
fn decode_ip(raw: [u8; 4], order: Endianness) -> Option<Ipv4Addr> {
    if raw == [0, 0, 0, 0] {
        return None;
    }
    let ip = match order {
        Endianness::Little => Ipv4Addr::new(raw[3], raw[2], raw[1], raw[0]),
        Endianness::Big => Ipv4Addr::new(raw[0], raw[1], raw[2], raw[3]),
    };
    Some(ip)
}

/// Recovers the user id hex string from the combined user+machine field.
///
/// The 8 bytes hold userId + machineId as one unsigned 64-bit value in
/// machineId's own byte order. Subtracting machineId back out and formatting
/// the big-endian hex digits, trimmed of leading zeros, gives the id the
/// client displayed. An all-zero result trims to nothing and becomes "0".
fn derive_user_id(raw: [u8; 8], machine_id: u32, machine_id_order: Endianness) -> String {
    let mut bytes = raw;
    if machine_id_order == Endianness::Big {
        bytes.reverse();
    }
    let combined = u64::from_le_bytes(bytes);
    let user = combined.wrapping_sub(u64::from(machine_id));
    let hex = format!("{user:016X}");
    let trimmed = hex.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Reads queue.dat files from disk, holding the most recent snapshot.
///
/// The held snapshot is reset to empty before any filesystem access, so a
/// caller that sees an I/O error rethrown never observes a half-updated
/// snapshot. Soft failures (wrong size, unsupported version) are absorbed
/// into `read_ok == false`.
pub struct QueueReader {
    snapshot: QueueSnapshot,
}

impl QueueReader {
    pub fn new() -> Self {
        QueueReader {
            snapshot: QueueSnapshot::default(),
        }
    }

    pub fn snapshot(&self) -> &QueueSnapshot {
        &self.snapshot
    }

    pub fn read(&mut self, path: &str) -> Result<()> {
        self.snapshot = QueueSnapshot::default();
        let data =
            fs::read(path).with_context(|| format!("Failed to read queue file: {path}"))?;
        self.snapshot = QueueSnapshot::decode(&data);
        Ok(())
    }
}

impl Default for QueueReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::layout::QUEUE_LENGTH;
    use std::io::Write;

    // Builds a blank record with the given version written in `order`.
    fn record_with_version(version: u32, order: Endianness) -> Vec<u8> {
        let mut data = vec![0u8; QUEUE_LENGTH];
        let bytes = match order {
            Endianness::Little => version.to_le_bytes(),
            Endianness::Big => version.to_be_bytes(),
        };
        data[record::VERSION..record::VERSION + 4].copy_from_slice(&bytes);
        data
    }

    fn put_u32(data: &mut [u8], slot_index: usize, offset: usize, value: u32, order: Endianness) {
        let base = record::ENTRIES + slot_index * layout::SLOT_LENGTH + offset;
        let bytes = match order {
            Endianness::Little => value.to_le_bytes(),
            Endianness::Big => value.to_be_bytes(),
        };
        data[base..base + 4].copy_from_slice(&bytes);
    }

    fn put_u16(data: &mut [u8], slot_index: usize, offset: usize, value: u16, order: Endianness) {
        let base = record::ENTRIES + slot_index * layout::SLOT_LENGTH + offset;
        let bytes = match order {
            Endianness::Little => value.to_le_bytes(),
            Endianness::Big => value.to_be_bytes(),
        };
        data[base..base + 2].copy_from_slice(&bytes);
    }

    fn put_bytes(data: &mut [u8], slot_index: usize, offset: usize, bytes: &[u8]) {
        let base = record::ENTRIES + slot_index * layout::SLOT_LENGTH + offset;
        data[base..base + bytes.len()].copy_from_slice(bytes);
    }

    #[test]
    fn test_wrong_length_yields_empty_snapshot() {
        for len in [0usize, 512, QUEUE_LENGTH - 1, QUEUE_LENGTH + 1, 8192] {
            let snapshot = QueueSnapshot::decode(&vec![0u8; len]);
            assert!(!snapshot.read_ok);
            assert_eq!(snapshot, QueueSnapshot::default());
        }
    }

    #[test]
    fn test_version_bounds() {
        for version in [500, 600, 699] {
            let data = record_with_version(version, Endianness::Little);
            let snapshot = QueueSnapshot::decode(&data);
            assert!(snapshot.read_ok, "version {version} should decode");
            assert_eq!(snapshot.version, version);
            assert_eq!(snapshot.slots.len(), SLOT_COUNT);
        }
        for version in [0, 499, 700, 9999] {
            let data = record_with_version(version, Endianness::Little);
            let snapshot = QueueSnapshot::decode(&data);
            assert!(!snapshot.read_ok, "version {version} should be rejected");
            assert_eq!(snapshot, QueueSnapshot::default());
        }
    }

    #[test]
    fn test_decode_never_panics_on_garbage() {
        let snapshot = QueueSnapshot::decode(&vec![0xFFu8; QUEUE_LENGTH]);
        assert!(!snapshot.read_ok);

        let mut patterned: Vec<u8> = (0..QUEUE_LENGTH).map(|i| (i % 251) as u8).collect();
        patterned[0..4].copy_from_slice(&600u32.to_le_bytes());
        let snapshot = QueueSnapshot::decode(&patterned);
        assert!(snapshot.read_ok);
        assert_eq!(snapshot.slots.len(), SLOT_COUNT);
    }

    #[test]
    fn test_big_endian_record_classification() {
        let data = record_with_version(600, Endianness::Big);
        let snapshot = QueueSnapshot::decode(&data);
        assert!(snapshot.read_ok);
        assert_eq!(snapshot.order, Endianness::Big);
        assert_eq!(snapshot.version, 600);
    }

    #[test]
    fn test_begin_end_due_index_swap() {
        // Little-endian: begin from timeData[0], end from timeData[4],
        // due from expirationTime[0]
        let mut data = record_with_version(600, Endianness::Little);
        put_u32(&mut data, 0, slot::TIME_DATA, 100, Endianness::Little);
        put_u32(&mut data, 0, slot::TIME_DATA + 16, 200, Endianness::Little);
        put_u32(&mut data, 0, slot::EXPIRATION_TIME, 300, Endianness::Little);
        let snapshot = QueueSnapshot::decode(&data);
        let entry = &snapshot.slots[0];
        assert_eq!(entry.begin_time_utc, from_epoch_2000(100));
        assert_eq!(entry.end_time_utc, from_epoch_2000(200));
        assert_eq!(entry.due_time_utc, from_epoch_2000(300));

        // Big-endian: one element over in each array
        let mut data = record_with_version(600, Endianness::Big);
        put_u32(&mut data, 0, slot::TIME_DATA + 4, 100, Endianness::Big);
        put_u32(&mut data, 0, slot::TIME_DATA + 20, 200, Endianness::Big);
        put_u32(&mut data, 0, slot::EXPIRATION_TIME + 4, 300, Endianness::Big);
        let snapshot = QueueSnapshot::decode(&data);
        let entry = &snapshot.slots[0];
        assert_eq!(entry.begin_time_utc, from_epoch_2000(100));
        assert_eq!(entry.end_time_utc, from_epoch_2000(200));
        assert_eq!(entry.due_time_utc, from_epoch_2000(300));
    }

    #[test]
    fn test_machine_id_per_field_endianness() {
        // Little-endian record, but machineId written big-endian: its raw
        // bytes exceed 65535 as LE, so the per-field flag flips to Big.
        let mut data = record_with_version(600, Endianness::Little);
        put_u32(&mut data, 0, slot::MACHINE_ID, 2, Endianness::Big);
        let snapshot = QueueSnapshot::decode(&data);
        let entry = &snapshot.slots[0];
        assert_eq!(entry.machine_id_order, Endianness::Big);
        assert_eq!(entry.machine_id, 2);

        let mut data = record_with_version(600, Endianness::Little);
        put_u32(&mut data, 0, slot::MACHINE_ID, 2, Endianness::Little);
        let snapshot = QueueSnapshot::decode(&data);
        let entry = &snapshot.slots[0];
        assert_eq!(entry.machine_id_order, Endianness::Little);
        assert_eq!(entry.machine_id, 2);
    }

    #[test]
    fn test_user_id_derivation() {
        let mut data = record_with_version(600, Endianness::Little);
        put_u32(&mut data, 0, slot::MACHINE_ID, 1, Endianness::Little);
        // user 0x500 + machine 1, stored in machineId's (little) byte order
        put_bytes(
            &mut data,
            0,
            slot::USER_AND_MACHINE_ID,
            &0x501u64.to_le_bytes(),
        );
        let snapshot = QueueSnapshot::decode(&data);
        assert_eq!(snapshot.slots[0].user_id, "500");
    }

    #[test]
    fn test_user_id_all_zero_trims_to_zero() {
        // combined == machineId, so the difference is zero
        let mut data = record_with_version(600, Endianness::Little);
        put_u32(&mut data, 0, slot::MACHINE_ID, 7, Endianness::Little);
        put_bytes(
            &mut data,
            0,
            slot::USER_AND_MACHINE_ID,
            &7u64.to_le_bytes(),
        );
        let snapshot = QueueSnapshot::decode(&data);
        assert_eq!(snapshot.slots[0].user_id, "0");
    }

    #[test]
    fn test_user_id_big_endian_machine_flag() {
        let mut data = record_with_version(600, Endianness::Little);
        put_u32(&mut data, 0, slot::MACHINE_ID, 1, Endianness::Big);
        put_bytes(
            &mut data,
            0,
            slot::USER_AND_MACHINE_ID,
            &0xAB0002u64.to_be_bytes(),
        );
        let snapshot = QueueSnapshot::decode(&data);
        assert_eq!(snapshot.slots[0].user_id, "AB0001");
    }

    #[test]
    fn test_assignment_checksum_reversal_polarity() {
        // Presence bytes [1,0,0,0] classify Little -> checksum reversed
        let mut data = record_with_version(600, Endianness::Little);
        put_bytes(&mut data, 0, slot::ASSIGNMENT_INFO_PRESENT, &[1, 0, 0, 0]);
        put_bytes(
            &mut data,
            0,
            slot::ASSIGNMENT_CHECKSUM,
            &[0xAA, 0xBB, 0xCC, 0xDD],
        );
        let snapshot = QueueSnapshot::decode(&data);
        let entry = &snapshot.slots[0];
        assert!(entry.assignment_info_present);
        assert_eq!(entry.assignment_checksum, "DDCCBBAA");

        // Presence bytes [0,0,0,1] classify Big -> checksum kept in order
        let mut data = record_with_version(600, Endianness::Little);
        put_bytes(&mut data, 0, slot::ASSIGNMENT_INFO_PRESENT, &[0, 0, 0, 1]);
        put_bytes(
            &mut data,
            0,
            slot::ASSIGNMENT_CHECKSUM,
            &[0xAA, 0xBB, 0xCC, 0xDD],
        );
        let snapshot = QueueSnapshot::decode(&data);
        let entry = &snapshot.slots[0];
        assert!(entry.assignment_info_present);
        assert_eq!(entry.assignment_checksum, "AABBCCDD");
    }

    #[test]
    fn test_ip_octet_order() {
        let mut data = record_with_version(600, Endianness::Little);
        put_bytes(&mut data, 0, slot::SERVER_IP, &[1, 2, 3, 4]);
        let snapshot = QueueSnapshot::decode(&data);
        assert_eq!(
            snapshot.slots[0].server_ip,
            Some(Ipv4Addr::new(4, 3, 2, 1))
        );
        assert_eq!(snapshot.slots[0].collection_server_ip, None);

        let mut data = record_with_version(600, Endianness::Big);
        put_bytes(&mut data, 0, slot::COLLECTION_SERVER_IP, &[1, 2, 3, 4]);
        let snapshot = QueueSnapshot::decode(&data);
        assert_eq!(
            snapshot.slots[0].collection_server_ip,
            Some(Ipv4Addr::new(1, 2, 3, 4))
        );
    }

    #[test]
    fn test_unconditionally_reversed_fields() {
        // cpu/os codes are network order even in a little-endian record
        let mut data = record_with_version(600, Endianness::Little);
        put_u32(&mut data, 0, slot::CPU_TYPE, 16, Endianness::Big);
        put_u32(&mut data, 0, slot::CPU_SPECIES, 0, Endianness::Big);
        put_u32(&mut data, 0, slot::OS_TYPE, 4, Endianness::Big);
        put_u32(&mut data, 0, slot::MEMORY_KB, 2048, Endianness::Big);
        put_u32(&mut data, 0, slot::NUMBER_OF_SMP_CORES, 8, Endianness::Big);
        let snapshot = QueueSnapshot::decode(&data);
        let entry = &snapshot.slots[0];
        assert_eq!(entry.cpu_type, 16);
        assert_eq!(entry.cpu_label(), "AMD64");
        assert_eq!(entry.os_label(), "Linux");
        assert_eq!(entry.memory_kb, 2048);
        assert_eq!(entry.number_of_smp_cores, 8);
    }

    #[test]
    fn test_status_resolution_uses_current_index() {
        let mut data = record_with_version(600, Endianness::Little);
        data[record::CURRENT_INDEX..record::CURRENT_INDEX + 4]
            .copy_from_slice(&3u32.to_le_bytes());
        put_u32(&mut data, 3, slot::STATUS, 1, Endianness::Little);
        put_u32(&mut data, 4, slot::STATUS, 1, Endianness::Little);
        put_u16(&mut data, 5, slot::PROJECT_ID, 2465, Endianness::Little);
        put_u32(&mut data, 5, slot::UPLOAD_STATUS, 1, Endianness::Little);
        let snapshot = QueueSnapshot::decode(&data);
        assert_eq!(snapshot.slots[0].status, EntryStatus::Empty);
        assert_eq!(snapshot.slots[3].status, EntryStatus::FoldingNow);
        assert_eq!(snapshot.slots[4].status, EntryStatus::Queued);
        assert_eq!(snapshot.slots[5].status, EntryStatus::Finished);
    }

    #[test]
    fn test_strings_and_team_number() {
        let mut data = record_with_version(600, Endianness::Little);
        put_bytes(&mut data, 1, slot::FOLDING_ID, b"anonymous\0");
        put_bytes(&mut data, 1, slot::TEAM, b"32\0");
        put_bytes(&mut data, 1, slot::WORK_UNIT_TYPE, b"Folding@Home\0");
        put_bytes(&mut data, 1, slot::CORE_DOWNLOAD_HOST, b"www.example.org\0");
        put_u32(&mut data, 1, slot::CORE_NUMBER, 0x78, Endianness::Little);
        let snapshot = QueueSnapshot::decode(&data);
        let entry = &snapshot.slots[1];
        assert_eq!(entry.folding_id, "anonymous");
        assert_eq!(entry.team, "32");
        assert_eq!(entry.team_number(), 32);
        assert_eq!(entry.work_unit_type, "Folding@Home");
        assert_eq!(entry.core_url(), "http://www.example.org/Core_78.fah");
    }

    #[test]
    fn test_aggregate_rates() {
        let mut data = record_with_version(600, Endianness::Little);
        data[record::DOWNLOAD_RATE_AVERAGE..record::DOWNLOAD_RATE_AVERAGE + 4]
            .copy_from_slice(&6500u32.to_le_bytes());
        data[record::RESULTS_SENT..record::RESULTS_SENT + 4]
            .copy_from_slice(&42u32.to_le_bytes());
        let snapshot = QueueSnapshot::decode(&data);
        assert_eq!(snapshot.download_rate_average, 6.5);
        assert_eq!(snapshot.results_sent, 42);
    }

    #[test]
    fn test_project_issued_uses_unix_epoch() {
        let mut data = record_with_version(600, Endianness::Little);
        put_u32(&mut data, 0, slot::PROJECT_ISSUED, 1_000_000, Endianness::Little);
        let snapshot = QueueSnapshot::decode(&data);
        assert_eq!(
            snapshot.slots[0].project_issued_utc,
            from_epoch_unix(1_000_000)
        );
        // Begin time of an untouched slot sits at the 2000 epoch, not 1970
        assert_eq!(snapshot.slots[0].begin_time_utc, from_epoch_2000(0));
    }

    #[test]
    fn test_reader_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&record_with_version(600, Endianness::Little))
            .unwrap();
        let mut reader = QueueReader::new();
        reader.read(file.path().to_str().unwrap()).unwrap();
        assert!(reader.snapshot().read_ok);
        assert_eq!(reader.snapshot().version, 600);
    }

    #[test]
    fn test_reader_short_file_is_soft_failure() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0u8; 100]).unwrap();
        let mut reader = QueueReader::new();
        reader.read(file.path().to_str().unwrap()).unwrap();
        assert!(!reader.snapshot().read_ok);
        assert_eq!(*reader.snapshot(), QueueSnapshot::default());
    }

    #[test]
    fn test_reader_missing_file_resets_state() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&record_with_version(600, Endianness::Little))
            .unwrap();
        let mut reader = QueueReader::new();
        reader.read(file.path().to_str().unwrap()).unwrap();
        assert!(reader.snapshot().read_ok);

        let result = reader.read("/nonexistent/queue.dat");
        assert!(result.is_err());
        // No half-updated state after the error
        assert_eq!(*reader.snapshot(), QueueSnapshot::default());
    }
}
