//! Attribute registry
//!
//! Sparse per-revision tables mapping a one-byte SMART attribute id to its
//! display name and ordinal. The same id means different things in different
//! revisions, so every lookup names the revision it belongs to and tables are
//! never shared.
//!
//! Also holds the static bucket table of the latency statistics page.

use crate::types::Attribute;

/// One registered attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeEntry {
    pub id: u8,
    pub ordinal: u32,
    pub name: &'static str,
}

const fn attr(id: u8, ordinal: u32, name: &'static str) -> AttributeEntry {
    AttributeEntry { id, ordinal, name }
}

/// Finite id → attribute mapping for one SMART revision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeTable {
    pub version: u8,
    entries: &'static [AttributeEntry],
}

impl AttributeTable {
    /// Resolve `id`; ids absent from the table are `Unknown`
    pub fn lookup(&self, id: u8) -> Attribute {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| Attribute::Known {
                name: entry.name,
                ordinal: entry.ordinal,
            })
            .unwrap_or(Attribute::Unknown)
    }

    pub fn entries(&self) -> &'static [AttributeEntry] {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub const SMART_V0: AttributeTable = AttributeTable {
    version: 0,
    entries: &[
        attr(0xab, 0, "program_fail_count"),
        attr(0xac, 1, "erase_fail_count"),
        attr(0xad, 2, "wear_leveling_count"),
        attr(0xb8, 3, "end_to_end_error_count"),
        attr(0xc7, 4, "crc_error_count"),
        attr(0xe2, 5, "timed_workload_media_wear"),
        attr(0xe3, 6, "timed_workload_host_reads"),
        attr(0xe4, 7, "timed_workload_timer"),
        attr(0xea, 8, "thermal_throttle_status"),
        attr(0xf0, 9, "retry_buffer_overflow_counter"),
        attr(0xf3, 10, "pll_lock_loss_count"),
        attr(0xf4, 11, "nand_bytes_written"),
        attr(0xf5, 12, "host_bytes_written"),
        attr(0xf6, 13, "system_area_life_remaining"),
        attr(0xfa, 14, "nand_bytes_read"),
        attr(0xe7, 15, "temperature"),
        attr(0xe8, 16, "power_consumption"),
        attr(0xaf, 17, "power_on_temperature"),
        attr(0xec, 18, "power_loss_protection"),
        attr(0xf2, 19, "read_fail_count"),
        attr(0xeb, 20, "thermal_throttle_time"),
        attr(0xed, 21, "flash_error_media_count"),
    ],
};

pub const SMART_V2: AttributeTable = AttributeTable {
    version: 2,
    entries: &[
        attr(0xab, 0, "program_fail_count"),
        attr(0xac, 1, "erase_fail_count"),
        attr(0xad, 2, "wear_leveling_count"),
        attr(0xb8, 3, "end_to_end_error_count"),
        attr(0xc7, 4, "crc_error_count"),
        attr(0xe2, 5, "timed_workload_media_wear"),
        attr(0xe3, 6, "timed_workload_host_reads"),
        attr(0xe4, 7, "timed_workload_timer"),
        attr(0xea, 8, "thermal_throttle_status"),
        attr(0xf0, 9, "lifetime_write_amplification"),
        attr(0xf3, 10, "pll_lock_loss_count"),
        attr(0xf4, 11, "nand_bytes_written"),
        attr(0xf5, 12, "host_bytes_written"),
        attr(0xf6, 13, "system_area_life_remaining"),
        attr(0xf9, 14, "firmware_update_count"),
        attr(0xfa, 15, "dram_cecc_count"),
        attr(0xfb, 16, "dram_uecc_count"),
        attr(0xfc, 17, "xor_pass_count"),
        attr(0xfd, 18, "xor_fail_count"),
        attr(0xfe, 19, "xor_invoked_count"),
        attr(0xe5, 20, "inflight_read_io_cmd"),
        attr(0xe6, 21, "flash_error_media_count"),
        attr(0xf8, 22, "nand_bytes_read"),
        attr(0xe7, 23, "temp_since_born"),
        attr(0xe8, 24, "power_consumption"),
        attr(0xaf, 25, "temp_since_bootup"),
        attr(0xeb, 26, "thermal_throttle_time"),
    ],
};

// Ordinals 11 and 18 are reserved in this revision
pub const SMART_V3: AttributeTable = AttributeTable {
    version: 3,
    entries: &[
        attr(0xab, 0, "program_fail_count"),
        attr(0xac, 1, "erase_fail_count"),
        attr(0xad, 2, "wear_leveling_count"),
        attr(0xb8, 3, "ext_e2e_err_count"),
        attr(0xc7, 4, "crc_err_count"),
        attr(0xf4, 5, "nand_bytes_written"),
        attr(0xf5, 6, "host_bytes_written"),
        attr(0xd0, 7, "reallocated_sector_count"),
        attr(0xd1, 8, "uncorrectable_sector_count"),
        attr(0xd2, 9, "nand_uecc_detection"),
        attr(0xd3, 10, "nand_xor_correction"),
        attr(0xd4, 12, "gc_count"),
        attr(0xd5, 13, "dram_uecc_detection_count"),
        attr(0xd6, 14, "sram_uecc_detection_count"),
        attr(0xd7, 15, "internal_raid_recovery_fail_count"),
        attr(0xd8, 16, "inflight_cmds"),
        attr(0xd9, 17, "internal_e2e_err_count"),
        attr(0xda, 19, "die_fail_count"),
        attr(0xdb, 20, "wear_leveling_execution_count"),
        attr(0xdc, 21, "read_disturb_count"),
        attr(0xdd, 22, "data_retention_count"),
        attr(0xde, 23, "capacitor_health"),
    ],
};

/// Table for a SMART revision, if the revision has one
pub fn smart_table(version: u8) -> Option<&'static AttributeTable> {
    match version {
        0 => Some(&SMART_V0),
        2 => Some(&SMART_V2),
        3 => Some(&SMART_V3),
        _ => None,
    }
}

/// `name_and_ordinal(schema_version, attribute_id)`; unregistered revisions
/// resolve every id to `Unknown`
pub fn lookup(version: u8, id: u8) -> Attribute {
    smart_table(version)
        .map(|table| table.lookup(id))
        .unwrap_or(Attribute::Unknown)
}

/// One latency bucket, `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketDescriptor {
    /// 1-based bucket number
    pub index: u32,
    pub start: &'static str,
    pub end: &'static str,
}

const fn bucket(index: u32, start: &'static str, end: &'static str) -> BucketDescriptor {
    BucketDescriptor { index, start, end }
}

pub const LATENCY_BUCKETS: [BucketDescriptor; 32] = [
    bucket(1, "0us", "50us"),
    bucket(2, "50us", "100us"),
    bucket(3, "100us", "150us"),
    bucket(4, "150us", "200us"),
    bucket(5, "200us", "300us"),
    bucket(6, "300us", "400us"),
    bucket(7, "400us", "500us"),
    bucket(8, "500us", "600us"),
    bucket(9, "600us", "700us"),
    bucket(10, "700us", "800us"),
    bucket(11, "800us", "900us"),
    bucket(12, "900us", "1ms"),
    bucket(13, "1ms", "5ms"),
    bucket(14, "5ms", "10ms"),
    bucket(15, "10ms", "20ms"),
    bucket(16, "20ms", "50ms"),
    bucket(17, "50ms", "100ms"),
    bucket(18, "100ms", "200ms"),
    bucket(19, "200ms", "300ms"),
    bucket(20, "300ms", "400ms"),
    bucket(21, "400ms", "500ms"),
    bucket(22, "500ms", "600ms"),
    bucket(23, "600ms", "700ms"),
    bucket(24, "700ms", "800ms"),
    bucket(25, "800ms", "900ms"),
    bucket(26, "900ms", "1s"),
    bucket(27, "1s", "2s"),
    bucket(28, "2s", "3s"),
    bucket(29, "3s", "4s"),
    bucket(30, "4s", "5s"),
    bucket(31, "5s", "8s"),
    bucket(32, "8s", "INF"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tables_are_per_revision() {
        assert_eq!(lookup(0, 0xf0).name(), Some("retry_buffer_overflow_counter"));
        assert_eq!(lookup(2, 0xf0).name(), Some("lifetime_write_amplification"));
        assert_eq!(lookup(3, 0xf0), Attribute::Unknown);
        assert_eq!(lookup(0, 0xd0), Attribute::Unknown);
        assert_eq!(lookup(3, 0xd0).name(), Some("reallocated_sector_count"));
    }

    #[test]
    fn test_unregistered_revision() {
        assert!(smart_table(1).is_none());
        assert_eq!(lookup(1, 0xab), Attribute::Unknown);
    }

    #[test]
    fn test_v3_reserved_ordinals() {
        let ordinals: HashSet<u32> = SMART_V3.entries().iter().map(|e| e.ordinal).collect();
        assert!(!ordinals.contains(&11));
        assert!(!ordinals.contains(&18));
        assert_eq!(
            SMART_V3.lookup(0xd4),
            Attribute::Known { name: "gc_count", ordinal: 12 }
        );
    }

    #[test]
    fn test_ids_unique_within_table() {
        for table in [SMART_V0, SMART_V2, SMART_V3] {
            let ids: HashSet<u8> = table.entries().iter().map(|e| e.id).collect();
            assert_eq!(ids.len(), table.len(), "duplicate id in v{}", table.version);
            assert!(!ids.contains(&0));
        }
    }

    #[test]
    fn test_bucket_table() {
        for (i, b) in LATENCY_BUCKETS.iter().enumerate() {
            assert_eq!(b.index as usize, i + 1);
        }
        // Consecutive buckets share their boundary
        for pair in LATENCY_BUCKETS.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert_eq!(LATENCY_BUCKETS[31].end, "INF");
    }
}
