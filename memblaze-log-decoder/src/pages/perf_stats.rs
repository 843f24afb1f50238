//! Performance statistics decoding (version 1)
//!
//! The page holds one block per requested hour. Each block starts with a
//! 6-byte millisecond timestamp followed by one entry per second of that hour.
//! Seconds without any read or write I/O are dropped.

use crate::layout::perf_stats::{self as ps, ENTRIES_PER_HOUR};
use crate::layout::Field;
use serde::Serialize;

/// One second of I/O activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PerfEntry {
    /// 1-based position within the hour
    pub slot: u32,
    /// Thousands of read I/Os
    pub read_iops: u16,
    /// MiB
    pub read_bandwidth: u16,
    /// Average read latency in microseconds
    pub read_latency_avg: u32,
    pub read_latency_max: u32,
    pub write_iops: u16,
    pub write_bandwidth: u16,
    pub write_latency_avg: u32,
    pub write_latency_max: u32,
}

/// One hourly block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PerfHour {
    /// 1-based hour number
    pub index: u32,
    pub timestamp_ms: u64,
    pub entries: Vec<PerfEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PerfStatsPage {
    pub version: u8,
    pub hours: Vec<PerfHour>,
}

/// Summed latency divided by the op count, 0 when nothing completed
pub fn average_latency(latency_sum: u32, ops: u16) -> u32 {
    if ops == 0 {
        0
    } else {
        latency_sum / ops as u32
    }
}

/// The caller has validated the version and that `raw` covers `hours` blocks
pub(crate) fn decode(raw: &[u8], version: u8, hours: usize) -> PerfStatsPage {
    let hours = (0..hours)
        .map_while(|hour| {
            let start = ps::block_offset(hour);
            raw.get(start..start + ps::BLOCK_SIZE)
                .map(|block| decode_block(block, hour))
        })
        .collect();

    PerfStatsPage { version, hours }
}

fn decode_block(block: &[u8], hour: usize) -> PerfHour {
    let entries = (0..ENTRIES_PER_HOUR)
        .filter_map(|slot| {
            let start = ps::entry_offset(slot);
            let entry = block.get(start..start + ps::ENTRY_SIZE)?;
            decode_entry(entry, slot)
        })
        .collect::<Vec<_>>();

    log::trace!("Performance hour {}: {} active seconds", hour + 1, entries.len());
    PerfHour {
        index: hour as u32 + 1,
        timestamp_ms: ps::TIMESTAMP.read(block).unwrap_or_default(),
        entries,
    }
}

fn decode_entry(entry: &[u8], slot: usize) -> Option<PerfEntry> {
    let get = |field: Field| field.read(entry).unwrap_or_default();

    let read_iops = get(ps::READ_IOPS) as u16;
    let write_iops = get(ps::WRITE_IOPS) as u16;
    if read_iops == 0 && write_iops == 0 {
        return None;
    }

    Some(PerfEntry {
        slot: slot as u32 + 1,
        read_iops,
        read_bandwidth: get(ps::READ_BANDWIDTH) as u16,
        read_latency_avg: average_latency(get(ps::READ_LATENCY) as u32, read_iops),
        read_latency_max: get(ps::READ_LATENCY_MAX) as u32,
        write_iops,
        write_bandwidth: get(ps::WRITE_BANDWIDTH) as u16,
        write_latency_avg: average_latency(get(ps::WRITE_LATENCY) as u32, write_iops),
        write_latency_max: get(ps::WRITE_LATENCY_MAX) as u32,
    })
}
