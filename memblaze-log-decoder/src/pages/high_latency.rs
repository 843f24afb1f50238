//! High latency log decoding (version 1)
//!
//! The page is a fixed ring of 64-byte entries; the first entry whose
//! timestamp is zero marks the end of valid data.

use crate::layout::high_latency::{self as hl, ENTRY_COUNT};
use crate::layout::Field;
use serde::Serialize;

/// One command that exceeded the configured latency threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HighLatencyEntry {
    /// Milliseconds since the epoch
    pub timestamp_ms: u64,
    /// Microseconds
    pub latency: u32,
    pub qid: u32,
    pub opcode: u8,
    pub fuse: u8,
    pub psdt: u8,
    pub cid: u16,
    pub nsid: u32,
    pub slba: u64,
    pub nlb: u16,
    pub dtype: u8,
    pub pinfo: u8,
    pub fua: u8,
    pub lr: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighLatencyPage {
    pub version: u32,
    pub entries: Vec<HighLatencyEntry>,
}

pub(crate) fn decode(raw: &[u8], version: u32) -> HighLatencyPage {
    let mut entries = Vec::new();
    for index in 0..ENTRY_COUNT {
        let start = hl::entry_offset(index);
        let Some(entry) = raw.get(start..start + hl::ENTRY_SIZE) else {
            break;
        };
        match decode_entry(entry) {
            Some(decoded) => entries.push(decoded),
            None => break,
        }
    }

    log::debug!("High latency log: {} valid entries", entries.len());
    HighLatencyPage { version, entries }
}

/// `None` once the ring's zero timestamp is reached
fn decode_entry(entry: &[u8]) -> Option<HighLatencyEntry> {
    let timestamp_ms = hl::TIMESTAMP.read(entry)?;
    if timestamp_ms == 0 {
        return None;
    }

    let get = |field: Field| field.read(entry).unwrap_or_default();
    Some(HighLatencyEntry {
        timestamp_ms,
        latency: get(hl::LATENCY) as u32,
        qid: get(hl::QID) as u32,
        opcode: get(hl::OPCODE) as u8,
        fuse: get(hl::FUSE) as u8,
        psdt: get(hl::PSDT) as u8,
        cid: get(hl::CID) as u16,
        nsid: get(hl::NSID) as u32,
        slba: get(hl::SLBA),
        nlb: get(hl::NLB) as u16,
        dtype: get(hl::DTYPE) as u8,
        pinfo: get(hl::PINFO) as u8,
        fua: get(hl::FUA) as u8,
        lr: get(hl::LR) as u8,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_entry(raw: &mut [u8], index: usize, timestamp: u64, latency: u32) {
        let start = hl::entry_offset(index);
        raw[start..start + 8].copy_from_slice(&timestamp.to_le_bytes());
        raw[start + 8..start + 12].copy_from_slice(&latency.to_le_bytes());
    }

    #[test]
    fn test_stops_at_first_zero_timestamp() {
        let mut raw = vec![0u8; hl::PAGE_SIZE];
        for i in 0..10 {
            write_entry(&mut raw, i, 1_000 + i as u64, 500);
        }
        // Entries past the hole must be ignored
        write_entry(&mut raw, 11, 99_999, 1);
        write_entry(&mut raw, 500, 99_999, 1);

        let page = decode(&raw, 1);
        assert_eq!(page.entries.len(), 10);
        assert_eq!(page.entries[9].timestamp_ms, 1_009);
    }

    #[test]
    fn test_empty_ring() {
        let raw = vec![0u8; hl::PAGE_SIZE];
        assert!(decode(&raw, 1).entries.is_empty());
    }

    #[test]
    fn test_full_ring() {
        let mut raw = vec![0u8; hl::PAGE_SIZE];
        for i in 0..ENTRY_COUNT {
            write_entry(&mut raw, i, 1 + i as u64, 0);
        }
        assert_eq!(decode(&raw, 1).entries.len(), ENTRY_COUNT);
    }

    #[test]
    fn test_packed_words() {
        let mut raw = vec![0u8; hl::PAGE_SIZE];
        write_entry(&mut raw, 0, 42, 1234);
        let start = hl::entry_offset(0);
        let command: u32 = 0x01 | (0b11 << 8) | (0b01 << 10) | (0x1234 << 12);
        raw[start + 16..start + 20].copy_from_slice(&command.to_le_bytes());
        raw[start + 20..start + 24].copy_from_slice(&1u32.to_le_bytes());
        raw[start + 24..start + 32].copy_from_slice(&0x1_0000_0000u64.to_le_bytes());
        let io: u32 = 7 | (0x02 << 16) | (0x3 << 24) | (1 << 28);
        raw[start + 32..start + 36].copy_from_slice(&io.to_le_bytes());

        let entry = decode(&raw, 1).entries[0];
        assert_eq!(entry.latency, 1234);
        assert_eq!(entry.opcode, 0x01);
        assert_eq!(entry.fuse, 3);
        assert_eq!(entry.psdt, 1);
        assert_eq!(entry.cid, 0x1234);
        assert_eq!(entry.nsid, 1);
        assert_eq!(entry.slba, 0x1_0000_0000);
        assert_eq!(entry.nlb, 7);
        assert_eq!(entry.dtype, 2);
        assert_eq!(entry.pinfo, 3);
        assert_eq!(entry.fua, 1);
        assert_eq!(entry.lr, 0);
    }
}
