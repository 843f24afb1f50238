//! Static field layouts
//!
//! Every (page kind, version) pair has one immutable description of where its
//! fields live. Decoders never index a buffer directly; they go through a
//! [`Field`], which checks bounds and applies the little-endian encoding.
//!
//! Bitfields inside packed words are allocated from the least significant bit,
//! the way the device firmware lays them out.

use crate::convert::U48_WIDTH;
use byteorder::{ByteOrder, LittleEndian};

/// How the bytes of a field are turned into a number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    U8,
    U16,
    U32,
    U48,
    U64,
    /// `width` bits starting at bit `shift` of a little-endian u32
    Bits { shift: u32, width: u32 },
}

impl Encoding {
    /// Number of bytes the encoding spans
    pub const fn size(self) -> usize {
        match self {
            Encoding::U8 => 1,
            Encoding::U16 => 2,
            Encoding::U32 | Encoding::Bits { .. } => 4,
            Encoding::U48 => U48_WIDTH,
            Encoding::U64 => 8,
        }
    }
}

/// One fixed-offset field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub offset: usize,
    pub encoding: Encoding,
}

impl Field {
    pub const fn new(name: &'static str, offset: usize, encoding: Encoding) -> Self {
        Self {
            name,
            offset,
            encoding,
        }
    }

    /// First byte past the end of the field
    pub const fn end(&self) -> usize {
        self.offset + self.encoding.size()
    }

    /// Read the field from `bytes`, or `None` if it would run past the end
    pub fn read(&self, bytes: &[u8]) -> Option<u64> {
        let span = bytes.get(self.offset..self.end())?;
        let value = match self.encoding {
            Encoding::U8 => span[0] as u64,
            Encoding::U16 => LittleEndian::read_u16(span) as u64,
            Encoding::U32 => LittleEndian::read_u32(span) as u64,
            Encoding::U48 => LittleEndian::read_u48(span),
            Encoding::U64 => LittleEndian::read_u64(span),
            Encoding::Bits { shift, width } => {
                let word = LittleEndian::read_u32(span);
                ((word >> shift) & ((1u32 << width) - 1)) as u64
            }
        };
        Some(value)
    }
}

/// Three little-endian u16 values packed into a SMART slot's value span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubLayout {
    /// min, max, avg
    WearLevel,
    /// max, min, curr in Kelvin
    Temperature,
    /// max, min, curr
    Power,
}

/// Position of each field inside a uniform SMART slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotLayout {
    /// Number of slots the revision defines
    pub count: usize,
    /// Bytes per slot
    pub width: usize,
    pub id: Field,
    pub normalized: Field,
    /// Start of the 6-byte raw-or-structured value
    pub value: Field,
}

/// Layout of one additive SMART log revision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmartLayout {
    pub version: u8,
    pub slots: SlotLayout,
    /// Ids whose value span carries sub-fields in this revision
    pub structured: &'static [(u8, SubLayout)],
}

impl SmartLayout {
    pub fn sub_layout(&self, id: u8) -> Option<SubLayout> {
        self.structured
            .iter()
            .find(|(structured_id, _)| *structured_id == id)
            .map(|(_, layout)| *layout)
    }

    /// Bytes covered by the slot array
    pub fn span(&self) -> usize {
        self.slots.count * self.slots.width
    }
}

pub mod smart_add {
    use super::*;

    pub const PAGE_SIZE: usize = 512;
    pub const VERSION: Field = Field::new("version", PAGE_SIZE - 1, Encoding::U8);

    /// id, rsvd[2], norm, rsvd, value[6], rsvd
    const SLOT_12: SlotLayout = SlotLayout {
        count: 0,
        width: 12,
        id: Field::new("id", 0, Encoding::U8),
        normalized: Field::new("normalized", 3, Encoding::U8),
        value: Field::new("raw", 5, Encoding::U48),
    };

    /// id, norm, value[6], rsvd[2]
    const SLOT_10: SlotLayout = SlotLayout {
        count: 0,
        width: 10,
        id: Field::new("id", 0, Encoding::U8),
        normalized: Field::new("normalized", 1, Encoding::U8),
        value: Field::new("raw", 2, Encoding::U48),
    };

    const STRUCTURED_V0_V2: &[(u8, SubLayout)] = &[
        (0xad, SubLayout::WearLevel),
        (0xe7, SubLayout::Temperature),
        (0xe8, SubLayout::Power),
        (0xaf, SubLayout::Temperature),
    ];

    const STRUCTURED_V3: &[(u8, SubLayout)] = &[(0xad, SubLayout::WearLevel)];

    pub const V0: SmartLayout = SmartLayout {
        version: 0,
        slots: SlotLayout { count: 22, ..SLOT_12 },
        structured: STRUCTURED_V0_V2,
    };

    pub const V2: SmartLayout = SmartLayout {
        version: 2,
        slots: SlotLayout { count: 27, ..SLOT_12 },
        structured: STRUCTURED_V0_V2,
    };

    pub const V3: SmartLayout = SmartLayout {
        version: 3,
        slots: SlotLayout { count: 24, ..SLOT_10 },
        structured: STRUCTURED_V3,
    };

    /// Revision that exists on some firmware but carries no data
    pub const RESERVED_VERSION: u8 = 1;
}

pub mod latency_stats {
    use super::*;

    pub const PAGE_SIZE: usize = 1024;
    pub const MINOR_VERSION: Field = Field::new("minor_version", 0, Encoding::U32);
    pub const MAJOR_VERSION: Field = Field::new("major_version", 4, Encoding::U32);

    pub const SUPPORTED_MAJOR: u32 = 2;
    pub const SUPPORTED_MINOR: u32 = 0;

    pub const BUCKET_COUNT: usize = 32;

    /// Each class array is followed by an equally sized reserved gap
    const CLASS_STRIDE: usize = BUCKET_COUNT * 4 * 2;
    const FIRST_CLASS: usize = 8;

    pub const READ_BUCKETS: usize = FIRST_CLASS;
    pub const WRITE_BUCKETS: usize = FIRST_CLASS + CLASS_STRIDE;
    pub const TRIM_BUCKETS: usize = FIRST_CLASS + 2 * CLASS_STRIDE;

    /// Counter `index` of the class array starting at `base`
    pub const fn bucket(base: usize, index: usize) -> Field {
        Field::new("bucket", base + index * 4, Encoding::U32)
    }
}

pub mod high_latency {
    use super::*;

    pub const ENTRY_COUNT: usize = 1024;
    pub const ENTRY_SIZE: usize = 64;
    pub const HEADER_SIZE: usize = 4;
    pub const PAGE_SIZE: usize = HEADER_SIZE + ENTRY_COUNT * ENTRY_SIZE;

    pub const VERSION: Field = Field::new("version", 0, Encoding::U32);
    pub const SUPPORTED_VERSION: u32 = 1;

    // Offsets are relative to the start of an entry
    pub const TIMESTAMP: Field = Field::new("timestamp", 0, Encoding::U64);
    pub const LATENCY: Field = Field::new("latency", 8, Encoding::U32);
    pub const QID: Field = Field::new("qid", 12, Encoding::U32);
    pub const OPCODE: Field = Field::new("opcode", 16, Encoding::Bits { shift: 0, width: 8 });
    pub const FUSE: Field = Field::new("fuse", 16, Encoding::Bits { shift: 8, width: 2 });
    pub const PSDT: Field = Field::new("psdt", 16, Encoding::Bits { shift: 10, width: 2 });
    pub const CID: Field = Field::new("cid", 16, Encoding::Bits { shift: 12, width: 16 });
    pub const NSID: Field = Field::new("nsid", 20, Encoding::U32);
    pub const SLBA: Field = Field::new("slba", 24, Encoding::U64);
    pub const NLB: Field = Field::new("nlb", 32, Encoding::Bits { shift: 0, width: 16 });
    pub const DTYPE: Field = Field::new("dtype", 32, Encoding::Bits { shift: 16, width: 8 });
    pub const PINFO: Field = Field::new("pinfo", 32, Encoding::Bits { shift: 24, width: 4 });
    pub const FUA: Field = Field::new("fua", 32, Encoding::Bits { shift: 28, width: 1 });
    pub const LR: Field = Field::new("lr", 32, Encoding::Bits { shift: 29, width: 1 });

    pub const fn entry_offset(index: usize) -> usize {
        HEADER_SIZE + index * ENTRY_SIZE
    }
}

pub mod perf_stats {
    use super::*;

    pub const HEADER_SIZE: usize = 4;
    pub const ENTRIES_PER_HOUR: usize = 3600;
    pub const ENTRY_SIZE: usize = 24;
    pub const TIMESTAMP_SIZE: usize = 6;
    pub const BLOCK_SIZE: usize = TIMESTAMP_SIZE + ENTRIES_PER_HOUR * ENTRY_SIZE;
    pub const MAX_HOURS: usize = 24;

    pub const VERSION: Field = Field::new("version", 0, Encoding::U8);
    pub const SUPPORTED_VERSION: u8 = 1;

    // Relative to the start of an hourly block
    pub const TIMESTAMP: Field = Field::new("timestamp", 0, Encoding::U48);

    // Relative to the start of an entry
    pub const READ_IOPS: Field = Field::new("read_iops", 0, Encoding::U16);
    pub const READ_BANDWIDTH: Field = Field::new("read_bandwidth", 2, Encoding::U16);
    pub const READ_LATENCY: Field = Field::new("read_latency", 4, Encoding::U32);
    pub const READ_LATENCY_MAX: Field = Field::new("read_latency_max", 8, Encoding::U32);
    pub const WRITE_IOPS: Field = Field::new("write_iops", 12, Encoding::U16);
    pub const WRITE_BANDWIDTH: Field = Field::new("write_bandwidth", 14, Encoding::U16);
    pub const WRITE_LATENCY: Field = Field::new("write_latency", 16, Encoding::U32);
    pub const WRITE_LATENCY_MAX: Field = Field::new("write_latency_max", 20, Encoding::U32);

    /// Logically valid size of a page covering `hours` blocks
    pub const fn page_size(hours: usize) -> usize {
        HEADER_SIZE + hours * BLOCK_SIZE
    }

    pub const fn block_offset(hour: usize) -> usize {
        HEADER_SIZE + hour * BLOCK_SIZE
    }

    pub const fn entry_offset(slot: usize) -> usize {
        TIMESTAMP_SIZE + slot * ENTRY_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_scalar_fields() {
        let bytes = [0x34, 0x12, 0x78, 0x56, 0xBC, 0x9A, 0xF0, 0xDE];
        assert_eq!(Field::new("a", 0, Encoding::U8).read(&bytes), Some(0x34));
        assert_eq!(Field::new("b", 0, Encoding::U16).read(&bytes), Some(0x1234));
        assert_eq!(Field::new("c", 0, Encoding::U32).read(&bytes), Some(0x5678_1234));
        assert_eq!(Field::new("d", 0, Encoding::U48).read(&bytes), Some(0x9ABC_5678_1234));
        assert_eq!(
            Field::new("e", 0, Encoding::U64).read(&bytes),
            Some(0xDEF0_9ABC_5678_1234)
        );
    }

    #[test]
    fn test_read_out_of_bounds() {
        let bytes = [0u8; 4];
        assert_eq!(Field::new("x", 2, Encoding::U32).read(&bytes), None);
        assert_eq!(Field::new("y", 4, Encoding::U8).read(&bytes), None);
    }

    #[test]
    fn test_read_bits() {
        // opcode 0x02, fuse 1, psdt 2, cid 0xBEEF
        let word: u32 = 0x02 | (1 << 8) | (2 << 10) | (0xBEEF << 12);
        let bytes = word.to_le_bytes();
        let entry: Vec<u8> = [vec![0u8; 16], bytes.to_vec()].concat();
        assert_eq!(high_latency::OPCODE.read(&entry), Some(0x02));
        assert_eq!(high_latency::FUSE.read(&entry), Some(1));
        assert_eq!(high_latency::PSDT.read(&entry), Some(2));
        assert_eq!(high_latency::CID.read(&entry), Some(0xBEEF));
    }

    #[test]
    fn test_smart_layouts_fit_page() {
        for layout in [smart_add::V0, smart_add::V2, smart_add::V3] {
            assert!(layout.span() < smart_add::VERSION.offset);
        }
        assert_eq!(smart_add::V2.sub_layout(0xe7), Some(SubLayout::Temperature));
        assert_eq!(smart_add::V3.sub_layout(0xe7), None);
    }

    #[test]
    fn test_latency_stats_offsets() {
        assert_eq!(latency_stats::READ_BUCKETS, 8);
        assert_eq!(latency_stats::WRITE_BUCKETS, 8 + 256);
        assert_eq!(latency_stats::TRIM_BUCKETS, 8 + 512);
        // 248 reserved bytes close the page
        assert_eq!(latency_stats::TRIM_BUCKETS + 256 + 248, latency_stats::PAGE_SIZE);
    }

    #[test]
    fn test_perf_stats_sizes() {
        assert_eq!(perf_stats::BLOCK_SIZE, 86_406);
        assert_eq!(perf_stats::page_size(1), 4 + 86_406);
    }
}
