//! Core types for the Memblaze log decoder library
//!
//! This module defines the fundamental types the decoder emits when processing
//! a raw log page: the page kinds and their version tags, decoded SMART items,
//! and the error type shared by every decoding stage.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DecoderError>;

/// Log page identifiers
pub const LID_SMART_LOG_ADD: u8 = 0xca;
pub const LID_LATENCY_STATISTICS: u8 = 0xd0;
pub const LID_HIGH_LATENCY_LOG: u8 = 0xd1;
pub const LID_PERFORMANCE_STATISTICS: u8 = 0xd2;

/// Feature identifier of the latency monitor configuration
pub const FID_LATENCY_FEATURE: u8 = 0xd0;

/// The vendor log pages this library understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageKind {
    /// Additional SMART attributes (512 bytes)
    SmartLogAdd,
    /// Latency bucket statistics (1024 bytes)
    LatencyStatistics,
    /// High latency command ring (4 + 1024 * 64 bytes)
    HighLatencyLog,
    /// Hourly performance statistics (duration dependent)
    PerformanceStatistics,
}

impl PageKind {
    /// Log identifier used with get-log-page
    pub fn log_id(self) -> u8 {
        match self {
            PageKind::SmartLogAdd => LID_SMART_LOG_ADD,
            PageKind::LatencyStatistics => LID_LATENCY_STATISTICS,
            PageKind::HighLatencyLog => LID_HIGH_LATENCY_LOG,
            PageKind::PerformanceStatistics => LID_PERFORMANCE_STATISTICS,
        }
    }

    /// Report title printed above the decoded table
    pub fn title(self) -> &'static str {
        match self {
            PageKind::SmartLogAdd => "Additional Smart Log",
            PageKind::LatencyStatistics => "Latency Statistics Log",
            PageKind::HighLatencyLog => "High Latency Log",
            PageKind::PerformanceStatistics => "Performance Stat log",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageKind::SmartLogAdd => write!(f, "smart-log-add"),
            PageKind::LatencyStatistics => write!(f, "latency-statistics"),
            PageKind::HighLatencyLog => write!(f, "high-latency-log"),
            PageKind::PerformanceStatistics => write!(f, "performance-statistics"),
        }
    }
}

/// Version tag as read from a page, before it has been validated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionTag {
    /// Single byte revision
    Byte(u8),
    /// Major/minor pair of little-endian words
    MajorMinor { major: u32, minor: u32 },
    /// Little-endian word revision
    Word(u32),
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionTag::Byte(v) => write!(f, "Version: {}", v),
            VersionTag::MajorMinor { major, minor } => {
                write!(f, "Major Version: {}, Minor Version: {}", major, minor)
            }
            VersionTag::Word(v) => write!(f, "Version: {}", v),
        }
    }
}

/// Why a version tag could not be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnsupportedReason {
    /// The revision exists but carries no decodable data
    Reserved,
    /// The revision is not known to this decoder
    Unknown,
    /// The major revision is known but its minor revision is not
    UnknownMinor,
}

/// Version tag that selected no layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsupportedVersion {
    pub page: PageKind,
    pub tag: VersionTag,
    pub reason: UnsupportedReason,
}

impl fmt::Display for UnsupportedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.reason, self.tag) {
            (UnsupportedReason::Reserved, VersionTag::MajorMinor { major, minor }) => {
                write!(f, "Major Version {}, Minor Version {}: N/A", major, minor)
            }
            (UnsupportedReason::Reserved, VersionTag::Byte(v)) => write!(f, "Version {}: N/A", v),
            (UnsupportedReason::Reserved, VersionTag::Word(v)) => write!(f, "Version {}: N/A", v),
            (UnsupportedReason::UnknownMinor, VersionTag::MajorMinor { major, minor }) => write!(
                f,
                "Major Version {}, Minor Version {}: Not supported yet",
                major, minor
            ),
            (_, VersionTag::MajorMinor { major, .. }) => {
                write!(f, "Major Version {}: Not supported yet", major)
            }
            (_, VersionTag::Byte(v)) => write!(f, "Version {}: Not supported yet", v),
            (_, VersionTag::Word(v)) => write!(f, "Version {}: Not supported yet", v),
        }
    }
}

/// Errors that can occur during decoding
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    #[error("{0}")]
    UnsupportedVersion(UnsupportedVersion),

    #[error("Device returned status 0x{0:X}")]
    DeviceStatus(u32),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("{page} buffer too short: need {needed} bytes, got {actual}")]
    BufferTooShort {
        page: PageKind,
        needed: usize,
        actual: usize,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Structured value carried by a SMART slot instead of a plain counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubValue {
    /// Erase count spread across blocks
    WearLevel { min: u16, max: u16, avg: u16 },
    /// Temperature readings in Kelvin
    Temperature { max: u16, min: u16, curr: u16 },
    /// Power consumption readings
    Power { max: u16, min: u16, curr: u16 },
}

/// Registry resolution of an attribute id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Attribute {
    Known { name: &'static str, ordinal: u32 },
    Unknown,
}

impl Attribute {
    pub fn name(&self) -> Option<&'static str> {
        match self {
            Attribute::Known { name, .. } => Some(name),
            Attribute::Unknown => None,
        }
    }
}

/// One non-empty SMART slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedItem {
    /// Attribute id (never zero)
    pub id: u8,
    /// Name and ordinal from the schema's registry
    pub attribute: Attribute,
    /// Device-computed health indicator
    pub normalized: u8,
    /// 48-bit little-endian value of the slot
    pub raw: u64,
    /// Decoded sub-fields for ids with a structured layout
    pub detail: Option<SubValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_log_ids() {
        assert_eq!(PageKind::SmartLogAdd.log_id(), 0xca);
        assert_eq!(PageKind::LatencyStatistics.log_id(), 0xd0);
        assert_eq!(PageKind::HighLatencyLog.log_id(), 0xd1);
        assert_eq!(PageKind::PerformanceStatistics.log_id(), 0xd2);
    }

    #[test]
    fn test_unsupported_messages() {
        let reserved = UnsupportedVersion {
            page: PageKind::SmartLogAdd,
            tag: VersionTag::Byte(1),
            reason: UnsupportedReason::Reserved,
        };
        assert_eq!(reserved.to_string(), "Version 1: N/A");

        let unknown = UnsupportedVersion {
            page: PageKind::SmartLogAdd,
            tag: VersionTag::Byte(9),
            reason: UnsupportedReason::Unknown,
        };
        assert_eq!(unknown.to_string(), "Version 9: Not supported yet");

        let minor = UnsupportedVersion {
            page: PageKind::LatencyStatistics,
            tag: VersionTag::MajorMinor { major: 2, minor: 1 },
            reason: UnsupportedReason::UnknownMinor,
        };
        assert_eq!(minor.to_string(), "Major Version 2, Minor Version 1: Not supported yet");

        let major = UnsupportedVersion {
            page: PageKind::LatencyStatistics,
            tag: VersionTag::MajorMinor { major: 3, minor: 0 },
            reason: UnsupportedReason::Unknown,
        };
        assert_eq!(major.to_string(), "Major Version 3: Not supported yet");
    }

    #[test]
    fn test_attribute_name() {
        let known = Attribute::Known { name: "gc_count", ordinal: 12 };
        assert_eq!(known.name(), Some("gc_count"));
        assert_eq!(Attribute::Unknown.name(), None);
    }
}
