//! Main decoder API
//!
//! This module provides the primary interface for the decoder library. The
//! [`Decoder`] reads a page's version tag, selects the matching schema and only
//! then hands the bytes to the schema decoder. An unknown or reserved tag stops
//! the call with [`DecoderError::UnsupportedVersion`] before any field is read.

use crate::config::DecoderConfig;
use crate::layout::{self, high_latency, latency_stats, perf_stats, smart_add, SmartLayout};
use crate::pages::{self, DecodedPage};
use crate::registry::{self, AttributeTable};
use crate::transport::RawPage;
use crate::types::{
    DecoderError, PageKind, Result, UnsupportedReason, UnsupportedVersion, VersionTag,
};

/// Schema chosen for a page after its version tag was validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    SmartLogAdd {
        layout: &'static SmartLayout,
        attributes: &'static AttributeTable,
    },
    LatencyStatsV2_0,
    HighLatencyV1,
    PerformanceStatsV1 { hours: usize },
}

impl Schema {
    /// Bytes the schema reads
    pub fn required_len(&self) -> usize {
        match self {
            Schema::SmartLogAdd { .. } => smart_add::PAGE_SIZE,
            Schema::LatencyStatsV2_0 => latency_stats::PAGE_SIZE,
            Schema::HighLatencyV1 => high_latency::PAGE_SIZE,
            Schema::PerformanceStatsV1 { hours } => perf_stats::page_size(*hours),
        }
    }
}

/// Read the version tag of `kind` from `raw`
pub fn read_version(kind: PageKind, raw: &[u8]) -> Result<VersionTag> {
    let short = |needed: usize| DecoderError::BufferTooShort {
        page: kind,
        needed,
        actual: raw.len(),
    };
    let read = |field: layout::Field| field.read(raw).ok_or_else(|| short(field.end()));

    let tag = match kind {
        PageKind::SmartLogAdd => VersionTag::Byte(read(smart_add::VERSION)? as u8),
        PageKind::LatencyStatistics => VersionTag::MajorMinor {
            major: read(latency_stats::MAJOR_VERSION)? as u32,
            minor: read(latency_stats::MINOR_VERSION)? as u32,
        },
        PageKind::HighLatencyLog => VersionTag::Word(read(high_latency::VERSION)? as u32),
        PageKind::PerformanceStatistics => VersionTag::Byte(read(perf_stats::VERSION)? as u8),
    };
    Ok(tag)
}

/// Select the schema for a validated tag
///
/// `valid_len` is only consulted for performance statistics, whose block count
/// follows from the requested duration.
pub fn select_schema(kind: PageKind, tag: VersionTag, valid_len: usize) -> Result<Schema> {
    let unsupported = |reason| {
        DecoderError::UnsupportedVersion(UnsupportedVersion {
            page: kind,
            tag,
            reason,
        })
    };

    match (kind, tag) {
        (PageKind::SmartLogAdd, VersionTag::Byte(version)) => {
            if version == smart_add::RESERVED_VERSION {
                return Err(unsupported(UnsupportedReason::Reserved));
            }
            let layout = match version {
                0 => &smart_add::V0,
                2 => &smart_add::V2,
                3 => &smart_add::V3,
                _ => return Err(unsupported(UnsupportedReason::Unknown)),
            };
            let attributes =
                registry::smart_table(version).ok_or(unsupported(UnsupportedReason::Unknown))?;
            Ok(Schema::SmartLogAdd { layout, attributes })
        }
        (PageKind::LatencyStatistics, VersionTag::MajorMinor { major, minor }) => {
            if major != latency_stats::SUPPORTED_MAJOR {
                Err(unsupported(UnsupportedReason::Unknown))
            } else if minor != latency_stats::SUPPORTED_MINOR {
                Err(unsupported(UnsupportedReason::UnknownMinor))
            } else {
                Ok(Schema::LatencyStatsV2_0)
            }
        }
        (PageKind::HighLatencyLog, VersionTag::Word(high_latency::SUPPORTED_VERSION)) => {
            Ok(Schema::HighLatencyV1)
        }
        (PageKind::PerformanceStatistics, VersionTag::Byte(perf_stats::SUPPORTED_VERSION)) => {
            let hours = perf_stats_hours(valid_len)?;
            Ok(Schema::PerformanceStatsV1 { hours })
        }
        _ => Err(unsupported(UnsupportedReason::Unknown)),
    }
}

/// Whole hourly blocks in a valid performance statistics prefix
fn perf_stats_hours(valid_len: usize) -> Result<usize> {
    let body = valid_len.saturating_sub(perf_stats::HEADER_SIZE);
    let hours = (body / perf_stats::BLOCK_SIZE).min(perf_stats::MAX_HOURS);
    if hours == 0 {
        return Err(DecoderError::BufferTooShort {
            page: PageKind::PerformanceStatistics,
            needed: perf_stats::page_size(1),
            actual: valid_len,
        });
    }
    Ok(hours)
}

/// The main decoder struct - entry point for all decoding operations
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    /// Create a decoder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode a page fetched from the device
    pub fn decode(&self, page: &RawPage) -> Result<DecodedPage> {
        self.decode_bytes(page.kind(), page.valid_bytes())
    }

    /// Decode the bytes of a page of `kind`
    ///
    /// # Example
    /// ```
    /// use memblaze_log_decoder::{Decoder, DecodedPage, PageKind};
    ///
    /// let mut raw = vec![0u8; 512];
    /// raw[511] = 3;
    /// raw[0] = 0xab; // program_fail_count
    /// raw[1] = 100;
    /// raw[2] = 7;
    ///
    /// match Decoder::new().decode_bytes(PageKind::SmartLogAdd, &raw).unwrap() {
    ///     DecodedPage::SmartLogAdd(page) => assert_eq!(page.items[0].raw, 7),
    ///     _ => unreachable!(),
    /// }
    /// ```
    pub fn decode_bytes(&self, kind: PageKind, raw: &[u8]) -> Result<DecodedPage> {
        let tag = read_version(kind, raw)?;
        log::debug!("{} {}", kind, tag);

        let schema = match select_schema(kind, tag, raw.len()) {
            Ok(schema) => schema,
            Err(e) => {
                log::warn!("{}: {}", kind, e);
                return Err(e);
            }
        };

        let needed = schema.required_len();
        if raw.len() < needed {
            return Err(DecoderError::BufferTooShort {
                page: kind,
                needed,
                actual: raw.len(),
            });
        }

        let decoded = match schema {
            Schema::SmartLogAdd { layout, attributes } => DecodedPage::SmartLogAdd(
                pages::smart_add::decode(raw, layout, attributes, &self.config),
            ),
            Schema::LatencyStatsV2_0 => DecodedPage::LatencyStatistics(
                pages::latency_stats::decode(
                    raw,
                    latency_stats::SUPPORTED_MAJOR,
                    latency_stats::SUPPORTED_MINOR,
                ),
            ),
            Schema::HighLatencyV1 => DecodedPage::HighLatencyLog(pages::high_latency::decode(
                raw,
                high_latency::SUPPORTED_VERSION,
            )),
            Schema::PerformanceStatsV1 { hours } => DecodedPage::PerformanceStatistics(
                pages::perf_stats::decode(raw, perf_stats::SUPPORTED_VERSION, hours),
            ),
        };
        Ok(decoded)
    }
}
