//! Device I/O seam
//!
//! The decoder never talks to a device itself. An [`AdminTransport`] issues
//! get-log-page / get-feature / set-feature and hands back bytes or the
//! device's status. This module also sizes page requests, including the extra
//! block fetched for odd performance statistics durations.

use crate::feature::SetFeatureArgs;
use crate::layout::{high_latency, latency_stats, perf_stats, smart_add};
use crate::types::{DecoderError, PageKind, Result};

/// Admin commands the decoder needs from a device
pub trait AdminTransport {
    /// Fetch `len` bytes of log page `log_id`
    fn get_log_page(&mut self, log_id: u8, len: usize) -> Result<Vec<u8>>;

    /// Read the current value of feature `feature_id`
    fn get_feature(&mut self, feature_id: u8) -> Result<u32>;

    /// Submit set-features; returns the command's completion result
    fn set_feature(&mut self, args: &SetFeatureArgs) -> Result<u32>;
}

/// Size and kind of a page to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub kind: PageKind,
    /// Bytes that carry meaningful data
    pub valid_len: usize,
    /// Bytes asked from the device
    pub transfer_len: usize,
}

impl PageRequest {
    /// Request for a page kind with a fixed size
    ///
    /// Performance statistics need a duration, see [`PageRequest::performance_statistics`].
    pub fn fixed(kind: PageKind) -> Result<Self> {
        let size = match kind {
            PageKind::SmartLogAdd => smart_add::PAGE_SIZE,
            PageKind::LatencyStatistics => latency_stats::PAGE_SIZE,
            PageKind::HighLatencyLog => high_latency::PAGE_SIZE,
            PageKind::PerformanceStatistics => {
                return Err(DecoderError::InvalidParameter(
                    "performance statistics need a duration".to_string(),
                ))
            }
        };
        Ok(Self {
            kind,
            valid_len: size,
            transfer_len: size,
        })
    }

    /// Request covering `hours` hourly blocks, 1 to 24
    ///
    /// An odd duration fetches one more block so the transfer stays dword
    /// aligned; only the requested prefix is valid.
    pub fn performance_statistics(hours: u32) -> Result<Self> {
        let hours = validate_duration(hours)?;
        let transfer_hours = if hours % 2 == 1 { hours + 1 } else { hours };
        Ok(Self {
            kind: PageKind::PerformanceStatistics,
            valid_len: perf_stats::page_size(hours),
            transfer_len: perf_stats::page_size(transfer_hours),
        })
    }
}

/// Check a performance statistics duration in hours
pub fn validate_duration(hours: u32) -> Result<usize> {
    if hours == 0 || hours as usize > perf_stats::MAX_HOURS {
        return Err(DecoderError::InvalidParameter(format!(
            "duration must be between 1 and {}, got {}",
            perf_stats::MAX_HOURS,
            hours
        )));
    }
    Ok(hours as usize)
}

/// Raw bytes of one page, borrowed read-only by the decoders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPage {
    kind: PageKind,
    bytes: Vec<u8>,
    valid_len: usize,
}

impl RawPage {
    /// A page whose every byte is valid
    pub fn new(kind: PageKind, bytes: Vec<u8>) -> Self {
        let valid_len = bytes.len();
        Self {
            kind,
            bytes,
            valid_len,
        }
    }

    /// A page fetched with padding beyond `valid_len`
    pub fn with_valid_len(kind: PageKind, bytes: Vec<u8>, valid_len: usize) -> Self {
        let valid_len = valid_len.min(bytes.len());
        Self {
            kind,
            bytes,
            valid_len,
        }
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    /// The logically valid prefix; this is what raw mode emits
    pub fn valid_bytes(&self) -> &[u8] {
        &self.bytes[..self.valid_len]
    }

    /// Everything the device returned, including alignment padding
    pub fn transfer_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Fetch the page described by `request`
pub fn fetch_page<T: AdminTransport + ?Sized>(
    transport: &mut T,
    request: PageRequest,
) -> Result<RawPage> {
    log::debug!(
        "Fetching {} (log 0x{:02x}): {} bytes, {} valid",
        request.kind,
        request.kind.log_id(),
        request.transfer_len,
        request.valid_len
    );
    let mut bytes = transport.get_log_page(request.kind.log_id(), request.transfer_len)?;
    // A short read is zero-filled like the device's zeroed buffer
    bytes.resize(request.transfer_len, 0);
    Ok(RawPage::with_valid_len(request.kind, bytes, request.valid_len))
}
