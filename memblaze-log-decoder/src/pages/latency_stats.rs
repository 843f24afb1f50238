//! Latency statistics decoding (major 2, minor 0)

use crate::layout::latency_stats::{self, BUCKET_COUNT};
use crate::registry::{BucketDescriptor, LATENCY_BUCKETS};
use serde::Serialize;

/// I/O class tallied by the latency buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IoClass {
    Read,
    Write,
    Trim,
}

impl IoClass {
    pub fn label(self) -> &'static str {
        match self {
            IoClass::Read => "Read",
            IoClass::Write => "Write",
            IoClass::Trim => "Trim",
        }
    }

    fn base(self) -> usize {
        match self {
            IoClass::Read => latency_stats::READ_BUCKETS,
            IoClass::Write => latency_stats::WRITE_BUCKETS,
            IoClass::Trim => latency_stats::TRIM_BUCKETS,
        }
    }
}

/// Decoded latency statistics page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatencyStatsPage {
    pub major: u32,
    pub minor: u32,
    pub read: [u32; BUCKET_COUNT],
    pub write: [u32; BUCKET_COUNT],
    pub trim: [u32; BUCKET_COUNT],
}

impl LatencyStatsPage {
    pub fn counters(&self, class: IoClass) -> &[u32; BUCKET_COUNT] {
        match class {
            IoClass::Read => &self.read,
            IoClass::Write => &self.write,
            IoClass::Trim => &self.trim,
        }
    }

    /// Pair every counter of `class` with its bucket bounds
    pub fn buckets(
        &self,
        class: IoClass,
    ) -> impl Iterator<Item = (&'static BucketDescriptor, u32)> + '_ {
        LATENCY_BUCKETS.iter().zip(self.counters(class).iter().copied())
    }
}

/// The caller has validated the version and the page size
pub(crate) fn decode(raw: &[u8], major: u32, minor: u32) -> LatencyStatsPage {
    LatencyStatsPage {
        major,
        minor,
        read: read_class(raw, IoClass::Read),
        write: read_class(raw, IoClass::Write),
        trim: read_class(raw, IoClass::Trim),
    }
}

fn read_class(raw: &[u8], class: IoClass) -> [u32; BUCKET_COUNT] {
    let mut counters = [0u32; BUCKET_COUNT];
    for (index, counter) in counters.iter_mut().enumerate() {
        *counter = latency_stats::bucket(class.base(), index)
            .read(raw)
            .unwrap_or_default() as u32;
    }
    counters
}
