//! Per-page schema decoders
//!
//! Each submodule turns the bytes of one validated (page kind, version) pair
//! into a typed page. Version selection and size checks happen before any of
//! these run, in [`crate::decoder`].

use crate::types::PageKind;
use serde::Serialize;

pub mod high_latency;
pub mod latency_stats;
pub mod perf_stats;
pub mod smart_add;

pub use high_latency::{HighLatencyEntry, HighLatencyPage};
pub use latency_stats::{IoClass, LatencyStatsPage};
pub use perf_stats::{PerfEntry, PerfHour, PerfStatsPage};
pub use smart_add::SmartLogPage;

/// A fully decoded log page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "kebab-case")]
pub enum DecodedPage {
    SmartLogAdd(SmartLogPage),
    LatencyStatistics(LatencyStatsPage),
    HighLatencyLog(HighLatencyPage),
    PerformanceStatistics(PerfStatsPage),
}

impl DecodedPage {
    pub fn kind(&self) -> PageKind {
        match self {
            DecodedPage::SmartLogAdd(_) => PageKind::SmartLogAdd,
            DecodedPage::LatencyStatistics(_) => PageKind::LatencyStatistics,
            DecodedPage::HighLatencyLog(_) => PageKind::HighLatencyLog,
            DecodedPage::PerformanceStatistics(_) => PageKind::PerformanceStatistics,
        }
    }
}
