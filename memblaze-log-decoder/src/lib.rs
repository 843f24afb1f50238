//! Memblaze Log Decoder Library
//!
//! A stateless library for decoding the vendor-specific NVMe log pages of
//! Memblaze drives: the additional SMART log, latency statistics, the high
//! latency log and hourly performance statistics. It also packs and unpacks
//! the latency monitor feature.
//!
//! # Architecture
//!
//! - Every page starts with a version check; the version selects a fixed
//!   layout, and only then are fields read
//! - Layouts are tables of (offset, width) fields over little-endian bytes
//! - SMART attribute names come from a per-revision registry
//! - Device access goes through the [`AdminTransport`] trait
//!
//! The library does NOT:
//! - Open devices or issue ioctls
//! - Parse command lines
//! - Decide where the output goes
//!
//! All of that lives in the application layer (memblaze-log-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use memblaze_log_decoder::render::Renderer;
//! use memblaze_log_decoder::{fetch_page, AdminTransport, Decoder, DecoderConfig, PageKind, PageRequest};
//!
//! fn print_smart<T: AdminTransport>(device: &mut T) -> memblaze_log_decoder::Result<()> {
//!     let config = DecoderConfig::new();
//!     let raw = fetch_page(device, PageRequest::fixed(PageKind::SmartLogAdd)?)?;
//!     let page = Decoder::with_config(config.clone()).decode(&raw)?;
//!     Renderer::new("nvme0", &config).render(&page, &mut std::io::stdout())
//! }
//! ```

pub mod config;
pub mod convert;
pub mod decoder;
pub mod feature;
pub mod layout;
pub mod pages;
pub mod registry;
pub mod render;
pub mod transport;
pub mod types;

pub use config::{DecoderConfig, UnknownAttributePolicy};
pub use convert::TimestampZone;
pub use decoder::Decoder;
pub use feature::{LatencyMonitorSettings, LatencyMonitorStatus, SetFeatureArgs};
pub use pages::DecodedPage;
pub use transport::{fetch_page, AdminTransport, PageRequest, RawPage};
pub use types::{
    DecodedItem, DecoderError, PageKind, Result, UnsupportedVersion, VersionTag,
    FID_LATENCY_FEATURE,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
