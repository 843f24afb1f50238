//! Latency monitor feature codec
//!
//! Packs the five set-feature inputs into admin command dwords and unpacks the
//! 32-bit feature value returned by get-feature.
//!
//! Feature value layout:
//! - bits 0..=2: enable latency statistics / high latency log / performance stats
//! - bits 4..=6: monitor read / write / trim commands
//! - bits 8..=15, 16..=23, 24..=31: read / write / trim thresholds (0-based, 10ms units)

use crate::convert::threshold_to_ms;
use crate::types::FID_LATENCY_FEATURE;
use serde::{Deserialize, Serialize};

const ENABLE_SHIFT: u32 = 0;
const MONITOR_SHIFT: u32 = 4;
const THRESHOLD_SHIFT: u32 = 8;

/// Inputs of the set path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyMonitorSettings {
    /// bit 0 latency statistics, bit 1 high latency log, bit 2 performance stats
    pub enable_mask: u32,
    /// bit 0 read, bit 1 write, bit 2 trim (trim is ignored by performance stats)
    pub command_mask: u32,
    pub read_threshold: u32,
    pub write_threshold: u32,
    pub trim_threshold: u32,
}

/// Admin command dwords of a set-features command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetFeatureArgs {
    pub cdw10: u32,
    pub cdw11: u32,
    pub cdw12: u32,
    pub cdw13: u32,
    pub cdw14: u32,
}

impl SetFeatureArgs {
    pub fn feature_id(&self) -> u8 {
        (self.cdw10 & 0xff) as u8
    }

    pub fn save(&self) -> bool {
        self.cdw10 & (1 << 31) != 0
    }

    /// Feature value a device reports after accepting these arguments
    pub fn feature_value(&self) -> u32 {
        ((self.cdw11 & 0x7) << ENABLE_SHIFT)
            | ((self.cdw12 & 0x7) << MONITOR_SHIFT)
            | ((self.cdw13 & 0x00ff_ffff) << THRESHOLD_SHIFT)
    }
}

impl LatencyMonitorSettings {
    /// Thresholds packed one byte each, read in the low byte
    pub fn threshold_word(&self) -> u32 {
        (self.read_threshold & 0xff)
            | ((self.write_threshold & 0xff) << 8)
            | ((self.trim_threshold & 0xff) << 16)
    }

    /// Build the set-features dwords; `save` persists across power cycles
    pub fn to_args(&self, save: bool) -> SetFeatureArgs {
        SetFeatureArgs {
            cdw10: FID_LATENCY_FEATURE as u32 | if save { 1 << 31 } else { 0 },
            cdw11: self.enable_mask,
            cdw12: self.command_mask,
            cdw13: self.threshold_word(),
            cdw14: 0,
        }
    }
}

/// Decoded get-feature result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LatencyMonitorStatus {
    pub value: u32,
    pub latency_statistics: bool,
    pub high_latency_log: bool,
    pub performance_stats: bool,
    pub monitor_read: bool,
    pub monitor_write: bool,
    pub monitor_trim: bool,
    pub read_threshold: u8,
    pub write_threshold: u8,
    pub trim_threshold: u8,
}

fn bit(value: u32, n: u32) -> bool {
    (value >> n) & 1 == 1
}

fn byte(value: u32, n: u32) -> u8 {
    ((value >> (8 * n)) & 0xff) as u8
}

impl LatencyMonitorStatus {
    pub fn from_value(value: u32) -> Self {
        Self {
            value,
            latency_statistics: bit(value, ENABLE_SHIFT),
            high_latency_log: bit(value, ENABLE_SHIFT + 1),
            performance_stats: bit(value, ENABLE_SHIFT + 2),
            monitor_read: bit(value, MONITOR_SHIFT),
            monitor_write: bit(value, MONITOR_SHIFT + 1),
            monitor_trim: bit(value, MONITOR_SHIFT + 2),
            read_threshold: byte(value, 1),
            write_threshold: byte(value, 2),
            trim_threshold: byte(value, 3),
        }
    }

    pub fn read_threshold_ms(&self) -> u32 {
        threshold_to_ms(self.read_threshold)
    }

    pub fn write_threshold_ms(&self) -> u32 {
        threshold_to_ms(self.write_threshold)
    }

    pub fn trim_threshold_ms(&self) -> u32 {
        threshold_to_ms(self.trim_threshold)
    }
}
