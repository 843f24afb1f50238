//! Unit conversions
//!
//! Pure numeric transforms applied to raw field values before they are shown:
//! temperature scale, 48-bit counters, latency thresholds and millisecond
//! timestamps.

use byteorder::{ByteOrder, LittleEndian};
use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Width of the counters stored in SMART slots
pub const U48_WIDTH: usize = 6;

/// Convert Kelvin to Celsius (integer subtraction, no rounding)
pub fn kelvin_to_celsius(kelvin: i32) -> i32 {
    kelvin - 273
}

/// Reconstruct a 48-bit little-endian counter from the first 6 bytes of `bytes`
///
/// Bytes beyond the sixth are ignored. Returns `None` when fewer than 6 bytes
/// are available.
pub fn read_u48(bytes: &[u8]) -> Option<u64> {
    bytes.get(..U48_WIDTH).map(LittleEndian::read_u48)
}

/// Encode the low 48 bits of `value` as 6 little-endian bytes
pub fn write_u48(value: u64) -> [u8; U48_WIDTH] {
    let mut out = [0u8; U48_WIDTH];
    LittleEndian::write_u48(&mut out, value & 0xFFFF_FFFF_FFFF);
    out
}

/// Latency thresholds are 0-based in units of 10ms
pub fn threshold_to_ms(raw: u8) -> u32 {
    (raw as u32 + 1) * 10
}

/// Timezone used when rendering device timestamps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampZone {
    #[default]
    Local,
    Utc,
}

/// Render a millisecond epoch timestamp as `YYYY-MM-DD HH:MM:SS.mmm`
pub fn format_timestamp_ms(timestamp_ms: u64, zone: TimestampZone) -> String {
    match zone {
        TimestampZone::Local => format_in(&Local, timestamp_ms),
        TimestampZone::Utc => format_in(&Utc, timestamp_ms),
    }
}

fn format_in<Tz: TimeZone>(tz: &Tz, timestamp_ms: u64) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let secs = (timestamp_ms / 1000) as i64;
    let millis = timestamp_ms % 1000;
    match DateTime::from_timestamp(secs, 0) {
        Some(utc) => format!(
            "{}.{:03}",
            utc.with_timezone(tz).format("%Y-%m-%d %H:%M:%S"),
            millis
        ),
        // Out of chrono's range; show the raw value rather than a wrong date
        None => format!("{}ms", timestamp_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kelvin_to_celsius() {
        assert_eq!(kelvin_to_celsius(300), 27);
        assert_eq!(kelvin_to_celsius(273), 0);
        assert_eq!(kelvin_to_celsius(0), -273);
    }

    #[test]
    fn test_u48_roundtrip() {
        for value in [0u64, 1, 0x1234_5678_9ABC, (1 << 48) - 1, 0xFF_0000_0001] {
            assert_eq!(read_u48(&write_u48(value)), Some(value));
        }
    }

    #[test]
    fn test_u48_ignores_trailing_bytes() {
        let bytes = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0xFF, 0xFF];
        assert_eq!(read_u48(&bytes), Some(0x0605_0403_0201));
    }

    #[test]
    fn test_u48_short_span() {
        assert_eq!(read_u48(&[1, 2, 3]), None);
    }

    #[test]
    fn test_threshold_to_ms() {
        assert_eq!(threshold_to_ms(0), 10);
        assert_eq!(threshold_to_ms(9), 100);
        assert_eq!(threshold_to_ms(255), 2560);
    }

    #[test]
    fn test_format_timestamp_utc() {
        assert_eq!(
            format_timestamp_ms(1_700_000_000_123, TimestampZone::Utc),
            "2023-11-14 22:13:20.123"
        );
        assert_eq!(format_timestamp_ms(5, TimestampZone::Utc), "1970-01-01 00:00:00.005");
    }
}
