//! Report rendering
//!
//! Turns decoded pages into the column-aligned text reports of the vendor
//! tool, dumps raw pages verbatim, or serializes pages as JSON. The device
//! name is always passed in by the caller.

use crate::config::DecoderConfig;
use crate::convert::{format_timestamp_ms, kelvin_to_celsius};
use crate::feature::LatencyMonitorStatus;
use crate::pages::{
    DecodedPage, HighLatencyPage, IoClass, LatencyStatsPage, PerfStatsPage, SmartLogPage,
};
use crate::transport::RawPage;
use crate::types::{DecodedItem, PageKind, Result, SubValue, UnsupportedVersion, VersionTag};
use std::io::Write;

/// Text renderer bound to one device
#[derive(Debug, Clone)]
pub struct Renderer<'a> {
    device: &'a str,
    config: &'a DecoderConfig,
}

impl<'a> Renderer<'a> {
    pub fn new(device: &'a str, config: &'a DecoderConfig) -> Self {
        Self { device, config }
    }

    /// Render a decoded page as a text report
    pub fn render<W: Write>(&self, page: &DecodedPage, out: &mut W) -> Result<()> {
        self.write_header(page.kind(), version_of(page), out)?;
        match page {
            DecodedPage::SmartLogAdd(p) => self.smart_log_add(p, out),
            DecodedPage::LatencyStatistics(p) => self.latency_stats(p, out),
            DecodedPage::HighLatencyLog(p) => self.high_latency(p, out),
            DecodedPage::PerformanceStatistics(p) => self.perf_stats(p, out),
        }
    }

    /// Header of a page whose version could not be decoded
    ///
    /// The explanation itself belongs on the diagnostic stream; see
    /// [`UnsupportedVersion`]'s `Display`.
    pub fn render_unsupported<W: Write>(
        &self,
        unsupported: &UnsupportedVersion,
        out: &mut W,
    ) -> Result<()> {
        self.write_header(unsupported.page, unsupported.tag, out)
    }

    fn write_header<W: Write>(&self, kind: PageKind, tag: VersionTag, out: &mut W) -> Result<()> {
        writeln!(out, "{}", tag)?;
        writeln!(out)?;
        writeln!(out, "{} for NVMe device: {}", kind.title(), self.device)?;
        writeln!(out)?;
        Ok(())
    }

    fn smart_log_add<W: Write>(&self, page: &SmartLogPage, out: &mut W) -> Result<()> {
        writeln!(out, "{:<12}{:<36}{:<12}{}", "Id", "Key", "Normalized", "Raw")?;
        for item in &page.items {
            let name = item
                .attribute
                .name()
                .unwrap_or(self.config.unknown_placeholder.as_str());
            writeln!(
                out,
                "{:<#12x}{:<36}{:<12}{}",
                item.id,
                name,
                item.normalized,
                smart_value(item)
            )?;
        }
        Ok(())
    }

    fn latency_stats<W: Write>(&self, page: &LatencyStatsPage, out: &mut W) -> Result<()> {
        for class in [IoClass::Read, IoClass::Write, IoClass::Trim] {
            writeln!(out, "Bucket 1-32 IO {} Command Data", class.label())?;
            writeln!(out, "-------------------------------------------")?;
            writeln!(out, "{:<12}{:<12}{:<12}{:<12}", "Bucket", "Start(>=)", "End(<)", "Value")?;
            for (bucket, value) in page.buckets(class) {
                writeln!(
                    out,
                    "{:<12}{:<12}{:<12}{:<12}",
                    bucket.index, bucket.start, bucket.end, value
                )?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    fn high_latency<W: Write>(&self, page: &HighLatencyPage, out: &mut W) -> Result<()> {
        writeln!(
            out,
            "{:<24}{:<12}{:<12}{:<6}{:<6}{:<6}{:<6}{:<12}{:<24}{:<6}{:<6}{:<6}{:<6}{:<6}",
            "Timestamp", "Latency(us)", "QID", "OpC", "Fuse", "PSDT", "CID", "NSID", "SLBA",
            "NLB", "DType", "PInfo", "FUA", "LR"
        )?;
        for e in &page.entries {
            writeln!(
                out,
                "{:<24}{:<12}{:<12}{:<6}{:<6}{:<6}{:<6}{:<12}{:<24}{:<6}{:<6}{:<6}{:<6}{:<6}",
                format_timestamp_ms(e.timestamp_ms, self.config.timestamp_zone),
                e.latency,
                e.qid,
                alt_hex(e.opcode.into()),
                e.fuse,
                e.psdt,
                e.cid,
                e.nsid,
                e.slba,
                e.nlb,
                e.dtype,
                e.pinfo,
                e.fua,
                e.lr
            )?;
        }
        Ok(())
    }

    fn perf_stats<W: Write>(&self, page: &PerfStatsPage, out: &mut W) -> Result<()> {
        for hour in &page.hours {
            writeln!(
                out,
                "Timestamp {:>2}: {}",
                hour.index,
                format_timestamp_ms(hour.timestamp_ms, self.config.timestamp_zone)
            )?;
            writeln!(
                out,
                "{:<8}{:<14}{:<21}{:<22}{:<22}{:<15}{:<22}{:<23}{:<23}",
                "Entry",
                "Read-IOs(K)",
                "Read-Bandwidth(MiB)",
                "Avg-Read-Latency(us)",
                "Max-Read-Latency(us)",
                "Write-IOs(K)",
                "Write-Bandwidth(MiB)",
                "Avg-Write-Latency(us)",
                "Max-Write-Latency(us)"
            )?;
            for e in &hour.entries {
                writeln!(
                    out,
                    "{:<8}{:<14}{:<21}{:<22}{:<22}{:<15}{:<22}{:<23}{:<23}",
                    e.slot,
                    e.read_iops,
                    e.read_bandwidth,
                    e.read_latency_avg,
                    e.read_latency_max,
                    e.write_iops,
                    e.write_bandwidth,
                    e.write_latency_avg,
                    e.write_latency_max
                )?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

fn version_of(page: &DecodedPage) -> VersionTag {
    match page {
        DecodedPage::SmartLogAdd(p) => VersionTag::Byte(p.version),
        DecodedPage::LatencyStatistics(p) => VersionTag::MajorMinor {
            major: p.major,
            minor: p.minor,
        },
        DecodedPage::HighLatencyLog(p) => VersionTag::Word(p.version),
        DecodedPage::PerformanceStatistics(p) => VersionTag::Byte(p.version),
    }
}

/// `0x`-prefixed hex, except zero which prints bare like printf's `%#x`
fn alt_hex(value: u32) -> String {
    if value == 0 {
        "0".to_string()
    } else {
        format!("{:#x}", value)
    }
}

/// Text of the `Raw` column
fn smart_value(item: &DecodedItem) -> String {
    let temp = |k: u16| format!("{} °C ({} K)", kelvin_to_celsius(k as i32), k);
    match item.detail {
        Some(SubValue::WearLevel { min, max, avg }) => {
            format!("min: {}, max: {}, avg: {}", min, max, avg)
        }
        Some(SubValue::Temperature { max, min, curr }) => format!(
            "max: {}, min: {}, curr: {}",
            temp(max),
            temp(min),
            temp(curr)
        ),
        Some(SubValue::Power { max, min, curr }) => {
            format!("max: {}, min: {}, curr: {}", max, min, curr)
        }
        None => item.raw.to_string(),
    }
}

/// Write the logically valid bytes of `page` untouched
pub fn write_raw<W: Write>(page: &RawPage, out: &mut W) -> Result<()> {
    out.write_all(page.valid_bytes())?;
    out.flush()?;
    Ok(())
}

/// Serialize a decoded page as pretty JSON
pub fn write_json<W: Write>(page: &DecodedPage, out: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, page).map_err(std::io::Error::from)?;
    writeln!(out)?;
    Ok(())
}

/// Report of a get-feature / set-feature completion
pub fn write_feature_result<W: Write>(command: &str, result: u32, out: &mut W) -> Result<()> {
    writeln!(out, "{} have done successfully. result = {}.", command, alt_hex(result))?;
    Ok(())
}

/// Decoded latency monitor flags and thresholds
pub fn write_feature_status<W: Write>(status: &LatencyMonitorStatus, out: &mut W) -> Result<()> {
    let flag = |on: bool| u8::from(on);
    writeln!(out, "latency statistics enable status = {}", flag(status.latency_statistics))?;
    writeln!(out, "high latency enable status = {}", flag(status.high_latency_log))?;
    writeln!(out, "performance stat enable status = {}", flag(status.performance_stats))?;
    writeln!(out, "Monitor Read command = {}", flag(status.monitor_read))?;
    writeln!(out, "Monitor Write command = {}", flag(status.monitor_write))?;
    writeln!(out, "Monitor Trim command = {}", flag(status.monitor_trim))?;
    writeln!(out, "Threshold for Read = {}ms", status.read_threshold_ms())?;
    writeln!(out, "Threshold for Write = {}ms", status.write_threshold_ms())?;
    writeln!(out, "Threshold for Trim = {}ms", status.trim_threshold_ms())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::TimestampZone;
    use crate::pages::{HighLatencyEntry, PerfEntry, PerfHour};
    use crate::types::{Attribute, UnsupportedReason};

    fn render_to_string(page: &DecodedPage, config: &DecoderConfig) -> String {
        let mut out = Vec::new();
        Renderer::new("nvme0", config).render(page, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn item(id: u8, attribute: Attribute, raw: u64, detail: Option<SubValue>) -> DecodedItem {
        DecodedItem {
            id,
            attribute,
            normalized: 100,
            raw,
            detail,
        }
    }

    #[test]
    fn test_smart_report() {
        let page = DecodedPage::SmartLogAdd(SmartLogPage {
            version: 2,
            items: vec![
                item(
                    0xab,
                    Attribute::Known { name: "program_fail_count", ordinal: 0 },
                    3,
                    None,
                ),
                item(
                    0xe7,
                    Attribute::Known { name: "temp_since_born", ordinal: 23 },
                    0,
                    Some(SubValue::Temperature { max: 320, min: 290, curr: 300 }),
                ),
                item(0x42, Attribute::Unknown, 9, None),
            ],
        });
        let text = render_to_string(&page, &DecoderConfig::new());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Version: 2");
        assert_eq!(lines[2], "Additional Smart Log for NVMe device: nvme0");
        assert_eq!(lines[4], format!("{:<12}{:<36}{:<12}Raw", "Id", "Key", "Normalized"));
        assert_eq!(lines[5], format!("{:<12}{:<36}{:<12}3", "0xab", "program_fail_count", 100));
        assert!(lines[6].ends_with("max: 47 °C (320 K), min: 17 °C (290 K), curr: 27 °C (300 K)"));
        assert!(lines[7].starts_with(&format!("{:<12}{:<36}", "0x42", "unknown")));
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn test_latency_report_sections() {
        let page = DecodedPage::LatencyStatistics(LatencyStatsPage {
            major: 2,
            minor: 0,
            read: [1; 32],
            write: [0; 32],
            trim: [0; 32],
        });
        let text = render_to_string(&page, &DecoderConfig::new());

        assert!(text.starts_with("Major Version: 2, Minor Version: 0\n"));
        assert!(text.contains("Bucket 1-32 IO Read Command Data"));
        assert!(text.contains("Bucket 1-32 IO Trim Command Data"));
        assert!(text.contains(&format!("{:<12}{:<12}{:<12}{:<12}\n", 32, "8s", "INF", 0)));
        assert!(text.contains(&format!("{:<12}{:<12}{:<12}{:<12}\n", 1, "0us", "50us", 1)));
    }

    #[test]
    fn test_high_latency_row() {
        let page = DecodedPage::HighLatencyLog(HighLatencyPage {
            version: 1,
            entries: vec![HighLatencyEntry {
                timestamp_ms: 1_700_000_000_123,
                latency: 15000,
                qid: 3,
                opcode: 0x02,
                fuse: 0,
                psdt: 0,
                cid: 17,
                nsid: 1,
                slba: 2048,
                nlb: 7,
                dtype: 0,
                pinfo: 0,
                fua: 1,
                lr: 0,
            }],
        });
        let config = DecoderConfig::new().with_timestamp_zone(TimestampZone::Utc);
        let text = render_to_string(&page, &config);
        let row = text.lines().last().unwrap();

        assert!(row.starts_with("2023-11-14 22:13:20.123 15000       3           0x2   "));
        assert!(row.contains("2048"));
    }

    #[test]
    fn test_zero_hex_prints_bare() {
        let page = DecodedPage::HighLatencyLog(HighLatencyPage {
            version: 1,
            entries: vec![HighLatencyEntry {
                timestamp_ms: 1,
                latency: 0,
                qid: 0,
                opcode: 0,
                fuse: 0,
                psdt: 0,
                cid: 0,
                nsid: 0,
                slba: 0,
                nlb: 0,
                dtype: 0,
                pinfo: 0,
                fua: 0,
                lr: 0,
            }],
        });
        let config = DecoderConfig::new().with_timestamp_zone(TimestampZone::Utc);
        let text = render_to_string(&page, &config);
        let row = text.lines().last().unwrap();
        assert!(row.contains(&format!("{:<12}{:<12}{:<6}", 0, 0, 0)));
        assert!(!row.contains("0x"));

        let mut out = Vec::new();
        write_feature_result("lat-get-feature", 0, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "lat-get-feature have done successfully. result = 0.\n"
        );

        let mut out = Vec::new();
        write_feature_result("lat-get-feature", 0x13, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("result = 0x13."));
    }

    #[test]
    fn test_perf_report() {
        let page = DecodedPage::PerformanceStatistics(PerfStatsPage {
            version: 1,
            hours: vec![PerfHour {
                index: 1,
                timestamp_ms: 0,
                entries: vec![PerfEntry {
                    slot: 5,
                    read_iops: 2,
                    read_bandwidth: 8,
                    read_latency_avg: 50,
                    read_latency_max: 90,
                    write_iops: 0,
                    write_bandwidth: 0,
                    write_latency_avg: 0,
                    write_latency_max: 0,
                }],
            }],
        });
        let config = DecoderConfig::new().with_timestamp_zone(TimestampZone::Utc);
        let text = render_to_string(&page, &config);

        assert!(text.contains("Performance Stat log for NVMe device: nvme0"));
        assert!(text.contains("Timestamp  1: 1970-01-01 00:00:00.000\n"));
        assert!(text.contains(&format!("{:<8}{:<14}{:<21}{:<22}{:<22}", 5, 2, 8, 50, 90)));
    }

    #[test]
    fn test_unsupported_header() {
        let unsupported = UnsupportedVersion {
            page: PageKind::HighLatencyLog,
            tag: VersionTag::Word(7),
            reason: UnsupportedReason::Unknown,
        };
        let config = DecoderConfig::new();
        let mut out = Vec::new();
        Renderer::new("nvme1", &config)
            .render_unsupported(&unsupported, &mut out)
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Version: 7\n\nHigh Latency Log for NVMe device: nvme1\n\n"
        );
    }

    #[test]
    fn test_raw_dump_uses_valid_prefix() {
        let page = RawPage::with_valid_len(PageKind::PerformanceStatistics, vec![7u8; 64], 10);
        let mut out = Vec::new();
        write_raw(&page, &mut out).unwrap();
        assert_eq!(out, vec![7u8; 10]);
    }

    #[test]
    fn test_feature_status_lines() {
        let status = LatencyMonitorStatus::from_value(0x0201_0013);
        let mut out = Vec::new();
        write_feature_status(&status, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("latency statistics enable status = 1\n"));
        assert!(text.contains("high latency enable status = 1\n"));
        assert!(text.contains("performance stat enable status = 0\n"));
        assert!(text.contains("Monitor Read command = 1\n"));
        assert!(text.contains("Threshold for Read = 10ms\n"));
        assert!(text.contains("Threshold for Write = 20ms\n"));
        assert!(text.contains("Threshold for Trim = 30ms\n"));
    }

    #[test]
    fn test_json_output() {
        let page = DecodedPage::HighLatencyLog(HighLatencyPage {
            version: 1,
            entries: vec![],
        });
        let mut out = Vec::new();
        write_json(&page, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["page"], "high-latency-log");
        assert_eq!(value["version"], 1);
    }
}
