//! Configuration loading and parsing

use anyhow::{Context, Result};
use memblaze_log_decoder::{DecoderConfig, TimestampZone, UnknownAttributePolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Application configuration (loaded from a TOML file)
///
/// Every section is optional; command-line flags override what is set here.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub performance: PerformanceConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DeviceConfig {
    /// Name used in report headers instead of the capture directory name
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub utc: bool,
    #[serde(default)]
    pub unknown_attributes: UnknownAttributePolicy,
    #[serde(default = "default_placeholder")]
    pub unknown_placeholder: String,
}

fn default_placeholder() -> String {
    "unknown".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            utc: false,
            unknown_attributes: UnknownAttributePolicy::default(),
            unknown_placeholder: default_placeholder(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Normal,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PerformanceConfig {
    /// Hours of performance statistics to print
    #[serde(default = "default_duration")]
    pub duration: u32,
}

fn default_duration() -> u32 {
    1
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            duration: default_duration(),
        }
    }
}

impl AppConfig {
    /// Decoder settings derived from the `[output]` section
    pub fn decoder_config(&self) -> DecoderConfig {
        let zone = if self.output.utc {
            TimestampZone::Utc
        } else {
            TimestampZone::Local
        };
        DecoderConfig::new()
            .with_unknown_attributes(self.output.unknown_attributes)
            .with_timestamp_zone(zone)
            .with_unknown_placeholder(self.output.unknown_placeholder.clone())
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}
