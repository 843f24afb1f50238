//! Capture directory transport
//!
//! Stands in for a device: raw pages and the feature value are served from
//! files captured earlier.
//!
//! ```text
//! <dir>/log-0xca.bin     raw bytes of log page 0xca
//! <dir>/feature-0xd0     feature value, decimal or 0x-prefixed hex
//! <dir>/status           optional; a non-zero value fails every command
//! ```

use memblaze_log_decoder::{AdminTransport, DecoderError, Result, SetFeatureArgs};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CaptureDir {
    root: PathBuf,
}

impl CaptureDir {
    pub fn open(path: &Path) -> Result<Self> {
        if !fs::metadata(path)?.is_dir() {
            return Err(DecoderError::IoError(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a capture directory", path.display()),
            )));
        }
        Ok(Self {
            root: path.to_path_buf(),
        })
    }

    /// Name shown in report headers when none is configured
    pub fn device_name(&self) -> String {
        self.root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.root.display().to_string())
    }

    pub fn log_path(&self, log_id: u8) -> PathBuf {
        self.root.join(format!("log-0x{:02x}.bin", log_id))
    }

    pub fn feature_path(&self, feature_id: u8) -> PathBuf {
        self.root.join(format!("feature-0x{:02x}", feature_id))
    }

    /// Fail like the device would when a status has been captured
    fn check_status(&self) -> Result<()> {
        let path = self.root.join("status");
        if !path.exists() {
            return Ok(());
        }
        match parse_u32(&fs::read_to_string(&path)?)? {
            0 => Ok(()),
            status => Err(DecoderError::DeviceStatus(status)),
        }
    }
}

fn parse_u32(text: &str) -> Result<u32> {
    let text = text.trim();
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|e| DecoderError::InvalidParameter(format!("bad value {:?}: {}", text, e)))
}

impl AdminTransport for CaptureDir {
    fn get_log_page(&mut self, log_id: u8, len: usize) -> Result<Vec<u8>> {
        self.check_status()?;
        let path = self.log_path(log_id);
        log::debug!("Reading {}", path.display());
        let mut bytes = fs::read(&path)?;
        if bytes.len() < len {
            log::warn!(
                "{} holds {} bytes, {} requested; padding with zeros",
                path.display(),
                bytes.len(),
                len
            );
        }
        bytes.truncate(len);
        Ok(bytes)
    }

    fn get_feature(&mut self, feature_id: u8) -> Result<u32> {
        self.check_status()?;
        let path = self.feature_path(feature_id);
        match fs::read_to_string(&path) {
            Ok(text) => parse_u32(&text),
            // a feature never set reads back as its reset value
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    fn set_feature(&mut self, args: &SetFeatureArgs) -> Result<u32> {
        self.check_status()?;
        let path = self.feature_path(args.feature_id());
        log::debug!("Writing {} (save: {})", path.display(), args.save());
        fs::write(&path, format!("{:#010x}\n", args.feature_value()))?;
        Ok(0)
    }
}
