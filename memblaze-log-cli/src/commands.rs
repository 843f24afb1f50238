//! Sub-command flows
//!
//! Each flow fetches through an [`AdminTransport`], then decodes and renders
//! to the given writer. Errors other than an unsupported page version are
//! returned to `main`, which maps device statuses to the exit code.

use crate::config::OutputFormat;
use anyhow::{Context, Result};
use memblaze_log_decoder::render::{self, Renderer};
use memblaze_log_decoder::{
    fetch_page, AdminTransport, Decoder, DecoderConfig, DecoderError, LatencyMonitorSettings,
    LatencyMonitorStatus, PageKind, PageRequest, FID_LATENCY_FEATURE,
};
use std::io::Write;

/// Settings shared by every sub-command of one invocation
#[derive(Debug, Clone)]
pub struct Session {
    pub device_name: String,
    pub decoder_config: DecoderConfig,
    pub format: OutputFormat,
}

impl Session {
    fn renderer(&self) -> Renderer<'_> {
        Renderer::new(&self.device_name, &self.decoder_config)
    }
}

/// Fetch, decode and print one log page
pub fn print_page<T, W>(
    session: &Session,
    transport: &mut T,
    request: PageRequest,
    raw_binary: bool,
    out: &mut W,
) -> Result<()>
where
    T: AdminTransport + ?Sized,
    W: Write,
{
    let page = fetch_page(transport, request)
        .with_context(|| format!("Failed to read {} log page", request.kind))?;

    if raw_binary {
        render::write_raw(&page, out)?;
        return Ok(());
    }

    let decoder = Decoder::with_config(session.decoder_config.clone());
    match decoder.decode(&page) {
        Ok(decoded) => match session.format {
            OutputFormat::Normal => session.renderer().render(&decoded, out)?,
            OutputFormat::Json => render::write_json(&decoded, out)?,
        },
        Err(DecoderError::UnsupportedVersion(unsupported)) => {
            if session.format == OutputFormat::Normal {
                session.renderer().render_unsupported(&unsupported, out)?;
            }
            eprintln!("{}", unsupported);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to decode {} log page", request.kind))
        }
    }
    Ok(())
}

/// Performance statistics covering `hours`; rejected before any device access
/// when out of range
pub fn print_perf_stats<T, W>(
    session: &Session,
    transport: &mut T,
    hours: u32,
    raw_binary: bool,
    out: &mut W,
) -> Result<()>
where
    T: AdminTransport + ?Sized,
    W: Write,
{
    let request = PageRequest::performance_statistics(hours)?;
    print_page(session, transport, request, raw_binary, out)
}

/// Print one of the fixed-size pages
pub fn print_fixed_page<T, W>(
    session: &Session,
    transport: &mut T,
    kind: PageKind,
    raw_binary: bool,
    out: &mut W,
) -> Result<()>
where
    T: AdminTransport + ?Sized,
    W: Write,
{
    print_page(session, transport, PageRequest::fixed(kind)?, raw_binary, out)
}

pub fn get_latency_feature<T, W>(session: &Session, transport: &mut T, out: &mut W) -> Result<()>
where
    T: AdminTransport + ?Sized,
    W: Write,
{
    let value = transport
        .get_feature(FID_LATENCY_FEATURE)
        .context("Failed to get latency feature")?;
    let status = LatencyMonitorStatus::from_value(value);
    log::debug!("latency feature value {:#010x}", value);

    match session.format {
        OutputFormat::Normal => {
            render::write_feature_result("lat-get-feature", value, out)?;
            render::write_feature_status(&status, out)?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &status)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

pub fn set_latency_feature<T, W>(
    transport: &mut T,
    settings: &LatencyMonitorSettings,
    out: &mut W,
) -> Result<()>
where
    T: AdminTransport + ?Sized,
    W: Write,
{
    let args = settings.to_args(false);
    log::debug!("set-features {:?}", args);
    let result = transport
        .set_feature(&args)
        .context("Failed to set latency feature")?;
    render::write_feature_result("lat-set-feature", result, out)?;
    Ok(())
}

/// Status to exit with when `err` came from the device
pub fn device_status(err: &anyhow::Error) -> Option<u32> {
    match err.downcast_ref::<DecoderError>() {
        Some(DecoderError::DeviceStatus(status)) => Some(*status),
        _ => None,
    }
}

/// Process exit code for a device status
///
/// Only the low byte of an exit code survives on Unix, so a status whose low
/// byte is zero still has to exit non-zero.
pub fn exit_code(status: u32) -> i32 {
    match status & 0xff {
        0 => 1,
        low => low as i32,
    }
}
