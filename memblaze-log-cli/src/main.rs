//! Memblaze Log CLI Application
//!
//! Command-line front end for the memblaze-log-decoder library. It adds:
//! - One sub-command per vendor log page and for the latency feature
//! - A TOML configuration file
//! - A capture directory standing in for the device
//! - Logging setup and exit status handling

use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand};
use memblaze_log_decoder::transport::validate_duration;
use memblaze_log_decoder::{LatencyMonitorSettings, PageKind, TimestampZone};
use std::io;
use std::path::PathBuf;

mod capture;
mod commands;
mod config;

use capture::CaptureDir;
use commands::Session;
use config::{AppConfig, OutputFormat};

/// Memblaze log reader - decode Memblaze NVMe vendor log pages
#[derive(Parser, Debug)]
#[command(name = "memblaze-log")]
#[command(about = "Decode Memblaze NVMe vendor log pages", long_about = None)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long, value_enum, global = true)]
    output_format: Option<OutputFormat>,

    /// Print timestamps in UTC instead of local time
    #[arg(long, global = true)]
    utc: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Retrieve the additional SMART log
    SmartLogAdd(PageArgs),
    /// Retrieve the latency statistics log
    LatStatsPrint(PageArgs),
    /// Retrieve the high latency log
    LatLogPrint(PageArgs),
    /// Retrieve the performance statistics log
    PerfStatsPrint {
        #[command(flatten)]
        page: PageArgs,

        /// [1-24] hours of statistics to print (default: 1)
        #[arg(short, long)]
        duration: Option<u32>,
    },
    /// Get the latency monitor feature
    LatGetFeature(DeviceArgs),
    /// Set the latency monitor feature
    LatSetFeature {
        #[command(flatten)]
        device: DeviceArgs,

        /// Features to turn on: bit 0 latency statistics, bit 1 high latency log,
        /// bit 2 performance stat
        #[arg(short = 's', long = "sel-perf-log", default_value_t = 0)]
        enable_mask: u32,

        /// Commands to monitor: bit 0 read, bit 1 write, bit 2 trim
        /// (trim is ignored by performance stat)
        #[arg(short = 'm', long = "set-commands-mask", default_value_t = 0)]
        command_mask: u32,

        /// Read high latency threshold, 0-based in units of 10ms
        #[arg(short = 'r', long = "set-read-threshold", default_value_t = 0)]
        read_threshold: u32,

        /// Write high latency threshold, 0-based in units of 10ms
        #[arg(short = 'w', long = "set-write-threshold", default_value_t = 0)]
        write_threshold: u32,

        /// Trim high latency threshold, 0-based in units of 10ms
        #[arg(short = 't', long = "set-trim-threshold", default_value_t = 0)]
        trim_threshold: u32,
    },
}

#[derive(ClapArgs, Debug)]
struct DeviceArgs {
    /// Capture directory of the device
    #[arg(value_name = "DEVICE")]
    device: PathBuf,
}

#[derive(ClapArgs, Debug)]
struct PageArgs {
    #[command(flatten)]
    device: DeviceArgs,

    /// Dump the whole log buffer in binary format
    #[arg(short = 'b', long)]
    raw_binary: bool,
}

impl Command {
    fn device(&self) -> &DeviceArgs {
        match self {
            Command::SmartLogAdd(page)
            | Command::LatStatsPrint(page)
            | Command::LatLogPrint(page)
            | Command::PerfStatsPrint { page, .. } => &page.device,
            Command::LatGetFeature(device) | Command::LatSetFeature { device, .. } => device,
        }
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::debug!("Memblaze Log CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using decoder library v{}", memblaze_log_decoder::VERSION);

    if let Err(err) = run(&args) {
        if let Some(status) = commands::device_status(&err) {
            eprintln!("NVMe status: {:#x}", status);
            std::process::exit(commands::exit_code(status));
        }
        return Err(err);
    }
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let app_config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    // A bad duration is rejected before the device is even opened
    let perf_hours = match &args.command {
        Command::PerfStatsPrint { duration, .. } => {
            let hours = duration.unwrap_or(app_config.performance.duration);
            validate_duration(hours)?;
            hours
        }
        _ => app_config.performance.duration,
    };

    let mut capture = CaptureDir::open(&args.command.device().device)?;
    let session = build_session(args, &app_config, &capture);
    let mut out = io::stdout().lock();

    match &args.command {
        Command::SmartLogAdd(page) => commands::print_fixed_page(
            &session,
            &mut capture,
            PageKind::SmartLogAdd,
            page.raw_binary,
            &mut out,
        ),
        Command::LatStatsPrint(page) => commands::print_fixed_page(
            &session,
            &mut capture,
            PageKind::LatencyStatistics,
            page.raw_binary,
            &mut out,
        ),
        Command::LatLogPrint(page) => commands::print_fixed_page(
            &session,
            &mut capture,
            PageKind::HighLatencyLog,
            page.raw_binary,
            &mut out,
        ),
        Command::PerfStatsPrint { page, .. } => commands::print_perf_stats(
            &session,
            &mut capture,
            perf_hours,
            page.raw_binary,
            &mut out,
        ),
        Command::LatGetFeature(_) => commands::get_latency_feature(&session, &mut capture, &mut out),
        Command::LatSetFeature {
            enable_mask,
            command_mask,
            read_threshold,
            write_threshold,
            trim_threshold,
            ..
        } => {
            let settings = LatencyMonitorSettings {
                enable_mask: *enable_mask,
                command_mask: *command_mask,
                read_threshold: *read_threshold,
                write_threshold: *write_threshold,
                trim_threshold: *trim_threshold,
            };
            commands::set_latency_feature(&mut capture, &settings, &mut out)
        }
    }
}

/// Merge the configuration file with command-line flags; flags win
fn build_session(args: &Args, app_config: &AppConfig, capture: &CaptureDir) -> Session {
    let mut decoder_config = app_config.decoder_config();
    if args.utc {
        decoder_config = decoder_config.with_timestamp_zone(TimestampZone::Utc);
    }

    Session {
        device_name: app_config
            .device
            .name
            .clone()
            .unwrap_or_else(|| capture.device_name()),
        decoder_config,
        format: args.output_format.unwrap_or(app_config.output.format),
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set_feature_flags() {
        let args = Args::parse_from([
            "memblaze-log",
            "lat-set-feature",
            "/dev/nvme0",
            "-s",
            "7",
            "-m",
            "3",
            "-r",
            "9",
            "-t",
            "2",
        ]);
        match args.command {
            Command::LatSetFeature {
                enable_mask,
                command_mask,
                read_threshold,
                write_threshold,
                trim_threshold,
                ..
            } => {
                assert_eq!(enable_mask, 7);
                assert_eq!(command_mask, 3);
                assert_eq!(read_threshold, 9);
                assert_eq!(write_threshold, 0);
                assert_eq!(trim_threshold, 2);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from([
            "memblaze-log",
            "perf-stats-print",
            "-b",
            "--duration",
            "5",
            "--utc",
            "-o",
            "json",
            "/tmp",
        ]);
        let capture = CaptureDir::open(std::path::Path::new("/tmp")).unwrap();
        let mut app_config = AppConfig::default();
        app_config.device.name = Some("nvme3".to_string());

        let session = build_session(&args, &app_config, &capture);
        assert_eq!(session.device_name, "nvme3");
        assert_eq!(session.format, OutputFormat::Json);
        assert_eq!(session.decoder_config.timestamp_zone, TimestampZone::Utc);

        match args.command {
            Command::PerfStatsPrint { page, duration } => {
                assert!(page.raw_binary);
                assert_eq!(duration, Some(5));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_bad_duration_checked_before_device_open() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nvme9");
        let args = Args::parse_from([
            "memblaze-log",
            "perf-stats-print",
            "-d",
            "0",
            missing.to_str().unwrap(),
        ]);

        let err = run(&args).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<memblaze_log_decoder::DecoderError>(),
            Some(memblaze_log_decoder::DecoderError::InvalidParameter(_))
        ));
    }
}
