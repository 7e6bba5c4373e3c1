//! Serimon - Live Serial Telemetry Monitor
//!
//! Connects to a serial device (auto-detected or explicit), streams
//! newline-delimited numeric telemetry, and feeds a bounded display window
//! until interrupted or the connection is lost.

use clap::{Parser, ValueEnum};
use serimon_core::{
    is_bluetooth_serial, is_usb_serial, AppConfig, ConsoleDisplay, DisplaySink, MonitorConfig,
    PortDescriptor, PortEnumerator, SerialMonitor, SystemEnumerator,
};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Pacing delay between poll-loop iterations.
const PACING: Duration = Duration::from_millis(10);

/// Output format for port listings
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format for scripting
    Json,
    /// CSV format
    Csv,
}

/// Serimon CLI
#[derive(Parser, Debug)]
#[command(
    name = "serimon",
    author = "Serimon Team",
    version,
    about = "Live serial telemetry monitor",
    long_about = None
)]
struct Cli {
    /// Serial port (e.g. COM3 or /dev/ttyUSB0); auto-detects a USB or
    /// Bluetooth device when omitted
    #[arg(short, long)]
    port: Option<String>,

    /// Baud rate
    #[arg(short, long)]
    baud: Option<u32>,

    /// Display window size in samples
    #[arg(short, long)]
    window: Option<usize>,

    /// List detected serial ports with their classification and exit
    #[arg(long)]
    list_ports: bool,

    /// Output format for --list-ports
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });

    if cli.list_ports {
        if let Err(e) = list_ports(cli.format) {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
        return ExitCode::SUCCESS;
    }

    run_monitor(&cli, &config)
}

fn classification(port: &PortDescriptor) -> &'static str {
    if is_usb_serial(port) {
        "usb"
    } else if is_bluetooth_serial(port) {
        "bluetooth"
    } else {
        "unknown"
    }
}

fn list_ports(format: OutputFormat) -> anyhow::Result<()> {
    let ports = SystemEnumerator.enumerate();

    if ports.is_empty() {
        println!("No serial ports found.");
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            let json: Vec<serde_json::Value> = ports
                .iter()
                .map(|p| {
                    serde_json::json!({
                        "device": p.device,
                        "description": p.description,
                        "manufacturer": p.manufacturer,
                        "class": classification(p),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Csv => {
            println!("device,description,class");
            for port in &ports {
                println!("{},{},{}", port.device, port.description, classification(port));
            }
        }
        OutputFormat::Text => {
            println!("Available Serial Ports:");
            println!("{:-<60}", "");
            for port in &ports {
                println!(
                    "  {:<20} {:<10} {}",
                    port.device,
                    classification(port),
                    port.description
                );
            }
        }
    }

    Ok(())
}

fn run_monitor(cli: &Cli, config: &AppConfig) -> ExitCode {
    let port = cli.port.clone().or_else(|| config.default_port.clone());
    let baud = cli.baud.unwrap_or(config.default_baud);
    let window = cli.window.unwrap_or(config.default_window);

    match &port {
        Some(p) => info!("Connecting to specified port {} at {} baud...", p, baud),
        None => info!("Searching for USB or Bluetooth serial device at {} baud...", baud),
    }

    let mut monitor = SerialMonitor::new(MonitorConfig::new(port, baud));
    if let Err(e) = monitor.connect() {
        error!("{}", e);
        return ExitCode::FAILURE;
    }
    info!("Connected to {}", monitor.port().unwrap_or("serial port"));

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    }) {
        warn!("Failed to install Ctrl+C handler: {}", e);
    }

    let mut display = ConsoleDisplay::new(window);
    info!("Monitoring serial data. Press Ctrl+C to exit.");

    while running.load(Ordering::SeqCst) {
        match monitor.read_sample() {
            Ok(reading) => {
                let sample = reading.sample();
                display.update(sample.timestamp, sample.value);
            }
            Err(e) => {
                error!("{}", e);
                break;
            }
        }
        std::thread::sleep(PACING);
    }

    info!("Shutting down...");
    monitor.close();
    display.close();
    ExitCode::SUCCESS
}
