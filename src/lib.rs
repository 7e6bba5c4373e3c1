//! # Serimon Core Library
//!
//! A live serial telemetry monitor library:
//! - Serial endpoint discovery (USB-serial bridges preferred over
//!   Bluetooth-emulated ports)
//! - Resilient streaming reads with typed transport-loss detection
//! - Newline-delimited float parsing with malformed-input tolerance
//! - A bounded display sink boundary
//!
//! ## Example
//!
//! ```rust,no_run
//! use serimon_core::{ConsoleDisplay, DisplaySink, MonitorConfig, SerialMonitor};
//!
//! fn main() -> Result<(), serimon_core::MonitorError> {
//!     let mut monitor = SerialMonitor::new(MonitorConfig::default());
//!     monitor.connect()?;
//!
//!     let mut display = ConsoleDisplay::new(100);
//!     let reading = monitor.read_sample()?;
//!     let sample = reading.sample();
//!     display.update(sample.timestamp, sample.value);
//!
//!     monitor.close();
//!     display.close();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod core;

// Re-exports for convenience
pub use crate::config::AppConfig;
pub use crate::core::discovery::{
    is_bluetooth_serial, is_usb_serial, select_port, PortDescriptor, PortEnumerator,
    SystemEnumerator,
};
pub use crate::core::display::{ConsoleDisplay, DataPoint, DisplaySink, WindowBuffer};
pub use crate::core::monitor::{
    ConnectionState, MonitorConfig, MonitorError, Reading, Sample, SerialMonitor, READ_TIMEOUT,
};
pub use crate::core::parser::MalformedLine;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
