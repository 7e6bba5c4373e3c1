//! Serial connection lifecycle and sample reading
//!
//! [`SerialMonitor`] owns a single serial endpoint: it resolves the port via
//! discovery, opens it, reads newline-delimited samples, detects transport
//! loss, and closes the handle. All reads funnel through one owner so the
//! physical device is never read from two call sites at once.

use crate::core::discovery::{select_port, PortEnumerator, SystemEnumerator};
use crate::core::parser::{self, MalformedLine};
use std::io;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};

/// Bounded read timeout on the open port.
///
/// Caps the wait for bytes of an unterminated line and doubles as the
/// mechanism by which a stalled device surfaces as a fault instead of a hang.
pub const READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Connection state of a [`SerialMonitor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Not connected
    #[default]
    Disconnected,
    /// Connected and readable
    Connected,
}

/// Monitor error types
#[derive(Error, Debug)]
pub enum MonitorError {
    /// No USB or Bluetooth serial candidate was found at startup
    #[error("no USB or Bluetooth serial device found")]
    NoDeviceFound,

    /// The endpoint could not be opened (permissions, busy, nonexistent)
    #[error("error connecting to {port}: {source}")]
    OpenFailed {
        /// Port that failed to open
        port: String,
        /// Underlying open failure
        source: serialport::Error,
    },

    /// Read attempted while not connected
    #[error("serial port not connected")]
    NotConnected,

    /// I/O fault on an already-open connection
    #[error("lost connection to {port}: {source}")]
    ConnectionLost {
        /// Port the connection was lost on
        port: String,
        /// Underlying I/O fault
        source: io::Error,
    },
}

/// Serial monitor configuration
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Explicit port name; auto-detect when `None`
    pub port: Option<String>,
    /// Baud rate
    pub baud_rate: u32,
}

impl MonitorConfig {
    /// Create a monitor configuration
    pub fn new(port: Option<String>, baud_rate: u32) -> Self {
        Self { port, baud_rate }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::new(None, 9600)
    }
}

/// Narrow seam between the monitor and an open serial handle.
pub trait SerialLink: Send {
    /// Number of bytes waiting in the receive buffer
    fn bytes_available(&mut self) -> io::Result<u32>;

    /// Read into `buf`, blocking up to the port timeout
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Link over an OS serial handle.
struct PortLink(Box<dyn serialport::SerialPort>);

impl SerialLink for PortLink {
    fn bytes_available(&mut self) -> io::Result<u32> {
        self.0.bytes_to_read().map_err(io::Error::from)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io::Read::read(&mut self.0, buf)
    }
}

/// Monotonic capture-time clock anchored at monitor creation.
#[derive(Debug, Clone, Copy)]
struct MonotonicClock(Instant);

impl MonotonicClock {
    fn start() -> Self {
        Self(Instant::now())
    }

    fn now(&self) -> f64 {
        self.0.elapsed().as_secs_f64()
    }
}

/// One telemetry reading forwarded to the display sink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Capture time in seconds, monotonically non-decreasing
    pub timestamp: f64,
    /// Parsed value (0.0 for the no-data and malformed sentinels)
    pub value: f64,
}

impl Sample {
    /// Create a sample
    pub fn new(timestamp: f64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Outcome of one read cycle.
///
/// Every variant carries the sample handed to the display sink; the variant
/// tells the caller how it was produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    /// A line parsed as a float
    Value(Sample),
    /// No bytes were waiting; zero-value sentinel
    Idle(Sample),
    /// A line was rejected; zero-value substitute
    Malformed {
        /// Offending line content, lossily decoded
        line: String,
        /// Why the line was rejected
        reason: MalformedLine,
        /// Substitute sample
        sample: Sample,
    },
}

impl Reading {
    /// The sample to forward to the display sink
    pub fn sample(&self) -> Sample {
        match self {
            Self::Value(sample) | Self::Idle(sample) => *sample,
            Self::Malformed { sample, .. } => *sample,
        }
    }
}

/// Owner of one serial endpoint.
///
/// At most one handle is open per monitor at any time. The API is
/// `&mut self` throughout; an implementation that moves I/O to a background
/// task must wrap the whole monitor, not its parts.
pub struct SerialMonitor {
    config: MonitorConfig,
    enumerator: Box<dyn PortEnumerator>,
    port: Option<String>,
    link: Option<Box<dyn SerialLink>>,
    state: ConnectionState,
    clock: MonotonicClock,
}

impl SerialMonitor {
    /// Create a monitor backed by the host port registry
    pub fn new(config: MonitorConfig) -> Self {
        Self::with_enumerator(config, Box::new(SystemEnumerator))
    }

    /// Create a monitor with a custom enumeration source
    pub fn with_enumerator(config: MonitorConfig, enumerator: Box<dyn PortEnumerator>) -> Self {
        Self {
            config,
            enumerator,
            port: None,
            link: None,
            state: ConnectionState::Disconnected,
            clock: MonotonicClock::start(),
        }
    }

    /// Resolved port name, once known
    pub fn port(&self) -> Option<&str> {
        self.port.as_deref()
    }

    /// Current connection state
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Whether the monitor holds an open connection
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Open the serial endpoint.
    ///
    /// Resolves the port via discovery when none was configured. Does not
    /// retry on failure; the caller decides whether to restart the whole
    /// startup.
    pub fn connect(&mut self) -> Result<(), MonitorError> {
        let port = match self.config.port.clone() {
            Some(port) => port,
            None => {
                let port = select_port(None, self.enumerator.as_ref())
                    .ok_or(MonitorError::NoDeviceFound)?;
                info!("Auto-detected port: {}", port);
                port
            }
        };

        let handle = serialport::new(&port, self.config.baud_rate)
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|source| MonitorError::OpenFailed {
                port: port.clone(),
                source,
            })?;

        self.link = Some(Box::new(PortLink(handle)));
        self.port = Some(port);
        self.state = ConnectionState::Connected;
        Ok(())
    }

    /// Close the connection.
    ///
    /// Idempotent: safe when already closed or never opened, and safe after
    /// the device has vanished.
    pub fn close(&mut self) {
        if self.link.take().is_some() {
            info!("Closed {}", self.port.as_deref().unwrap_or("serial port"));
        }
        self.state = ConnectionState::Disconnected;
    }

    /// Read one sample.
    ///
    /// Returns immediately with an idle sentinel when no bytes are waiting.
    /// A malformed line is logged and substituted with a zero-value sample
    /// without touching the connection; only a transport fault transitions
    /// the monitor to [`ConnectionState::Disconnected`].
    pub fn read_sample(&mut self) -> Result<Reading, MonitorError> {
        if self.state != ConnectionState::Connected {
            return Err(MonitorError::NotConnected);
        }
        let link = self.link.as_mut().ok_or(MonitorError::NotConnected)?;

        let polled = Self::poll_line(link.as_mut());
        let stamp = self.clock.now();

        match polled {
            Ok(None) => Ok(Reading::Idle(Sample::new(stamp, 0.0))),
            Ok(Some(raw)) => match parser::decode_line(&raw) {
                Ok(value) => Ok(Reading::Value(Sample::new(stamp, value))),
                Err(reason) => {
                    let line = String::from_utf8_lossy(&raw).trim().to_string();
                    warn!("Invalid data received ({}): {:?}", reason, line);
                    Ok(Reading::Malformed {
                        line,
                        reason,
                        sample: Sample::new(stamp, 0.0),
                    })
                }
            },
            Err(source) => Err(self.lose_connection(source)),
        }
    }

    /// Drain one line if bytes are pending.
    ///
    /// `Ok(None)` means nothing was waiting. A timeout mid-line yields the
    /// truncated prefix; a zero-length read means the device is gone.
    fn poll_line(link: &mut dyn SerialLink) -> io::Result<Option<Vec<u8>>> {
        if link.bytes_available()? == 0 {
            return Ok(None);
        }

        let mut raw = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            match link.read(&mut byte) {
                Ok(0) => return Err(io::Error::from(io::ErrorKind::UnexpectedEof)),
                Ok(_) => {
                    if byte[0] == b'\n' {
                        break;
                    }
                    raw.push(byte[0]);
                }
                Err(e) if e.kind() == io::ErrorKind::TimedOut => break,
                Err(e) => return Err(e),
            }
        }
        Ok(Some(raw))
    }

    fn lose_connection(&mut self, source: io::Error) -> MonitorError {
        self.link = None;
        self.state = ConnectionState::Disconnected;
        MonitorError::ConnectionLost {
            port: self.port.clone().unwrap_or_default(),
            source,
        }
    }
}
