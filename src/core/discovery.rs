//! Serial endpoint discovery and classification
//!
//! Enumerates the host port registry and classifies each candidate as a
//! direct USB-serial bridge or a Bluetooth-emulated endpoint, then picks the
//! best candidate for the monitor to open.

use serialport::{SerialPortInfo, SerialPortType};
use tracing::warn;

/// Description fragments that mark a direct USB-serial bridge.
const USB_DESCRIPTION_IDS: &[&str] = &["Arduino", "CH340", "USB Serial"];

/// Platform tty naming patterns for ACM/USB-modem devices.
const USB_DEVICE_PATTERNS: &[&str] = &["ttyACM", "ttyUSB", "usbmodem"];

/// Description fragments that mark a Bluetooth/RFCOMM endpoint.
const BLUETOOTH_DESCRIPTION_IDS: &[&str] = &["Bluetooth", "BT", "RFCOMM"];

/// A serial endpoint as reported by the host port registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortDescriptor {
    /// Device path or name (e.g. `/dev/ttyACM0`, `COM3`)
    pub device: String,
    /// Human-readable description from the registry
    pub description: String,
    /// Manufacturer string, when the registry reports one
    pub manufacturer: Option<String>,
}

impl PortDescriptor {
    /// Create a descriptor with no manufacturer metadata
    pub fn new(device: &str, description: &str) -> Self {
        Self {
            device: device.to_string(),
            description: description.to_string(),
            manufacturer: None,
        }
    }

    /// Set the manufacturer string
    #[must_use]
    pub fn manufacturer(mut self, manufacturer: &str) -> Self {
        self.manufacturer = Some(manufacturer.to_string());
        self
    }

    /// Build a descriptor from a `serialport` registry entry
    pub fn from_port_info(info: &SerialPortInfo) -> Self {
        let (description, manufacturer) = match &info.port_type {
            SerialPortType::UsbPort(usb) => (
                usb.product.clone().unwrap_or_default(),
                usb.manufacturer.clone(),
            ),
            SerialPortType::BluetoothPort => ("Bluetooth".to_string(), None),
            SerialPortType::PciPort | SerialPortType::Unknown => (String::new(), None),
        };

        Self {
            device: info.port_name.clone(),
            description,
            manufacturer,
        }
    }
}

/// Check whether a port looks like a direct USB-serial device.
///
/// Matches the description against known bridge-chip identifiers, the device
/// name against platform tty patterns, and the manufacturer field.
pub fn is_usb_serial(port: &PortDescriptor) -> bool {
    if USB_DESCRIPTION_IDS
        .iter()
        .any(|id| port.description.contains(id))
    {
        return true;
    }
    if USB_DEVICE_PATTERNS
        .iter()
        .any(|pattern| port.device.contains(pattern))
    {
        return true;
    }
    port.manufacturer
        .as_deref()
        .is_some_and(|m| m.contains("Arduino"))
}

/// Check whether a port looks like a Bluetooth-emulated serial device.
///
/// Not mutually exclusive with [`is_usb_serial`]; the selector checks the
/// USB classification first, so a port matching both counts as USB.
pub fn is_bluetooth_serial(port: &PortDescriptor) -> bool {
    BLUETOOTH_DESCRIPTION_IDS
        .iter()
        .any(|id| port.description.contains(id))
}

/// Source of enumeration snapshots.
#[cfg_attr(test, mockall::automock)]
pub trait PortEnumerator {
    /// List the serial endpoints currently present on the host.
    fn enumerate(&self) -> Vec<PortDescriptor>;
}

/// Enumerator backed by the host OS port registry.
///
/// Queries the registry on every call, so hot-plugged devices are visible on
/// the next enumeration. An enumeration failure is logged and yields an
/// empty snapshot.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEnumerator;

impl PortEnumerator for SystemEnumerator {
    fn enumerate(&self) -> Vec<PortDescriptor> {
        match serialport::available_ports() {
            Ok(ports) => ports.iter().map(PortDescriptor::from_port_info).collect(),
            Err(e) => {
                warn!("Failed to enumerate serial ports: {}", e);
                Vec::new()
            }
        }
    }
}

/// Pick the port the monitor should open.
///
/// An explicit port wins outright and is returned verbatim without checking
/// that it exists or is reachable; open-time validation reports a clear
/// error instead. Otherwise USB-classified ports are preferred over
/// Bluetooth-classified ones, first match in enumeration order within a
/// class. `None` means no candidate was found.
pub fn select_port(explicit: Option<&str>, enumerator: &dyn PortEnumerator) -> Option<String> {
    if let Some(port) = explicit {
        return Some(port.to_string());
    }

    let ports = enumerator.enumerate();

    ports
        .iter()
        .find(|p| is_usb_serial(p))
        .or_else(|| ports.iter().find(|p| is_bluetooth_serial(p)))
        .map(|p| p.device.clone())
}
