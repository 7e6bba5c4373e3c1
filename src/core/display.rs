//! Bounded display buffer and sink boundary
//!
//! The monitor core hands `(timestamp, value)` pairs to a [`DisplaySink`];
//! ordering and cadence are the contract, rendering is not. The bundled
//! [`ConsoleDisplay`] prints samples and keeps the bounded window a plotting
//! surface would draw from.

use std::collections::VecDeque;
use tracing::info;

/// Single data point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataPoint {
    /// Timestamp
    pub x: f64,
    /// Value
    pub y: f64,
}

impl DataPoint {
    /// Create a point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Receiver of the sample stream.
///
/// `update` is called once per produced sample, zero-value sentinels
/// included; `close` is called once during shutdown and must be idempotent.
pub trait DisplaySink {
    /// Consume one sample
    fn update(&mut self, timestamp: f64, value: f64);

    /// Release the rendering surface
    fn close(&mut self);
}

/// Bounded window of recent data points.
#[derive(Debug, Clone)]
pub struct WindowBuffer {
    points: VecDeque<DataPoint>,
    window_size: usize,
}

impl WindowBuffer {
    /// Create a buffer holding at most `window_size` points
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            points: VecDeque::with_capacity(window_size),
            window_size,
        }
    }

    /// Append a point, evicting the oldest beyond the window
    pub fn push(&mut self, x: f64, y: f64) {
        self.points.push_back(DataPoint::new(x, y));
        while self.points.len() > self.window_size {
            self.points.pop_front();
        }
    }

    /// All buffered points, oldest first
    pub fn points(&self) -> &VecDeque<DataPoint> {
        &self.points
    }

    /// Latest value
    pub fn last_value(&self) -> Option<f64> {
        self.points.back().map(|p| p.y)
    }

    /// Min/max of buffered values
    pub fn y_range(&self) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }

        let mut min = f64::MAX;
        let mut max = f64::MIN;
        for point in &self.points {
            min = min.min(point.y);
            max = max.max(point.y);
        }
        Some((min, max))
    }

    /// First and last buffered timestamps
    pub fn time_range(&self) -> Option<(f64, f64)> {
        let first = self.points.front()?.x;
        let last = self.points.back()?.x;
        Some((first, last))
    }

    /// Configured window size
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Point count
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the buffer holds no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Drop all points
    pub fn clear(&mut self) {
        self.points.clear();
    }
}

/// Console-backed display sink.
///
/// Prints one line per sample with the time axis rebased to the first
/// sample, the way a live plot would label it. Status output goes to the
/// log; sample lines go to stdout so they can be piped.
pub struct ConsoleDisplay {
    buffer: WindowBuffer,
    origin: Option<f64>,
    samples_seen: u64,
    closed: bool,
}

impl ConsoleDisplay {
    /// Create a display with the given window size
    pub fn new(window_size: usize) -> Self {
        Self {
            buffer: WindowBuffer::new(window_size),
            origin: None,
            samples_seen: 0,
            closed: false,
        }
    }

    /// The underlying window buffer
    pub fn buffer(&self) -> &WindowBuffer {
        &self.buffer
    }
}

impl DisplaySink for ConsoleDisplay {
    fn update(&mut self, timestamp: f64, value: f64) {
        let origin = *self.origin.get_or_insert(timestamp);
        self.buffer.push(timestamp, value);
        self.samples_seen += 1;
        println!("{:10.3}  {:>14.4}", timestamp - origin, value);
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        info!("Display closed after {} samples", self.samples_seen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_evicts_oldest_points() {
        let mut buffer = WindowBuffer::new(3);
        for i in 0..10 {
            buffer.push(f64::from(i), f64::from(i));
        }

        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.points().front().map(|p| p.x), Some(7.0));
        assert_eq!(buffer.last_value(), Some(9.0));
    }

    #[test]
    fn buffer_reports_ranges() {
        let mut buffer = WindowBuffer::new(10);
        buffer.push(1.0, 10.0);
        buffer.push(2.0, 50.0);
        buffer.push(3.0, 30.0);

        assert_eq!(buffer.y_range(), Some((10.0, 50.0)));
        assert_eq!(buffer.time_range(), Some((1.0, 3.0)));
    }

    #[test]
    fn empty_buffer_has_no_ranges() {
        let buffer = WindowBuffer::new(4);
        assert!(buffer.is_empty());
        assert_eq!(buffer.y_range(), None);
        assert_eq!(buffer.time_range(), None);
        assert_eq!(buffer.last_value(), None);
    }

    #[test]
    fn zero_window_is_clamped_to_one() {
        let mut buffer = WindowBuffer::new(0);
        buffer.push(1.0, 1.0);
        buffer.push(2.0, 2.0);
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.last_value(), Some(2.0));
    }

    #[test]
    fn display_keeps_the_window_bounded() {
        let mut display = ConsoleDisplay::new(2);
        display.update(1.0, 5.0);
        display.update(2.0, 6.0);
        display.update(3.0, 7.0);

        assert_eq!(display.buffer().len(), 2);
        assert_eq!(display.buffer().last_value(), Some(7.0));
    }

    #[test]
    fn display_close_is_idempotent() {
        let mut display = ConsoleDisplay::new(2);
        display.update(1.0, 5.0);
        display.close();
        display.close();
    }
}
