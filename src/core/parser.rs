//! Line decoding for the telemetry stream
//!
//! One sample per line: UTF-8 text holding a single float literal. The
//! decode step is pure, and rejection reasons are typed so the reader can
//! log them without tearing anything down.

use std::fmt;

/// Why a line was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedLine {
    /// Nothing but whitespace
    Empty,
    /// Bytes were not valid UTF-8
    InvalidUtf8,
    /// Text did not parse as a float literal
    NotNumeric(String),
}

impl fmt::Display for MalformedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty line"),
            Self::InvalidUtf8 => write!(f, "invalid UTF-8"),
            Self::NotNumeric(text) => write!(f, "not a number: {text:?}"),
        }
    }
}

/// Decode one raw line into a float value.
///
/// Strips surrounding whitespace (including the `\r` of CRLF endings)
/// before parsing.
pub fn decode_line(raw: &[u8]) -> Result<f64, MalformedLine> {
    let text = std::str::from_utf8(raw).map_err(|_| MalformedLine::InvalidUtf8)?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(MalformedLine::Empty);
    }
    trimmed
        .parse()
        .map_err(|_| MalformedLine::NotNumeric(trimmed.to_string()))
}
