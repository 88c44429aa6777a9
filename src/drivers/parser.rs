//! Line classification for the telemetry stream.
//!
//! The device prints three kinds of lines: a CSV header, CSV rows of
//! `voltage,current,power`, and an occasional summary such as
//! `Time to encrypt : 534.894 ms`. `classify` is pure; applying the result
//! to the buffers happens in [`crate::drivers::state`].
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::Sample;

static ENCRYPT_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Time\s+to\s+encrypt\s*[:-]?\s*([\d.]+)\s*ms")
        .unwrap_or_else(|err| panic!("marker pattern is a valid regex: {err}"))
});

/// Substrings that identify a header or banner line.
pub const HEADER_TOKENS: [&str; 3] = ["Voltage", "Current", "Power"];

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LineKind {
    /// Elapsed encryption time in milliseconds.
    Marker(f64),
    Header,
    Data(Sample),
    /// Anything that could not be used, including a marker whose value failed to parse.
    Malformed,
}

/// Classifies a trimmed line. First match wins: marker, header, CSV data.
pub fn classify(line: &str) -> LineKind {
    if let Some(caps) = ENCRYPT_MARKER.captures(line) {
        // A marker that fails to parse is consumed here, never re-read as data.
        return match caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok()) {
            Some(ms) if ms.is_finite() => LineKind::Marker(ms),
            _ => LineKind::Malformed,
        };
    }
    if HEADER_TOKENS.iter().any(|tok| line.contains(tok)) {
        return LineKind::Header;
    }
    if line.contains(',') {
        return parse_csv(line).map_or(LineKind::Malformed, LineKind::Data);
    }
    LineKind::Malformed
}

fn parse_csv(line: &str) -> Option<Sample> {
    let mut fields = line.split(',').map(str::trim);
    let voltage = parse_field(fields.next()?)?;
    let current = parse_field(fields.next()?)?;
    let power = parse_field(fields.next()?)?;
    Some(Sample::new(voltage, current, power))
}

fn parse_field(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|v| v.is_finite())
}
