//! Recognition of `setdest` scheduling lines.
//!
//! Only one line shape is relevant:
//!
//! ```text
//! $ns_ at 12.5 "$node_(3) setdest 140.25 87.0 4.5"
//! ```
//!
//! Anything after the y coordinate is ignored, and any other line is skipped.
//! Fields are ASCII digits only; a value too large to be a finite `f64` is
//! a malformed field.

use super::error::{TraceError, TraceResult};
use crate::models::EntityId;
use regex::Regex;
use std::str::FromStr;

const SETDEST_PATTERN: &str =
    r#"\$ns_ at ([0-9]*\.[0-9]*) "\$node_\(([0-9]*)\) setdest ([0-9]*\.[0-9]*) ([0-9]*\.[0-9]*)"#;

/// A single movement command extracted from a trace line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetDest {
    pub time: f64,
    pub node: EntityId,
    pub x: f64,
    pub y: f64,
}

/// Matches trace lines against the `setdest` pattern.
pub struct LineParser {
    pattern: Regex,
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser {
    /// Create a parser with the compiled `setdest` pattern.
    pub fn new() -> Self {
        // The pattern is a constant, so compilation cannot fail at runtime.
        let pattern = Regex::new(SETDEST_PATTERN).expect("setdest pattern is valid");
        Self { pattern }
    }

    /// Parse one line.
    ///
    /// Returns `Ok(None)` for lines that do not match, and an error if the
    /// line matches but a captured field is not a valid number.
    /// `line_number` is 1-based and only used for error reporting.
    pub fn parse_line(&self, line: &str, line_number: usize) -> TraceResult<Option<SetDest>> {
        let Some(caps) = self.pattern.captures(line) else {
            return Ok(None);
        };

        let field = |index: usize| caps.get(index).map_or("", |m| m.as_str());

        Ok(Some(SetDest {
            time: parse_number(field(1), "time", line_number)?,
            node: parse_field(field(2), "node id", line_number)?,
            x: parse_number(field(3), "x", line_number)?,
            y: parse_number(field(4), "y", line_number)?,
        }))
    }
}

fn parse_field<T: FromStr>(raw: &str, field: &'static str, line: usize) -> TraceResult<T> {
    raw.parse().map_err(|_| malformed(raw, field, line))
}

/// Parses a time or coordinate. Overlong digit strings parse to infinity,
/// which is rejected.
fn parse_number(raw: &str, field: &'static str, line: usize) -> TraceResult<f64> {
    let value: f64 = parse_field(raw, field, line)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(malformed(raw, field, line))
    }
}

fn malformed(raw: &str, field: &'static str, line: usize) -> TraceError {
    TraceError::MalformedField {
        line,
        field,
        value: raw.to_string(),
    }
}
