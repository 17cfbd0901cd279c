//! Parser for `unbound-control stats` output.
//!
//! The output is one `name=value` pair per line, e.g.
//!
//! ```text
//! total.num.queries=42
//! total.num.cachehits=10
//! total.recursion.time.avg=0.013370
//! ```
//!
//! Lines that do not fit are skipped and logged; they never abort the parse.

use tracing::warn;

use super::{error::CollectorError, types::CollectorResult};
use crate::core::payload::Metric;

const LOCATION: &str = "unbound-control output";

/// Metrics extracted from one run, in output order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedStats {
    pub metrics: Vec<Metric>,
    /// Number of non-blank lines that were rejected.
    pub skipped: usize,
}

/// Parses a single line into a metric. Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// `InvalidFormat` when the line has no `=`, an empty name, or an empty value;
/// `ParseError` when the value is not a finite `f64`.
pub fn parse_line(line: &str) -> CollectorResult<Option<Metric>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (name, value) = line
        .split_once('=')
        .ok_or_else(|| CollectorError::InvalidFormat {
            location: LOCATION.to_string(),
            reason: format!("missing '=' in line {:?}", line),
        })?;
    let (name, value) = (name.trim(), value.trim());

    if name.is_empty() || value.is_empty() {
        return Err(CollectorError::InvalidFormat {
            location: LOCATION.to_string(),
            reason: format!("empty name or value in line {:?}", line),
        });
    }

    let parsed = value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CollectorError::ParseError {
            metric: name.to_string(),
            location: LOCATION.to_string(),
            reason: format!("{:?} is not a finite number", value),
        })?;

    Ok(Some(Metric::cumulative_count(name, parsed)))
}

/// Parses the whole output, skipping (and logging) every malformed line.
pub fn parse_stats(output: &str) -> ParsedStats {
    let mut stats = ParsedStats::default();

    for (index, line) in output.lines().enumerate() {
        match parse_line(line) {
            Ok(Some(metric)) => stats.metrics.push(metric),
            Ok(None) => {}
            Err(e) => {
                warn!("Skipping line {}: {}", index + 1, e);
                stats.skipped += 1;
            }
        }
    }

    stats
}
