//! Errors raised while parsing and querying a mobility trace.

use crate::models::EntityId;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for trace parsing and aggregate queries.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The trace file could not be opened or read.
    #[error("failed to read trace {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A `setdest` line matched but one of its numeric fields did not parse.
    #[error("line {line}: malformed {field} field {value:?}")]
    MalformedField {
        line: usize,
        field: &'static str,
        value: String,
    },

    /// A query referenced a node that never appeared in the trace.
    #[error("unknown node id {0}")]
    UnknownNode(EntityId),

    /// An aggregate query was made on a trace with no `setdest` lines.
    #[error("trace contains no node movements")]
    EmptyTrace,

    /// The time-series resolution was not a positive finite number.
    #[error("invalid time step {0}")]
    InvalidStep(f64),

    /// The time series would need more samples than can be held.
    #[error("time series over {end}s at step {step}s exceeds {limit} samples")]
    SeriesTooLong { end: f64, step: f64, limit: u64 },
}

pub type TraceResult<T> = std::result::Result<T, TraceError>;
