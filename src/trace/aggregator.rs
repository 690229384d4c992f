//! Per-node aggregation over a mobility trace.
//!
//! A [`TraceAggregator`] is built by one sequential pass over a trace and is
//! read-only afterwards. It answers per-node queries (activity window and
//! spatial bounds) and aggregate queries (simulation time, spatial ranges and
//! the active-node time series).

use super::error::{TraceError, TraceResult};
use super::parser::{LineParser, SetDest};
use crate::models::{EntityId, NodeRecord, TraceSummary};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, trace};

/// Upper bound on the number of points in an active-count series.
pub const MAX_SERIES_SAMPLES: u64 = 10_000_000;

/// Activity windows and spatial bounds of every node in one trace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraceAggregator {
    nodes: BTreeMap<EntityId, NodeRecord>,
}

impl TraceAggregator {
    /// Parse the trace file at `path`.
    ///
    /// The file is closed before this returns, on success and on error.
    pub fn from_path(path: &Path) -> TraceResult<Self> {
        let file = File::open(path).map_err(|source| TraceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_reader(BufReader::new(file)).map_err(|e| match e {
            TraceError::Io { source, .. } => TraceError::Io {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parse a trace from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> TraceResult<Self> {
        let parser = LineParser::new();
        let mut aggregator = Self::default();
        let mut matched = 0usize;

        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| TraceError::Io {
                path: Default::default(),
                source,
            })?;
            let line_number = index + 1;

            match parser.parse_line(&line, line_number)? {
                Some(cmd) => {
                    aggregator.apply(cmd);
                    matched += 1;
                }
                None => trace!("Skipping line {}", line_number),
            }
        }

        debug!(
            "Matched {} setdest lines for {} nodes",
            matched,
            aggregator.node_count()
        );

        Ok(aggregator)
    }

    /// Parse a trace held in memory.
    #[allow(dead_code)] // Used by tests and in-memory callers
    pub fn parse_str(content: &str) -> TraceResult<Self> {
        Self::from_reader(content.as_bytes())
    }

    fn apply(&mut self, cmd: SetDest) {
        self.nodes
            .entry(cmd.node)
            .and_modify(|record| record.observe(cmd.time, cmd.x, cmd.y))
            .or_insert_with(|| NodeRecord::first_sighting(cmd.time, cmd.x, cmd.y));
    }

    /// Number of distinct nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// True if no `setdest` line was found.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = (EntityId, &NodeRecord)> + '_ {
        self.nodes.iter().map(|(id, record)| (*id, record))
    }

    /// Latest exit time over all nodes.
    pub fn simulation_time(&self) -> TraceResult<f64> {
        self.nodes
            .values()
            .map(|r| r.window.exit_time)
            .reduce(f64::max)
            .ok_or(TraceError::EmptyTrace)
    }

    /// `(min, max)` of the x coordinate over all nodes.
    pub fn simulation_x_range(&self) -> TraceResult<(f64, f64)> {
        self.range_of(|r| r.x.as_pair())
    }

    /// `(min, max)` of the y coordinate over all nodes.
    pub fn simulation_y_range(&self) -> TraceResult<(f64, f64)> {
        self.range_of(|r| r.y.as_pair())
    }

    fn range_of(&self, axis: impl Fn(&NodeRecord) -> (f64, f64)) -> TraceResult<(f64, f64)> {
        self.nodes
            .values()
            .map(axis)
            .reduce(|(lo, hi), (min, max)| (lo.min(min), hi.max(max)))
            .ok_or(TraceError::EmptyTrace)
    }

    /// Number of nodes whose activity window contains `tau` (inclusive).
    pub fn active_count(&self, tau: f64) -> usize {
        self.nodes
            .values()
            .filter(|r| r.window.contains(tau))
            .count()
    }

    /// Active-node count at every whole second from 0 to the simulation time.
    pub fn active_count_series(&self) -> TraceResult<Vec<(u64, usize)>> {
        let last = sample_count(self.simulation_time()?, 1.0)?;
        Ok((0..=last)
            .map(|second| (second, self.active_count(second as f64)))
            .collect())
    }

    /// Active-node count sampled every `step` seconds from 0 to the
    /// simulation time.
    #[allow(dead_code)] // Charts sample whole seconds
    pub fn active_count_series_with_step(&self, step: f64) -> TraceResult<Vec<(f64, usize)>> {
        if !step.is_finite() || step <= 0.0 {
            return Err(TraceError::InvalidStep(step));
        }
        let samples = sample_count(self.simulation_time()?, step)?;
        Ok((0..=samples)
            .map(|i| {
                let tau = i as f64 * step;
                (tau, self.active_count(tau))
            })
            .collect())
    }

    /// Aggregate statistics for reporting, labelled with `file`.
    pub fn summary(&self, file: &Path) -> TraceResult<TraceSummary> {
        Ok(TraceSummary {
            file: file.display().to_string(),
            node_count: self.node_count(),
            simulation_time: self.simulation_time()?,
            x_range: self.simulation_x_range()?,
            y_range: self.simulation_y_range()?,
        })
    }
}

// Per-node lookups. The batch driver only needs the aggregates, but these
// are part of the query surface renderers and tests rely on.
#[allow(dead_code)]
impl TraceAggregator {
    /// The record of one node, if it was seen.
    pub fn node(&self, id: EntityId) -> Option<&NodeRecord> {
        self.nodes.get(&id)
    }

    fn lookup(&self, id: EntityId) -> TraceResult<&NodeRecord> {
        self.nodes.get(&id).ok_or(TraceError::UnknownNode(id))
    }

    pub fn entry_time(&self, id: EntityId) -> TraceResult<f64> {
        Ok(self.lookup(id)?.window.entry_time)
    }

    pub fn exit_time(&self, id: EntityId) -> TraceResult<f64> {
        Ok(self.lookup(id)?.window.exit_time)
    }

    pub fn min_x(&self, id: EntityId) -> TraceResult<f64> {
        Ok(self.lookup(id)?.x.min)
    }

    pub fn max_x(&self, id: EntityId) -> TraceResult<f64> {
        Ok(self.lookup(id)?.x.max)
    }

    pub fn min_y(&self, id: EntityId) -> TraceResult<f64> {
        Ok(self.lookup(id)?.y.min)
    }

    pub fn max_y(&self, id: EntityId) -> TraceResult<f64> {
        Ok(self.lookup(id)?.y.max)
    }
}

/// Index of the last sample in a series over `[0, end]` at `step`.
fn sample_count(end: f64, step: f64) -> TraceResult<u64> {
    let last = (end / step).floor();
    if last.is_finite() && last < MAX_SERIES_SAMPLES as f64 {
        Ok(last as u64)
    } else {
        Err(TraceError::SeriesTooLong {
            end,
            step,
            limit: MAX_SERIES_SAMPLES,
        })
    }
}
