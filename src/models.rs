//! Data models for trace aggregation.
//!
//! This module contains the per-node value records built while parsing a
//! mobility trace, plus the serializable summaries written to reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a simulated node (`$node_(<id>)`).
pub type EntityId = u32;

/// Time interval during which a node has recorded movement commands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivityWindow {
    /// Timestamp of the first `setdest` seen for the node.
    pub entry_time: f64,
    /// Timestamp of the latest `setdest` seen for the node.
    pub exit_time: f64,
}

impl ActivityWindow {
    /// Creates a window that starts and ends at `time`.
    pub fn starting_at(time: f64) -> Self {
        Self {
            entry_time: time,
            exit_time: time,
        }
    }

    /// Moves the exit time to `time`.
    ///
    /// The entry time is never touched. Trace lines are emitted in
    /// chronological order, so the latest line always carries the latest time.
    pub fn advance_to(&mut self, time: f64) {
        self.exit_time = time;
    }

    /// Returns true if `tau` lies within `[entry_time, exit_time]`.
    pub fn contains(&self, tau: f64) -> bool {
        self.entry_time <= tau && tau <= self.exit_time
    }

    /// Length of the window in seconds.
    #[allow(dead_code)] // Utility for statistics
    pub fn duration(&self) -> f64 {
        self.exit_time - self.entry_time
    }
}

/// Minimal interval on one axis containing all observed positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpatialBounds {
    pub min: f64,
    pub max: f64,
}

impl SpatialBounds {
    /// Creates degenerate bounds around a single coordinate.
    pub fn at(value: f64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Widens the bounds to include `value`.
    pub fn include(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Returns the bounds as a `(min, max)` pair.
    pub fn as_pair(&self) -> (f64, f64) {
        (self.min, self.max)
    }
}

/// Everything tracked for one node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub window: ActivityWindow,
    pub x: SpatialBounds,
    pub y: SpatialBounds,
}

impl NodeRecord {
    /// Creates the record for a node sighted for the first time.
    pub fn first_sighting(time: f64, x: f64, y: f64) -> Self {
        Self {
            window: ActivityWindow::starting_at(time),
            x: SpatialBounds::at(x),
            y: SpatialBounds::at(y),
        }
    }

    /// Applies a later movement command to the record.
    pub fn observe(&mut self, time: f64, x: f64, y: f64) {
        self.window.advance_to(time);
        self.x.include(x);
        self.y.include(y);
    }
}

/// Aggregate statistics for one trace file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceSummary {
    /// Path of the trace file.
    pub file: String,
    /// Number of distinct nodes.
    pub node_count: usize,
    /// Latest exit time over all nodes.
    pub simulation_time: f64,
    /// `(min, max)` over all nodes' x bounds.
    pub x_range: (f64, f64),
    /// `(min, max)` over all nodes' y bounds.
    pub y_range: (f64, f64),
}

impl fmt::Display for TraceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total Nodes: {}, Simulation Time: {}s, X Range: ({}, {}), Y Range: ({}, {})",
            self.node_count,
            self.simulation_time,
            self.x_range.0,
            self.x_range.1,
            self.y_range.0,
            self.y_range.1
        )
    }
}

/// Summary of a complete batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// When the batch was processed.
    pub generated_at: DateTime<Utc>,
    /// Directory that was scanned.
    pub directory: String,
    /// Trace file extension that was scanned for.
    pub extension: String,
    /// Per-file statistics, in processing order.
    pub traces: Vec<TraceSummary>,
    /// Files that contained no `setdest` lines.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
}

impl BatchReport {
    /// Creates an empty report for a scan of `directory`.
    pub fn new(directory: String, extension: String) -> Self {
        Self {
            generated_at: Utc::now(),
            directory,
            extension,
            traces: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Total nodes across all non-empty traces.
    pub fn total_nodes(&self) -> usize {
        self.traces.iter().map(|t| t.node_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_contains_is_inclusive() {
        let window = ActivityWindow {
            entry_time: 2.0,
            exit_time: 5.0,
        };
        assert!(window.contains(2.0));
        assert!(window.contains(5.0));
        assert!(!window.contains(1.999));
        assert!(!window.contains(5.001));
        assert_eq!(window.duration(), 3.0);
    }

    #[test]
    fn test_window_advance_keeps_entry() {
        let mut window = ActivityWindow::starting_at(1.0);
        window.advance_to(4.0);
        window.advance_to(7.5);
        assert_eq!(window.entry_time, 1.0);
        assert_eq!(window.exit_time, 7.5);
    }

    #[test]
    fn test_bounds_only_widen() {
        let mut bounds = SpatialBounds::at(10.0);
        bounds.include(12.0);
        bounds.include(11.0);
        bounds.include(3.0);
        assert_eq!(bounds.as_pair(), (3.0, 12.0));
    }

    #[test]
    fn test_node_record_observe() {
        let mut record = NodeRecord::first_sighting(1.0, 5.0, 5.0);
        record.observe(3.0, 6.0, 5.0);
        assert_eq!(record.window.entry_time, 1.0);
        assert_eq!(record.window.exit_time, 3.0);
        assert_eq!(record.x.as_pair(), (5.0, 6.0));
        assert_eq!(record.y.as_pair(), (5.0, 5.0));
    }

    #[test]
    fn test_summary_display() {
        let summary = TraceSummary {
            file: "a.tcl".to_string(),
            node_count: 2,
            simulation_time: 3.0,
            x_range: (0.0, 6.5),
            y_range: (0.0, 5.0),
        };
        assert_eq!(
            summary.to_string(),
            "Total Nodes: 2, Simulation Time: 3s, X Range: (0, 6.5), Y Range: (0, 5)"
        );
    }

    #[test]
    fn test_batch_report_totals() {
        let mut report = BatchReport::new(".".to_string(), "tcl".to_string());
        assert_eq!(report.total_nodes(), 0);
        report.traces.push(TraceSummary {
            file: "a.tcl".to_string(),
            node_count: 3,
            simulation_time: 10.0,
            x_range: (0.0, 1.0),
            y_range: (0.0, 1.0),
        });
        report.traces.push(TraceSummary {
            file: "b.tcl".to_string(),
            node_count: 4,
            simulation_time: 12.0,
            x_range: (0.0, 1.0),
            y_range: (0.0, 1.0),
        });
        assert_eq!(report.total_nodes(), 7);
    }
}
