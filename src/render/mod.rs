//! Chart rendering.
//!
//! Renderers only see the read-only query interface of
//! [`TraceAggregator`](crate::trace::TraceAggregator).

pub mod charts;

pub use charts::PlotRenderer;

use crate::trace::TraceAggregator;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Something that turns an aggregated trace into chart images.
pub trait Renderer {
    /// One horizontal bar per node spanning its activity window.
    fn render_activity(&self, trace: &TraceAggregator, out: &Path) -> Result<()>;

    /// Active-node count over time.
    fn render_density(&self, trace: &TraceAggregator, out: &Path) -> Result<()>;
}

/// Output paths of the two charts for `trace_file`.
///
/// `scenario.tcl` becomes `scenario_node_activity.png` and
/// `scenario_network_density.png`. Without `output_dir` they sit next to the
/// trace. With it, the trace's subdirectory below `scan_root` is kept under
/// `output_dir`, so equally named traces in different folders stay apart.
pub fn chart_paths(
    trace_file: &Path,
    scan_root: &Path,
    output_dir: Option<&Path>,
) -> (PathBuf, PathBuf) {
    let stem = trace_file
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "trace".to_string());

    let parent = trace_file.parent().unwrap_or_else(|| Path::new(""));
    let dir = match output_dir {
        Some(out) => out.join(parent.strip_prefix(scan_root).unwrap_or_else(|_| Path::new(""))),
        None => parent.to_path_buf(),
    };

    (
        dir.join(format!("{}_node_activity.png", stem)),
        dir.join(format!("{}_network_density.png", stem)),
    )
}
