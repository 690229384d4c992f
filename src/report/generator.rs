//! Batch report generation.
//!
//! This module renders a [`BatchReport`] as Markdown or JSON.

use crate::cli::ReportFormat;
use crate::models::{BatchReport, TraceSummary};
use anyhow::{Context, Result};
use std::path::Path;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &BatchReport) -> String {
    let mut output = String::new();

    output.push_str("# TraceStat Report\n\n");
    output.push_str(&generate_metadata_section(report));
    output.push_str(&generate_traces_section(&report.traces));
    output.push_str(&generate_skipped_section(&report.skipped));

    output
}

/// Generate the metadata section.
fn generate_metadata_section(report: &BatchReport) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Directory:** `{}`\n", report.directory));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Extension:** `.{}`\n", report.extension));
    section.push_str(&format!("- **Traces:** {}\n", report.traces.len()));
    if !report.skipped.is_empty() {
        section.push_str(&format!("- **Skipped (no data):** {}\n", report.skipped.len()));
    }
    section.push_str(&format!("- **Total Nodes:** {}\n", report.total_nodes()));
    section.push('\n');

    section
}

/// Generate the per-trace table.
fn generate_traces_section(traces: &[TraceSummary]) -> String {
    let mut section = String::new();

    section.push_str("## Traces\n\n");

    if traces.is_empty() {
        section.push_str("No trace contained node movements.\n\n");
        return section;
    }

    section.push_str("| File | Nodes | Simulation Time (s) | X Range | Y Range |\n");
    section.push_str("|------|------:|--------------------:|---------|---------|\n");
    for trace in traces {
        section.push_str(&format!(
            "| `{}` | {} | {} | {} .. {} | {} .. {} |\n",
            trace.file,
            trace.node_count,
            trace.simulation_time,
            trace.x_range.0,
            trace.x_range.1,
            trace.y_range.0,
            trace.y_range.1
        ));
    }
    section.push('\n');

    section
}

fn generate_skipped_section(skipped: &[String]) -> String {
    if skipped.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Skipped\n\n");
    for file in skipped {
        section.push_str(&format!("- `{}`\n", file));
    }
    section.push('\n');

    section
}

/// Generate a JSON report.
pub fn generate_json_report(report: &BatchReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write the report to `path` in the requested format.
pub fn write_report(report: &BatchReport, path: &Path, format: ReportFormat) -> Result<()> {
    let content = match format {
        ReportFormat::Json => generate_json_report(report)?,
        ReportFormat::Markdown => generate_markdown_report(report),
    };

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}
