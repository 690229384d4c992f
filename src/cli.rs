//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// TraceStat - NS-2 mobility trace statistics
///
/// Scans a directory for mobility traces, prints node count, simulation
/// time and spatial ranges for each one, and renders a node activity
/// timeline and a network density chart per trace.
///
/// Examples:
///   tracestat
///   tracestat ./scenarios --output-dir ./plots
///   tracestat --extension mob --no-plots --report summary.json --format json
///   tracestat --dry-run
///   tracestat --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Directory to scan for trace files
    #[arg(default_value = ".", value_name = "DIR")]
    pub directory: PathBuf,

    /// Trace file extension (without the dot)
    ///
    /// Defaults to "tcl", or the value in .tracestat.toml.
    #[arg(short, long, value_name = "EXT", env = "TRACESTAT_EXTENSION")]
    pub extension: Option<String>,

    /// Directory depth to scan (1 = top level only)
    #[arg(long, value_name = "DEPTH")]
    pub max_depth: Option<usize>,

    /// Directory for chart images
    ///
    /// If not specified, charts are written next to each trace file.
    /// Subdirectories of the scanned directory are mirrored below it.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .tracestat.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write a batch report to this file
    #[arg(short, long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Batch report format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<ReportFormat>,

    /// Skip chart rendering
    #[arg(long)]
    pub no_plots: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: list the trace files that would be processed and exit
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .tracestat.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the batch report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref extension) = self.extension {
            let trimmed = extension.trim_start_matches('.');
            if trimmed.is_empty() || trimmed.contains(['/', '\\']) {
                return Err(format!("Invalid trace extension: {:?}", extension));
            }
        }

        if self.max_depth == Some(0) {
            return Err("Max depth must be at least 1".to_string());
        }

        if !self.directory.is_dir() {
            return Err(format!(
                "Trace directory does not exist: {}",
                self.directory.display()
            ));
        }

        if let Some(ref out) = self.output_dir {
            if out.exists() && !out.is_dir() {
                return Err(format!(
                    "Output path is not a directory: {}",
                    out.display()
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
