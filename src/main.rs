//! TraceStat - NS-2 mobility trace statistics
//!
//! A CLI tool that scans a directory for mobility traces, derives each
//! node's activity window and spatial bounds, and renders a node activity
//! timeline and a network density chart per trace.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (unreadable trace, malformed line, config error, etc.)

mod cli;
mod config;
mod models;
mod render;
mod report;
mod scanner;
mod trace;

use anyhow::{Context, Result};
use cli::Args;
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use models::{BatchReport, TraceSummary};
use render::{PlotRenderer, Renderer};
use std::path::{Path, PathBuf};
use trace::TraceAggregator;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("TraceStat v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run_batch(args) {
        error!("Batch failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .tracestat.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(config::CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", config::CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", config::CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", config::CONFIG_FILE);
    println!("   Edit it to customize the extension, chart labels and report format.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// What happened to one trace file.
#[derive(Debug)]
enum TraceOutcome {
    /// The trace had node movements.
    Summarized(TraceSummary),
    /// No `setdest` line was found.
    Empty,
}

/// Run the complete batch: scan, aggregate, print, render, report.
fn run_batch(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let scan_config = scanner::ScanConfig::from(&config.scanner);
    let file_scanner = scanner::TraceScanner::new(args.directory.clone(), scan_config);
    let files = file_scanner.scan()?;

    if files.is_empty() {
        println!("No .{} files found in the directory.", config.scanner.extension);
        return Ok(());
    }

    // Handle --dry-run: list files and exit
    if args.dry_run {
        return handle_dry_run(&files);
    }

    if let Some(ref out) = args.output_dir {
        std::fs::create_dir_all(out)
            .with_context(|| format!("Failed to create output directory {}", out.display()))?;
    }

    let renderer = config
        .render
        .enabled
        .then(|| PlotRenderer::new(config.render.clone()));

    let mut report = BatchReport::new(
        args.directory.display().to_string(),
        config.scanner.extension.clone(),
    );

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(files.len() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    // A hidden bar swallows println, so fall back to stdout when quiet.
    let say = |line: String| {
        if pb.is_hidden() {
            println!("{}", line);
        } else {
            pb.println(line);
        }
    };

    for file in &files {
        pb.set_message(file.display().to_string());
        say(format!("Processing {}...", file.display()));

        let outcome = process_trace(
            file,
            renderer.as_ref().map(|r| r as &dyn Renderer),
            &args.directory,
            args.output_dir.as_deref(),
        )?;

        match outcome {
            TraceOutcome::Summarized(summary) => {
                say(summary.to_string());
                report.traces.push(summary);
            }
            TraceOutcome::Empty => {
                say(format!("Skipping {}: No data found.", file.display()));
                report.skipped.push(file.display().to_string());
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("done");

    if let Some(ref path) = args.report {
        report::write_report(&report, path, config.report.format)?;
        println!("\n✅ Report saved to: {}", path.display());
    }

    info!(
        "Processed {} traces ({} skipped, {} nodes)",
        report.traces.len(),
        report.skipped.len(),
        report.total_nodes()
    );
    Ok(())
}

/// Aggregate one trace and render its charts.
///
/// Empty traces are reported as such and never rendered.
fn process_trace(
    file: &Path,
    renderer: Option<&dyn Renderer>,
    scan_root: &Path,
    output_dir: Option<&Path>,
) -> Result<TraceOutcome> {
    let aggregator = TraceAggregator::from_path(file)
        .with_context(|| format!("Failed to process {}", file.display()))?;

    if aggregator.is_empty() {
        warn!("No setdest lines in {}", file.display());
        return Ok(TraceOutcome::Empty);
    }

    let summary = aggregator.summary(file)?;
    info!(
        "{}: {} nodes over {}s",
        file.display(),
        summary.node_count,
        summary.simulation_time
    );

    if let Some(renderer) = renderer {
        let (activity, density) = render::chart_paths(file, scan_root, output_dir);
        if let Some(dir) = activity.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        }
        renderer.render_activity(&aggregator, &activity)?;
        renderer.render_density(&aggregator, &density)?;
    }

    Ok(TraceOutcome::Summarized(summary))
}

/// Handle --dry-run: print the files that would be processed.
fn handle_dry_run(files: &[PathBuf]) -> Result<()> {
    println!("\n🔍 Dry run: {} trace files would be processed:\n", files.len());
    for file in files {
        println!("     📄 {}", file.display());
    }
    println!("\n✅ Dry run complete. No traces were parsed.");
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", config::CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
