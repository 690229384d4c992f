//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.tracestat.toml` files.

use crate::cli::ReportFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".tracestat.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Scanner settings.
    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Chart settings.
    #[serde(default)]
    pub render: RenderConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Trace discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Trace file extension (without the dot).
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Directory depth to scan; 1 means the top-level directory only.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// File or directory names to skip.
    #[serde(default = "default_excludes")]
    pub excludes: Vec<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            max_depth: default_max_depth(),
            excludes: default_excludes(),
        }
    }
}

fn default_extension() -> String {
    "tcl".to_string()
}

fn default_max_depth() -> usize {
    1
}

fn default_excludes() -> Vec<String> {
    vec!["target", ".git"].into_iter().map(String::from).collect()
}

/// Chart rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Render charts at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Image width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Image height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    #[serde(default = "default_activity_title")]
    pub activity_title: String,

    #[serde(default = "default_time_label")]
    pub activity_x_label: String,

    #[serde(default = "default_activity_y_label")]
    pub activity_y_label: String,

    /// `{nodes}` is replaced with the total node count.
    #[serde(default = "default_density_title")]
    pub density_title: String,

    #[serde(default = "default_time_label")]
    pub density_x_label: String,

    #[serde(default = "default_density_y_label")]
    pub density_y_label: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            width: default_width(),
            height: default_height(),
            activity_title: default_activity_title(),
            activity_x_label: default_time_label(),
            activity_y_label: default_activity_y_label(),
            density_title: default_density_title(),
            density_x_label: default_time_label(),
            density_y_label: default_density_y_label(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_width() -> u32 {
    1200
}

fn default_height() -> u32 {
    600
}

fn default_activity_title() -> String {
    "Activity interval per node".to_string()
}

fn default_time_label() -> String {
    "Time (s)".to_string()
}

fn default_activity_y_label() -> String {
    "Node ID".to_string()
}

fn default_density_title() -> String {
    "Active nodes per second ({nodes} nodes)".to_string()
}

fn default_density_y_label() -> String {
    "Active nodes".to_string()
}

/// Batch report settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Report format used with `--report`.
    #[serde(default)]
    pub format: ReportFormat,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if config.render.width == 0 || config.render.height == 0 {
            anyhow::bail!("Chart width and height must be positive in {}", path.display());
        }

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref extension) = args.extension {
            self.scanner.extension = extension.trim_start_matches('.').to_string();
        }
        if let Some(depth) = args.max_depth {
            self.scanner.max_depth = depth;
        }
        if let Some(format) = args.format {
            self.report.format = format;
        }

        // Flags always override
        if args.no_plots {
            self.render.enabled = false;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.scanner.extension, "tcl");
        assert_eq!(config.scanner.max_depth, 1);
        assert!(config.render.enabled);
        assert_eq!(config.render.width, 1200);
        assert_eq!(config.report.format, ReportFormat::Markdown);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[scanner]
extension = "mob"
max_depth = 2

[render]
enabled = false
density_title = "Density"

[report]
format = "json"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.scanner.extension, "mob");
        assert_eq!(config.scanner.max_depth, 2);
        assert!(!config.render.enabled);
        assert_eq!(config.render.density_title, "Density");
        assert_eq!(config.render.height, 600);
        assert_eq!(config.render.activity_y_label, "Node ID");
        assert_eq!(config.report.format, ReportFormat::Json);
    }

    #[test]
    fn test_load_rejects_zero_size() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[render]\nwidth = 0\n").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[scanner]"));
        assert!(toml_str.contains("[render]"));
        assert!(toml_str.contains("[report]"));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.scanner.extension, "tcl");
    }
}
