//! File scanner for discovering trace files.
//!
//! This module finds the trace files of a batch run, honouring the
//! configured extension, exclude list and directory depth.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Configuration for file scanning.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Trace file extension without the dot (e.g. "tcl")
    pub extension: String,
    /// Names to skip (files or directories)
    pub excludes: Vec<String>,
    /// Maximum directory depth; 1 scans only the top-level directory
    pub max_depth: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extension: "tcl".to_string(),
            excludes: vec!["target".to_string(), ".git".to_string()],
            max_depth: 1,
        }
    }
}

impl From<&crate::config::ScannerConfig> for ScanConfig {
    fn from(config: &crate::config::ScannerConfig) -> Self {
        Self {
            extension: config.extension.clone(),
            excludes: config.excludes.clone(),
            max_depth: config.max_depth,
        }
    }
}

/// Scanner for discovering trace files under a directory.
pub struct TraceScanner {
    config: ScanConfig,
    root: PathBuf,
}

impl TraceScanner {
    /// Create a new trace scanner.
    pub fn new(root: PathBuf, config: ScanConfig) -> Self {
        Self { config, root }
    }

    /// Scan for all matching files, sorted by path.
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            anyhow::bail!("Not a directory: {}", self.root.display());
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .max_depth(self.config.max_depth.max(1))
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.is_excluded(entry));

        for entry in walker {
            let entry = entry
                .with_context(|| format!("Failed to scan {}", self.root.display()))?;

            if entry.file_type().is_file() && self.matches(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        debug!(
            "Found {} .{} files in {}",
            files.len(),
            self.config.extension,
            self.root.display()
        );
        Ok(files)
    }

    /// Check if a path has the configured extension.
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| ext == self.config.extension)
    }

    /// Check if an entry matches exclusion patterns.
    fn is_excluded(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();

        // Hidden files
        if name.starts_with('.') {
            return true;
        }

        self.config.excludes.iter().any(|pattern| name == pattern.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), "").unwrap();
    }

    #[test]
    fn test_scan_finds_extension_only() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "b.tcl");
        touch(temp_dir.path(), "a.tcl");
        touch(temp_dir.path(), "notes.txt");
        touch(temp_dir.path(), "tcl");
        touch(temp_dir.path(), ".hidden.tcl");

        let scanner = TraceScanner::new(temp_dir.path().to_path_buf(), ScanConfig::default());
        let files = scanner.scan().unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.tcl", "b.tcl"]);
    }

    #[test]
    fn test_scan_depth_and_excludes() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "top.tcl");
        std::fs::create_dir(temp_dir.path().join("runs")).unwrap();
        touch(&temp_dir.path().join("runs"), "nested.tcl");
        std::fs::create_dir(temp_dir.path().join("target")).unwrap();
        touch(&temp_dir.path().join("target"), "ignored.tcl");

        let shallow = TraceScanner::new(temp_dir.path().to_path_buf(), ScanConfig::default());
        assert_eq!(shallow.scan().unwrap().len(), 1);

        let config = ScanConfig {
            max_depth: 3,
            ..ScanConfig::default()
        };
        let deep = TraceScanner::new(temp_dir.path().to_path_buf(), config);
        let files = deep.scan().unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|p| !p.starts_with(temp_dir.path().join("target"))));
    }

    #[test]
    fn test_scan_custom_extension() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "a.tcl");
        touch(temp_dir.path(), "b.mob");

        let config = ScanConfig {
            extension: "mob".to_string(),
            ..ScanConfig::default()
        };
        let scanner = TraceScanner::new(temp_dir.path().to_path_buf(), config);
        let files = scanner.scan().unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("b.mob"));
    }

    #[test]
    fn test_scan_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = TraceScanner::new(temp_dir.path().join("nope"), ScanConfig::default());
        assert!(scanner.scan().is_err());
    }
}
