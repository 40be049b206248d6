#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use import_analyzer::{DataAnalysis, analyze};
use tempfile::{TempDir, tempdir};

/// Returns the absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub fn table(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter().map(|row| strings(row)).collect()
}

/// Runs the analyzer over borrowed literals.
pub fn analyze_literal(headers: &[&str], rows: &[&[&str]]) -> DataAnalysis {
    analyze(&strings(headers), &table(rows))
}

pub const TENANT_HEADERS: &[&str] = &[
    "Tenant Name",
    "Unit Number",
    "Lease Start",
    "Rent Amount",
    "Phone",
];

pub const TENANT_ROWS: &[&[&str]] = &[
    &["John Smith", "101", "2024-01-01", "1200.00", "555-123-4567"],
    &["Jane Doe", "102", "2024-02-01", "1350.00", "555-234-5678"],
    &["Bob Lee", "103", "2024-03-15", "1100.50", "(555) 345-6789"],
    &["Ann Wu", "104", "2024-04-01", "1425.00", "555.456.7890"],
    &["Raj Patel", "105", "2024-05-01", "999.99", "5555678901"],
];

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}
