//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - The core stays headless (no terminal crates)
//! - The TUI stays a thin client (no HTTP, no arithmetic)
//! - No sleeping outside the TUI frame loop
//! - No unwrap/expect in production code
//!
//! The helpers here locate the workspace and hand the tests the production
//! part of every source file.

use std::fs;
use std::path::{Path, PathBuf};

/// Workspace root, two levels above this package
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

/// A source file with its test module cut off
pub struct SourceFile {
    /// Path relative to the workspace root
    pub path: PathBuf,
    /// Lines before the first `#[cfg(test)]`
    pub lines: Vec<String>,
}

impl SourceFile {
    /// Lines with `//` comments removed, numbered from 1
    pub fn code_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines.iter().enumerate().map(|(idx, line)| {
            let code = line.split("//").next().unwrap_or(line.as_str());
            (idx + 1, code)
        })
    }

    /// `path:line - what` for a violation report
    pub fn violation(&self, line: usize, what: &str) -> String {
        format!("{}:{} - {}", self.path.display(), line, what)
    }
}

/// Production sources under `dir` (relative to the workspace root)
///
/// Panics if the directory does not exist, so a moved crate cannot make
/// the checks pass vacuously.
pub fn production_sources(dir: &str) -> Vec<SourceFile> {
    let root = workspace_root();
    let base = root.join(dir);
    assert!(base.exists(), "{} does not exist", base.display());

    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(&base)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("rs") {
            continue;
        }
        let Ok(content) = fs::read_to_string(path) else {
            continue;
        };
        let lines = content
            .lines()
            .take_while(|line| !line.trim_start().starts_with("#[cfg(test)]"))
            .map(str::to_string)
            .collect();
        files.push(SourceFile {
            path: path.strip_prefix(&root).unwrap_or(path).to_path_buf(),
            lines,
        });
    }
    files
}

/// Contents of a crate manifest
pub fn manifest(dir: &str) -> String {
    let path = workspace_root().join(dir).join("Cargo.toml");
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}

/// Print violations and fail
pub fn report(title: &str, violations: &[String]) {
    if violations.is_empty() {
        return;
    }
    eprintln!("\n{title}\n");
    for violation in violations {
        eprintln!("  {violation}");
    }
    panic!(
        "\nFound {} violation(s). Fix these before merging!",
        violations.len()
    );
}
