//! Shared fixtures for integration tests.

use std::io::Write;
use std::path::PathBuf;

use tempfile::TempDir;

/// Write `lines` to a temp file, newline-terminated.
///
/// Keep the returned `TempDir` alive for as long as the path is used.
pub fn fixture_file(lines: &[String]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("fixture.txt");
    let mut file = std::fs::File::create(&path).expect("create fixture");
    for line in lines {
        writeln!(file, "{}", line).expect("write fixture");
    }
    (dir, path)
}

/// A numbered-lines fixture, `line 0` through `line {count - 1}`.
pub fn numbered_lines(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("line {}", i)).collect()
}
