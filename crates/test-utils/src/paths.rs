//! Path utilities for test data and scratch output.

use std::path::PathBuf;
use tempfile::TempDir;

/// Returns the workspace root directory.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Searches for a test file or directory.
///
/// Checks `TEST_DATA_DIR` (if set) and then the workspace root.
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("TEST_DATA_DIR") {
        let candidate = PathBuf::from(dir).join(name);
        if candidate.exists() {
            return Some(candidate);
        }
    }

    let candidate = workspace_root().join(name);
    candidate.exists().then_some(candidate)
}

/// Creates a scratch directory and returns it with a file path inside it.
///
/// Keep the `TempDir` alive for as long as the path is used.
pub fn temp_output_path(file_name: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join(file_name);
    (dir, path)
}
