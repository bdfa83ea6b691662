// Directory scanner: turns base paths into the immediate subdirectories
// that are candidates for renaming.

use std::path::{Path, PathBuf};
use tracing::debug;

/// A directory found under one of the base paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub path: PathBuf,
    /// Basename of `path`, the name sent to the suggester.
    pub name: String,
}

/// Result of scanning a list of base paths.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub entries: Vec<DirectoryEntry>,
    /// Base paths that were not readable directories.
    pub skipped: Vec<PathBuf>,
    /// Subdirectories left out because their name is not valid UTF-8 and
    /// cannot round-trip through JSON.
    pub non_utf8: Vec<PathBuf>,
}

impl ScanResult {
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }
}

/// Collect the subdirectories of every base path, in base-path order and
/// then listing order. Duplicates across base paths are kept.
pub fn scan<P: AsRef<Path>>(base_paths: &[P]) -> ScanResult {
    let mut result = ScanResult::default();

    for base in base_paths {
        let base = base.as_ref();
        if !list_subdirectories(base, &mut result) {
            result.skipped.push(base.to_path_buf());
        }
    }

    result
}

/// Returns false when `base` cannot be listed as a directory.
fn list_subdirectories(base: &Path, result: &mut ScanResult) -> bool {
    if !base.is_dir() {
        return false;
    }
    let read_dir = match std::fs::read_dir(base) {
        Ok(rd) => rd,
        Err(e) => {
            debug!(base = %base.display(), error = %e, "cannot list base path");
            return false;
        }
    };

    let before = result.entries.len();
    for item in read_dir.flatten() {
        let path = item.path();
        if !path.is_dir() {
            continue;
        }
        match item.file_name().into_string() {
            Ok(name) => result.entries.push(DirectoryEntry { path, name }),
            Err(_) => result.non_utf8.push(path),
        }
    }
    debug!(base = %base.display(), count = result.entries.len() - before, "scanned base path");
    true
}
