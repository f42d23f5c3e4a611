//! Directory tree scanning.
//!
//! A single pure walk primitive shared by code-generation discovery, source
//! discovery and the cleaner: from a root, a set of excluded directory names
//! and a file-name suffix to the matching file paths. Exclusion is by
//! directory *name*, so build artifact directories are skipped wherever they
//! appear in the tree.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively collect every file under `root` whose name ends with
/// `suffix`, skipping directories whose name is in `excluded_dirs`.
/// Entries are visited in file-name order so repeated scans of an unchanged
/// tree yield identical results.
pub fn scan_files(root: &Path, excluded_dirs: &[&str], suffix: &str) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            !excluded_dirs.contains(&name.as_ref())
        })
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file() && entry.file_name().to_string_lossy().ends_with(suffix)
        })
        .map(|entry| entry.into_path())
        .collect()
}
