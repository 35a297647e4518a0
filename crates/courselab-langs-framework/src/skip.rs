//! Directory skippers consulted by the tree walker before descending.

use std::path::Path;
use walkdir::WalkDir;

/// Directory-level prune predicate. The walker prunes a subtree when any
/// registered skipper returns true for its root.
pub type DirectorySkipper = Box<dyn Fn(&Path) -> bool>;

fn dir_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

/// Directories with names starting with '.'.
pub fn is_hidden_dir(path: &Path) -> bool {
    dir_name(path)
        .map(|s| s.starts_with('.'))
        .unwrap_or_default()
}

/// Version control metadata directories.
pub fn is_vcs_dir(path: &Path) -> bool {
    matches!(dir_name(path), Some(".git" | ".hg" | ".svn"))
}

/// Build output directories of the supported ecosystems.
pub fn is_build_output_dir(path: &Path) -> bool {
    matches!(
        dir_name(path),
        Some("target" | "build" | "bin" | "obj" | "__pycache__" | "node_modules")
    )
}

/// Tells if the directory contains a file with the given marker name in its root.
pub fn contains_marker_file(path: &Path, marker: &str) -> bool {
    for entry in WalkDir::new(path)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_file() && entry.file_name() == marker {
            log::debug!("contains {}: {}", marker, entry.path().display());
            return true;
        }
    }
    false
}

/// The skipper set applied by every standard traversal: hidden directories,
/// version control metadata and build output.
pub fn standard_skippers() -> Vec<DirectorySkipper> {
    vec![
        Box::new(is_hidden_dir),
        Box::new(is_vcs_dir),
        Box::new(is_build_output_dir),
    ]
}
