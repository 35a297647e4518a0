//! The error type for the crate.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LangsError {
    // IO
    #[error("Failed to open file at {0}")]
    OpenFile(PathBuf, #[source] std::io::Error),
    #[error("Failed to create file at {0}")]
    CreateFile(PathBuf, #[source] std::io::Error),
    #[error("Failed to read file at {0}")]
    ReadFile(PathBuf, #[source] std::io::Error),
    #[error("Failed to write to file at {0}")]
    WriteFile(PathBuf, #[source] std::io::Error),
    #[error("Failed to copy file from {0} to {1}")]
    CopyFile(PathBuf, PathBuf, #[source] std::io::Error),
    #[error("Failed to create dir(s) at {0}")]
    CreateDir(PathBuf, #[source] std::io::Error),
    #[error("Failed to read dir at {0}")]
    ReadDir(PathBuf, #[source] std::io::Error),
    #[error("Failed to create temporary directory")]
    TempDir(#[source] std::io::Error),
    #[error("Failed to read line")]
    ReadLine(#[source] std::io::Error),
    #[error("Failed to read the root of the traversal at {0}")]
    WalkRoot(PathBuf, #[source] walkdir::Error),

    #[error("Malformed directive on line {line}: {reason}")]
    MalformedDirective { line: usize, reason: String },
    #[error("Failed to filter source file at {0}")]
    SourceFilter(PathBuf, #[source] Box<LangsError>),

    #[error("Path {0} contained invalid UTF-8")]
    InvalidUtf8(PathBuf),
    #[error("No matching language plugin found for {0}")]
    PluginNotFound(PathBuf),

    #[error("Failed to write {0} into the archive")]
    ZipWrite(PathBuf, #[source] std::io::Error),
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}
