#![deny(clippy::print_stdout, clippy::print_stderr, clippy::unwrap_used)]

//! Contains functionality for preparing, packaging and unpacking exercise projects.

pub mod archive;
mod error;
mod exercise_builder;
pub mod file_util;
mod meta_syntax;
mod plugin;
mod policy;
mod project_config;
pub mod skip;
mod submission_processing;
mod walk;

pub use self::{
    error::LangsError,
    exercise_builder::{prepare_solution, prepare_stub},
    meta_syntax::{MetaString, MetaSyntaxParser},
    plugin::LanguagePlugin,
    policy::{EverythingIsStudentFilePolicy, NothingIsStudentFilePolicy, StudentFilePolicy},
    project_config::{ProjectConfig, CONFIG_FILE_NAME},
    submission_processing::copy_student_files,
    walk::{DirectoryDecision, FileTreeWalker, Filer},
};
pub use zip;
