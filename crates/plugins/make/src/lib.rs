#![deny(clippy::print_stdout, clippy::print_stderr, clippy::unwrap_used)]

//! Language plugin for C projects built with Make.

mod policy;

pub use self::policy::MakeStudentFilePolicy;
use courselab_langs_framework::LanguagePlugin;
use std::path::Path;

pub struct MakePlugin;

impl LanguagePlugin for MakePlugin {
    const PLUGIN_NAME: &'static str = "make";
    type StudentFilePolicy = MakeStudentFilePolicy;

    fn is_exercise_type_correct(path: &Path) -> bool {
        path.join("Makefile").is_file()
    }
}
