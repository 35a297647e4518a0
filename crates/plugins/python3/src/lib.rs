#![deny(clippy::print_stdout, clippy::print_stderr, clippy::unwrap_used)]

//! Language plugin for Python 3 projects.

mod policy;

pub use self::policy::Python3StudentFilePolicy;
use courselab_langs_framework::LanguagePlugin;
use std::path::Path;

pub struct Python3Plugin;

impl LanguagePlugin for Python3Plugin {
    const PLUGIN_NAME: &'static str = "python3";
    type StudentFilePolicy = Python3StudentFilePolicy;

    fn is_exercise_type_correct(path: &Path) -> bool {
        let setup = path.join("setup.py");
        let requirements = path.join("requirements.txt");
        let test = path.join("test").join("__init__.py");
        let tmc = path.join("tmc").join("__main__.py");

        setup.exists() || requirements.exists() || test.exists() || tmc.exists()
    }
}
