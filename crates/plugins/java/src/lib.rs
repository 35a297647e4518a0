#![deny(clippy::print_stdout, clippy::print_stderr, clippy::unwrap_used)]

//! Language plugins for Java projects built with Maven or Apache Ant.

mod ant_policy;
mod maven_policy;

pub use self::{ant_policy::AntStudentFilePolicy, maven_policy::MavenStudentFilePolicy};
use courselab_langs_framework::LanguagePlugin;
use std::path::Path;

pub struct MavenPlugin;

impl LanguagePlugin for MavenPlugin {
    const PLUGIN_NAME: &'static str = "apache-maven";
    type StudentFilePolicy = MavenStudentFilePolicy;

    fn is_exercise_type_correct(path: &Path) -> bool {
        path.join("pom.xml").exists()
    }
}

pub struct AntPlugin;

impl LanguagePlugin for AntPlugin {
    const PLUGIN_NAME: &'static str = "apache-ant";
    type StudentFilePolicy = AntStudentFilePolicy;

    fn is_exercise_type_correct(path: &Path) -> bool {
        path.join("build.xml").is_file()
            || path.join("test").is_dir() && path.join("src").is_dir()
    }
}
