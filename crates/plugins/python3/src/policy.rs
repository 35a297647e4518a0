//! Contains the Python 3 student file policy.

use courselab_langs_framework::{ProjectConfig, StudentFilePolicy};
use std::{ffi::OsStr, path::Path};

pub struct Python3StudentFilePolicy {
    project_config: ProjectConfig,
}

impl StudentFilePolicy for Python3StudentFilePolicy {
    fn new_with_config(project_config: ProjectConfig) -> Self {
        Self { project_config }
    }

    fn config(&self) -> &ProjectConfig {
        &self.project_config
    }

    fn is_student_source_file(&self, file_path: &Path) -> bool {
        // python project structure is more freeform than most languages,
        // so any .py file counts, except under the venv, test and tmc dirs
        let in_venv = file_path.starts_with("venv") || file_path.starts_with(".venv");
        let in_test = file_path.starts_with("test");
        let in_tmc = file_path.starts_with("tmc");
        let excluded = in_venv || in_test || in_tmc;

        !excluded && file_path.extension() == Some(OsStr::new("py"))
    }
}
