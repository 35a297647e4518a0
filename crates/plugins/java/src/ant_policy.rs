//! Ant student file policy

use courselab_langs_framework::{ProjectConfig, StudentFilePolicy};
use std::{ffi::OsStr, path::Path};

pub struct AntStudentFilePolicy {
    project_config: ProjectConfig,
}

impl StudentFilePolicy for AntStudentFilePolicy {
    fn new_with_config(project_config: ProjectConfig) -> Self {
        Self { project_config }
    }

    fn config(&self) -> &ProjectConfig {
        &self.project_config
    }

    fn is_student_source_file(&self, file_path: &Path) -> bool {
        file_path.starts_with("src") && file_path.extension() == Some(OsStr::new("java"))
    }
}
