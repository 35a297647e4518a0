//! Contains the language policy for the plugin.

use courselab_langs_framework::{ProjectConfig, StudentFilePolicy};
use std::path::Path;

pub struct MakeStudentFilePolicy {
    project_config: ProjectConfig,
}

impl StudentFilePolicy for MakeStudentFilePolicy {
    fn new_with_config(project_config: ProjectConfig) -> Self {
        Self { project_config }
    }

    fn config(&self) -> &ProjectConfig {
        &self.project_config
    }

    fn is_student_source_file(&self, file_path: &Path) -> bool {
        file_path.starts_with("src")
    }
}
