//! Maven student file policy

use courselab_langs_framework::{ProjectConfig, StudentFilePolicy};
use std::path::Path;

pub struct MavenStudentFilePolicy {
    project_config: ProjectConfig,
}

impl StudentFilePolicy for MavenStudentFilePolicy {
    fn new_with_config(project_config: ProjectConfig) -> Self {
        Self { project_config }
    }

    fn config(&self) -> &ProjectConfig {
        &self.project_config
    }

    fn is_student_source_file(&self, file_path: &Path) -> bool {
        file_path.starts_with("src/main")
    }
}
