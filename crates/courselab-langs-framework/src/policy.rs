//! Contains StudentFilePolicy.

use crate::project_config::{ProjectConfig, CONFIG_FILE_NAME};
use std::path::Path;

/// Specifies which files are student files. A single policy is only valid for a
/// single project as it uses the project's config file to determine its output.
///
/// Student files are any files that are expected to be modified and/or created
/// by the student. That is, any files that should not be overwritten when
/// updating an already downloaded exercise and any files that should be
/// submitted to the server.
///
/// All paths given to a policy are relative to the project root, using the
/// path's own segments for matching. Classification depends only on the path
/// and the project config, never on file contents.
pub trait StudentFilePolicy {
    /// This constructor should store the project config in the implementing struct.
    fn new_with_config(project_config: ProjectConfig) -> Self
    where
        Self: Sized;

    /// Loads the project config from the given root and calls the helper
    /// constructor. Implementing types should only be constructed using this
    /// function. Never fails; a broken config degrades to the built-in rules.
    fn new(project_dir: &Path) -> Self
    where
        Self: Sized,
    {
        Self::new_with_config(ProjectConfig::load_or_default(project_dir))
    }

    /// The config parsed from the project this policy was created for.
    fn config(&self) -> &ProjectConfig;

    /// Defines the plugin's built-in rule for determining whether a file is a
    /// student file.
    ///
    /// A file should be considered a student source file if it resides in a
    /// location the student is expected to create his or her own source files
    /// in the general case. Any special cases are handled through the
    /// `extra_student_files` config field.
    ///
    /// For example in a Java project that uses Apache Ant, returns `true` for
    /// any Java files in the `src` directory.
    fn is_student_source_file(&self, file_path: &Path) -> bool;

    /// Determines whether a file is a student file.
    ///
    /// Extra student files from the config expand on the built-in rule; they
    /// can never turn a student file back into an exercise file.
    fn is_student_file(&self, file_path: &Path) -> bool {
        // the config file itself is never considered a student file
        if file_path == Path::new(CONFIG_FILE_NAME) {
            return false;
        }

        self.config()
            .extra_student_files
            .iter()
            .any(|f| file_path.starts_with(f))
            || self.is_student_source_file(file_path)
    }

    /// Determines whether a file may be included in a packaged submission.
    ///
    /// Implementations must keep every student file includable.
    fn may_be_included_in_submission(&self, _file_path: &Path) -> bool {
        true
    }

    /// Used to check for files which should always be overwritten.
    fn is_updating_forced(&self, file_path: &Path) -> bool {
        self.config()
            .force_update
            .iter()
            .any(|f| file_path.starts_with(f))
    }

    /// Determines whether an incoming archive entry should be written to disk
    /// when unpacking over an existing tree. A student file already on disk
    /// wins, unless its path is listed under `force_update`.
    fn should_be_extracted(&self, file_path: &Path, overwrites_existing: bool) -> bool {
        !overwrites_existing
            || !self.is_student_file(file_path)
            || self.is_updating_forced(file_path)
    }
}

/// Mock policy that ignores the config file and returns false for all files.
pub struct NothingIsStudentFilePolicy {
    project_config: ProjectConfig,
}

impl StudentFilePolicy for NothingIsStudentFilePolicy {
    fn new_with_config(_project_config: ProjectConfig) -> Self {
        Self {
            project_config: ProjectConfig::default(),
        }
    }

    fn config(&self) -> &ProjectConfig {
        &self.project_config
    }

    fn is_student_source_file(&self, _file_path: &Path) -> bool {
        false
    }
}

/// Mock policy that ignores the config file and returns true for all files.
pub struct EverythingIsStudentFilePolicy {
    project_config: ProjectConfig,
}

impl StudentFilePolicy for EverythingIsStudentFilePolicy {
    fn new_with_config(_project_config: ProjectConfig) -> Self {
        Self {
            project_config: ProjectConfig::default(),
        }
    }

    fn config(&self) -> &ProjectConfig {
        &self.project_config
    }

    fn is_student_file(&self, _file_path: &Path) -> bool {
        true
    }

    fn is_student_source_file(&self, _file_path: &Path) -> bool {
        true
    }
}
