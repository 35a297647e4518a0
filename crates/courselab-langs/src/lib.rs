#![deny(clippy::print_stdout, clippy::print_stderr, clippy::unwrap_used)]

//! High level operations for preparing, packaging and unpacking exercise
//! projects across the supported language ecosystems. Operations that need a
//! student file policy detect the project type first and dispatch to the
//! matching plugin.

use courselab_langs_framework::{archive, skip, LanguagePlugin};
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub use courselab_langs_framework::{
    prepare_solution, prepare_stub, LangsError, NothingIsStudentFilePolicy, ProjectConfig,
    StudentFilePolicy, CONFIG_FILE_NAME,
};
pub use courselab_langs_java::{AntPlugin, MavenPlugin};
pub use courselab_langs_make::MakePlugin;
pub use courselab_langs_python3::Python3Plugin;

/// All the supported project types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectType {
    Maven,
    Make,
    Python3,
    Ant,
}

impl ProjectType {
    /// Recognizes the project type, trying each plugin in order.
    ///
    /// An unrecognized tree yields `None`, which is distinct from failure.
    /// Ant is tried last, for legacy reasons: any tree with both src and test
    /// directories is recognized as an Ant project.
    pub fn detect(path: &Path) -> Option<ProjectType> {
        let project_type = if MavenPlugin::is_exercise_type_correct(path) {
            Self::Maven
        } else if MakePlugin::is_exercise_type_correct(path) {
            Self::Make
        } else if Python3Plugin::is_exercise_type_correct(path) {
            Self::Python3
        } else if AntPlugin::is_exercise_type_correct(path) {
            Self::Ant
        } else {
            log::debug!("no plugin matched {}", path.display());
            return None;
        };
        log::info!(
            "detected project at {} as {}",
            path.display(),
            project_type.plugin_name()
        );
        Some(project_type)
    }

    pub fn plugin_name(self) -> &'static str {
        match self {
            Self::Maven => MavenPlugin::PLUGIN_NAME,
            Self::Make => MakePlugin::PLUGIN_NAME,
            Self::Python3 => Python3Plugin::PLUGIN_NAME,
            Self::Ant => AntPlugin::PLUGIN_NAME,
        }
    }
}

/// Returns the student file policy matching the project type of the given root.
pub fn get_student_file_policy(path: &Path) -> Result<Box<dyn StudentFilePolicy>, LangsError> {
    let policy: Box<dyn StudentFilePolicy> = match ProjectType::detect(path) {
        Some(ProjectType::Maven) => {
            Box::new(<MavenPlugin as LanguagePlugin>::StudentFilePolicy::new(path))
        }
        Some(ProjectType::Make) => {
            Box::new(<MakePlugin as LanguagePlugin>::StudentFilePolicy::new(path))
        }
        Some(ProjectType::Python3) => {
            Box::new(<Python3Plugin as LanguagePlugin>::StudentFilePolicy::new(path))
        }
        Some(ProjectType::Ant) => {
            Box::new(<AntPlugin as LanguagePlugin>::StudentFilePolicy::new(path))
        }
        None => return Err(LangsError::PluginNotFound(path.to_path_buf())),
    };
    Ok(policy)
}

/// Compresses the project at the given root into an in-memory zip, packaging
/// what the project type's policy allows into the submission.
pub fn compress_project(path: &Path) -> Result<Vec<u8>, LangsError> {
    let policy = get_student_file_policy(path)?;
    archive::pack(policy.as_ref(), path)
}

/// Extracts a compressed project over the target location. Student files
/// already on disk win over the incoming entries.
///
/// If no plugin recognizes the target, for example because it is empty, the
/// archive is extracted over everything.
pub fn extract_project(
    compressed_project: impl Read + Seek,
    target_location: &Path,
) -> Result<(), LangsError> {
    match get_student_file_policy(target_location) {
        Ok(policy) => archive::unpack(policy.as_ref(), compressed_project, target_location),
        Err(LangsError::PluginNotFound(_)) => {
            log::debug!(
                "no matching language plugin found for {}, overwriting",
                target_location.display()
            );
            let policy = NothingIsStudentFilePolicy::new_with_config(ProjectConfig::default());
            archive::unpack(&policy, compressed_project, target_location)
        }
        Err(err) => Err(err),
    }
}

/// Copies the student files of an extracted submission into a prepared copy
/// of the exercise at dest.
pub fn prepare_submission(extracted_submission: &Path, dest: &Path) -> Result<(), LangsError> {
    let policy = get_student_file_policy(dest)?;
    courselab_langs_framework::copy_student_files(policy.as_ref(), extracted_submission, dest)
}

/// Finds every directory under the given path that some plugin recognizes as
/// an exercise, in stable order. Hidden directories and build output are not
/// searched.
pub fn find_exercise_directories(base_path: &Path) -> Vec<PathBuf> {
    let mut exercises = vec![];
    for entry in WalkDir::new(base_path)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !(skip::is_hidden_dir(e.path()) || skip::is_build_output_dir(e.path()))
        })
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_dir() && ProjectType::detect(entry.path()).is_some() {
            exercises.push(entry.path().to_path_buf());
        }
    }
    exercises
}
