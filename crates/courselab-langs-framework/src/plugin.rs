//! Contains LanguagePlugin.

use crate::archive;
use crate::error::LangsError;
use crate::policy::StudentFilePolicy;
use crate::skip;
use crate::submission_processing;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// The trait that each language plugin must implement.
///
/// A plugin contributes the built-in student file classification and exercise
/// detection for its ecosystem; the preparation and packaging operations are
/// provided on top of the core. Build and test tooling is invoked elsewhere,
/// against trees this trait prepares.
///
/// Implementations must be stateless: every operation takes the project root
/// it works on.
pub trait LanguagePlugin {
    const PLUGIN_NAME: &'static str;
    type StudentFilePolicy: StudentFilePolicy;

    /// Tells if there's a valid exercise in this path.
    fn is_exercise_type_correct(path: &Path) -> bool;

    /// Searches the base path for directories that contain an exercise of this
    /// plugin's type, in stable order. Hidden directories and build output are
    /// not searched.
    fn find_exercises(base_path: &Path) -> Vec<PathBuf> {
        let mut exercises = vec![];
        if base_path.is_dir() {
            for entry in WalkDir::new(base_path)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|e| {
                    e.depth() == 0
                        || !(skip::is_hidden_dir(e.path()) || skip::is_build_output_dir(e.path()))
                })
                .filter_map(|e| e.ok())
            {
                if entry.file_type().is_dir() && Self::is_exercise_type_correct(entry.path()) {
                    log::debug!("found exercise {}", entry.path().display());
                    exercises.push(entry.path().to_path_buf());
                }
            }
        }
        exercises
    }

    /// Extracts a compressed project over the target location.
    ///
    /// Existing files are overwritten as long as the policy does not classify
    /// them as student files.
    fn extract_project(
        compressed_project: impl Read + Seek,
        target_location: &Path,
    ) -> Result<(), LangsError> {
        let policy = Self::StudentFilePolicy::new(target_location);
        archive::unpack(&policy, compressed_project, target_location)
    }

    /// Compresses the project at the given root into an in-memory zip.
    fn compress_project(path: &Path) -> Result<Vec<u8>, LangsError> {
        let policy = Self::StudentFilePolicy::new(path);
        archive::pack(&policy, path)
    }

    /// Copies the student files of an extracted submission into a prepared
    /// copy of the exercise at dest.
    fn prepare_submission(extracted_submission: &Path, dest: &Path) -> Result<(), LangsError> {
        let policy = Self::StudentFilePolicy::new(dest);
        submission_processing::copy_student_files(&policy, extracted_submission, dest)
    }
}
