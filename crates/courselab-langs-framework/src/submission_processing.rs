//! Functions for merging a student's submission with a prepared exercise copy.

use crate::error::LangsError;
use crate::file_util;
use crate::policy::StudentFilePolicy;
use crate::walk::{FileTreeWalker, Filer};
use std::path::Path;

/// Copies student-owned files from an extracted submission over the destination.
struct SubmissionFiler<'a> {
    policy: &'a dyn StudentFilePolicy,
    source: &'a Path,
    target: &'a Path,
}

impl Filer for SubmissionFiler<'_> {
    fn visit_file(&mut self, file: &Path) -> Result<(), LangsError> {
        let relative = match file.strip_prefix(self.source) {
            Ok(relative) => relative,
            Err(_) => return Ok(()),
        };
        if !self.policy.is_student_file(relative) {
            log::trace!("not a student file, skipping {}", relative.display());
            return Ok(());
        }

        let target_path = self.target.join(relative);
        if target_path.exists() {
            let incoming = file_util::read_file(file)?;
            let current = file_util::read_file(&target_path)?;
            if incoming == current {
                return Ok(());
            }
        }
        log::debug!(
            "copying student file {} to {}",
            file.display(),
            target_path.display()
        );
        file_util::copy(file, &target_path)
    }
}

/// Copies the student files of an extracted submission at source into the
/// prepared destination. For example, a student file source/foo.java is copied
/// to target/foo.java. Files the policy classifies as exercise files are left
/// alone, as are student files whose content already matches the destination.
pub fn copy_student_files(
    policy: &dyn StudentFilePolicy,
    source: &Path,
    target: &Path,
) -> Result<(), LangsError> {
    log::info!(
        "copying student files from {} to {}",
        source.display(),
        target.display()
    );

    let walker = FileTreeWalker::with_standard_skippers(source);
    let mut filer = SubmissionFiler {
        policy,
        source,
        target,
    };
    walker.traverse(&mut filer)
}
