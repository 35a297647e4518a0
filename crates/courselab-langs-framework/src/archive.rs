//! Policy-aware zipping and unzipping of exercise projects.

use crate::error::LangsError;
use crate::file_util;
use crate::policy::StudentFilePolicy;
use crate::skip;
use crate::walk::{DirectoryDecision, FileTreeWalker, Filer};
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;
use zip::{write::FileOptions, ZipArchive, ZipWriter};

// unix file type mask and the symlink file type, for rejecting symlink entries
const S_IFMT: u32 = 0o170_000;
const S_IFLNK: u32 = 0o120_000;

/// Appends every includable file to the archive, with entry paths relative to
/// the project root using forward slash separators. Directories get an entry
/// only when they are empty, as unpacking would not recreate them otherwise.
struct PackingFiler<'a> {
    policy: &'a dyn StudentFilePolicy,
    root: &'a Path,
    writer: ZipWriter<Cursor<Vec<u8>>>,
    // errors from the directory hook, surfaced after the walk
    failure: Option<LangsError>,
}

impl PackingFiler<'_> {
    fn entry_name(&self, path: &Path) -> Result<String, LangsError> {
        let relative = path.strip_prefix(self.root).unwrap_or(path);
        let mut name = String::new();
        for component in relative.components() {
            let segment = component
                .as_os_str()
                .to_str()
                .ok_or_else(|| LangsError::InvalidUtf8(path.to_path_buf()))?;
            if !name.is_empty() {
                name.push('/');
            }
            name.push_str(segment);
        }
        Ok(name)
    }

    fn add_directory_if_empty(&mut self, dir: &Path) -> Result<(), LangsError> {
        let mut entries =
            std::fs::read_dir(dir).map_err(|e| LangsError::ReadDir(dir.to_path_buf(), e))?;
        if entries.next().is_some() {
            return Ok(());
        }
        let name = self.entry_name(dir)?;
        log::trace!("adding directory {}", name);
        self.writer.add_directory(name, FileOptions::default())?;
        Ok(())
    }
}

impl Filer for PackingFiler<'_> {
    fn decide_on_directory(&mut self, dir: &Path) -> DirectoryDecision {
        if dir == self.root {
            return DirectoryDecision::Continue;
        }
        let relative = dir.strip_prefix(self.root).unwrap_or(dir);
        if !self.policy.may_be_included_in_submission(relative) {
            log::trace!("not includable, pruning {}", relative.display());
            return DirectoryDecision::Prune;
        }
        match self.add_directory_if_empty(dir) {
            Ok(()) => DirectoryDecision::Continue,
            Err(err) => {
                self.failure = Some(err);
                DirectoryDecision::Terminate
            }
        }
    }

    fn visit_file(&mut self, file: &Path) -> Result<(), LangsError> {
        let relative = file.strip_prefix(self.root).unwrap_or(file);
        if !self.policy.may_be_included_in_submission(relative) {
            log::trace!("not includable, skipping {}", relative.display());
            return Ok(());
        }
        let name = self.entry_name(file)?;
        let bytes = file_util::read_file(file)?;
        log::trace!("writing file {}", name);
        self.writer.start_file(name, FileOptions::default())?;
        self.writer
            .write_all(&bytes)
            .map_err(|e| LangsError::ZipWrite(file.to_path_buf(), e))?;
        Ok(())
    }
}

/// Compresses the project into an in-memory zip, honoring the policy's
/// inclusion rules and the standard skippers, plus `.tmcnosubmit` markers.
///
/// Entries appear in the walker's stable order, so the same tree always
/// produces the same archive.
pub fn pack(policy: &dyn StudentFilePolicy, root: &Path) -> Result<Vec<u8>, LangsError> {
    log::debug!("zipping {}", root.display());

    let walker = FileTreeWalker::with_standard_skippers(root)
        .add_skipper(|dir| skip::contains_marker_file(dir, ".tmcnosubmit"));
    let mut filer = PackingFiler {
        policy,
        root,
        writer: ZipWriter::new(Cursor::new(vec![])),
        failure: None,
    };
    walker.traverse(&mut filer)?;
    if let Some(err) = filer.failure {
        return Err(err);
    }
    let cursor = filer.writer.finish()?;
    Ok(cursor.into_inner())
}

/// Merges a raw extraction into the destination. An entry is written unless it
/// would overwrite an on-disk file the policy assigns to the student; paths
/// under `force_update` are always written.
struct ExtractingFiler<'a> {
    policy: &'a dyn StudentFilePolicy,
    source: &'a Path,
    target: &'a Path,
}

impl Filer for ExtractingFiler<'_> {
    fn decide_on_directory(&mut self, dir: &Path) -> DirectoryDecision {
        // recreate directories, including ones with no files in them
        if let Ok(relative) = dir.strip_prefix(self.source) {
            let target_path = self.target.join(relative);
            if !target_path.exists() {
                if let Err(err) = file_util::create_dir_all(&target_path) {
                    log::warn!("failed to create {}: {}", target_path.display(), err);
                }
            }
        }
        DirectoryDecision::Continue
    }

    fn visit_file(&mut self, file: &Path) -> Result<(), LangsError> {
        let relative = match file.strip_prefix(self.source) {
            Ok(relative) => relative,
            Err(_) => return Ok(()),
        };
        let target_path = self.target.join(relative);
        if !self
            .policy
            .should_be_extracted(relative, target_path.exists())
        {
            log::trace!(
                "{} is on disk and belongs to the student, leaving as is",
                target_path.display()
            );
            return Ok(());
        }
        log::trace!("writing {}", target_path.display());
        file_util::copy(file, &target_path)
    }
}

/// Unzips the archive over the destination according to the given policy.
///
/// Entries are first extracted into a temporary directory, skipping unsafe
/// ones (path traversal, absolute paths, symlinks), and then merged with the
/// destination; student files already on disk win. The temporary directory is
/// removed on every exit path.
pub fn unpack(
    policy: &dyn StudentFilePolicy,
    archive: impl Read + Seek,
    target: &Path,
) -> Result<(), LangsError> {
    log::debug!("unzipping to {}", target.display());

    let mut zip_archive = ZipArchive::new(archive)?;
    let temp = tempfile::tempdir().map_err(LangsError::TempDir)?;

    for i in 0..zip_archive.len() {
        let mut file = zip_archive.by_index(i)?;
        let relative = match file.enclosed_name() {
            Some(name) => name.to_path_buf(),
            None => {
                log::warn!("skipping unsafe archive entry {}", file.name());
                continue;
            }
        };
        if let Some(mode) = file.unix_mode() {
            if mode & S_IFMT == S_IFLNK {
                log::warn!("skipping symlink archive entry {}", file.name());
                continue;
            }
        }

        let path_in_temp = temp.path().join(&relative);
        if file.is_dir() {
            file_util::create_dir_all(&path_in_temp)?;
        } else {
            log::trace!("extracting {}", relative.display());
            file_util::read_to_file(&mut file, &path_in_temp)?;
        }
    }

    let mut filer = ExtractingFiler {
        policy,
        source: temp.path(),
        target,
    };
    FileTreeWalker::new(temp.path()).traverse(&mut filer)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod test {
    use super::*;
    use crate::policy::{EverythingIsStudentFilePolicy, NothingIsStudentFilePolicy};
    use crate::project_config::ProjectConfig;
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use walkdir::WalkDir;

    fn init() {
        use log::*;
        use simple_logger::*;
        let _ = SimpleLogger::new().with_level(LevelFilter::Debug).init();
    }

    fn file_to(root: &Path, relative: &str, contents: &str) {
        let target = root.join(relative);
        std::fs::create_dir_all(target.parent().unwrap()).unwrap();
        std::fs::write(target, contents).unwrap();
    }

    fn tree_contents(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
        WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .map(|e| e.unwrap())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                (
                    e.path().strip_prefix(root).unwrap().to_path_buf(),
                    std::fs::read(e.path()).unwrap(),
                )
            })
            .collect()
    }

    struct SrcIsStudentPolicy {
        project_config: ProjectConfig,
    }

    impl StudentFilePolicy for SrcIsStudentPolicy {
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

    #[test]
    fn packs_only_unskipped_files() {
        init();

        let temp = tempfile::tempdir().unwrap();
        file_to(temp.path(), ".git/HEAD", "ref");
        file_to(temp.path(), "target/classes/X.class", "");
        file_to(temp.path(), "src/Main.java", "class Main {}");

        let policy = EverythingIsStudentFilePolicy::new_with_config(ProjectConfig::default());
        let bytes = pack(&policy, temp.path()).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["src/Main.java".to_string()]);
    }

    #[test]
    fn packing_is_reproducible() {
        init();

        let temp = tempfile::tempdir().unwrap();
        file_to(temp.path(), "src/Main.java", "class Main {}");
        file_to(temp.path(), "src/Other.java", "class Other {}");
        file_to(temp.path(), "pom.xml", "<project />");

        let policy = EverythingIsStudentFilePolicy::new_with_config(ProjectConfig::default());
        let first = pack(&policy, temp.path()).unwrap();
        let second = pack(&policy, temp.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn respects_nosubmit_markers() {
        init();

        let temp = tempfile::tempdir().unwrap();
        file_to(temp.path(), "src/Main.java", "class Main {}");
        file_to(temp.path(), "secret/data.txt", "data");
        file_to(temp.path(), "secret/.tmcnosubmit", "");

        let policy = EverythingIsStudentFilePolicy::new_with_config(ProjectConfig::default());
        let bytes = pack(&policy, temp.path()).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert!(archive.by_name("src/Main.java").is_ok());
        assert!(archive.by_name("secret/data.txt").is_err());
    }

    #[test]
    fn respects_inclusion_policy() {
        init();

        struct NoDataPolicy {
            project_config: ProjectConfig,
        }

        impl StudentFilePolicy for NoDataPolicy {
            fn new_with_config(project_config: ProjectConfig) -> Self {
                Self { project_config }
            }

            fn config(&self) -> &ProjectConfig {
                &self.project_config
            }

            fn is_student_source_file(&self, file_path: &Path) -> bool {
                file_path.starts_with("src")
            }

            fn may_be_included_in_submission(&self, file_path: &Path) -> bool {
                !file_path.starts_with("data")
            }
        }

        let temp = tempfile::tempdir().unwrap();
        file_to(temp.path(), "src/Main.java", "class Main {}");
        file_to(temp.path(), "data/huge.csv", "1,2,3");

        let policy = NoDataPolicy::new_with_config(ProjectConfig::default());
        let bytes = pack(&policy, temp.path()).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert!(archive.by_name("src/Main.java").is_ok());
        assert!(archive.by_name("data/huge.csv").is_err());
    }

    #[test]
    fn round_trips_through_an_empty_destination() {
        init();

        let source = tempfile::tempdir().unwrap();
        file_to(source.path(), "src/Main.java", "class Main {}");
        file_to(source.path(), "pom.xml", "<project />");
        file_to(source.path(), "answer.txt", "");
        std::fs::create_dir_all(source.path().join("empty")).unwrap();

        let policy = EverythingIsStudentFilePolicy::new_with_config(ProjectConfig::default());
        let bytes = pack(&policy, source.path()).unwrap();

        let dest = tempfile::tempdir().unwrap();
        let extract_policy =
            NothingIsStudentFilePolicy::new_with_config(ProjectConfig::default());
        unpack(&extract_policy, Cursor::new(bytes), dest.path()).unwrap();

        assert_eq!(tree_contents(source.path()), tree_contents(dest.path()));
        assert!(dest.path().join("empty").is_dir());
    }

    #[test]
    fn preserves_student_edits() {
        init();

        let source = tempfile::tempdir().unwrap();
        file_to(source.path(), "src/answer.txt", "template");
        file_to(source.path(), "Makefile", "all:\n");

        let policy = EverythingIsStudentFilePolicy::new_with_config(ProjectConfig::default());
        let bytes = pack(&policy, source.path()).unwrap();

        let dest = tempfile::tempdir().unwrap();
        file_to(dest.path(), "src/answer.txt", "42");
        file_to(dest.path(), "Makefile", "stale");

        let merge_policy = SrcIsStudentPolicy::new_with_config(ProjectConfig::default());
        unpack(&merge_policy, Cursor::new(bytes), dest.path()).unwrap();

        assert_eq!(
            std::fs::read_to_string(dest.path().join("src/answer.txt")).unwrap(),
            "42"
        );
        assert_eq!(
            std::fs::read_to_string(dest.path().join("Makefile")).unwrap(),
            "all:\n"
        );
    }

    #[test]
    fn force_update_paths_overwrite_student_files() {
        init();

        let source = tempfile::tempdir().unwrap();
        file_to(source.path(), "src/given/Lib.java", "v2");
        file_to(source.path(), "src/Main.java", "template");

        let policy = EverythingIsStudentFilePolicy::new_with_config(ProjectConfig::default());
        let bytes = pack(&policy, source.path()).unwrap();

        let dest = tempfile::tempdir().unwrap();
        file_to(dest.path(), "src/given/Lib.java", "v1, edited");
        file_to(dest.path(), "src/Main.java", "mine");

        let merge_policy = SrcIsStudentPolicy::new_with_config(ProjectConfig {
            force_update: vec![PathBuf::from("src/given")],
            ..Default::default()
        });
        unpack(&merge_policy, Cursor::new(bytes), dest.path()).unwrap();

        assert_eq!(
            std::fs::read_to_string(dest.path().join("src/given/Lib.java")).unwrap(),
            "v2"
        );
        assert_eq!(
            std::fs::read_to_string(dest.path().join("src/Main.java")).unwrap(),
            "mine"
        );
    }

    #[test]
    fn skips_unsafe_entries() {
        init();

        let mut writer = ZipWriter::new(Cursor::new(vec![]));
        writer
            .start_file("../evil", FileOptions::default())
            .unwrap();
        writer.write_all(b"evil").unwrap();
        writer.start_file("fine.txt", FileOptions::default()).unwrap();
        writer.write_all(b"fine").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let parent = tempfile::tempdir().unwrap();
        let dest = parent.path().join("dest");
        std::fs::create_dir_all(&dest).unwrap();

        let policy = NothingIsStudentFilePolicy::new_with_config(ProjectConfig::default());
        unpack(&policy, Cursor::new(bytes), &dest).unwrap();

        assert!(!parent.path().join("evil").exists());
        assert_eq!(
            std::fs::read_to_string(dest.join("fine.txt")).unwrap(),
            "fine"
        );
    }

    #[test]
    fn unpacking_invalid_archive_errors() {
        init();

        let dest = tempfile::tempdir().unwrap();
        let policy = NothingIsStudentFilePolicy::new_with_config(ProjectConfig::default());
        assert!(unpack(&policy, Cursor::new(b"not a zip".to_vec()), dest.path()).is_err());
    }
}
