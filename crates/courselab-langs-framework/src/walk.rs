//! Generic depth-first traversal of an exercise tree, with directory skippers
//! and a pluggable per-file strategy.

use crate::error::LangsError;
use crate::skip::{self, DirectorySkipper};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Returned by a filer when the walker enters a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryDecision {
    /// Descend into the directory.
    Continue,
    /// Skip the directory and everything below it.
    Prune,
    /// Stop the whole traversal.
    Terminate,
}

/// The per-file strategy driven by the walker.
pub trait Filer {
    fn decide_on_directory(&mut self, _dir: &Path) -> DirectoryDecision {
        DirectoryDecision::Continue
    }

    fn visit_file(&mut self, file: &Path) -> Result<(), LangsError>;
}

/// Depth-first walker that consults its skippers before descending into a
/// directory and delegates per-file work to a filer.
///
/// Entries are visited in lexicographic order by path segment, so any output
/// derived from a walk is reproducible for a given tree. IO errors on
/// individual entries are logged and skipped; only failing to read the
/// traversal root is fatal.
pub struct FileTreeWalker {
    root: PathBuf,
    skippers: Vec<DirectorySkipper>,
}

impl FileTreeWalker {
    /// A walker with no skippers; every directory is entered.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            skippers: vec![],
        }
    }

    /// A walker preloaded with the standard skipper set.
    pub fn with_standard_skippers(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            skippers: skip::standard_skippers(),
        }
    }

    pub fn add_skipper(mut self, skipper: impl Fn(&Path) -> bool + 'static) -> Self {
        self.skippers.push(Box::new(skipper));
        self
    }

    fn skip_directory(&self, dir: &Path) -> bool {
        self.skippers.iter().any(|skipper| skipper(dir))
    }

    /// Drives the filer over the tree.
    pub fn traverse(&self, filer: &mut dyn Filer) -> Result<(), LangsError> {
        let mut iter = WalkDir::new(&self.root).sort_by_file_name().into_iter();
        while let Some(entry) = iter.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    if err.depth() == 0 {
                        return Err(LangsError::WalkRoot(self.root.clone(), err));
                    }
                    log::warn!("skipping unreadable entry: {}", err);
                    continue;
                }
            };
            if entry.file_type().is_dir() {
                // the root itself is never skipped
                if entry.depth() > 0 && self.skip_directory(entry.path()) {
                    log::debug!("pruning {}", entry.path().display());
                    iter.skip_current_dir();
                    continue;
                }
                match filer.decide_on_directory(entry.path()) {
                    DirectoryDecision::Continue => {}
                    DirectoryDecision::Prune => iter.skip_current_dir(),
                    DirectoryDecision::Terminate => break,
                }
            } else if entry.file_type().is_file() {
                filer.visit_file(entry.path())?;
            }
            // symlinks and other special files are ignored
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod test {
    use super::*;

    fn init() {
        use log::*;
        use simple_logger::*;
        let _ = SimpleLogger::new().with_level(LevelFilter::Debug).init();
    }

    fn file_to(root: &Path, relative: &str) {
        let target = root.join(relative);
        std::fs::create_dir_all(target.parent().unwrap()).unwrap();
        std::fs::write(target, "").unwrap();
    }

    struct CollectingFiler {
        root: PathBuf,
        visited: Vec<PathBuf>,
        prune: Option<&'static str>,
        terminate_after: Option<usize>,
    }

    impl CollectingFiler {
        fn new(root: &Path) -> Self {
            Self {
                root: root.to_path_buf(),
                visited: vec![],
                prune: None,
                terminate_after: None,
            }
        }
    }

    impl Filer for CollectingFiler {
        fn decide_on_directory(&mut self, dir: &Path) -> DirectoryDecision {
            if let Some(prune) = self.prune {
                if dir.file_name().map(|n| n == prune).unwrap_or_default() {
                    return DirectoryDecision::Prune;
                }
            }
            if let Some(limit) = self.terminate_after {
                if self.visited.len() >= limit {
                    return DirectoryDecision::Terminate;
                }
            }
            DirectoryDecision::Continue
        }

        fn visit_file(&mut self, file: &Path) -> Result<(), LangsError> {
            self.visited
                .push(file.strip_prefix(&self.root).unwrap().to_path_buf());
            Ok(())
        }
    }

    #[test]
    fn visits_in_stable_order() {
        init();

        let temp = tempfile::tempdir().unwrap();
        for relative in ["b/2", "b/1", "a/z", "a/1", "c", "a/b/c"] {
            file_to(temp.path(), relative);
        }

        let walker = FileTreeWalker::new(temp.path());
        let mut first = CollectingFiler::new(temp.path());
        walker.traverse(&mut first).unwrap();
        let mut second = CollectingFiler::new(temp.path());
        walker.traverse(&mut second).unwrap();

        let expected: Vec<PathBuf> = ["a/1", "a/b/c", "a/z", "b/1", "b/2", "c"]
            .iter()
            .map(PathBuf::from)
            .collect();
        assert_eq!(first.visited, expected);
        assert_eq!(first.visited, second.visited);
    }

    #[test]
    fn skippers_prune_subtrees() {
        init();

        let temp = tempfile::tempdir().unwrap();
        file_to(temp.path(), ".git/HEAD");
        file_to(temp.path(), "target/classes/Main.class");
        file_to(temp.path(), "src/Main.java");

        let walker = FileTreeWalker::with_standard_skippers(temp.path());
        let mut filer = CollectingFiler::new(temp.path());
        walker.traverse(&mut filer).unwrap();

        assert_eq!(filer.visited, vec![PathBuf::from("src/Main.java")]);
    }

    #[test]
    fn hidden_root_is_not_skipped() {
        init();

        // temp dirs are dot-prefixed on some platforms; the root must still be entered
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join(".exercise");
        file_to(&root, "src/Main.java");

        let walker = FileTreeWalker::with_standard_skippers(&root);
        let mut filer = CollectingFiler::new(&root);
        walker.traverse(&mut filer).unwrap();

        assert_eq!(filer.visited, vec![PathBuf::from("src/Main.java")]);
    }

    #[test]
    fn filer_can_prune() {
        init();

        let temp = tempfile::tempdir().unwrap();
        file_to(temp.path(), "keep/file");
        file_to(temp.path(), "skipped/file");

        let walker = FileTreeWalker::new(temp.path());
        let mut filer = CollectingFiler::new(temp.path());
        filer.prune = Some("skipped");
        walker.traverse(&mut filer).unwrap();

        assert_eq!(filer.visited, vec![PathBuf::from("keep/file")]);
    }

    #[test]
    fn filer_can_terminate() {
        init();

        let temp = tempfile::tempdir().unwrap();
        file_to(temp.path(), "a/file");
        file_to(temp.path(), "z/file");

        let walker = FileTreeWalker::new(temp.path());
        let mut filer = CollectingFiler::new(temp.path());
        filer.terminate_after = Some(1);
        walker.traverse(&mut filer).unwrap();

        assert_eq!(filer.visited, vec![PathBuf::from("a/file")]);
    }

    #[test]
    fn unreadable_root_is_fatal() {
        init();

        let walker = FileTreeWalker::new("nonexistent");
        let mut filer = CollectingFiler::new(Path::new("nonexistent"));
        assert!(walker.traverse(&mut filer).is_err());
    }
}
