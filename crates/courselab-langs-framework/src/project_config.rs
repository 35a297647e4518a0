//! Contains a struct that models the optional per-project configuration file.

use crate::file_util;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File name of the per-project configuration, resolved against the project root.
pub const CONFIG_FILE_NAME: &str = ".tmcproject.yml";

/// Extra data from a `.tmcproject.yml` file.
///
/// The file is optional. All of its fields expand on the built-in rules of the
/// project's student file policy; unknown fields are ignored.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ProjectConfig {
    /// Paths, relative to the project root, that belong to the student even
    /// though the built-in policy would classify them as exercise files.
    #[serde(default)]
    pub extra_student_files: Vec<PathBuf>,

    /// Paths that are overwritten on every extraction, even when the policy
    /// would classify them as student files.
    #[serde(default)]
    pub force_update: Vec<PathBuf>,
}

impl ProjectConfig {
    pub fn path_in(project_dir: &Path) -> PathBuf {
        project_dir.join(CONFIG_FILE_NAME)
    }

    /// Loads the config from the given project root.
    ///
    /// A missing, unreadable, empty or malformed file degrades to the default
    /// config; problems are logged but never fatal.
    pub fn load_or_default(project_dir: &Path) -> Self {
        let config_path = Self::path_in(project_dir);
        if !config_path.exists() {
            log::trace!("no config found at {}", config_path.display());
            return Self::default();
        }
        log::debug!("reading config from {}", config_path.display());
        let file = match file_util::open_file(&config_path) {
            Ok(file) => file,
            Err(err) => {
                log::warn!("failed to open {}: {}", config_path.display(), err);
                return Self::default();
            }
        };
        match serde_yaml::from_reader(file) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("failed to parse {}: {}", config_path.display(), err);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod test {
    use super::*;
    use std::io::Write;

    fn init() {
        use log::*;
        use simple_logger::*;
        let _ = SimpleLogger::new().with_level(LevelFilter::Debug).init();
    }

    #[test]
    fn parses_extra_student_files() {
        init();

        let temp = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(temp.path().join(CONFIG_FILE_NAME)).unwrap();
        file.write_all(
            r#"
extra_student_files:
  - test/StudentTest.java
  - test/OtherTest.java
"#
            .as_bytes(),
        )
        .unwrap();

        let config = ProjectConfig::load_or_default(temp.path());
        assert_eq!(
            config.extra_student_files[0],
            PathBuf::from("test/StudentTest.java")
        );
        assert_eq!(
            config.extra_student_files[1],
            PathBuf::from("test/OtherTest.java")
        );
        assert!(config.force_update.is_empty());
    }

    #[test]
    fn missing_file_is_default() {
        init();

        let temp = tempfile::tempdir().unwrap();
        let config = ProjectConfig::load_or_default(temp.path());
        assert!(config.extra_student_files.is_empty());
        assert!(config.force_update.is_empty());
    }

    #[test]
    fn malformed_file_is_default() {
        init();

        let temp = tempfile::tempdir().unwrap();
        std::fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "extra_student_files: {not: [a, list",
        )
        .unwrap();

        let config = ProjectConfig::load_or_default(temp.path());
        assert!(config.extra_student_files.is_empty());
    }

    #[test]
    fn empty_file_is_default() {
        init();

        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join(CONFIG_FILE_NAME), "").unwrap();

        let config = ProjectConfig::load_or_default(temp.path());
        assert!(config.extra_student_files.is_empty());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        init();

        let temp = tempfile::tempdir().unwrap();
        std::fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            r#"
extra_student_files:
  - notes.txt
tests_timeout_ms: 10000
"#,
        )
        .unwrap();

        let config = ProjectConfig::load_or_default(temp.path());
        assert_eq!(config.extra_student_files[0], PathBuf::from("notes.txt"));
    }
}
