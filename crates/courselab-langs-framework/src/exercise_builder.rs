//! Builds the stub and solution variants of an exercise tree.

use crate::error::LangsError;
use crate::file_util;
use crate::meta_syntax::{MetaString, MetaSyntaxParser};
use crate::skip;
use crate::walk::{FileTreeWalker, Filer};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

// file extensions that are copied as-is instead of being run through the directive parser
#[allow(clippy::unwrap_used)]
static NON_TEXT_TYPES: Lazy<Regex> =
    Lazy::new(|| Regex::new("class|jar|exe|jpg|jpeg|gif|png|zip|tar|gz|db|bin|csv|tsv|^$").unwrap());

/// Selects which variant of the exercise is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
    Stub,
    Solution,
}

/// Routes text files through the directive parser in the requested mode and
/// writes the filtered result into the destination; other files are copied
/// byte for byte.
struct ExerciseBuildFiler<'a> {
    variant: Variant,
    source: &'a Path,
    dest: &'a Path,
    // the first malformed source file; surfaced once the rest of the tree has been processed
    failure: Option<LangsError>,
}

impl Filer for ExerciseBuildFiler<'_> {
    fn visit_file(&mut self, file: &Path) -> Result<(), LangsError> {
        let relative = file.strip_prefix(self.source).unwrap_or(file);
        let dest_path = self.dest.join(relative);

        let extension = file.extension().and_then(|e| e.to_str()).unwrap_or_default();
        if NON_TEXT_TYPES.is_match(extension) {
            log::debug!(
                "copying binary file {} to {}",
                file.display(),
                dest_path.display()
            );
            return file_util::copy(file, &dest_path);
        }

        let source_file = file_util::open_file(file)?;
        let parser = MetaSyntaxParser::new(source_file, extension);
        let parsed = match parser.collect::<Result<Vec<MetaString>, _>>() {
            Ok(parsed) => parsed,
            Err(err @ LangsError::MalformedDirective { .. }) => {
                log::error!("malformed directive in {}: {}", file.display(), err);
                if self.failure.is_none() {
                    self.failure =
                        Some(LangsError::SourceFilter(file.to_path_buf(), Box::new(err)));
                }
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        // files marked as solution files have no stub
        if self.variant == Variant::Stub
            && parsed
                .iter()
                .any(|ms| matches!(ms, MetaString::SolutionFileMarker))
        {
            log::debug!("omitting solution file {}", file.display());
            return Ok(());
        }

        let mut output = vec![];
        for line in parsed {
            match line {
                MetaString::SolutionFileMarker => {}
                MetaString::Solution(_) if self.variant == Variant::Stub => {}
                MetaString::Stub(_) if self.variant == Variant::Solution => {}
                MetaString::String(s) | MetaString::Stub(s) | MetaString::Solution(s) => {
                    output.extend(s.as_bytes())
                }
            }
        }
        log::debug!("filtered {} to {}", file.display(), dest_path.display());
        file_util::write_to_file(&output, &dest_path)
    }
}

/// Walks the exercise tree, processing files and copying them into the destination.
///
/// Skips hidden directories, version control metadata, build output and
/// directories with a `.tmcignore` file in their root. Binary files are copied
/// without extra processing, while text files are parsed to elide solution
/// blocks and emit stub lines in their place; files marked as solution files
/// are omitted entirely.
///
/// A malformed directive fails the build, but only after the remaining files
/// have been emitted.
pub fn prepare_stub(exercise_path: &Path, dest_root: &Path) -> Result<(), LangsError> {
    prepare_variant(Variant::Stub, exercise_path, dest_root)
}

/// Walks the exercise tree, processing files and copying them into the destination.
///
/// Skips the same directories as `prepare_stub`. Text files are parsed to
/// elide stub lines and directive markers, keeping solution blocks and files
/// marked as solution files.
pub fn prepare_solution(exercise_path: &Path, dest_root: &Path) -> Result<(), LangsError> {
    prepare_variant(Variant::Solution, exercise_path, dest_root)
}

fn prepare_variant(variant: Variant, source: &Path, dest_root: &Path) -> Result<(), LangsError> {
    log::info!(
        "preparing {:?} from {} into {}",
        variant,
        source.display(),
        dest_root.display()
    );

    let walker = FileTreeWalker::with_standard_skippers(source)
        .add_skipper(|dir| skip::contains_marker_file(dir, ".tmcignore"));
    let mut filer = ExerciseBuildFiler {
        variant,
        source,
        dest: dest_root,
        failure: None,
    };
    walker.traverse(&mut filer)?;
    match filer.failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
