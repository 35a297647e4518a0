//! Contains utilities for parsing annotated exercise source files, separating
//! lines into strings, stubs and solutions so that they can be filtered when
//! building the exercise variants.

use crate::error::LangsError;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::io::{BufRead, BufReader, Read};

// rules for finding comments in the supported source file families
static META_SYNTAXES_C: Lazy<[MetaSyntax; 2]> = Lazy::new(|| {
    [
        MetaSyntax::new("//", None),
        MetaSyntax::new(r"/\*", Some(r"\*/")),
    ]
});
static META_SYNTAXES_XML: Lazy<[MetaSyntax; 1]> =
    Lazy::new(|| [MetaSyntax::new("<!--", Some("-->"))]);
static META_SYNTAXES_HASH: Lazy<[MetaSyntax; 1]> = Lazy::new(|| [MetaSyntax::new("#", None)]);

/// Used to classify lines of code based on the annotations in the file.
#[derive(Debug, PartialEq, Eq)]
pub enum MetaString {
    /// Line that belongs to both the stub and the solution.
    String(String),
    /// Line that is only emitted into the stub.
    Stub(String),
    /// Line that is only emitted into the solution.
    Solution(String),
    /// Marker that excludes the whole file from the stub.
    SolutionFileMarker,
}

/// Contains the regexes for one comment syntax.
#[derive(Debug)]
struct MetaSyntax {
    solution_file: Regex,
    solution_begin: Regex,
    solution_end: Regex,
    stub_begin: Regex,
    stub_end: Regex,
}

#[allow(clippy::unwrap_used)]
impl MetaSyntax {
    fn new(comment_start: &'static str, comment_end: Option<&'static str>) -> Self {
        // comment patterns
        let comment_start_pattern = format!(r"^(\s*){comment_start}\s*");
        let comment_end_pattern = match comment_end {
            Some(s) => format!(r"(.*){s}\s*"),
            None => "(.*)".to_string(),
        };

        // directive patterns; the directive words are case-insensitive
        let solution_file = Regex::new(&format!(
            r"{comment_start_pattern}(?i:SOLUTION\s+FILE){comment_end_pattern}"
        ))
        .unwrap();
        let solution_begin = Regex::new(&format!(
            r"{comment_start_pattern}(?i:BEGIN\s+SOLUTION){comment_end_pattern}"
        ))
        .unwrap();
        let solution_end = Regex::new(&format!(
            r"{comment_start_pattern}(?i:END\s+SOLUTION){comment_end_pattern}"
        ))
        .unwrap();
        let stub_begin =
            Regex::new(&format!(r"{comment_start_pattern}(?i:STUB:)[\s&&[^\n]]*")).unwrap();
        let stub_end = Regex::new(&comment_end_pattern).unwrap();

        Self {
            solution_file,
            solution_begin,
            solution_end,
            stub_begin,
            stub_end,
        }
    }
}

/// Parses a given text file into an iterator of `MetaString`s.
///
/// Directive errors (mismatched or nested markers, end of file inside a
/// region) are surfaced as `MalformedDirective` with the offending line
/// number, after which the iterator fuses.
#[derive(Debug)]
pub struct MetaSyntaxParser<B: BufRead> {
    meta_syntaxes: &'static [MetaSyntax],
    reader: B,
    line: usize,
    // contains the syntax that started the current stub block
    // used to make sure only the appropriate terminator ends the block
    in_stub: Option<&'static MetaSyntax>,
    in_solution: bool,
    failed: bool,
}

impl<R: Read> MetaSyntaxParser<BufReader<R>> {
    pub fn new(target: R, target_extension: &str) -> Self {
        let reader = BufReader::new(target);
        // assigns each supported file extension the proper comment syntax
        let meta_syntaxes: &[MetaSyntax] = match target_extension {
            "java" | "c" | "cpp" | "h" | "hpp" | "js" | "css" | "rs" => &*META_SYNTAXES_C,
            "xml" | "html" => &*META_SYNTAXES_XML,
            "properties" | "py" | "R" => &*META_SYNTAXES_HASH,
            _ => &[],
        };

        Self {
            meta_syntaxes,
            reader,
            line: 0,
            in_stub: None,
            in_solution: false,
            failed: false,
        }
    }
}

impl<B: BufRead> MetaSyntaxParser<B> {
    fn fail(&mut self, reason: impl Into<String>) -> Option<Result<MetaString, LangsError>> {
        self.failed = true;
        Some(Err(LangsError::MalformedDirective {
            line: self.line,
            reason: reason.into(),
        }))
    }
}

// iterates through the lines in the underlying file, parsing them to MetaStrings
impl<B: BufRead> Iterator for MetaSyntaxParser<B> {
    type Item = Result<MetaString, LangsError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let mut raw_line: Vec<u8> = Vec::new();
        match self.reader.read_until(b'\n', &mut raw_line) {
            // read 0 bytes = reader empty = iterator empty
            Ok(0) => {
                if self.in_solution {
                    return self.fail("end of file inside a solution block");
                }
                if self.in_stub.is_some() {
                    return self.fail("end of file inside a stub block");
                }
                None
            }
            Ok(_) => {
                self.line += 1;
                let s = String::from_utf8_lossy(&raw_line).to_string();

                // inside a solution block, the only valid directive is the terminator
                if self.in_solution {
                    for meta_syntax in self.meta_syntaxes {
                        if meta_syntax.solution_end.is_match(&s) {
                            log::trace!("solution end: '{}'", s);
                            self.in_solution = false;
                            return self.next();
                        }
                        if meta_syntax.solution_begin.is_match(&s) {
                            return self.fail("BEGIN SOLUTION inside a solution block");
                        }
                        if meta_syntax.solution_file.is_match(&s) {
                            return self.fail("SOLUTION FILE inside a solution block");
                        }
                        if meta_syntax.stub_begin.is_match(&s) {
                            // stub directives inside a solution block are dropped
                            return self.next();
                        }
                    }
                    log::trace!("solution: '{}'", s);
                    return Some(Ok(MetaString::Solution(s)));
                }

                // inside a stub block, only the terminator of the syntax that
                // started the block ends it
                if let Some(stub_syntax) = self.in_stub {
                    for meta_syntax in self.meta_syntaxes {
                        if meta_syntax.solution_begin.is_match(&s)
                            || meta_syntax.solution_end.is_match(&s)
                            || meta_syntax.solution_file.is_match(&s)
                        {
                            return self.fail("solution directive inside a stub block");
                        }
                    }
                    if stub_syntax.stub_end.is_match(&s) {
                        log::trace!("stub end: '{}'", s);
                        self.in_stub = None;
                        let s = stub_syntax
                            .stub_end
                            .replace(&s, |caps: &Captures| caps[1].to_string())
                            .to_string();
                        if s.trim().is_empty() {
                            // only metadata, skip
                            return self.next();
                        }
                        return Some(Ok(MetaString::Stub(s)));
                    }
                    log::trace!("stub: '{}'", s);
                    return Some(Ok(MetaString::Stub(s)));
                }

                // no open region: check the line against each syntax
                for meta_syntax in self.meta_syntaxes {
                    if meta_syntax.stub_begin.is_match(&s) {
                        log::trace!("stub start: '{}'", s);
                        // remove the stub marker, keeping the indentation
                        let stripped = meta_syntax
                            .stub_begin
                            .replace(&s, |caps: &Captures| caps[1].to_string())
                            .to_string();
                        if meta_syntax.stub_end.is_match(&stripped) {
                            // one line stub
                            let content = meta_syntax
                                .stub_end
                                .replace(&stripped, |caps: &Captures| caps[1].to_string())
                                .to_string();
                            if content.trim().is_empty() {
                                // empty oneliner stubs are replaced by a newline
                                return Some(Ok(MetaString::Stub("\n".to_string())));
                            }
                            return Some(Ok(MetaString::Stub(content)));
                        }
                        // block stub: the following lines belong to the stub
                        self.in_stub = Some(meta_syntax);
                        if stripped.trim().is_empty() {
                            // only metadata, skip
                            return self.next();
                        }
                        return Some(Ok(MetaString::Stub(stripped)));
                    }
                    if meta_syntax.solution_file.is_match(&s) {
                        log::trace!("solution file marker");
                        return Some(Ok(MetaString::SolutionFileMarker));
                    }
                    if meta_syntax.solution_begin.is_match(&s) {
                        log::trace!("solution begin: '{}'", s);
                        self.in_solution = true;
                        return self.next();
                    }
                    if meta_syntax.solution_end.is_match(&s) {
                        return self.fail("END SOLUTION without a matching BEGIN SOLUTION");
                    }
                }
                log::trace!("string: '{}'", s);
                Some(Ok(MetaString::String(s)))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(LangsError::ReadLine(err)))
            }
        }
    }
}
