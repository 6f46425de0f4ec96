//! Batch validation of candidate output names.
//!
//! Checks a whole batch of candidate names against a target platform's
//! rules. The first failing candidate short-circuits the scan and becomes
//! the single reported error, but the batch is always scanned separately
//! for exact duplicates, and a candidate that merely shares the input
//! file's name is surfaced as a non-blocking warning.
//!
//! This module emits typed kinds, not presentation strings; the UI layer
//! localizes from the kind.

use std::path::{Component, Path, PathBuf};

use crate::models::Platform;

/// Windows MAX_PATH minus the terminator.
const MAX_PATH_CHARS: usize = 259;

/// Classification of a path problem, for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathProblemKind {
    NoInput,
    EmptyName,
    InvalidChar,
    SameAsInput,
    TrailingWhitespaceOrDot,
    PathTooLong,
    Duplicate,
}

/// A blocking problem with a batch of candidate names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathProblem {
    /// No input file is open, so nothing can be planned.
    #[error("No input file is open")]
    NoInput,

    /// A candidate contains a character the platform forbids.
    #[error("Name #{index} contains a character that is not allowed: {ch:?}")]
    InvalidChar { index: usize, ch: char },

    /// A candidate is empty.
    #[error("Name #{index} is empty")]
    EmptyName { index: usize },

    /// A candidate resolves to the input file itself.
    #[error("Name #{index} resolves to the input file path")]
    SameAsInput { index: usize },

    /// A candidate ends with whitespace or a dot.
    #[error("Name #{index} ends with whitespace or a dot")]
    TrailingWhitespaceOrDot { index: usize },

    /// The full output path exceeds the platform limit.
    #[error("Path for name #{index} is {length} characters; the limit is 259")]
    PathTooLong { index: usize, length: usize },

    /// Two candidates are exactly equal.
    #[error("Names #{first} and #{second} are identical")]
    Duplicate { first: usize, second: usize },
}

impl PathProblem {
    /// The typed kind for this problem.
    pub fn kind(&self) -> PathProblemKind {
        match self {
            PathProblem::NoInput => PathProblemKind::NoInput,
            PathProblem::InvalidChar { .. } => PathProblemKind::InvalidChar,
            PathProblem::EmptyName { .. } => PathProblemKind::EmptyName,
            PathProblem::SameAsInput { .. } => PathProblemKind::SameAsInput,
            PathProblem::TrailingWhitespaceOrDot { .. } => {
                PathProblemKind::TrailingWhitespaceOrDot
            }
            PathProblem::PathTooLong { .. } => PathProblemKind::PathTooLong,
            PathProblem::Duplicate { .. } => PathProblemKind::Duplicate,
        }
    }
}

/// Non-blocking notice: a candidate shares the input file's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SameNameWarning {
    /// Index of the candidate.
    pub index: usize,
    /// The shared file name.
    pub file_name: String,
}

/// Outcome of validating one batch of candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// First per-candidate problem found, if any.
    pub error: Option<PathProblem>,
    /// Exact-duplicate problem, scanned independently of `error`.
    pub duplicate: Option<PathProblem>,
    /// Non-blocking same-name-as-input notice.
    pub warning: Option<SameNameWarning>,
}

impl ValidationReport {
    /// Whether the batch is usable as-is (warnings do not block).
    pub fn is_ok(&self) -> bool {
        self.error.is_none() && self.duplicate.is_none()
    }

    /// The problem that should block the plan, if any.
    pub fn blocking_problem(&self) -> Option<&PathProblem> {
        self.error.as_ref().or(self.duplicate.as_ref())
    }
}

/// Validator for a batch of candidate output names.
pub struct PathValidator<'a> {
    original_file: Option<&'a Path>,
    output_dir: &'a Path,
    platform: Platform,
    safe_mode: bool,
    diagnostics: bool,
}

impl<'a> PathValidator<'a> {
    /// Create a validator. Safe mode is on by default; diagnostics mode
    /// (which applies the Windows-only checks everywhere) is off.
    pub fn new(
        original_file: Option<&'a Path>,
        output_dir: &'a Path,
        platform: Platform,
    ) -> Self {
        Self {
            original_file,
            output_dir,
            platform,
            safe_mode: true,
            diagnostics: false,
        }
    }

    /// Enable or disable safe mode (forbids the path separator in names).
    pub fn with_safe_mode(mut self, yes: bool) -> Self {
        self.safe_mode = yes;
        self
    }

    /// Apply the Windows-only checks regardless of platform.
    pub fn with_diagnostics(mut self, yes: bool) -> Self {
        self.diagnostics = yes;
        self
    }

    /// Validate a batch of candidate names.
    pub fn validate(&self, candidates: &[String]) -> ValidationReport {
        ValidationReport {
            error: self.first_problem(candidates),
            duplicate: find_duplicate(candidates),
            warning: self.same_name_warning(candidates),
        }
    }

    /// Scan candidates in order, stopping at the first problem.
    fn first_problem(&self, candidates: &[String]) -> Option<PathProblem> {
        for (index, name) in candidates.iter().enumerate() {
            let original = match self.original_file {
                Some(path) => path,
                None => return Some(PathProblem::NoInput),
            };

            if let Some(ch) = name.chars().find(|&c| self.is_illegal_char(c)) {
                return Some(PathProblem::InvalidChar { index, ch });
            }

            if name.is_empty() {
                return Some(PathProblem::EmptyName { index });
            }

            let full = normalize_lexically(&self.output_dir.join(name));
            if full == normalize_lexically(original) {
                return Some(PathProblem::SameAsInput { index });
            }

            if self.platform == Platform::Windows || self.diagnostics {
                if name.ends_with(|c: char| c.is_whitespace() || c == '.') {
                    return Some(PathProblem::TrailingWhitespaceOrDot { index });
                }

                let length = full.to_string_lossy().chars().count();
                if length >= MAX_PATH_CHARS {
                    return Some(PathProblem::PathTooLong { index, length });
                }
            }
        }
        None
    }

    fn is_illegal_char(&self, c: char) -> bool {
        if self.safe_mode && self.is_separator(c) {
            return true;
        }
        match self.platform {
            Platform::Windows => ['<', '>', ':', '"', '|', '?', '*'].contains(&c),
            Platform::MacOs => c == ':',
            Platform::Linux => false,
        }
    }

    /// Path separators for the target platform. Windows accepts both; on
    /// unix a backslash is an ordinary file-name character.
    fn is_separator(&self, c: char) -> bool {
        c == '/' || (self.platform == Platform::Windows && c == '\\')
    }

    /// A candidate whose final component equals the input file's name is
    /// legal but usually a mistake, so it is surfaced as a warning.
    fn same_name_warning(&self, candidates: &[String]) -> Option<SameNameWarning> {
        let original = self.original_file?.file_name()?.to_string_lossy();
        candidates.iter().enumerate().find_map(|(index, name)| {
            let last = name
                .rsplit(|c: char| self.is_separator(c))
                .next()
                .unwrap_or(name);
            (last == original).then(|| SameNameWarning {
                index,
                file_name: last.to_string(),
            })
        })
    }
}

/// Find the first exact-string duplicate pair in the batch.
fn find_duplicate(candidates: &[String]) -> Option<PathProblem> {
    for (second, name) in candidates.iter().enumerate() {
        if let Some(first) = candidates[..second].iter().position(|n| n == name) {
            return Some(PathProblem::Duplicate { first, second });
        }
    }
    None
}

/// Purely lexical normalization: drops `.` components and resolves `..`
/// against preceding components. No filesystem access.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
