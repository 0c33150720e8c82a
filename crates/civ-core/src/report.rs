use std::path::PathBuf;

use thiserror::Error;

use crate::error::LintError;
use crate::outcome::ValidationOutcome;

/// Result of validating one input path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: ValidationOutcome,
    /// Empty when `outcome` is `Pass`.
    pub diagnostics: Vec<String>,
}

impl FileReport {
    pub fn pass(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            outcome: ValidationOutcome::Pass,
            diagnostics: vec![],
        }
    }

    pub fn from_error(path: impl Into<PathBuf>, err: &LintError) -> Self {
        Self {
            path: path.into(),
            outcome: err.outcome(),
            diagnostics: err.diagnostics(),
        }
    }

    /// Status line followed by one ` - ` line per diagnostic.
    pub fn render(&self) -> String {
        let mut out = format!("{}: {}\n", self.outcome.label(), self.path.display());
        if self.outcome != ValidationOutcome::Pass {
            for d in &self.diagnostics {
                out.push_str(" - ");
                out.push_str(d);
                out.push('\n');
            }
        }
        out
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("no files were validated")]
pub struct EmptyRun;

/// Overall outcome of a run: the most severe per-file outcome.
pub fn aggregate<'a, I>(reports: I) -> Result<ValidationOutcome, EmptyRun>
where
    I: IntoIterator<Item = &'a FileReport>,
{
    reports.into_iter().map(|r| r.outcome).max().ok_or(EmptyRun)
}
