use std::path::PathBuf;

use thiserror::Error;

use crate::outcome::ValidationOutcome;

/// Everything that can stop a single document from passing.
///
/// Each variant maps onto exactly one [`ValidationOutcome`], except `Auth`,
/// which the run loop treats as terminal for the whole run.
#[derive(Debug, Error)]
pub enum LintError {
    #[error("failed to read {}: {source}", path.display())]
    LocalIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: file name does not end with .yml; the lint endpoint only accepts .yml files", path.display())]
    UnsupportedExtension { path: PathBuf },
    #[error("{0}")]
    LocalSyntax(String),
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Service(String),
    #[error("HTTP {status} received from {host}, authentication is required")]
    Auth {
        status: u16,
        host: String,
        message: String,
    },
    #[error("lint endpoint reported {} error(s)", .0.len())]
    RemoteContent(Vec<String>),
}

impl LintError {
    pub fn outcome(&self) -> ValidationOutcome {
        match self {
            LintError::LocalIo { .. }
            | LintError::UnsupportedExtension { .. }
            | LintError::LocalSyntax(_)
            | LintError::RemoteContent(_) => ValidationOutcome::HardFail,
            LintError::Transport(_) | LintError::Service(_) | LintError::Auth { .. } => {
                ValidationOutcome::SoftFail
            }
        }
    }

    /// True when no further file should be attempted in this run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LintError::Auth { .. })
    }

    /// Human-readable lines attached to the file's report.
    pub fn diagnostics(&self) -> Vec<String> {
        match self {
            LintError::RemoteContent(errors) => errors.clone(),
            other => vec![other.to_string()],
        }
    }
}
