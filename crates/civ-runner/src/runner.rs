use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use civ_core::{
    aggregate, ClientIdentity, EndpointConfig, FileReport, LintError, ValidationOutcome,
    AUTH_FAILURE_EXIT_CODE,
};
use civ_document::check_local;
use civ_remote::LintTransport;

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// Every path was validated.
    Completed {
        reports: Vec<FileReport>,
        overall: ValidationOutcome,
    },
    /// The endpoint rejected our credentials while validating `path`;
    /// later paths were not attempted.
    Aborted {
        reports: Vec<FileReport>,
        path: PathBuf,
        error: LintError,
    },
}

impl RunOutcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            RunOutcome::Completed { overall, .. } => overall.exit_code(),
            RunOutcome::Aborted { .. } => AUTH_FAILURE_EXIT_CODE,
        }
    }

    pub fn reports(&self) -> &[FileReport] {
        match self {
            RunOutcome::Completed { reports, .. } | RunOutcome::Aborted { reports, .. } => reports,
        }
    }
}

/// Sequential validation loop: local checks, then the lint endpoint, one
/// file at a time in the order given.
pub struct Runner<T> {
    pub endpoint: EndpointConfig,
    pub identity: ClientIdentity,
    pub transport: T,
}

impl<T: LintTransport> Runner<T> {
    pub fn new(endpoint: EndpointConfig, identity: ClientIdentity, transport: T) -> Self {
        Self {
            endpoint,
            identity,
            transport,
        }
    }

    /// Validate a single file. `Ok` means it passed.
    pub async fn validate_file(&self, path: &Path) -> Result<(), LintError> {
        let doc = check_local(path)?;
        civ_remote::validate(&self.endpoint, &self.identity, &self.transport, &doc.content).await?;
        Ok(())
    }

    /// Validate `paths` and write each file's report block to `out` as soon
    /// as it is known.
    pub async fn run<W: Write>(&self, paths: &[PathBuf], out: &mut W) -> Result<RunOutcome> {
        tracing::info!(files = paths.len(), host = %self.endpoint.display_host(), "validating");

        let mut reports = Vec::with_capacity(paths.len());
        for path in paths {
            let report = match self.validate_file(path).await {
                Ok(()) => FileReport::pass(path),
                Err(error) if error.is_terminal() => {
                    out.write_all(auth_guidance(&error).as_bytes())?;
                    out.flush()?;
                    tracing::info!(path = %path.display(), "run aborted: authentication failed");
                    return Ok(RunOutcome::Aborted {
                        reports,
                        path: path.clone(),
                        error,
                    });
                }
                Err(error) => FileReport::from_error(path, &error),
            };
            out.write_all(report.render().as_bytes())?;
            reports.push(report);
        }
        out.flush()?;

        let overall = aggregate(&reports)?;
        tracing::info!(%overall, "run complete");
        Ok(RunOutcome::Completed { reports, overall })
    }
}

fn auth_guidance(error: &LintError) -> String {
    let mut msg = format!(
        "{error}. See --help on how to provide an identity if you have not already, \
         otherwise double check your basic auth or token.\n"
    );
    if let LintError::Auth { message, .. } = error {
        if !message.is_empty() {
            msg.push_str(&format!("message from server: {message}\n"));
        }
    }
    msg
}
