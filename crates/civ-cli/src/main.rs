use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use civ_core::{ClientIdentity, PayloadShape, TokenPlacement};
use civ_remote::ReqwestTransport;
use civ_runner::{resolve_endpoint, FileConfig, Overrides, Runner};

/// Usage and configuration problems share the hard-failure status.
const USAGE_EXIT_CODE: u8 = 1;

#[derive(Parser, Debug)]
#[command(
    name = "gitlab-ci-validate",
    version,
    about = "Validate GitLab CI files against a GitLab instance's lint API",
    after_help = "Exit status: 0 all files passed, 1 at least one file is invalid \
                  (or authentication failed), 2 some files could not be validated."
)]
struct Cli {
    /// GitLab instance used to validate the files
    #[arg(long, env = "GITLAB_HOST")]
    host: Option<String>,

    /// GitLab API access token
    #[arg(long, env = "GITLAB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// GitLab project ID; selects the project-scoped lint endpoint
    #[arg(long, env = "GITLAB_PROJECT_ID")]
    project_id: Option<String>,

    /// Request body encoding: json or form
    #[arg(long, env = "GITLAB_LINT_PAYLOAD")]
    payload: Option<PayloadShape>,

    /// Where the token is sent: query or header
    #[arg(long)]
    token_in: Option<TokenPlacement>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// TOML file with defaults for the options above
    #[arg(long, env = "GITLAB_CI_VALIDATE_CONFIG")]
    config: Option<PathBuf>,

    /// Files to validate, in order
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            host: self.host.clone(),
            token: self.token.clone(),
            project_id: self.project_id.clone(),
            payload: self.payload,
            token_in: self.token_in,
            timeout_secs: self.timeout_secs,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(USAGE_EXIT_CODE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(USAGE_EXIT_CODE)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<u8> {
    let file_cfg = match &cli.config {
        Some(path) => {
            let cfg = FileConfig::load_from(path)?;
            tracing::debug!(config = %path.display(), "loaded config file");
            cfg
        }
        None => FileConfig::default(),
    };
    let endpoint = resolve_endpoint(&cli.overrides(), &file_cfg)?;
    let identity = ClientIdentity::new("gitlab-ci-validate", env!("CARGO_PKG_VERSION"));
    let transport = ReqwestTransport::new(endpoint.timeout).context("create HTTP transport")?;

    let runner = Runner::new(endpoint, identity, transport);
    let mut stderr = std::io::stderr();
    let outcome = runner.run(&cli.files, &mut stderr).await?;
    Ok(outcome.exit_code())
}
