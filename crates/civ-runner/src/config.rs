use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use civ_core::{EndpointConfig, PayloadShape, TokenPlacement, DEFAULT_HOST};

/// Optional TOML file with the same knobs as the command line.
///
/// ```toml
/// host = "https://gitlab.example.com"
/// token = "glpat-..."
/// project_id = "1234"
/// payload = "json"      # or "form"
/// token_in = "query"    # or "header"
/// timeout_secs = 30
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub payload: Option<PayloadShape>,
    #[serde(default)]
    pub token_in: Option<TokenPlacement>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    pub fn load_from(path: &Path) -> Result<Self> {
        let path = expand_path(path);
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("read config {}", path.display()))?;
        let cfg: FileConfig =
            toml::from_str(&s).with_context(|| format!("parse config {}", path.display()))?;
        Ok(cfg)
    }
}

/// Values already merged from flags and environment; `None` means unset.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub token: Option<String>,
    pub project_id: Option<String>,
    pub payload: Option<PayloadShape>,
    pub token_in: Option<TokenPlacement>,
    pub timeout_secs: Option<u64>,
}

/// Merge overrides over the config file over built-in defaults, then check
/// that the result can authenticate.
pub fn resolve_endpoint(overrides: &Overrides, file: &FileConfig) -> Result<EndpointConfig> {
    let host = overrides
        .host
        .as_deref()
        .or(file.host.as_deref())
        .unwrap_or(DEFAULT_HOST);

    let mut endpoint = EndpointConfig::new(host)?
        .with_payload(overrides.payload.or(file.payload).unwrap_or_default())
        .with_token_placement(overrides.token_in.or(file.token_in).unwrap_or_default())
        .with_timeout(
            overrides
                .timeout_secs
                .or(file.timeout_secs)
                .map(Duration::from_secs),
        );
    if let Some(token) = overrides.token.as_ref().or(file.token.as_ref()) {
        endpoint = endpoint.with_token(token.clone());
    }
    if let Some(project_id) = overrides.project_id.as_ref().or(file.project_id.as_ref()) {
        endpoint = endpoint.with_project_id(project_id.clone());
    }

    endpoint.check_credentials()?;
    Ok(endpoint)
}

fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).to_string())
}
