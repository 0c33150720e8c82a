use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub const DEFAULT_HOST: &str = "https://gitlab.com";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EndpointError {
    #[error("host must not be empty")]
    EmptyHost,
    #[error("host '{host}' is not a valid URL: {reason}")]
    InvalidHost { host: String, reason: String },
    #[error("host '{0}' must use http or https")]
    UnsupportedScheme(String),
    #[error("token is required (or embed user:password in the host URL)")]
    MissingToken,
    #[error("unknown {kind} '{value}' (expected one of: {expected})")]
    UnknownVariant {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Request body encoding understood by the lint endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadShape {
    /// `{"content": "..."}` as `application/json`.
    #[default]
    Json,
    /// `content=...` as `application/x-www-form-urlencoded`.
    Form,
}

impl FromStr for PayloadShape {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(PayloadShape::Json),
            "form" => Ok(PayloadShape::Form),
            other => Err(EndpointError::UnknownVariant {
                kind: "payload",
                value: other.to_string(),
                expected: "json, form",
            }),
        }
    }
}

/// Where the access token travels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenPlacement {
    /// `?private_token=...`
    #[default]
    Query,
    /// `PRIVATE-TOKEN: ...`
    Header,
}

impl FromStr for TokenPlacement {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "query" => Ok(TokenPlacement::Query),
            "header" => Ok(TokenPlacement::Header),
            other => Err(EndpointError::UnknownVariant {
                kind: "token placement",
                value: other.to_string(),
                expected: "query, header",
            }),
        }
    }
}

/// Everything needed to address the lint endpoint. Built once per run and
/// handed read-only to the remote client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointConfig {
    pub host: Url,
    pub token: Option<String>,
    pub token_placement: TokenPlacement,
    /// Present for project-scoped deployments (`/projects/<id>/ci/lint`).
    pub project_id: Option<String>,
    pub payload: PayloadShape,
    pub timeout: Option<Duration>,
}

impl EndpointConfig {
    pub fn new(host: &str) -> Result<Self, EndpointError> {
        Ok(Self {
            host: parse_host(host)?,
            token: None,
            token_placement: TokenPlacement::default(),
            project_id: None,
            payload: PayloadShape::default(),
            timeout: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into()).filter(|t: &String| !t.is_empty());
        self
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into()).filter(|p: &String| !p.is_empty());
        self
    }

    pub fn with_payload(mut self, payload: PayloadShape) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_token_placement(mut self, placement: TokenPlacement) -> Self {
        self.token_placement = placement;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// A token is required unless the host URL carries its own credentials.
    pub fn check_credentials(&self) -> Result<(), EndpointError> {
        if self.token.is_none() && self.basic_auth().is_none() {
            return Err(EndpointError::MissingToken);
        }
        Ok(())
    }

    /// `host[:port]` for messages; never includes credentials.
    pub fn display_host(&self) -> String {
        let host = self.host.host_str().unwrap_or_default();
        match self.host.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }

    /// Basic-auth pair taken from the host URL's userinfo, if any. A
    /// password without a user name (`https://:pw@host`) still counts.
    pub fn basic_auth(&self) -> Option<(String, Option<String>)> {
        if self.host.username().is_empty() && self.host.password().is_none() {
            return None;
        }
        Some((
            self.host.username().to_string(),
            self.host.password().map(str::to_string),
        ))
    }

    /// Target of the lint request, with userinfo stripped and the token
    /// appended as `private_token` when it travels in the query.
    pub fn lint_url(&self) -> Url {
        let mut url = self.host.clone();
        // parse_host only admits http(s) URLs, which always accept these.
        let _ = url.set_username("");
        let _ = url.set_password(None);
        url.set_query(None);
        url.set_fragment(None);

        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["api", "v4"]);
            if let Some(project_id) = &self.project_id {
                segments.push("projects").push(project_id);
            }
            segments.extend(["ci", "lint"]);
        }

        if let (Some(token), TokenPlacement::Query) = (&self.token, self.token_placement) {
            url.query_pairs_mut().append_pair("private_token", token);
        }
        url
    }

    /// Token for the `PRIVATE-TOKEN` header, when configured that way.
    pub fn header_token(&self) -> Option<&str> {
        match self.token_placement {
            TokenPlacement::Header => self.token.as_deref(),
            TokenPlacement::Query => None,
        }
    }
}

/// Parse a host, defaulting the scheme to `https` when it is omitted.
pub fn parse_host(raw: &str) -> Result<Url, EndpointError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(EndpointError::EmptyHost);
    }
    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };
    let url = Url::parse(&with_scheme).map_err(|e| EndpointError::InvalidHost {
        host: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(EndpointError::UnsupportedScheme(raw.to_string()));
    }
    Ok(url)
}

/// User-Agent marker sent with every lint request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientIdentity {
    user_agent: String,
}

impl ClientIdentity {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            user_agent: format!(
                "{name}/{version} rust {}/{}",
                std::env::consts::OS,
                std::env::consts::ARCH
            ),
        }
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}
