use std::error::Error as _;
use std::future::Future;
use std::time::Duration;

use civ_core::LintError;
use url::Url;

/// One outgoing lint call, fully resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LintHttpRequest {
    pub url: Url,
    pub headers: Vec<(&'static str, String)>,
    pub basic_auth: Option<(String, Option<String>)>,
    pub body: Vec<u8>,
}

impl LintHttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LintHttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Carries a single POST to the lint endpoint. Connection-level failures
/// come back as `LintError::Transport`; every HTTP status is a response.
pub trait LintTransport: Send + Sync {
    fn send(
        &self,
        request: LintHttpRequest,
    ) -> impl Future<Output = Result<LintHttpResponse, LintError>> + Send;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self, LintError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| LintError::Transport(format!("build HTTP client: {}", describe(e))))?;
        Ok(Self { client })
    }
}

impl LintTransport for ReqwestTransport {
    async fn send(&self, request: LintHttpRequest) -> Result<LintHttpResponse, LintError> {
        let mut builder = self.client.post(request.url).body(request.body);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value.as_str());
        }
        if let Some((user, password)) = &request.basic_auth {
            builder = builder.basic_auth(user, password.as_ref());
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| LintError::Transport(describe(e)))?;
        let status = resp.status().as_u16();
        let body = match resp.bytes().await {
            Ok(body) => body.to_vec(),
            // The status alone decides auth failures; the message is optional.
            Err(e) if matches!(status, 401 | 403) => {
                tracing::debug!(status, error = %describe(e), "auth response body unreadable");
                Vec::new()
            }
            Err(e) => {
                return Err(LintError::Transport(format!(
                    "read response body: {}",
                    describe(e)
                )))
            }
        };

        Ok(LintHttpResponse { status, body })
    }
}

/// Error chain as one line. The URL is dropped because it may carry the
/// private token.
fn describe(err: reqwest::Error) -> String {
    let err = err.without_url();
    let mut out = err.to_string();
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
