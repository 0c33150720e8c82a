use civ_core::{ClientIdentity, EndpointConfig, LintError};
use url::Url;

use crate::request::ValidationRequest;
use crate::response::ValidationResponse;
use crate::transport::{LintHttpRequest, LintHttpResponse, LintTransport};

const SNIPPET_CHARS: usize = 512;

/// Resolve the HTTP call for one document. Pure; performs no I/O.
pub fn build_request(
    endpoint: &EndpointConfig,
    identity: &ClientIdentity,
    request: &ValidationRequest,
) -> LintHttpRequest {
    let body = request.encode(endpoint.payload);
    let mut headers = vec![
        ("User-Agent", identity.user_agent().to_string()),
        ("Content-Type", body.content_type.to_string()),
    ];
    if let Some(token) = endpoint.header_token() {
        headers.push(("PRIVATE-TOKEN", token.to_string()));
    }

    LintHttpRequest {
        url: endpoint.lint_url(),
        headers,
        basic_auth: endpoint.basic_auth(),
        body: body.bytes,
    }
}

/// Map an HTTP exchange onto a verdict.
///
/// 401/403 become `LintError::Auth`, which callers must treat as terminal
/// for the run. Other non-200 statuses and undecodable bodies are service
/// errors; an invalid verdict carries the server's errors in order.
pub fn interpret(
    endpoint: &EndpointConfig,
    url: &Url,
    response: &LintHttpResponse,
) -> Result<ValidationResponse, LintError> {
    let body = String::from_utf8_lossy(&response.body);
    match response.status {
        200 => {}
        401 | 403 => {
            return Err(LintError::Auth {
                status: response.status,
                host: endpoint.display_host(),
                message: body.trim().to_string(),
            })
        }
        status => {
            return Err(LintError::Service(format!(
                "non-200 status from {} for {}: {}: {}",
                endpoint.display_host(),
                url.path(),
                status,
                snippet(&body)
            )))
        }
    }

    let verdict = ValidationResponse::from_json(&response.body)?;
    if !verdict.valid {
        return Err(LintError::RemoteContent(verdict.errors));
    }
    for warning in &verdict.warnings {
        tracing::warn!(host = %endpoint.display_host(), "lint warning: {warning}");
    }
    Ok(verdict)
}

/// Submit `content` to the lint endpoint. `Ok` means the document passed.
pub async fn validate<T: LintTransport>(
    endpoint: &EndpointConfig,
    identity: &ClientIdentity,
    transport: &T,
    content: &str,
) -> Result<ValidationResponse, LintError> {
    let request = build_request(endpoint, identity, &ValidationRequest::new(content));
    let url = request.url.clone();
    tracing::debug!(
        host = %endpoint.display_host(),
        path = url.path(),
        payload = ?endpoint.payload,
        "sending lint request"
    );

    let response = transport.send(request).await?;
    tracing::debug!(status = response.status, "lint response received");
    interpret(endpoint, &url, &response)
}

fn snippet(body: &str) -> String {
    let body = body.trim();
    if body.chars().count() <= SNIPPET_CHARS {
        return body.to_string();
    }
    let mut out: String = body.chars().take(SNIPPET_CHARS).collect();
    out.push_str("...");
    out
}
