use civ_core::LintError;
use serde::Deserialize;

/// Verdict returned by the lint endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationResponse {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

// Servers have answered with `valid: bool` and, historically, with
// `status: "valid" | "invalid"`.
#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    valid: Option<bool>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    errors: Option<Vec<String>>,
    #[serde(default)]
    warnings: Option<Vec<String>>,
}

impl ValidationResponse {
    /// Decode a 200 body. Any mismatch is a service error, not a verdict.
    pub fn from_json(body: &[u8]) -> Result<Self, LintError> {
        let wire: WireResponse = serde_json::from_slice(body)
            .map_err(|e| LintError::Service(format!("malformed lint response: {e}")))?;

        let valid = match (wire.valid, wire.status.as_deref()) {
            (Some(valid), _) => valid,
            (None, Some(status)) => status == "valid",
            (None, None) => {
                return Err(LintError::Service(
                    "malformed lint response: expected a boolean `valid` or string `status` field"
                        .to_string(),
                ))
            }
        };

        Ok(Self {
            valid,
            errors: wire.errors.unwrap_or_default(),
            warnings: wire.warnings.unwrap_or_default(),
        })
    }
}
