use serde::{Deserialize, Serialize};

/// Severity of one file's validation, ordered `Pass < SoftFail < HardFail`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationOutcome {
    /// The lint endpoint accepted the document.
    #[default]
    Pass = 0,
    /// No authoritative answer: network, service or response problem.
    SoftFail = 1,
    /// The document itself is invalid, locally or per the lint endpoint.
    HardFail = 2,
}

impl ValidationOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            ValidationOutcome::Pass => "PASS",
            ValidationOutcome::SoftFail => "SOFT FAIL",
            ValidationOutcome::HardFail => "HARD FAIL",
        }
    }

    /// Process exit code for a run whose overall outcome is `self`.
    ///
    /// Hard failures (1) need a fix; soft failures (2) may be retried.
    pub fn exit_code(&self) -> u8 {
        match self {
            ValidationOutcome::Pass => 0,
            ValidationOutcome::HardFail => 1,
            ValidationOutcome::SoftFail => 2,
        }
    }
}

impl std::fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
