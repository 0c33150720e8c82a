//! Local pre-checks: load a pipeline file and make sure it is well-formed
//! YAML before anything is sent to the lint endpoint.

pub mod loader;
pub mod parser;

pub use loader::*;
pub use parser::*;

use std::path::Path;

use civ_core::LintError;

/// A document that passed every local check.
#[derive(Clone, Debug)]
pub struct CheckedDocument {
    /// Raw text, forwarded verbatim to the lint endpoint.
    pub content: String,
    pub parsed: GenericDocument,
}

/// Load `path` and run the structural gate.
pub fn check_local(path: &Path) -> Result<CheckedDocument, LintError> {
    let bytes = load(path)?;
    let parsed = parse(&bytes)?;
    let content = String::from_utf8(bytes)
        .map_err(|e| LintError::LocalSyntax(format!("document is not valid UTF-8: {e}")))?;
    Ok(CheckedDocument { content, parsed })
}
