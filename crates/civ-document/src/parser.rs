use civ_core::LintError;
use serde::de::IgnoredAny;
use serde::Deserialize;

/// Shape of a stream that passed the syntax gate. Keys are not interpreted,
/// so mappings with repeated keys are accepted the way the endpoint accepts
/// them (last key wins).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenericDocument {
    pub document_count: usize,
}

/// Syntax gate run before any network call. Multi-document streams (for
/// example a `spec:` header followed by `---`) are accepted.
pub fn parse(content: &[u8]) -> Result<GenericDocument, LintError> {
    let mut document_count = 0;
    for doc in serde_yaml::Deserializer::from_slice(content) {
        IgnoredAny::deserialize(doc).map_err(|e| LintError::LocalSyntax(e.to_string()))?;
        document_count += 1;
    }
    Ok(GenericDocument { document_count })
}
