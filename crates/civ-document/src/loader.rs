use std::path::Path;

use civ_core::LintError;

/// The only suffix the lint endpoint's naming convention accepts.
pub const ACCEPTED_SUFFIX: &str = ".yml";

/// Read `path` fully, then check its name. Both failures are hard failures
/// and neither reaches the network.
pub fn load(path: &Path) -> Result<Vec<u8>, LintError> {
    let content = std::fs::read(path).map_err(|source| LintError::LocalIo {
        path: path.to_path_buf(),
        source,
    })?;

    if !has_accepted_suffix(path) {
        return Err(LintError::UnsupportedExtension {
            path: path.to_path_buf(),
        });
    }

    tracing::debug!(path = %path.display(), bytes = content.len(), "loaded document");
    Ok(content)
}

fn has_accepted_suffix(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().ends_with(ACCEPTED_SUFFIX))
        .unwrap_or(false)
}
