//! Clean: removal of the entire derived-artifact tree.

use std::path::Path;

use crate::error::BuildError;

/// Deletes the build output root recursively.
///
/// Idempotent: an absent root is success, not an error. Any other failure
/// (permissions, busy files) is surfaced to the caller rather than
/// reported as a partial silent success.
pub fn clean(output_root: &Path) -> Result<(), BuildError> {
    match std::fs::remove_dir_all(output_root) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(BuildError::Io {
            path: output_root.to_path_buf(),
            source: e,
        }),
    }
}
