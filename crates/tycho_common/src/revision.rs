//! Repository revision metadata for build traceability.
//!
//! Every compiled artifact embeds a revision descriptor (tag, abbreviated
//! hash, dirty flag) so a binary can always be mapped back to the source
//! state that produced it. When no descriptor is obtainable the provider
//! substitutes an explicit sentinel rather than failing or embedding an
//! empty string.

use std::path::{Path, PathBuf};
use std::process::Command;

/// Sentinel embedded when no revision descriptor can be obtained.
pub const UNKNOWN_REVISION: &str = "unknown-revision";

/// Supplies the revision descriptor stamped into every compiled artifact.
pub trait BuildMetadataProvider {
    /// Returns the revision descriptor. Never empty: implementations fall
    /// back to [`UNKNOWN_REVISION`] when metadata is unavailable.
    fn revision(&self) -> String;
}

/// Queries `git describe` for the revision descriptor.
///
/// Produces strings like `v1.4-12-g3f9ab2c` or `3f9ab2c-dirty`. Any failure
/// (no git binary, not a repository, no commits) yields the sentinel.
pub struct GitMetadata {
    repo_dir: PathBuf,
}

impl GitMetadata {
    /// Creates a provider querying the repository containing `repo_dir`.
    pub fn new(repo_dir: &Path) -> Self {
        Self {
            repo_dir: repo_dir.to_path_buf(),
        }
    }
}

impl BuildMetadataProvider for GitMetadata {
    fn revision(&self) -> String {
        let output = Command::new("git")
            .args(["describe", "--tags", "--always", "--dirty"])
            .current_dir(&self.repo_dir)
            .output();

        match output {
            Ok(out) if out.status.success() => {
                let descriptor = String::from_utf8_lossy(&out.stdout).trim().to_string();
                if descriptor.is_empty() {
                    UNKNOWN_REVISION.to_string()
                } else {
                    descriptor
                }
            }
            _ => UNKNOWN_REVISION.to_string(),
        }
    }
}

/// A provider returning a fixed descriptor. Used in tests and for builds
/// where the revision is supplied externally.
pub struct FixedMetadata {
    revision: String,
}

impl FixedMetadata {
    /// Creates a provider that always returns `revision`.
    pub fn new(revision: &str) -> Self {
        Self {
            revision: revision.to_string(),
        }
    }
}

impl BuildMetadataProvider for FixedMetadata {
    fn revision(&self) -> String {
        self.revision.clone()
    }
}
