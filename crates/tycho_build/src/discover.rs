//! Source discovery across configured roots.
//!
//! Walks every configured source root recursively and returns the current
//! set of compilable files, tagged by kind. Nothing is cached between
//! invocations: added or removed files are always picked up on the next
//! build.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tycho_common::SourceKind;

use crate::error::BuildError;

/// A compilable file found under a source root.
///
/// An immutable snapshot taken at discovery time: the modification
/// timestamp is recorded once and all staleness decisions in the same
/// invocation use it.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Full path to the source file.
    pub path: PathBuf,
    /// The source root this file was found under.
    pub root: PathBuf,
    /// The toolchain kind that compiles it.
    pub kind: SourceKind,
    /// Modification timestamp at discovery time.
    pub mtime: SystemTime,
}

impl SourceFile {
    /// Returns the path relative to the root it was discovered under.
    pub fn rel_path(&self) -> &Path {
        self.path.strip_prefix(&self.root).unwrap_or(&self.path)
    }
}

/// Discovers all compilable files under the given source roots.
///
/// Returns the files sorted lexicographically by path so the compile order
/// and artifact set are deterministic. Roots are scanned recursively; only
/// extensions with a recognized kind are included. Fails if any configured
/// root does not exist.
pub fn discover_sources(roots: &[PathBuf]) -> Result<Vec<SourceFile>, BuildError> {
    let mut sources = Vec::new();
    for root in roots {
        if !root.is_dir() {
            return Err(BuildError::MissingSourceRoot(root.clone()));
        }
        walk_root(root, root, &mut sources)?;
    }
    sources.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(sources)
}

/// Recursively walks one root collecting recognized source files.
fn walk_root(root: &Path, dir: &Path, sources: &mut Vec<SourceFile>) -> Result<(), BuildError> {
    let entries = std::fs::read_dir(dir).map_err(|e| BuildError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;
    for entry in entries {
        let entry = entry.map_err(|e| BuildError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_dir() {
            walk_root(root, &path, sources)?;
        } else if let Some(kind) = SourceKind::from_path(&path) {
            let mtime = std::fs::metadata(&path)
                .and_then(|m| m.modified())
                .map_err(|e| BuildError::Io {
                    path: path.clone(),
                    source: e,
                })?;
            sources.push(SourceFile {
                path,
                root: root.to_path_buf(),
                kind,
                mtime,
            });
        }
    }
    Ok(())
}
