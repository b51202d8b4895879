//! Dependency tracking and staleness decisions.
//!
//! An artifact is stale iff it does not exist or any member of its
//! dependency set has a modification time newer than the artifact's own.
//! The dependency set is deliberately coarse: besides its own source,
//! every artifact of a kind shares the kind's configured header list and
//! the build description file itself, so touching one tracked header
//! invalidates every artifact of that kind, whether or not the file
//! includes it.
//!
//! All modification times are collected once per invocation into a single
//! [`MtimeSnapshot`]; staleness decisions are made only from that snapshot,
//! so there is no race between the check and the subsequent compile.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A single consistent view of file modification times.
///
/// Missing files are simply absent from the snapshot.
#[derive(Debug)]
pub struct MtimeSnapshot {
    times: HashMap<PathBuf, SystemTime>,
}

impl MtimeSnapshot {
    /// Captures modification times for all given paths.
    pub fn capture<'a, I>(paths: I) -> Self
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let mut times = HashMap::new();
        for path in paths {
            if let Ok(mtime) = std::fs::metadata(path).and_then(|m| m.modified()) {
                times.insert(path.to_path_buf(), mtime);
            }
        }
        Self { times }
    }

    /// Returns the snapshotted modification time, or `None` if the file
    /// did not exist at capture time.
    pub fn mtime(&self, path: &Path) -> Option<SystemTime> {
        self.times.get(path).copied()
    }
}

/// The set of files whose modification invalidates one artifact.
#[derive(Debug, Clone)]
pub struct DependencySet {
    /// The artifact's own source file.
    pub source: PathBuf,
    /// Files shared by every artifact of the kind: the configured header
    /// list plus the build description file.
    pub shared: Vec<PathBuf>,
}

impl DependencySet {
    /// Iterates over every member of the set.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.source.as_path()).chain(self.shared.iter().map(PathBuf::as_path))
    }
}

/// Decides whether an artifact must be rebuilt.
///
/// Stale iff the artifact is absent from the snapshot or any dependency is
/// strictly newer than it. A dependency missing from the snapshot cannot
/// be newer; if it is genuinely required the compiler will report it.
pub fn is_stale(artifact: &Path, deps: &DependencySet, snapshot: &MtimeSnapshot) -> bool {
    let Some(built) = snapshot.mtime(artifact) else {
        return true;
    };
    deps.iter()
        .any(|dep| snapshot.mtime(dep).is_some_and(|m| m > built))
}
