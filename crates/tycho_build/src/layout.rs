//! Path mapping from source files to derived artifact paths.
//!
//! Each source root's relative directory structure is mirrored under the
//! output root, so identically named files from different roots never
//! collide: `src/util.c` and `lib/util.c` map to `obj/src/util.o` and
//! `obj/lib/util.o`. Injectivity over the full discovered set is verified
//! up front; a collision is a fatal configuration error.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tycho_common::kind::OBJECT_EXT;

use crate::discover::SourceFile;
use crate::error::BuildError;

/// The derived-artifact layout under one build output root.
///
/// Owns path derivation only; directories are created lazily, on demand,
/// before the first write into them.
#[derive(Debug, Clone)]
pub struct BuildLayout {
    project_dir: PathBuf,
    output_root: PathBuf,
}

impl BuildLayout {
    /// Creates a layout for the given project directory and output root.
    ///
    /// A relative output root is resolved against the project directory.
    pub fn new(project_dir: &Path, output_root: &Path) -> Self {
        let output_root = if output_root.is_absolute() {
            output_root.to_path_buf()
        } else {
            project_dir.join(output_root)
        };
        Self {
            project_dir: project_dir.to_path_buf(),
            output_root,
        }
    }

    /// The build output root owning all derived artifacts.
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Directory holding compiled object artifacts.
    pub fn obj_dir(&self) -> PathBuf {
        self.output_root.join("obj")
    }

    /// Path of the linked target binary for the given target name.
    pub fn binary_path(&self, target: &str) -> PathBuf {
        self.output_root.join("bin").join(target)
    }

    /// Derives the artifact path for one source file.
    ///
    /// Pure function of the source's root-relative path: the root's own
    /// position (relative to the project directory where possible) prefixes
    /// the mirrored path, and the source extension is replaced with the
    /// object extension.
    pub fn artifact_path(&self, source: &SourceFile) -> PathBuf {
        let root_tag = source
            .root
            .strip_prefix(&self.project_dir)
            .unwrap_or_else(|_| root_name(&source.root));
        let mut path = self.obj_dir().join(root_tag).join(source.rel_path());
        path.set_extension(OBJECT_EXT);
        path
    }

    /// Maps every discovered source to its artifact path, verifying that
    /// the mapping is injective.
    ///
    /// Returns artifact paths in the same order as `sources`. Two sources
    /// mapping to the same artifact (a configuration error, e.g. two roots
    /// with identical relative substructure) fail the build rather than
    /// silently overwriting each other.
    pub fn map_artifacts(&self, sources: &[SourceFile]) -> Result<Vec<PathBuf>, BuildError> {
        let mut seen: HashMap<PathBuf, &SourceFile> = HashMap::with_capacity(sources.len());
        let mut artifacts = Vec::with_capacity(sources.len());
        for source in sources {
            let artifact = self.artifact_path(source);
            if let Some(first) = seen.insert(artifact.clone(), source) {
                return Err(BuildError::ArtifactCollision {
                    first: first.path.clone(),
                    second: source.path.clone(),
                    artifact,
                });
            }
            artifacts.push(artifact);
        }
        Ok(artifacts)
    }
}

/// Creates the parent directory of a path about to be written.
///
/// Idempotent: an already existing directory is not an error, and the
/// operation is safe under concurrent callers.
pub fn ensure_parent_dir(path: &Path) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| BuildError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

/// Last path component of a root, used when the root lies outside the
/// project directory and cannot be mirrored by relative position.
fn root_name(root: &Path) -> &Path {
    root.file_name().map(Path::new).unwrap_or(root)
}
