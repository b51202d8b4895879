//! Error types for build pipeline operations.

use std::path::PathBuf;

/// Errors that can occur while running the build pipeline.
///
/// Configuration problems (missing roots, unresolvable compilers, artifact
/// path collisions) are detected before any compilation begins; compile and
/// link failures abort the build with completed artifacts left on disk.
#[derive(Debug)]
pub enum BuildError {
    /// A configured source root does not exist.
    MissingSourceRoot(PathBuf),

    /// A toolchain executable could not be resolved.
    CompilerNotFound(PathBuf),

    /// Two source files map to the same artifact path. This indicates a
    /// configuration error (e.g. two roots with identical relative
    /// substructure), never a silent overwrite.
    ArtifactCollision {
        /// The source file that claimed the artifact path first.
        first: PathBuf,
        /// The source file that collided with it.
        second: PathBuf,
        /// The contested artifact path.
        artifact: PathBuf,
    },

    /// A single source file failed to compile. The whole build aborts and
    /// the link stage is skipped.
    Compile {
        /// The source file that failed.
        source: PathBuf,
        /// Compiler diagnostics or the spawn error.
        detail: String,
    },

    /// The link stage failed. Any prior binary is left untouched.
    Link {
        /// Linker diagnostics or the spawn error.
        detail: String,
    },

    /// An I/O error occurred at a known path.
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

// Implemented by hand rather than derived with thiserror: the `Compile`
// variant's field is named `source` but holds a `PathBuf`, which the derive
// would insist on exposing as `Error::source()`.
impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingSourceRoot(root) => {
                write!(f, "source root does not exist: {}", root.display())
            }
            Self::CompilerNotFound(compiler) => {
                write!(f, "compiler not found: {}", compiler.display())
            }
            Self::ArtifactCollision {
                first,
                second,
                artifact,
            } => write!(
                f,
                "artifact path collision: {} and {} both map to {}",
                first.display(),
                second.display(),
                artifact.display()
            ),
            Self::Compile { source, detail } => {
                write!(f, "failed to compile {}: {detail}", source.display())
            }
            Self::Link { detail } => write!(f, "link failed: {detail}"),
            Self::Io { path, source } => {
                write!(f, "I/O error at {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_source_root() {
        let err = BuildError::MissingSourceRoot(PathBuf::from("srcs"));
        assert_eq!(format!("{err}"), "source root does not exist: srcs");
    }

    #[test]
    fn display_collision() {
        let err = BuildError::ArtifactCollision {
            first: PathBuf::from("src/util.c"),
            second: PathBuf::from("src/util.cu"),
            artifact: PathBuf::from("build/obj/src/util.o"),
        };
        let msg = format!("{err}");
        assert!(msg.contains("src/util.c"));
        assert!(msg.contains("build/obj/src/util.o"));
    }

    #[test]
    fn display_compile_failure() {
        let err = BuildError::Compile {
            source: PathBuf::from("src/density.cu"),
            detail: "error: expected ';'".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("density.cu"));
        assert!(msg.contains("expected ';'"));
    }

    #[test]
    fn display_io_error() {
        let err = BuildError::Io {
            path: PathBuf::from("build"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(format!("{err}").contains("I/O error at build"));
    }
}
