//! Source kind classification.
//!
//! Every compilable file belongs to exactly one kind, determined by its
//! extension. The kind selects the toolchain profile used to compile it.

use std::fmt;
use std::path::Path;

/// File extension of compiled object artifacts, for both kinds.
pub const OBJECT_EXT: &str = "o";

/// The toolchain family a source file compiles with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Compiled directly for the controlling CPU (`.c`).
    Host,
    /// Compiled for an attached accelerator device with separable
    /// device compilation and device-aware linking (`.cu`).
    Accelerator,
}

impl SourceKind {
    /// Detects the source kind from a file's extension.
    ///
    /// Returns `None` for unrecognized extensions; such files are not
    /// compilable and are skipped during discovery.
    pub fn from_path(path: &Path) -> Option<SourceKind> {
        match path.extension()?.to_str()? {
            "c" => Some(SourceKind::Host),
            "cu" => Some(SourceKind::Accelerator),
            _ => None,
        }
    }

}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Host => write!(f, "host"),
            SourceKind::Accelerator => write!(f, "accelerator"),
        }
    }
}
