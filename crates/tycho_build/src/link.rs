//! Link stage: combining all artifacts into the target binary.
//!
//! Uses the device-aware linker (the accelerator compiler) with the same
//! architecture selector used during compilation, since separable device
//! compilation defers device link resolution to this stage. External
//! libraries and rpath entries are embedded so the binary resolves its
//! shared libraries without further environment setup.

use std::path::{Path, PathBuf};
use std::process::Command;

use tycho_config::{LinkSection, ResolvedToolchain};

use crate::error::BuildError;
use crate::layout::ensure_parent_dir;

/// Links every artifact plus the declared external libraries into the
/// target binary at `binary`.
///
/// Precondition (enforced by the orchestrator): every artifact for the
/// current source set exists and is fresh. The linker writes the binary
/// only on success, so a link failure leaves any prior binary in place.
pub fn link(
    artifacts: &[PathBuf],
    link_section: &LinkSection,
    toolchain: &ResolvedToolchain,
    binary: &Path,
) -> Result<(), BuildError> {
    ensure_parent_dir(binary)?;

    let mut cmd = Command::new(&toolchain.accelerator.compiler);
    if let Some(arch) = &toolchain.accelerator.arch {
        cmd.arg(format!("-arch={arch}"));
    }
    cmd.args(artifacts);
    cmd.arg("-o").arg(binary);

    for dir in &link_section.library_dirs {
        cmd.arg(format!("-L{}", dir.display()));
    }
    if let Some(toolkit_lib) = &toolchain.toolkit_lib_dir {
        cmd.arg(format!("-L{}", toolkit_lib.display()));
    }
    for lib in &link_section.libraries {
        cmd.arg(format!("-l{lib}"));
    }
    for rpath in &link_section.rpaths {
        cmd.arg("-Xlinker")
            .arg(format!("-rpath={}", rpath.display()));
    }
    cmd.args(&link_section.flags);

    let output = cmd.output().map_err(|e| BuildError::Link {
        detail: e.to_string(),
    })?;

    if !output.status.success() {
        return Err(BuildError::Link {
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}
