//! Compile dispatch: invoking the correct toolchain per stale source.
//!
//! Host sources compile directly to a relocatable object. Accelerator
//! sources use separable device compilation (`-dc`) with the resolved
//! architecture selector, deferring final device linking to the link
//! stage. Every invocation embeds the revision descriptor as a `VERSION`
//! define so any binary maps back to the source state that produced it.
//!
//! Stale artifacts compile in parallel; each artifact is written by
//! exactly one invocation. The dispatcher runs the complete stale set to
//! resolution and reports the first failure after the barrier, so a
//! failing accelerator compile never suppresses host compiles from the
//! same run.

use std::path::{Path, PathBuf};
use std::process::Command;

use rayon::prelude::*;
use tycho_common::SourceKind;
use tycho_config::{ResolvedProfile, ResolvedToolchain};

use crate::discover::SourceFile;
use crate::error::BuildError;
use crate::layout::ensure_parent_dir;

/// One pending compilation: a stale source and its artifact path.
#[derive(Debug, Clone)]
pub struct CompileJob {
    /// The source file to compile.
    pub source: SourceFile,
    /// The artifact path to produce.
    pub artifact: PathBuf,
}

/// Verifies that both configured compilers are resolvable executables.
///
/// Called before any compilation begins so an unresolvable toolchain
/// fails the build without a partial attempt.
pub fn verify_toolchain(toolchain: &ResolvedToolchain) -> Result<(), BuildError> {
    for profile in [&toolchain.host, &toolchain.accelerator] {
        if resolve_executable(&profile.compiler).is_none() {
            return Err(BuildError::CompilerNotFound(profile.compiler.clone()));
        }
    }
    Ok(())
}

/// Resolves a compiler name or path to an executable on disk.
///
/// A path containing a separator is checked directly; a bare name is
/// searched for in `PATH`.
pub fn resolve_executable(compiler: &Path) -> Option<PathBuf> {
    if compiler.components().count() > 1 {
        return compiler.is_file().then(|| compiler.to_path_buf());
    }
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(compiler))
        .find(|candidate| candidate.is_file())
}

/// Compiles every job in parallel, bounded by available CPU parallelism.
///
/// All jobs run to resolution before the first error (if any) is
/// returned; artifacts produced by succeeding jobs stay on disk either
/// way. Returns the number of artifacts compiled.
pub fn compile_all(
    jobs: &[CompileJob],
    toolchain: &ResolvedToolchain,
    revision: &str,
) -> Result<usize, BuildError> {
    let results: Vec<Result<(), BuildError>> = jobs
        .par_iter()
        .map(|job| compile_one(job, toolchain.profile(job.source.kind), revision))
        .collect();
    for result in results {
        result?;
    }
    Ok(jobs.len())
}

/// Compiles one source file to its artifact with the given profile.
pub fn compile_one(
    job: &CompileJob,
    profile: &ResolvedProfile,
    revision: &str,
) -> Result<(), BuildError> {
    ensure_parent_dir(&job.artifact)?;

    let mut cmd = Command::new(&profile.compiler);
    match job.source.kind {
        SourceKind::Host => {
            cmd.arg("-c");
        }
        SourceKind::Accelerator => {
            // Separable device compilation; device linking happens at the
            // link stage with the same selector.
            cmd.arg("-dc");
            if let Some(arch) = &profile.arch {
                cmd.arg(format!("-arch={arch}"));
            }
        }
    }
    cmd.args(&profile.flags);
    for dir in &profile.include_dirs {
        cmd.arg(format!("-I{}", dir.display()));
    }
    for define in &profile.defines {
        cmd.arg(format!("-D{define}"));
    }
    cmd.arg(format!("-DVERSION=\"{revision}\""));
    cmd.arg(&job.source.path).arg("-o").arg(&job.artifact);

    let output = cmd.output().map_err(|e| BuildError::Compile {
        source: job.source.path.clone(),
        detail: e.to_string(),
    })?;

    if !output.status.success() {
        return Err(BuildError::Compile {
            source: job.source.path.clone(),
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}
