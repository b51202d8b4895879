//! `tycho build` — discover, map, check staleness, compile, link.

use tycho_build::BuildOrchestrator;
use tycho_common::{BuildMetadataProvider, GitMetadata, UNKNOWN_REVISION};
use tycho_config::{resolve_toolchain, ToolchainOverrides};

use crate::pipeline::resolve_project;
use crate::{BuildArgs, GlobalArgs};

/// Picks the revision descriptor embedded into every compile.
///
/// A project outside any repository still carries its configured version
/// instead of the bare sentinel.
fn effective_revision(described: String, version: &str) -> String {
    if described == UNKNOWN_REVISION && !version.is_empty() {
        format!("v{version}")
    } else {
        described
    }
}

/// Runs the `tycho build` command.
///
/// Returns exit code 0 on success, 1 on the first failure.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let paths = resolve_project(global)?;
    let config = tycho_config::load_config_file(&paths.config_path)?;

    let overrides = ToolchainOverrides {
        arch: args.arch.clone(),
        toolkit_root: args.toolkit_root.clone(),
    };
    let toolchain = resolve_toolchain(&config, &overrides)?;
    let revision = effective_revision(
        GitMetadata::new(&paths.root).revision(),
        &config.project.version,
    );

    if !global.quiet {
        eprintln!("  Building {} [{}]", config.project.name, revision);
    }
    if global.verbose {
        if let Some(arch) = &toolchain.accelerator.arch {
            eprintln!("      Arch {arch}");
        }
    }

    let orchestrator =
        BuildOrchestrator::new(&paths.root, &paths.config_path, config, toolchain, &revision);
    match orchestrator.run() {
        Ok(outcome) => {
            if global.verbose {
                eprintln!(
                    "   Sources {} discovered, {} stale",
                    outcome.sources, outcome.compiled
                );
            }
            if !global.quiet {
                if outcome.linked {
                    eprintln!("  Compiled {} artifact(s)", outcome.compiled);
                    eprintln!("    Linked {}", outcome.binary.display());
                } else {
                    eprintln!("Up to date ({} artifacts)", outcome.artifacts.len());
                }
            }
            Ok(0)
        }
        Err(e) => {
            eprintln!("error: {e}");
            Ok(1)
        }
    }
}
