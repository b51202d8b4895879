//! `tycho clean` — delete the derived-artifact tree.

use tycho_build::BuildLayout;

use crate::pipeline::resolve_project;
use crate::GlobalArgs;

/// Runs the `tycho clean` command.
///
/// Idempotent: succeeds with exit code 0 whether or not a build output
/// root exists. I/O failures during removal exit non-zero.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let paths = resolve_project(global)?;
    let config = tycho_config::load_config_file(&paths.config_path)?;
    let layout = BuildLayout::new(&paths.root, &config.build.output_root);

    match tycho_build::clean(layout.output_root()) {
        Ok(()) => {
            if !global.quiet {
                eprintln!("   Cleaned {}", layout.output_root().display());
            }
            Ok(0)
        }
        Err(e) => {
            eprintln!("error: {e}");
            Ok(1)
        }
    }
}
