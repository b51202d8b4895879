//! Shared helpers for CLI commands: project and config resolution.

use std::path::{Path, PathBuf};

use tycho_config::CONFIG_FILE;

use crate::GlobalArgs;

/// Walks up from `start` looking for the nearest directory containing `tycho.toml`.
///
/// Returns the directory containing `tycho.toml`, or an error if none is found.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {} in {} or any parent directory",
                CONFIG_FILE,
                start.display()
            )
            .into());
        }
    }
}

/// Where a project lives on disk: its root directory and the build
/// description file governing it.
#[derive(Debug)]
pub struct ProjectPaths {
    /// The project root directory, against which relative paths resolve.
    pub root: PathBuf,
    /// The build description file (usually `<root>/tycho.toml`, but
    /// `--config` may name any file).
    pub config_path: PathBuf,
}

/// Resolves the project location from global CLI args.
///
/// If `--config` names a file, that exact file is the build description
/// and its parent directory is the project root. If it names a
/// directory, `tycho.toml` inside it is used. Otherwise the current
/// directory and its parents are searched for `tycho.toml`.
pub fn resolve_project(global: &GlobalArgs) -> Result<ProjectPaths, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            let root = match p.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            Ok(ProjectPaths {
                root,
                config_path: p,
            })
        } else {
            Ok(ProjectPaths {
                config_path: p.join(CONFIG_FILE),
                root: p,
            })
        }
    } else {
        let root = find_project_root(&std::env::current_dir()?)?;
        Ok(ProjectPaths {
            config_path: root.join(CONFIG_FILE),
            root,
        })
    }
}
