//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::Path;

/// Name of the build description file within a project directory.
pub const CONFIG_FILE: &str = "tycho.toml";

/// Loads and validates a `tycho.toml` configuration from a project directory.
///
/// Reads `<project_dir>/tycho.toml`, parses it, and validates required fields.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    load_config_file(&project_dir.join(CONFIG_FILE))
}

/// Loads and validates a configuration from an explicit file path.
///
/// The file does not have to be named `tycho.toml`; this is the entry
/// point behind the CLI's `--config` flag.
pub fn load_config_file(config_path: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `tycho.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and configuration values are consistent.
///
/// The architecture-selector check is eager: a mismatch between `[build]` and
/// `[toolchain.accelerator]` is rejected here, before any compilation begins.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.build.source_roots.is_empty() {
        return Err(ConfigError::MissingField("build.source_roots".to_string()));
    }
    if let (Some(global), Some(profile)) = (&config.build.arch, &config.toolchain.accelerator.arch)
    {
        if global != profile {
            return Err(ConfigError::ArchMismatch {
                global: global.clone(),
                profile: profile.clone(),
            });
        }
    }
    Ok(())
}
