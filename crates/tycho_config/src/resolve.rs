//! Toolchain resolution: merging configuration with CLI overrides.
//!
//! Resolution produces one [`ResolvedProfile`] per source kind with defaults
//! filled in, the toolkit root applied, and the architecture selector
//! settled. The resolved structs are the only toolchain state the rest of
//! the pipeline sees; nothing downstream reads the raw configuration.

use crate::error::ConfigError;
use crate::types::{ProjectConfig, ToolchainProfile};
use std::path::PathBuf;
use tycho_common::SourceKind;

/// Default host compiler when none is configured.
pub const DEFAULT_HOST_COMPILER: &str = "cc";

/// Default accelerator compiler when none is configured.
pub const DEFAULT_ACCEL_COMPILER: &str = "nvcc";

/// Default accelerator architecture selector when none is configured.
pub const DEFAULT_ARCH: &str = "sm_52";

/// CLI-level overrides applied on top of the configuration file.
#[derive(Debug, Default)]
pub struct ToolchainOverrides {
    /// Overrides the configured architecture selector.
    pub arch: Option<String>,
    /// Overrides the configured accelerator toolchain installation root.
    pub toolkit_root: Option<PathBuf>,
}

/// A fully resolved compiler profile for one source kind.
#[derive(Debug, Clone)]
pub struct ResolvedProfile {
    /// The source kind this profile compiles.
    pub kind: SourceKind,
    /// Compiler executable name or absolute path.
    pub compiler: PathBuf,
    /// Compiler flags, passed through verbatim.
    pub flags: Vec<String>,
    /// Include directories.
    pub include_dirs: Vec<PathBuf>,
    /// Preprocessor defines, without the leading `-D`.
    pub defines: Vec<String>,
    /// Shared header dependency list for this kind.
    pub headers: Vec<PathBuf>,
    /// Architecture selector; always present for the accelerator profile,
    /// always absent for the host profile.
    pub arch: Option<String>,
}

/// Both resolved profiles plus link-time paths contributed by the toolkit root.
#[derive(Debug, Clone)]
pub struct ResolvedToolchain {
    /// Profile for host-kind sources.
    pub host: ResolvedProfile,
    /// Profile for accelerator-kind sources; its compiler doubles as the
    /// device-aware linker.
    pub accelerator: ResolvedProfile,
    /// Library directory of the accelerator toolkit, joined into the link
    /// search path when a toolkit root is configured.
    pub toolkit_lib_dir: Option<PathBuf>,
}

impl ResolvedToolchain {
    /// Returns the profile compiling the given source kind.
    pub fn profile(&self, kind: SourceKind) -> &ResolvedProfile {
        match kind {
            SourceKind::Host => &self.host,
            SourceKind::Accelerator => &self.accelerator,
        }
    }
}

/// Resolves the configured toolchain profiles, applying CLI overrides.
///
/// The architecture selector is settled here with precedence: CLI override,
/// then `[build] arch`, then the accelerator profile, then [`DEFAULT_ARCH`].
/// (Conflicting declarations between `[build]` and the profile were already
/// rejected during config validation; an explicit CLI override wins over
/// both.) When a toolkit root is present the accelerator compiler resolves
/// to `<root>/bin/<compiler>` and `<root>/include` joins its include path.
pub fn resolve_toolchain(
    config: &ProjectConfig,
    overrides: &ToolchainOverrides,
) -> Result<ResolvedToolchain, ConfigError> {
    let host = resolve_profile(
        SourceKind::Host,
        &config.toolchain.host,
        DEFAULT_HOST_COMPILER,
        None,
    )?;

    let arch = overrides
        .arch
        .clone()
        .or_else(|| config.build.arch.clone())
        .or_else(|| config.toolchain.accelerator.arch.clone())
        .unwrap_or_else(|| DEFAULT_ARCH.to_string());

    let mut accelerator = resolve_profile(
        SourceKind::Accelerator,
        &config.toolchain.accelerator,
        DEFAULT_ACCEL_COMPILER,
        Some(arch),
    )?;

    let toolkit_root = overrides
        .toolkit_root
        .clone()
        .or_else(|| config.build.toolkit_root.clone());

    let toolkit_lib_dir = match toolkit_root {
        Some(root) => {
            accelerator.compiler = root.join("bin").join(&accelerator.compiler);
            accelerator.include_dirs.push(root.join("include"));
            Some(root.join("lib64"))
        }
        None => None,
    };

    Ok(ResolvedToolchain {
        host,
        accelerator,
        toolkit_lib_dir,
    })
}

/// Resolves a single profile, filling in the default compiler.
fn resolve_profile(
    kind: SourceKind,
    profile: &ToolchainProfile,
    default_compiler: &str,
    arch: Option<String>,
) -> Result<ResolvedProfile, ConfigError> {
    let compiler = match profile.compiler.as_deref() {
        Some("") => {
            return Err(ConfigError::ValidationError(format!(
                "empty compiler for {kind} toolchain"
            )))
        }
        Some(name) => PathBuf::from(name),
        None => PathBuf::from(default_compiler),
    };

    Ok(ResolvedProfile {
        kind,
        compiler,
        flags: profile.flags.clone(),
        include_dirs: profile.include_dirs.clone(),
        defines: profile.defines.clone(),
        headers: profile.headers.clone(),
        arch,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    fn minimal_config() -> ProjectConfig {
        load_config_from_str(
            r#"
[project]
name = "impact"

[build]
source_roots = ["src"]
"#,
        )
        .unwrap()
    }

    #[test]
    fn defaults_fill_in() {
        let toolchain =
            resolve_toolchain(&minimal_config(), &ToolchainOverrides::default()).unwrap();
        assert_eq!(toolchain.host.compiler, PathBuf::from("cc"));
        assert_eq!(toolchain.accelerator.compiler, PathBuf::from("nvcc"));
        assert_eq!(toolchain.accelerator.arch.as_deref(), Some(DEFAULT_ARCH));
        assert!(toolchain.host.arch.is_none());
        assert!(toolchain.toolkit_lib_dir.is_none());
    }

    #[test]
    fn configured_arch_wins_over_default() {
        let config = load_config_from_str(
            r#"
[project]
name = "impact"

[build]
source_roots = ["src"]
arch = "sm_61"
"#,
        )
        .unwrap();
        let toolchain = resolve_toolchain(&config, &ToolchainOverrides::default()).unwrap();
        assert_eq!(toolchain.accelerator.arch.as_deref(), Some("sm_61"));
    }

    #[test]
    fn override_arch_wins_over_config() {
        let config = load_config_from_str(
            r#"
[project]
name = "impact"

[build]
source_roots = ["src"]
arch = "sm_52"
"#,
        )
        .unwrap();
        let overrides = ToolchainOverrides {
            arch: Some("sm_75".to_string()),
            toolkit_root: None,
        };
        let toolchain = resolve_toolchain(&config, &overrides).unwrap();
        assert_eq!(toolchain.accelerator.arch.as_deref(), Some("sm_75"));
    }

    #[test]
    fn profile_arch_used_when_build_arch_absent() {
        let config = load_config_from_str(
            r#"
[project]
name = "impact"

[build]
source_roots = ["src"]

[toolchain.accelerator]
arch = "sm_86"
"#,
        )
        .unwrap();
        let toolchain = resolve_toolchain(&config, &ToolchainOverrides::default()).unwrap();
        assert_eq!(toolchain.accelerator.arch.as_deref(), Some("sm_86"));
    }

    #[test]
    fn toolkit_root_rewrites_accelerator_paths() {
        let config = load_config_from_str(
            r#"
[project]
name = "impact"

[build]
source_roots = ["src"]
toolkit_root = "/opt/cuda-12.2"
"#,
        )
        .unwrap();
        let toolchain = resolve_toolchain(&config, &ToolchainOverrides::default()).unwrap();
        assert_eq!(
            toolchain.accelerator.compiler,
            PathBuf::from("/opt/cuda-12.2/bin/nvcc")
        );
        assert!(toolchain
            .accelerator
            .include_dirs
            .contains(&PathBuf::from("/opt/cuda-12.2/include")));
        assert_eq!(
            toolchain.toolkit_lib_dir,
            Some(PathBuf::from("/opt/cuda-12.2/lib64"))
        );
    }

    #[test]
    fn toolkit_root_override_wins() {
        let config = load_config_from_str(
            r#"
[project]
name = "impact"

[build]
source_roots = ["src"]
toolkit_root = "/opt/cuda-11.8"
"#,
        )
        .unwrap();
        let overrides = ToolchainOverrides {
            arch: None,
            toolkit_root: Some(PathBuf::from("/opt/cuda-12.2")),
        };
        let toolchain = resolve_toolchain(&config, &overrides).unwrap();
        assert_eq!(
            toolchain.accelerator.compiler,
            PathBuf::from("/opt/cuda-12.2/bin/nvcc")
        );
    }

    #[test]
    fn empty_compiler_is_rejected() {
        let config = load_config_from_str(
            r#"
[project]
name = "impact"

[build]
source_roots = ["src"]

[toolchain.host]
compiler = ""
"#,
        )
        .unwrap();
        let err = resolve_toolchain(&config, &ToolchainOverrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn profile_fields_carry_through() {
        let config = load_config_from_str(
            r#"
[project]
name = "impact"

[build]
source_roots = ["src"]

[toolchain.host]
compiler = "gcc"
flags = ["-O2"]
include_dirs = ["include"]
defines = ["NDEBUG"]
headers = ["include/params.h"]
"#,
        )
        .unwrap();
        let toolchain = resolve_toolchain(&config, &ToolchainOverrides::default()).unwrap();
        assert_eq!(toolchain.host.compiler, PathBuf::from("gcc"));
        assert_eq!(toolchain.host.flags, vec!["-O2"]);
        assert_eq!(toolchain.host.defines, vec!["NDEBUG"]);
        assert_eq!(toolchain.host.headers, vec![PathBuf::from("include/params.h")]);
    }
}
