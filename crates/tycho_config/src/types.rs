//! Configuration types deserialized from `tycho.toml`.

use serde::Deserialize;
use std::path::PathBuf;

/// The top-level project configuration parsed from `tycho.toml`.
///
/// Describes everything the orchestrator needs: which trees to scan for
/// sources, where derived artifacts live, which compilers produce them,
/// and how the final binary is linked.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Core project metadata (name, version, target binary name).
    pub project: ProjectMeta,
    /// Build settings (source roots, output root, architecture selector).
    pub build: BuildSection,
    /// Per-kind toolchain profiles.
    #[serde(default)]
    pub toolchain: ToolchainSection,
    /// Link stage settings (external libraries, search paths, rpaths).
    #[serde(default)]
    pub link: LinkSection,
}

/// Core project metadata required in every `tycho.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// The project version string. Embedded as the revision descriptor
    /// when the project carries no repository metadata.
    #[serde(default)]
    pub version: String,
    /// Name of the linked target binary. Defaults to the project name.
    #[serde(default)]
    pub target: Option<String>,
}

impl ProjectMeta {
    /// Returns the target binary name (explicit `target` or the project name).
    pub fn target_name(&self) -> &str {
        self.target.as_deref().unwrap_or(&self.name)
    }
}

/// Build settings: where sources come from and where artifacts go.
#[derive(Debug, Deserialize)]
pub struct BuildSection {
    /// Directory trees scanned recursively for compilable files.
    /// Order is irrelevant; the union of their contents is built.
    pub source_roots: Vec<PathBuf>,
    /// Root of the derived-artifact tree (`obj/` and `bin/` live under it).
    /// Relative paths are resolved against the project directory.
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,
    /// Architecture selector for accelerator compilation (e.g. `sm_52`).
    /// Must agree with any selector declared in the accelerator profile.
    #[serde(default)]
    pub arch: Option<String>,
    /// Accelerator toolchain installation root. When set, the accelerator
    /// compiler resolves to `<root>/bin/<compiler>` and `<root>/include`
    /// and `<root>/lib64` join the include and library search paths.
    #[serde(default)]
    pub toolkit_root: Option<PathBuf>,
}

fn default_output_root() -> PathBuf {
    PathBuf::from("build")
}

/// The two configured toolchain profiles, one per source kind.
#[derive(Debug, Default, Deserialize)]
pub struct ToolchainSection {
    /// Profile for host-kind sources.
    #[serde(default)]
    pub host: ToolchainProfile,
    /// Profile for accelerator-kind sources.
    #[serde(default)]
    pub accelerator: ToolchainProfile,
}

/// A configured compiler profile for one source kind.
///
/// Profiles are configured, never derived: there is exactly one per kind,
/// constructed once and passed explicitly through the pipeline.
#[derive(Debug, Default, Deserialize)]
pub struct ToolchainProfile {
    /// Compiler executable name or path. Defaults are filled in during
    /// resolution (`cc` for host, `nvcc` for accelerator).
    #[serde(default)]
    pub compiler: Option<String>,
    /// Extra compiler flags, passed through verbatim.
    #[serde(default)]
    pub flags: Vec<String>,
    /// Include directories (`-I`).
    #[serde(default)]
    pub include_dirs: Vec<PathBuf>,
    /// Preprocessor defines (`-D`), without the leading `-D`.
    #[serde(default)]
    pub defines: Vec<String>,
    /// Shared header dependency list for this kind. A change to any listed
    /// header invalidates every artifact of this kind, whether or not the
    /// file textually includes it.
    #[serde(default)]
    pub headers: Vec<PathBuf>,
    /// Architecture selector override for this profile (accelerator only).
    #[serde(default)]
    pub arch: Option<String>,
}

/// Link stage configuration: external libraries and search paths.
#[derive(Debug, Default, Deserialize)]
pub struct LinkSection {
    /// External libraries to link (`-l`), without the leading `-l`.
    #[serde(default)]
    pub libraries: Vec<String>,
    /// Library search directories (`-L`).
    #[serde(default)]
    pub library_dirs: Vec<PathBuf>,
    /// Runtime library search paths embedded into the binary so it
    /// resolves shared libraries without further environment setup.
    #[serde(default)]
    pub rpaths: Vec<PathBuf>,
    /// Extra linker flags, passed through verbatim.
    #[serde(default)]
    pub flags: Vec<String>,
}
