//! The build pipeline: discovery through link, as one orchestrated run.
//!
//! Every invocation recomputes the source set from scratch, derives the
//! artifact mapping, takes a single modification-time snapshot, compiles
//! whatever is stale (in parallel), and relinks when any artifact changed
//! or the binary is missing. Artifacts persist on disk between
//! invocations; there is no other cached state.

use std::path::{Path, PathBuf};

use tycho_common::SourceKind;
use tycho_config::{ProjectConfig, ResolvedToolchain};

use crate::compile::{compile_all, verify_toolchain, CompileJob};
use crate::discover::discover_sources;
use crate::error::BuildError;
use crate::layout::BuildLayout;
use crate::link::link;
use crate::stale::{is_stale, DependencySet, MtimeSnapshot};

/// What one build invocation did.
#[derive(Debug)]
pub struct BuildOutcome {
    /// Number of source files discovered.
    pub sources: usize,
    /// Number of artifacts compiled this invocation.
    pub compiled: usize,
    /// Whether the target binary was (re)linked.
    pub linked: bool,
    /// Path of the target binary.
    pub binary: PathBuf,
    /// Artifact paths for the full discovered source set.
    pub artifacts: Vec<PathBuf>,
}

/// Runs the full pipeline for one project.
pub struct BuildOrchestrator {
    project_dir: PathBuf,
    config_path: PathBuf,
    config: ProjectConfig,
    toolchain: ResolvedToolchain,
    layout: BuildLayout,
    revision: String,
}

impl BuildOrchestrator {
    /// Creates an orchestrator for a loaded and resolved project.
    ///
    /// `config_path` is the build description file the configuration was
    /// loaded from; it joins every artifact's dependency set.
    pub fn new(
        project_dir: &Path,
        config_path: &Path,
        config: ProjectConfig,
        toolchain: ResolvedToolchain,
        revision: &str,
    ) -> Self {
        let layout = BuildLayout::new(project_dir, &config.build.output_root);
        Self {
            project_dir: project_dir.to_path_buf(),
            config_path: config_path.to_path_buf(),
            config,
            toolchain,
            layout,
            revision: revision.to_string(),
        }
    }

    /// The derived-artifact layout for this project.
    pub fn layout(&self) -> &BuildLayout {
        &self.layout
    }

    /// Runs one build invocation: discover, map, check staleness, compile
    /// stale artifacts, link if needed.
    ///
    /// The toolchain is verified before any compilation. A compile failure
    /// aborts the build after the parallel pass resolves, leaving completed
    /// artifacts on disk and skipping the link stage.
    pub fn run(&self) -> Result<BuildOutcome, BuildError> {
        verify_toolchain(&self.toolchain)?;

        let roots: Vec<PathBuf> = self
            .config
            .build
            .source_roots
            .iter()
            .map(|r| self.resolve_path(r))
            .collect();
        let sources = discover_sources(&roots)?;
        let artifacts = self.layout.map_artifacts(&sources)?;
        let binary = self.layout.binary_path(self.config.project.target_name());

        let shared_host = self.shared_deps(SourceKind::Host);
        let shared_accel = self.shared_deps(SourceKind::Accelerator);

        let snapshot = MtimeSnapshot::capture(
            sources
                .iter()
                .map(|s| s.path.as_path())
                .chain(artifacts.iter().map(PathBuf::as_path))
                .chain(shared_host.iter().map(PathBuf::as_path))
                .chain(shared_accel.iter().map(PathBuf::as_path))
                .chain(std::iter::once(binary.as_path())),
        );

        let mut jobs = Vec::new();
        for (source, artifact) in sources.iter().zip(&artifacts) {
            let shared = match source.kind {
                SourceKind::Host => &shared_host,
                SourceKind::Accelerator => &shared_accel,
            };
            let deps = DependencySet {
                source: source.path.clone(),
                shared: shared.clone(),
            };
            if is_stale(artifact, &deps, &snapshot) {
                jobs.push(CompileJob {
                    source: source.clone(),
                    artifact: artifact.clone(),
                });
            }
        }

        let compiled = compile_all(&jobs, &self.toolchain, &self.revision)?;

        let needs_link = !artifacts.is_empty()
            && (compiled > 0
                || match snapshot.mtime(&binary) {
                    None => true,
                    Some(bin_mtime) => artifacts
                        .iter()
                        .any(|a| snapshot.mtime(a).is_some_and(|m| m > bin_mtime)),
                });

        if needs_link {
            link(&artifacts, &self.config.link, &self.toolchain, &binary)?;
        }

        Ok(BuildOutcome {
            sources: sources.len(),
            compiled,
            linked: needs_link,
            binary,
            artifacts,
        })
    }

    /// The shared dependency list for one kind: its configured headers
    /// plus the build description file itself.
    fn shared_deps(&self, kind: SourceKind) -> Vec<PathBuf> {
        let mut shared: Vec<PathBuf> = self
            .toolchain
            .profile(kind)
            .headers
            .iter()
            .map(|h| self.resolve_path(h))
            .collect();
        shared.push(self.config_path.clone());
        shared
    }

    /// Resolves a configured path against the project directory.
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_dir.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::fake_compiler;
    use std::fs::OpenOptions;
    use std::time::{Duration, SystemTime};
    use tycho_config::{load_config_file, resolve_toolchain, ToolchainOverrides, CONFIG_FILE};

    fn write_source(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "int x;").unwrap();
    }

    fn set_mtime(path: &Path, time: SystemTime) {
        let f = OpenOptions::new().write(true).open(path).unwrap();
        f.set_modified(time).unwrap();
    }

    fn future() -> SystemTime {
        SystemTime::now() + Duration::from_secs(3600)
    }

    /// Writes `tycho.toml` pointing at fake compilers and builds the
    /// orchestrator for it.
    fn orchestrator(dir: &Path, roots: &[&str], nvcc_exit: i32) -> BuildOrchestrator {
        orchestrator_with_config(dir, roots, nvcc_exit, CONFIG_FILE)
    }

    fn orchestrator_with_config(
        dir: &Path,
        roots: &[&str],
        nvcc_exit: i32,
        config_name: &str,
    ) -> BuildOrchestrator {
        let cc = fake_compiler(dir, "fake-cc", 0);
        let nvcc = fake_compiler(dir, "fake-nvcc", nvcc_exit);
        let roots_toml: Vec<String> = roots.iter().map(|r| format!("\"{r}\"")).collect();
        let toml = format!(
            r#"
[project]
name = "impact"

[build]
source_roots = [{roots}]
arch = "sm_52"

[toolchain.host]
compiler = "{cc}"
headers = ["include/host_params.h"]

[toolchain.accelerator]
compiler = "{nvcc}"
headers = ["include/device_params.h"]

[link]
libraries = ["m", "hdf5"]
"#,
            roots = roots_toml.join(", "),
            cc = cc.display(),
            nvcc = nvcc.display(),
        );
        let config_path = dir.join(config_name);
        std::fs::write(&config_path, toml).unwrap();
        let config = load_config_file(&config_path).unwrap();
        let toolchain = resolve_toolchain(&config, &ToolchainOverrides::default()).unwrap();
        BuildOrchestrator::new(dir, &config_path, config, toolchain, "v0.3-7-g1234abc")
    }

    #[test]
    fn clean_build_produces_one_artifact_per_source() {
        let dir = tempfile::tempdir().unwrap();
        write_source(&dir.path().join("src/main.c"));
        write_source(&dir.path().join("src/tree.c"));
        write_source(&dir.path().join("src/kernels/density.cu"));

        let outcome = orchestrator(dir.path(), &["src"], 0).run().unwrap();
        assert_eq!(outcome.sources, 3);
        assert_eq!(outcome.compiled, 3);
        assert_eq!(outcome.artifacts.len(), 3);
        assert!(outcome.linked);
        assert!(outcome.binary.is_file());
        for artifact in &outcome.artifacts {
            assert!(artifact.is_file());
        }
    }

    #[test]
    fn identical_basenames_map_to_distinct_artifacts_and_both_link() {
        let dir = tempfile::tempdir().unwrap();
        write_source(&dir.path().join("src/util.c"));
        write_source(&dir.path().join("lib/util.c"));

        let outcome = orchestrator(dir.path(), &["src", "lib"], 0).run().unwrap();
        assert_eq!(outcome.compiled, 2);

        let expected_src = dir.path().join("build/obj/src/util.o");
        let expected_lib = dir.path().join("build/obj/lib/util.o");
        assert!(outcome.artifacts.contains(&expected_src));
        assert!(outcome.artifacts.contains(&expected_lib));

        // The fake linker records its argument list into the binary:
        // both artifacts were handed to the link stage.
        let linked_args = std::fs::read_to_string(&outcome.binary).unwrap();
        assert!(linked_args.contains("obj/src/util.o"));
        assert!(linked_args.contains("obj/lib/util.o"));
    }

    #[test]
    fn unchanged_rebuild_compiles_and_links_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write_source(&dir.path().join("src/main.c"));
        write_source(&dir.path().join("src/density.cu"));

        let orch = orchestrator(dir.path(), &["src"], 0);
        let first = orch.run().unwrap();
        assert_eq!(first.compiled, 2);
        assert!(first.linked);

        let binary_mtime = std::fs::metadata(&first.binary).unwrap().modified().unwrap();

        let second = orch.run().unwrap();
        assert_eq!(second.compiled, 0);
        assert!(!second.linked);
        assert_eq!(
            std::fs::metadata(&second.binary).unwrap().modified().unwrap(),
            binary_mtime
        );
    }

    #[test]
    fn touching_one_source_recompiles_only_that_artifact() {
        let dir = tempfile::tempdir().unwrap();
        write_source(&dir.path().join("src/a.c"));
        write_source(&dir.path().join("src/b.c"));

        let orch = orchestrator(dir.path(), &["src"], 0);
        orch.run().unwrap();

        set_mtime(&dir.path().join("src/a.c"), future());
        let outcome = orch.run().unwrap();
        assert_eq!(outcome.compiled, 1);
        assert!(outcome.linked);
    }

    #[test]
    fn shared_header_invalidates_every_artifact_of_its_kind_only() {
        let dir = tempfile::tempdir().unwrap();
        write_source(&dir.path().join("src/a.c"));
        write_source(&dir.path().join("src/b.c"));
        write_source(&dir.path().join("src/k.cu"));
        // Neither a.c nor b.c includes this header; the coarse shared
        // list invalidates them anyway.
        write_source(&dir.path().join("include/host_params.h"));
        write_source(&dir.path().join("include/device_params.h"));

        let orch = orchestrator(dir.path(), &["src"], 0);
        assert_eq!(orch.run().unwrap().compiled, 3);

        set_mtime(&dir.path().join("include/host_params.h"), future());
        let outcome = orch.run().unwrap();
        assert_eq!(outcome.compiled, 2); // both host artifacts, not the device one
        assert!(outcome.linked);
    }

    #[test]
    fn touching_the_build_description_invalidates_everything() {
        let dir = tempfile::tempdir().unwrap();
        write_source(&dir.path().join("src/a.c"));
        write_source(&dir.path().join("src/k.cu"));

        let orch = orchestrator(dir.path(), &["src"], 0);
        assert_eq!(orch.run().unwrap().compiled, 2);

        set_mtime(&dir.path().join(CONFIG_FILE), future());
        assert_eq!(orch.run().unwrap().compiled, 2);
    }

    #[test]
    fn custom_named_build_description_is_tracked_too() {
        let dir = tempfile::tempdir().unwrap();
        write_source(&dir.path().join("src/a.c"));

        let orch = orchestrator_with_config(dir.path(), &["src"], 0, "ceres.toml");
        assert_eq!(orch.run().unwrap().compiled, 1);
        assert_eq!(orch.run().unwrap().compiled, 0);

        set_mtime(&dir.path().join("ceres.toml"), future());
        assert_eq!(orch.run().unwrap().compiled, 1);
    }

    #[test]
    fn clean_and_rebuild_reproduce_the_same_artifact_paths() {
        let dir = tempfile::tempdir().unwrap();
        write_source(&dir.path().join("src/main.c"));
        write_source(&dir.path().join("src/kernels/density.cu"));

        let orch = orchestrator(dir.path(), &["src"], 0);
        let first = orch.run().unwrap();

        crate::clean(orch.layout().output_root()).unwrap();
        assert!(!orch.layout().output_root().exists());

        let second = orch.run().unwrap();
        assert_eq!(first.artifacts, second.artifacts);
        assert_eq!(second.compiled, 2);
    }

    #[test]
    fn missing_binary_relinks_without_recompiling() {
        let dir = tempfile::tempdir().unwrap();
        write_source(&dir.path().join("src/main.c"));

        let orch = orchestrator(dir.path(), &["src"], 0);
        let first = orch.run().unwrap();
        std::fs::remove_file(&first.binary).unwrap();

        let second = orch.run().unwrap();
        assert_eq!(second.compiled, 0);
        assert!(second.linked);
        assert!(second.binary.is_file());
    }

    #[test]
    fn failing_accelerator_compile_aborts_without_touching_the_binary() {
        let dir = tempfile::tempdir().unwrap();
        write_source(&dir.path().join("src/main.c"));
        write_source(&dir.path().join("src/broken.cu"));

        // First build succeeds and links.
        let orch = orchestrator(dir.path(), &["src"], 0);
        let first = orch.run().unwrap();
        let binary_mtime = std::fs::metadata(&first.binary).unwrap().modified().unwrap();

        // Make both sources stale, then break the accelerator compiler.
        set_mtime(&dir.path().join("src/main.c"), future());
        set_mtime(&dir.path().join("src/broken.cu"), future());
        fake_compiler(dir.path(), "fake-nvcc", 1);

        let err = orch.run().unwrap_err();
        assert!(matches!(err, BuildError::Compile { .. }));

        // The binary was not relinked, but the host artifact from the same
        // run was still freshly compiled.
        assert_eq!(
            std::fs::metadata(&first.binary).unwrap().modified().unwrap(),
            binary_mtime
        );
        let host_artifact = dir.path().join("build/obj/src/main.o");
        let host_mtime = std::fs::metadata(&host_artifact).unwrap().modified().unwrap();
        assert!(host_mtime > binary_mtime);
    }

    #[test]
    fn first_build_with_failing_compile_produces_no_binary() {
        let dir = tempfile::tempdir().unwrap();
        write_source(&dir.path().join("src/broken.cu"));

        let err = orchestrator(dir.path(), &["src"], 1).run().unwrap_err();
        assert!(matches!(err, BuildError::Compile { .. }));
        assert!(!dir.path().join("build/bin/impact").exists());
    }

    #[test]
    fn missing_source_root_fails_before_compiling() {
        let dir = tempfile::tempdir().unwrap();
        let err = orchestrator(dir.path(), &["no-such-dir"], 0)
            .run()
            .unwrap_err();
        assert!(matches!(err, BuildError::MissingSourceRoot(_)));
        assert!(!dir.path().join("build").exists());
    }

    #[test]
    fn unresolvable_compiler_fails_before_discovery() {
        let dir = tempfile::tempdir().unwrap();
        write_source(&dir.path().join("src/main.c"));

        let orch = orchestrator(dir.path(), &["src"], 0);
        std::fs::remove_file(dir.path().join("fake-nvcc")).unwrap();

        let err = orch.run().unwrap_err();
        assert!(matches!(err, BuildError::CompilerNotFound(_)));
        assert!(!dir.path().join("build").exists());
    }

    #[test]
    fn empty_source_set_builds_nothing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();

        let outcome = orchestrator(dir.path(), &["src"], 0).run().unwrap();
        assert_eq!(outcome.sources, 0);
        assert_eq!(outcome.compiled, 0);
        assert!(!outcome.linked);
    }

    #[test]
    fn revision_descriptor_reaches_every_compile() {
        let dir = tempfile::tempdir().unwrap();
        write_source(&dir.path().join("src/main.c"));

        let outcome = orchestrator(dir.path(), &["src"], 0).run().unwrap();
        let recorded = std::fs::read_to_string(&outcome.artifacts[0]).unwrap();
        assert!(recorded.contains("-DVERSION=\"v0.3-7-g1234abc\""));
    }
}
