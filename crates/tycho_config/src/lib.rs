//! Parsing and validation of `tycho.toml` project configuration files.
//!
//! This crate reads the build description and produces a strongly-typed
//! [`ProjectConfig`], then resolves it (together with CLI overrides) into
//! per-kind [`ResolvedProfile`]s passed explicitly to discovery, compile
//! dispatch, and the link stage.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE};
pub use resolve::{resolve_toolchain, ResolvedProfile, ResolvedToolchain, ToolchainOverrides};
pub use types::*;
