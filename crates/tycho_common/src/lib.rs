//! Shared foundational types used across the tycho build orchestrator.
//!
//! This crate provides the source-kind classification (host vs. accelerator
//! compilation) and the build metadata provider used to stamp every compiled
//! artifact with a repository revision descriptor.

#![warn(missing_docs)]

pub mod kind;
pub mod revision;

pub use kind::SourceKind;
pub use revision::{BuildMetadataProvider, FixedMetadata, GitMetadata, UNKNOWN_REVISION};
