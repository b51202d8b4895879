//! The tycho build core: discovery, path mapping, staleness tracking,
//! compile dispatch, linking, and cleaning.
//!
//! The pipeline runs Discovery → Path Mapping → Dependency check →
//! Compile Dispatch (parallel across independent artifacts) → Link Stage
//! (barrier). [`BuildOrchestrator`] ties the stages together; `clean` is an
//! independent, unconditional operation on the output root.

#![warn(missing_docs)]

pub mod clean;
pub mod compile;
pub mod discover;
pub mod error;
pub mod layout;
pub mod link;
pub mod orchestrator;
pub mod stale;

#[cfg(test)]
pub(crate) mod testutil;

pub use clean::clean;
pub use discover::{discover_sources, SourceFile};
pub use error::BuildError;
pub use layout::BuildLayout;
pub use orchestrator::{BuildOrchestrator, BuildOutcome};
