//! Error types for configuration loading and validation.

/// Errors that can occur when loading or validating a `tycho.toml` configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A required field is missing from the configuration.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// The accelerator architecture selector is configured inconsistently.
    /// All accelerator artifacts in one build must target the same
    /// instruction-set generation.
    #[error("architecture selector mismatch: [build] declares '{global}' but [toolchain.accelerator] declares '{profile}'")]
    ArchMismatch {
        /// The selector declared in the `[build]` table.
        global: String,
        /// The selector declared in the accelerator toolchain profile.
        profile: String,
    },

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}
