//! Error types for Concord core.

use thiserror::Error;

/// Result type for Concord operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the ambient shell around the engine.
///
/// Analysis content never produces these: parse failures, unresolvable
/// imports and per-file read problems all degrade to warnings. Only setup
/// paths (reading a project, decoding a manifest, bad configuration) can
/// fail.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error (package.json, baseline snapshots).
    #[error("JSON parse error in {file}: {source}")]
    Json {
        /// Path to the JSON file with the error.
        file: String,
        /// The underlying JSON parsing error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration is invalid.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },

    /// File provider error (directory walk failed outright).
    #[error("File provider error: {message}")]
    Provider {
        /// Error message from the provider.
        message: String,
    },
}
