//! # Skyline Error Types
//!
//! Generation, selection and binning never fail. Errors only come from the
//! edges: reading and validating configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur at the edges of the pipeline.
#[derive(Error, Debug)]
pub enum SkylineError {
    /// A configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not valid TOML for the expected schema.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A configuration could not be serialized.
    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// A configuration value is outside its allowed range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for fallible skyline operations.
pub type SkylineResult<T> = Result<T, SkylineError>;
