//! Error types for the core library

use std::path::PathBuf;

use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised outside the generation path (configuration, input)
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration file could not be read
    #[error("Failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for `Settings`
    #[error("Invalid config: {0}")]
    Config(#[from] toml::de::Error),

    /// A color value in the branding section is not `#rrggbb`
    #[error("Invalid color '{0}', expected #rrggbb")]
    InvalidColor(String),

    /// The transcript handed to the core is unusable
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Transcript (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
