//! Common error types for revtag hosts.

use thiserror::Error;

/// Common error type for revtag operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot (de)serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Config file parse error
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Fatal fingerprint failure (not found, structural)
    #[error("fingerprint error: {0}")]
    Fingerprint(#[from] revtag_core::FingerprintError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid command-line or request input
    #[error("invalid input: {0}")]
    Input(String),
}

/// Result type alias using revtag Error.
pub type Result<T> = std::result::Result<T, Error>;
