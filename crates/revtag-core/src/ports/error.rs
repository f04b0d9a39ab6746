//! Port error types

use thiserror::Error;

/// Errors a read port can surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortError {
    /// The requested record does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Transient read failure (backend unreachable, timeout, I/O)
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// Stored data is structurally invalid
    #[error("malformed data: {0}")]
    Malformed(String),
}

impl PortError {
    /// Transient failures are absorbed by poisoning; everything else is structural.
    pub fn is_transient(&self) -> bool {
        matches!(self, PortError::Unavailable(_))
    }
}

/// Result type for port operations
pub type PortResult<T> = Result<T, PortError>;
