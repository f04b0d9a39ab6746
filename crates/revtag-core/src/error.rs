//! Fatal fingerprint errors.
//!
//! Only structural and not-found failures reach the caller. Transient read
//! failures are absorbed with poison markers and never appear here.

use thiserror::Error;

use crate::ids::{AccountId, EntityId, ScopeId};
use crate::ports::PortError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FingerprintError {
    /// The entity itself does not exist
    #[error("entity not found: {0}")]
    NotFound(EntityId),

    /// The entity exists but its own state could not be read
    #[error("entity {entity} unavailable: {reason}")]
    EntityUnavailable { entity: EntityId, reason: String },

    /// The scope hierarchy loops back on itself (or exceeds the depth limit)
    #[error("configuration cycle at scope '{scope}'")]
    ConfigurationCycle { scope: ScopeId },

    /// A scope in the hierarchy does not exist or is malformed
    #[error("unresolvable scope '{scope}': {reason}")]
    UnresolvableScope { scope: ScopeId, reason: String },

    /// A port returned data that is missing or structurally invalid
    #[error("malformed {port} data: {reason}")]
    MalformedData { port: &'static str, reason: String },

    /// Identified viewers carry a positive account number
    #[error("invalid viewer account {0}")]
    InvalidViewer(AccountId),
}

impl FingerprintError {
    pub(crate) fn malformed(port: &'static str, err: PortError) -> Self {
        FingerprintError::MalformedData {
            port,
            reason: err.to_string(),
        }
    }
}

/// Result type for fingerprint computations
pub type FingerprintResult<T> = Result<T, FingerprintError>;
