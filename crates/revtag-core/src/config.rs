//! Engine configuration

use serde::{Deserialize, Serialize};

/// Representation format version.
///
/// Bump on any change to the rendered shape of the entity (new fields, etc.)
/// so that otherwise unchanged entities get new fingerprints.
pub const FORMAT_VERSION: u32 = 1;

/// Default bound on the length of a scope chain.
pub const DEFAULT_MAX_SCOPE_DEPTH: usize = 64;

/// Fingerprint engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerprintConfig {
    /// Version fed first into every fingerprint
    pub format_version: u32,

    /// Consult the viewer-private state port when one is attached
    pub include_private_state: bool,

    /// Scope chains longer than this are rejected as cycles
    pub max_scope_depth: usize,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            include_private_state: true,
            max_scope_depth: DEFAULT_MAX_SCOPE_DEPTH,
        }
    }
}
