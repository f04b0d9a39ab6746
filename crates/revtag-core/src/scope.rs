//! Scope hierarchy traversal.
//!
//! Walks from an entity's namespace up through its ancestors to the root,
//! always self first. Chains that revisit a scope, or grow past the configured
//! depth, are rejected as cycles.

use std::collections::HashSet;
use thiserror::Error;
use tracing::trace;

use crate::ids::ScopeId;
use crate::marker::Marker;
use crate::ports::{PortError, ScopeConfigPort};

/// One scope in a chain with its configuration marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeLink {
    pub scope: ScopeId,
    /// `Present` or `Absent`, never `Poisoned`
    pub marker: Marker,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalkError {
    #[error("configuration cycle at scope '{scope}'")]
    ConfigurationCycle { scope: ScopeId },

    #[error("unresolvable scope '{scope}': {reason}")]
    UnresolvableScope { scope: ScopeId, reason: String },

    /// A scope could not be read; `partial` holds the links walked so far.
    #[error("scope chain unavailable: {reason}")]
    Unavailable {
        partial: Vec<ScopeLink>,
        reason: PortError,
    },
}

pub struct ScopeHierarchyWalker<'a> {
    port: &'a dyn ScopeConfigPort,
    max_depth: usize,
}

impl<'a> ScopeHierarchyWalker<'a> {
    pub fn new(port: &'a dyn ScopeConfigPort, max_depth: usize) -> Self {
        Self { port, max_depth }
    }

    /// Walk from `namespace` to the root.
    pub async fn walk(&self, namespace: &ScopeId) -> Result<Vec<ScopeLink>, WalkError> {
        let mut chain: Vec<ScopeLink> = Vec::new();
        let mut seen: HashSet<ScopeId> = HashSet::new();
        let mut next = Some(namespace.clone());

        while let Some(scope) = next.take() {
            if !seen.insert(scope.clone()) || chain.len() >= self.max_depth {
                return Err(WalkError::ConfigurationCycle { scope });
            }

            let config = match self.port.load_scope(&scope).await {
                Ok(Some(config)) => config,
                Ok(None) => {
                    return Err(WalkError::UnresolvableScope {
                        scope,
                        reason: "no such scope".to_string(),
                    })
                }
                Err(e) if e.is_transient() => {
                    return Err(WalkError::Unavailable {
                        partial: chain,
                        reason: e,
                    })
                }
                Err(e) => {
                    return Err(WalkError::UnresolvableScope {
                        scope,
                        reason: e.to_string(),
                    })
                }
            };

            trace!(scope = %scope, parent = ?config.parent, "walked scope");
            chain.push(ScopeLink {
                scope,
                marker: Marker::from(config.revision),
            });
            next = config.parent;
        }

        Ok(chain)
    }
}
