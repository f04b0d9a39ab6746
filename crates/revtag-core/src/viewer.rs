//! Viewer context folded into the fingerprint.
//!
//! What a viewer sees depends on who they are and which groups they belong
//! to, so both go into the digest ahead of the viewer-independent state.

use std::collections::BTreeSet;
use thiserror::Error;
use tracing::warn;

use crate::digest::FeedValue;
use crate::entity::Viewer;
use crate::ids::EntityId;
use crate::marker::Marker;
use crate::ports::{GroupPort, PortError, ViewerPrivateStatePort};

/// A viewer read failed structurally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{port} read failed: {reason}")]
pub struct BindError {
    pub port: &'static str,
    pub reason: PortError,
}

/// Produces the viewer-specific feed values.
pub struct ViewerContextBinder<'a> {
    groups: &'a dyn GroupPort,
    private_state: Option<&'a dyn ViewerPrivateStatePort>,
}

impl<'a> ViewerContextBinder<'a> {
    pub fn new(groups: &'a dyn GroupPort) -> Self {
        Self {
            groups,
            private_state: None,
        }
    }

    pub fn with_private_state(mut self, port: &'a dyn ViewerPrivateStatePort) -> Self {
        self.private_state = Some(port);
        self
    }

    /// Values to feed for `viewer` looking at `entity`.
    ///
    /// Anonymous: the `0` discriminator only. Identified: account number,
    /// sorted distinct group ids, then the private-state marker if a port is
    /// attached. Transiently unavailable groups or private state feed a
    /// poison marker; any other read failure is returned.
    pub async fn bind(
        &self,
        viewer: Viewer,
        entity: EntityId,
    ) -> Result<Vec<FeedValue>, BindError> {
        let mut values = vec![FeedValue::Int(viewer.discriminator())];
        let Some(account) = viewer.account_id() else {
            return Ok(values);
        };

        let private = async {
            match self.private_state {
                Some(port) => Some(port.load_marker(account, entity).await),
                None => None,
            }
        };
        let (groups, private) =
            futures::join!(self.groups.list_effective_groups(account), private);

        match groups {
            Ok(groups) => {
                let sorted: BTreeSet<_> = groups.into_iter().collect();
                values.extend(sorted.into_iter().map(|g| FeedValue::Ident(g.0)));
            }
            Err(e) if e.is_transient() => {
                warn!(viewer = %account, entity = %entity, error = %e, "groups unavailable, poisoning");
                values.push(FeedValue::Marker(Marker::Poisoned));
            }
            Err(reason) => {
                return Err(BindError {
                    port: "groups",
                    reason,
                })
            }
        }

        match private {
            None => {}
            Some(Ok(marker)) => values.push(FeedValue::Marker(Marker::from(marker))),
            Some(Err(e)) if e.is_transient() => {
                warn!(viewer = %account, entity = %entity, error = %e, "private state unavailable, poisoning");
                values.push(FeedValue::Marker(Marker::Poisoned));
            }
            Some(Err(reason)) => {
                return Err(BindError {
                    port: "private state",
                    reason,
                })
            }
        }

        Ok(values)
    }
}
