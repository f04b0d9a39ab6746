//! Related-account resolution.
//!
//! Collects every account whose state can show up in the rendered entity:
//! owner, assignee, each contributor, and every current or former participant.
//! Former participants stay in because anything they posted is still visible.

use std::collections::BTreeSet;
use thiserror::Error;

use crate::entity::EntityState;
use crate::ids::{AccountId, EntityId};
use crate::ports::{ContributionPort, ParticipantPort, PortError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A list could not be read; `partial` holds everything that could be.
    #[error("related accounts partially unavailable: {reason}")]
    PartialDataUnavailable {
        partial: BTreeSet<AccountId>,
        reason: PortError,
    },

    /// A list read failed structurally.
    #[error("{port} list malformed: {reason}")]
    Malformed {
        port: &'static str,
        reason: PortError,
    },
}

/// Computes the deduplicated, ordered set of related accounts.
pub struct RelatedEntityResolver<'a> {
    contributions: &'a dyn ContributionPort,
    participants: &'a dyn ParticipantPort,
}

impl<'a> RelatedEntityResolver<'a> {
    pub fn new(
        contributions: &'a dyn ContributionPort,
        participants: &'a dyn ParticipantPort,
    ) -> Self {
        Self {
            contributions,
            participants,
        }
    }

    /// Resolve related accounts of `entity`, ascending by id.
    pub async fn resolve(
        &self,
        entity: EntityId,
        state: &EntityState,
    ) -> Result<BTreeSet<AccountId>, ResolveError> {
        let mut accounts = BTreeSet::new();
        accounts.insert(state.owner);
        accounts.extend(state.assignee);

        let (contributors, participants) = futures::join!(
            self.contributions.list_contributors(entity),
            self.participants.list_participants(entity),
        );

        let mut failure = None;
        for (port, listed) in [("contributions", contributors), ("participants", participants)] {
            match listed {
                Ok(ids) => accounts.extend(ids),
                Err(e) if e.is_transient() => {
                    failure.get_or_insert(e);
                }
                Err(reason) => return Err(ResolveError::Malformed { port, reason }),
            }
        }

        match failure {
            None => Ok(accounts),
            Some(reason) => Err(ResolveError::PartialDataUnavailable {
                partial: accounts,
                reason,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ScopeId;
    use crate::ports::{MemoryPorts, PortResult};
    use chrono::{TimeZone, Utc};
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    const E: EntityId = EntityId(1);

    fn state(assignee: Option<AccountId>) -> EntityState {
        EntityState {
            revision: 1,
            last_modified: Utc.timestamp_millis_opt(0).unwrap(),
            owner: AccountId(10),
            assignee,
            namespace: ScopeId::new("proj"),
        }
    }

    fn ids(raw: &[i32]) -> BTreeSet<AccountId> {
        raw.iter().copied().map(AccountId).collect()
    }

    #[test]
    fn includes_owner_assignee_contributors_and_participants() {
        let mut ports = MemoryPorts::new();
        ports.add_contributor(E, AccountId(20));
        ports.add_contributor(E, AccountId(10));
        ports.set_participants(E, vec![AccountId(40), AccountId(20)]);

        let resolver = RelatedEntityResolver::new(&ports, &ports);
        let got = block_on(resolver.resolve(E, &state(Some(AccountId(30))))).unwrap();

        assert_eq!(got, ids(&[10, 20, 30, 40]));
    }

    #[test]
    fn participant_order_does_not_matter() {
        let mut a = MemoryPorts::new();
        a.set_participants(E, vec![AccountId(3), AccountId(1), AccountId(2)]);
        let mut b = MemoryPorts::new();
        b.set_participants(E, vec![AccountId(2), AccountId(3), AccountId(1)]);

        let ra = block_on(RelatedEntityResolver::new(&a, &a).resolve(E, &state(None))).unwrap();
        let rb = block_on(RelatedEntityResolver::new(&b, &b).resolve(E, &state(None))).unwrap();

        assert_eq!(
            ra.into_iter().collect::<Vec<_>>(),
            rb.into_iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn participant_failure_keeps_what_loaded() {
        let mut ports = MemoryPorts::new();
        ports.add_contributor(E, AccountId(20));
        ports.fail_participants();

        let resolver = RelatedEntityResolver::new(&ports, &ports);
        let err = block_on(resolver.resolve(E, &state(None))).unwrap_err();

        match err {
            ResolveError::PartialDataUnavailable { partial, reason } => {
                assert_eq!(partial, ids(&[10, 20]));
                assert!(reason.is_transient());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    struct CorruptParticipants;

    #[async_trait::async_trait]
    impl ParticipantPort for CorruptParticipants {
        async fn list_participants(&self, _entity: EntityId) -> PortResult<Vec<AccountId>> {
            Err(PortError::Malformed("participant row without account".to_string()))
        }
    }

    #[test]
    fn malformed_list_is_structural() {
        let ports = MemoryPorts::new();
        let resolver = RelatedEntityResolver::new(&ports, &CorruptParticipants);

        let err = block_on(resolver.resolve(E, &state(None))).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::Malformed { port: "participants", .. }
        ));
    }
}
