//! Fingerprint orchestration.
//!
//! Composes the entity's own revision, the viewer context, every related
//! account, the content log and the scope chain into one token. Reads run
//! concurrently; feeding always follows this order:
//!
//! 1. format version
//! 2. last-modified timestamp, revision counter
//! 3. viewer discriminator (`0` for anonymous)
//! 4. viewer groups (sorted) and private-state marker, identified viewers only
//! 5. for each related account, ascending: metadata marker, external id markers
//! 6. content-log marker
//! 7. scope chain markers, self to root
//!
//! A transient read failure in steps 4-7 feeds [`Marker::Poisoned`] in place of
//! the missing value and the computation completes. The resulting token can
//! never match one computed from real data, so the next request refetches.
//! Any other read failure aborts the computation as soon as it is seen.

use futures::future::join_all;
use tracing::{debug, warn};

use crate::config::FingerprintConfig;
use crate::digest::{DigestAccumulator, FeedValue, Fingerprint};
use crate::entity::{AccountRevision, EntityState, Viewer};
use crate::error::{FingerprintError, FingerprintResult};
use crate::ids::{AccountId, EntityId, ObjectId};
use crate::marker::Marker;
use crate::ports::{
    AccountPort, ContentLogPort, ContributionPort, EntityPort, GroupPort, ParticipantPort,
    PortError, PortResult, ScopeConfigPort, ViewerPrivateStatePort,
};
use crate::resolve::{RelatedEntityResolver, ResolveError};
use crate::scope::{ScopeHierarchyWalker, ScopeLink, WalkError};
use crate::viewer::ViewerContextBinder;

/// The read ports a [`Fingerprinter`] consumes.
#[derive(Clone, Copy)]
pub struct PortSet<'a> {
    pub entities: &'a dyn EntityPort,
    pub contributions: &'a dyn ContributionPort,
    pub participants: &'a dyn ParticipantPort,
    pub accounts: &'a dyn AccountPort,
    pub groups: &'a dyn GroupPort,
    pub scopes: &'a dyn ScopeConfigPort,
    pub content_log: &'a dyn ContentLogPort,
    pub private_state: Option<&'a dyn ViewerPrivateStatePort>,
}

impl<'a> PortSet<'a> {
    /// Use one backend for every port, including private state.
    pub fn uniform<P>(ports: &'a P) -> Self
    where
        P: EntityPort
            + ContributionPort
            + ParticipantPort
            + AccountPort
            + GroupPort
            + ScopeConfigPort
            + ContentLogPort
            + ViewerPrivateStatePort,
    {
        Self {
            entities: ports,
            contributions: ports,
            participants: ports,
            accounts: ports,
            groups: ports,
            scopes: ports,
            content_log: ports,
            private_state: Some(ports),
        }
    }

    pub fn without_private_state(mut self) -> Self {
        self.private_state = None;
        self
    }
}

/// Everything read for one computation, buffered before feeding.
struct Observed {
    state: EntityState,
    viewer: Vec<FeedValue>,
    accounts: Vec<(AccountId, PortResult<AccountRevision>)>,
    accounts_incomplete: Option<PortError>,
    content_log: PortResult<Option<ObjectId>>,
    scopes: Vec<ScopeLink>,
    scopes_incomplete: Option<PortError>,
}

/// Stateless fingerprint engine over a set of read ports.
pub struct Fingerprinter<'a> {
    ports: PortSet<'a>,
    config: FingerprintConfig,
}

impl<'a> Fingerprinter<'a> {
    pub fn new(ports: PortSet<'a>) -> Self {
        Self {
            ports,
            config: FingerprintConfig::default(),
        }
    }

    pub fn with_config(mut self, config: FingerprintConfig) -> Self {
        self.config = config;
        self
    }

    /// Fingerprint `entity` as seen by `viewer` at the configured format version.
    pub async fn compute(&self, entity: EntityId, viewer: Viewer) -> FingerprintResult<Fingerprint> {
        self.compute_with_version(entity, viewer, self.config.format_version)
            .await
    }

    /// Fingerprint `entity` as seen by `viewer` at an explicit format version.
    pub async fn compute_with_version(
        &self,
        entity: EntityId,
        viewer: Viewer,
        format_version: u32,
    ) -> FingerprintResult<Fingerprint> {
        let mut acc = DigestAccumulator::open();
        self.prepare(&mut acc, entity, viewer, format_version).await?;
        let token = acc.finalize();
        debug!(entity = %entity, viewer = viewer.discriminator(), token = %token, "computed fingerprint");
        Ok(token)
    }

    /// Fingerprint one revision of `entity`.
    ///
    /// Extends the entity sequence with the revision id, so any change to the
    /// entity also invalidates every one of its revision tokens.
    pub async fn compute_revision(
        &self,
        entity: EntityId,
        viewer: Viewer,
        revision: ObjectId,
    ) -> FingerprintResult<Fingerprint> {
        let mut acc = DigestAccumulator::open();
        let version = self.config.format_version;
        self.prepare(&mut acc, entity, viewer, version).await?;
        acc.feed_marker(Marker::Present(revision));
        Ok(acc.finalize())
    }

    /// Feed the full entity sequence into `acc` without finalising.
    ///
    /// On error nothing has been fed.
    pub async fn prepare(
        &self,
        acc: &mut DigestAccumulator,
        entity: EntityId,
        viewer: Viewer,
        format_version: u32,
    ) -> FingerprintResult<()> {
        let observed = self.observe(entity, viewer).await?;

        acc.feed_int(i64::from(format_version))
            .feed_timestamp(observed.state.last_modified)
            .feed_int(i64::from(observed.state.revision))
            .feed_all(&observed.viewer);

        for (account, revision) in &observed.accounts {
            match revision {
                Ok(rev) => feed_account(acc, rev),
                Err(e) => {
                    warn!(entity = %entity, account = %account, error = %e, "account unavailable, poisoning");
                    acc.feed_marker(Marker::Poisoned);
                }
            }
        }
        if let Some(e) = &observed.accounts_incomplete {
            warn!(entity = %entity, error = %e, "related accounts incomplete, poisoning");
            acc.feed_marker(Marker::Poisoned);
        }

        match &observed.content_log {
            Ok(marker) => acc.feed_marker(Marker::from(*marker)),
            Err(e) => {
                warn!(entity = %entity, error = %e, "content log unavailable, poisoning");
                acc.feed_marker(Marker::Poisoned)
            }
        };

        for link in &observed.scopes {
            acc.feed_marker(link.marker);
        }
        if let Some(e) = &observed.scopes_incomplete {
            warn!(entity = %entity, namespace = %observed.state.namespace, error = %e, "scope chain incomplete, poisoning");
            acc.feed_marker(Marker::Poisoned);
        }

        Ok(())
    }

    async fn observe(&self, entity: EntityId, viewer: Viewer) -> FingerprintResult<Observed> {
        if let Some(account) = viewer.account_id().filter(|id| !id.is_valid()) {
            return Err(FingerprintError::InvalidViewer(account));
        }

        let state = self
            .ports
            .entities
            .load_own_state(entity)
            .await
            .map_err(|e| match e {
                PortError::NotFound(_) => FingerprintError::NotFound(entity),
                other => FingerprintError::EntityUnavailable {
                    entity,
                    reason: other.to_string(),
                },
            })?;

        let mut binder = ViewerContextBinder::new(self.ports.groups);
        if self.config.include_private_state {
            if let Some(port) = self.ports.private_state {
                binder = binder.with_private_state(port);
            }
        }
        let resolver = RelatedEntityResolver::new(self.ports.contributions, self.ports.participants);
        let walker = ScopeHierarchyWalker::new(self.ports.scopes, self.config.max_scope_depth);

        let viewer_values = async {
            binder
                .bind(viewer, entity)
                .await
                .map_err(|e| FingerprintError::malformed(e.port, e.reason))
        };

        let accounts = async {
            let (related, incomplete) = match resolver.resolve(entity, &state).await {
                Ok(related) => (related, None),
                Err(ResolveError::PartialDataUnavailable { partial, reason }) => {
                    (partial, Some(reason))
                }
                Err(ResolveError::Malformed { port, reason }) => {
                    return Err(FingerprintError::malformed(port, reason))
                }
            };
            let revisions = join_all(
                related
                    .iter()
                    .map(|account| self.ports.accounts.load_account_revision(*account)),
            )
            .await;

            let mut loaded = Vec::with_capacity(related.len());
            for (account, revision) in related.into_iter().zip(revisions) {
                match revision {
                    Err(e) if !e.is_transient() => {
                        return Err(FingerprintError::malformed("accounts", e))
                    }
                    revision => loaded.push((account, revision)),
                }
            }
            Ok::<_, FingerprintError>((loaded, incomplete))
        };

        let content_log = async {
            match self.ports.content_log.latest_marker(entity).await {
                Err(e) if !e.is_transient() => Err(FingerprintError::malformed("content log", e)),
                read => Ok(read),
            }
        };

        let scopes = async {
            match walker.walk(&state.namespace).await {
                Ok(chain) => Ok((chain, None)),
                Err(WalkError::Unavailable { partial, reason }) => Ok((partial, Some(reason))),
                Err(WalkError::ConfigurationCycle { scope }) => {
                    Err(FingerprintError::ConfigurationCycle { scope })
                }
                Err(WalkError::UnresolvableScope { scope, reason }) => {
                    Err(FingerprintError::UnresolvableScope { scope, reason })
                }
            }
        };

        let (viewer_values, accounts, content_log, scopes) =
            futures::try_join!(viewer_values, accounts, content_log, scopes)?;
        let (accounts, accounts_incomplete) = accounts;
        let (scopes, scopes_incomplete) = scopes;

        Ok(Observed {
            state,
            viewer: viewer_values,
            accounts,
            accounts_incomplete,
            content_log,
            scopes,
            scopes_incomplete,
        })
    }
}

/// Account metadata marker, then external id markers ordered by key.
fn feed_account(acc: &mut DigestAccumulator, rev: &AccountRevision) {
    acc.feed_marker(Marker::from(rev.meta));
    let mut external: Vec<_> = rev.external_ids.iter().collect();
    external.sort_by(|a, b| a.key.cmp(&b.key));
    for ext in external {
        acc.feed_marker(Marker::from(ext.blob));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ScopeConfig;
    use crate::ids::ScopeId;
    use crate::ports::MemoryPorts;
    use chrono::{TimeZone, Utc};
    use futures::executor::block_on;

    const E: EntityId = EntityId(1);

    fn ports() -> MemoryPorts {
        let mut ports = MemoryPorts::new();
        ports.put_entity(
            E,
            EntityState {
                revision: 5,
                last_modified: Utc.timestamp_millis_opt(1_704_067_200_000).unwrap(),
                owner: AccountId(1),
                assignee: None,
                namespace: ScopeId::new("proj"),
            },
        );
        ports.put_scope(ScopeConfig {
            id: ScopeId::new("proj"),
            parent: None,
            revision: None,
        });
        ports
    }

    #[test]
    fn prepare_feeds_nothing_on_error() {
        let ports = MemoryPorts::new();
        let fp = Fingerprinter::new(PortSet::uniform(&ports));
        let mut acc = DigestAccumulator::open();

        let err = block_on(fp.prepare(&mut acc, E, Viewer::Anonymous, 1)).unwrap_err();
        assert_eq!(err, FingerprintError::NotFound(E));
        assert!(acc.is_empty());
    }

    #[test]
    fn prepare_matches_compute() {
        let ports = ports();
        let fp = Fingerprinter::new(PortSet::uniform(&ports));

        let mut acc = DigestAccumulator::open();
        block_on(fp.prepare(&mut acc, E, Viewer::Anonymous, 1)).unwrap();
        let computed = block_on(fp.compute(E, Viewer::Anonymous)).unwrap();

        assert_eq!(acc.finalize(), computed);
    }

    #[test]
    fn external_id_order_is_canonical() {
        use crate::entity::ExternalIdMarker;

        let ext = |key: &str, byte: u8| ExternalIdMarker {
            key: key.to_string(),
            blob: Some(ObjectId::from_bytes([byte; ObjectId::LEN])),
        };

        let mut a = ports();
        a.put_account(
            AccountId(1),
            AccountRevision {
                meta: None,
                external_ids: vec![ext("mailto:a", 1), ext("username:a", 2)],
            },
        );
        let mut b = ports();
        b.put_account(
            AccountId(1),
            AccountRevision {
                meta: None,
                external_ids: vec![ext("username:a", 2), ext("mailto:a", 1)],
            },
        );

        let ta = block_on(Fingerprinter::new(PortSet::uniform(&a)).compute(E, Viewer::Anonymous));
        let tb = block_on(Fingerprinter::new(PortSet::uniform(&b)).compute(E, Viewer::Anonymous));
        assert_eq!(ta.unwrap(), tb.unwrap());
    }

    #[test]
    fn private_state_can_be_disabled_by_config() {
        let mut ports = ports();
        let viewer = Viewer::Identified(AccountId(1));
        let star = ObjectId::from_bytes([9; ObjectId::LEN]);

        let config = FingerprintConfig {
            include_private_state: false,
            ..FingerprintConfig::default()
        };
        let before = block_on(
            Fingerprinter::new(PortSet::uniform(&ports))
                .with_config(config.clone())
                .compute(E, viewer),
        )
        .unwrap();
        ports.set_private_marker(AccountId(1), E, star);
        let after = block_on(
            Fingerprinter::new(PortSet::uniform(&ports))
                .with_config(config)
                .compute(E, viewer),
        )
        .unwrap();

        assert_eq!(before, after);
    }

    #[test]
    fn non_positive_viewer_is_rejected() {
        let ports = ports();
        let fp = Fingerprinter::new(PortSet::uniform(&ports).without_private_state());

        for raw in [0, -1] {
            let viewer = Viewer::Identified(AccountId(raw));
            let mut acc = DigestAccumulator::open();
            let err = block_on(fp.prepare(&mut acc, E, viewer, 1)).unwrap_err();
            assert_eq!(err, FingerprintError::InvalidViewer(AccountId(raw)));
            assert!(acc.is_empty());
        }
        assert!(block_on(fp.compute(E, Viewer::Anonymous)).is_ok());
    }
}
