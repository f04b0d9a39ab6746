//! Port trait definitions

use async_trait::async_trait;

use crate::entity::{AccountRevision, EntityState, ScopeConfig};
use crate::ids::{AccountId, EntityId, GroupId, ObjectId, ScopeId};
use crate::ports::error::PortResult;

/// Loads the entity being fingerprinted.
#[async_trait]
pub trait EntityPort: Send + Sync {
    /// Returns `PortError::NotFound` when the entity does not exist.
    async fn load_own_state(&self, entity: EntityId) -> PortResult<EntityState>;
}

/// Lists accounts that contributed revisions to the entity.
#[async_trait]
pub trait ContributionPort: Send + Sync {
    async fn list_contributors(&self, entity: EntityId) -> PortResult<Vec<AccountId>>;
}

/// Lists current and former reviewers/observers of the entity.
///
/// Removed participants must still be returned: anything they left behind
/// (comments, votes) can affect the rendered entity.
#[async_trait]
pub trait ParticipantPort: Send + Sync {
    async fn list_participants(&self, entity: EntityId) -> PortResult<Vec<AccountId>>;
}

/// Account directory.
#[async_trait]
pub trait AccountPort: Send + Sync {
    async fn load_account_revision(&self, account: AccountId) -> PortResult<AccountRevision>;
}

/// Authorization subsystem.
#[async_trait]
pub trait GroupPort: Send + Sync {
    /// Transitive set of groups the viewer effectively belongs to.
    async fn list_effective_groups(&self, viewer: AccountId) -> PortResult<Vec<GroupId>>;
}

/// Scope configuration store.
#[async_trait]
pub trait ScopeConfigPort: Send + Sync {
    /// Load one scope. `Ok(None)` means no such scope exists.
    async fn load_scope(&self, scope: &ScopeId) -> PortResult<Option<ScopeConfig>>;
}

/// Append-only change-metadata log of the entity.
#[async_trait]
pub trait ContentLogPort: Send + Sync {
    /// Id of the latest log entry; `None` if the log is empty.
    async fn latest_marker(&self, entity: EntityId) -> PortResult<Option<ObjectId>>;
}

/// Viewer-private auxiliary state (e.g. a star/watch marker).
#[async_trait]
pub trait ViewerPrivateStatePort: Send + Sync {
    async fn load_marker(&self, viewer: AccountId, entity: EntityId)
        -> PortResult<Option<ObjectId>>;
}
