//! In-memory port backend
//!
//! A BTreeMap-based implementation of every read port, for testing and for
//! fingerprinting JSON snapshots. Faults can be injected per port to exercise
//! the transient-failure paths.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::entity::{AccountRevision, EntityState, ScopeConfig};
use crate::ids::{AccountId, EntityId, GroupId, ObjectId, ScopeId};
use crate::ports::error::{PortError, PortResult};
use crate::ports::traits::{
    AccountPort, ContentLogPort, ContributionPort, EntityPort, GroupPort, ParticipantPort,
    ScopeConfigPort, ViewerPrivateStatePort,
};

/// In-memory implementation of all read ports.
///
/// Accounts missing from `accounts` load as an empty [`AccountRevision`],
/// the same way a directory reports an account with no stored metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryPorts {
    #[serde(default)]
    entities: BTreeMap<EntityId, EntityState>,

    #[serde(default)]
    contributors: BTreeMap<EntityId, Vec<AccountId>>,

    #[serde(default)]
    participants: BTreeMap<EntityId, Vec<AccountId>>,

    #[serde(default)]
    accounts: BTreeMap<AccountId, AccountRevision>,

    #[serde(default)]
    groups: BTreeMap<AccountId, Vec<GroupId>>,

    #[serde(default)]
    scopes: BTreeMap<ScopeId, ScopeConfig>,

    #[serde(default)]
    content_log: BTreeMap<EntityId, ObjectId>,

    /// viewer -> entity -> marker
    #[serde(default)]
    private_markers: BTreeMap<AccountId, BTreeMap<EntityId, ObjectId>>,

    #[serde(skip)]
    faults: Faults,
}

#[derive(Debug, Clone, Default)]
struct Faults {
    accounts: HashSet<AccountId>,
    scopes: HashSet<ScopeId>,
    groups: bool,
    content_log: bool,
    participants: bool,
    contributors: bool,
    private_state: bool,
}

impl MemoryPorts {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON snapshot.
    ///
    /// Each `scopes` entry must be keyed by its own id.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let ports: Self = serde_json::from_str(json)?;
        if let Some((key, config)) = ports.scopes.iter().find(|(key, c)| **key != c.id) {
            return Err(serde::de::Error::custom(format!(
                "scope keyed '{}' has id '{}'",
                key, config.id
            )));
        }
        Ok(ports)
    }

    pub fn put_entity(&mut self, id: EntityId, state: EntityState) {
        self.entities.insert(id, state);
    }

    /// Mutable access to a stored entity, for simulating writes.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut EntityState> {
        self.entities.get_mut(&id)
    }

    pub fn add_contributor(&mut self, entity: EntityId, account: AccountId) {
        self.contributors.entry(entity).or_default().push(account);
    }

    pub fn set_contributors(&mut self, entity: EntityId, accounts: Vec<AccountId>) {
        self.contributors.insert(entity, accounts);
    }

    pub fn add_participant(&mut self, entity: EntityId, account: AccountId) {
        self.participants.entry(entity).or_default().push(account);
    }

    pub fn set_participants(&mut self, entity: EntityId, accounts: Vec<AccountId>) {
        self.participants.insert(entity, accounts);
    }

    pub fn put_account(&mut self, account: AccountId, revision: AccountRevision) {
        self.accounts.insert(account, revision);
    }

    pub fn set_groups(&mut self, viewer: AccountId, groups: Vec<GroupId>) {
        self.groups.insert(viewer, groups);
    }

    pub fn put_scope(&mut self, config: ScopeConfig) {
        self.scopes.insert(config.id.clone(), config);
    }

    pub fn set_content_log(&mut self, entity: EntityId, marker: Option<ObjectId>) {
        match marker {
            Some(id) => self.content_log.insert(entity, id),
            None => self.content_log.remove(&entity),
        };
    }

    pub fn set_private_marker(&mut self, viewer: AccountId, entity: EntityId, marker: ObjectId) {
        self.private_markers
            .entry(viewer)
            .or_default()
            .insert(entity, marker);
    }

    pub fn fail_account(&mut self, account: AccountId) {
        self.faults.accounts.insert(account);
    }

    pub fn fail_scope(&mut self, scope: ScopeId) {
        self.faults.scopes.insert(scope);
    }

    pub fn fail_groups(&mut self) {
        self.faults.groups = true;
    }

    pub fn fail_content_log(&mut self) {
        self.faults.content_log = true;
    }

    pub fn fail_participants(&mut self) {
        self.faults.participants = true;
    }

    pub fn fail_contributors(&mut self) {
        self.faults.contributors = true;
    }

    pub fn fail_private_state(&mut self) {
        self.faults.private_state = true;
    }

    /// Clear all injected faults.
    pub fn heal(&mut self) {
        self.faults = Faults::default();
    }
}

fn injected(what: impl std::fmt::Display) -> PortError {
    PortError::Unavailable(format!("injected fault: {}", what))
}

#[async_trait]
impl EntityPort for MemoryPorts {
    async fn load_own_state(&self, entity: EntityId) -> PortResult<EntityState> {
        self.entities
            .get(&entity)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("entity {}", entity)))
    }
}

#[async_trait]
impl ContributionPort for MemoryPorts {
    async fn list_contributors(&self, entity: EntityId) -> PortResult<Vec<AccountId>> {
        if self.faults.contributors {
            return Err(injected(format!("contributors of {}", entity)));
        }
        Ok(self.contributors.get(&entity).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl ParticipantPort for MemoryPorts {
    async fn list_participants(&self, entity: EntityId) -> PortResult<Vec<AccountId>> {
        if self.faults.participants {
            return Err(injected(format!("participants of {}", entity)));
        }
        Ok(self.participants.get(&entity).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl AccountPort for MemoryPorts {
    async fn load_account_revision(&self, account: AccountId) -> PortResult<AccountRevision> {
        if self.faults.accounts.contains(&account) {
            return Err(injected(format!("account {}", account)));
        }
        Ok(self.accounts.get(&account).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl GroupPort for MemoryPorts {
    async fn list_effective_groups(&self, viewer: AccountId) -> PortResult<Vec<GroupId>> {
        if self.faults.groups {
            return Err(injected(format!("groups of {}", viewer)));
        }
        Ok(self.groups.get(&viewer).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl ScopeConfigPort for MemoryPorts {
    async fn load_scope(&self, scope: &ScopeId) -> PortResult<Option<ScopeConfig>> {
        if self.faults.scopes.contains(scope) {
            return Err(injected(format!("scope {}", scope)));
        }
        Ok(self.scopes.get(scope).cloned())
    }
}

#[async_trait]
impl ContentLogPort for MemoryPorts {
    async fn latest_marker(&self, entity: EntityId) -> PortResult<Option<ObjectId>> {
        if self.faults.content_log {
            return Err(injected(format!("content log of {}", entity)));
        }
        Ok(self.content_log.get(&entity).copied())
    }
}

#[async_trait]
impl ViewerPrivateStatePort for MemoryPorts {
    async fn load_marker(
        &self,
        viewer: AccountId,
        entity: EntityId,
    ) -> PortResult<Option<ObjectId>> {
        if self.faults.private_state {
            return Err(injected(format!("private state of {} on {}", viewer, entity)));
        }
        Ok(self
            .private_markers
            .get(&viewer)
            .and_then(|m| m.get(&entity))
            .copied())
    }
}
