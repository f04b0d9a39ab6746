//! Snapshot types read through the ports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{AccountId, ObjectId, ScopeId};

/// The entity's own revision signals and direct relations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityState {
    /// Monotonically increasing row revision
    pub revision: i32,

    pub last_modified: DateTime<Utc>,

    pub owner: AccountId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<AccountId>,

    /// Namespace whose scope chain configures this entity
    pub namespace: ScopeId,
}

/// One external identity linked to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalIdMarker {
    /// External id key, e.g. `username:alice`
    pub key: String,

    /// Revision of the blob storing this external id
    #[serde(default)]
    pub blob: Option<ObjectId>,
}

/// Revision state of one account as held by the account directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRevision {
    /// Revision of the account's own metadata; `None` if never written
    #[serde(default)]
    pub meta: Option<ObjectId>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external_ids: Vec<ExternalIdMarker>,
}

/// Configuration of one scope in the namespace hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeConfig {
    pub id: ScopeId,

    /// `None` for the root scope
    #[serde(default)]
    pub parent: Option<ScopeId>,

    /// Revision of the scope's configuration; `None` if never initialised
    #[serde(default)]
    pub revision: Option<ObjectId>,
}

/// Who is asking for the fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Viewer {
    #[default]
    Anonymous,
    Identified(AccountId),
}

impl Viewer {
    pub fn account_id(&self) -> Option<AccountId> {
        match self {
            Viewer::Anonymous => None,
            Viewer::Identified(id) => Some(*id),
        }
    }

    /// `0` for anonymous, the account number otherwise.
    pub fn discriminator(&self) -> i64 {
        self.account_id().map_or(0, |id| i64::from(id.get()))
    }
}

impl From<Option<AccountId>> for Viewer {
    fn from(id: Option<AccountId>) -> Self {
        id.map_or(Viewer::Anonymous, Viewer::Identified)
    }
}
