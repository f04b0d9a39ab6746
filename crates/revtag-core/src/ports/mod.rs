//! Read ports consumed by the fingerprint engine.
//!
//! Each external collaborator is reached through one narrow async trait:
//!
//! - **EntityPort**: the entity's own revision, owner, assignee and namespace
//! - **ContributionPort** / **ParticipantPort**: accounts related to the entity
//! - **AccountPort**: per-account revision markers
//! - **GroupPort**: a viewer's effective groups
//! - **ScopeConfigPort**: scope configuration, one scope at a time
//! - **ContentLogPort**: latest entry of the entity's change log
//! - **ViewerPrivateStatePort**: viewer-private marker (optional)
//!
//! [`MemoryPorts`] implements all of them for tests and the snapshot CLI.
//!
//! # Example
//!
//! ```rust
//! use revtag_core::ports::{EntityPort, MemoryPorts};
//! use revtag_core::{AccountId, EntityId, EntityState, ScopeId};
//! use chrono::{TimeZone, Utc};
//!
//! let mut ports = MemoryPorts::new();
//! ports.put_entity(EntityId(1), EntityState {
//!     revision: 3,
//!     last_modified: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
//!     owner: AccountId(1000),
//!     assignee: None,
//!     namespace: ScopeId::new("platform/core"),
//! });
//!
//! let state = futures::executor::block_on(ports.load_own_state(EntityId(1))).unwrap();
//! assert_eq!(state.revision, 3);
//! ```

mod error;
mod memory;
mod traits;

pub use error::{PortError, PortResult};
pub use memory::MemoryPorts;
pub use traits::{
    AccountPort, ContentLogPort, ContributionPort, EntityPort, GroupPort, ParticipantPort,
    ScopeConfigPort, ViewerPrivateStatePort,
};
