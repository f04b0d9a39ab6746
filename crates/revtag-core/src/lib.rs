//! revtag Core Engine
//!
//! Computes entity fingerprints: opaque tokens summarising everything that
//! can change how an aggregate entity renders for a given viewer. Tokens are
//! used as HTTP entity tags for conditional requests.
//!
//! A fingerprint folds in the entity's own revision, the viewer's identity
//! and groups, the revision markers of every related account, the entity's
//! content log, and the configuration of each scope in its namespace chain.
//! Reads go through the narrow async traits in [`ports`]; transient read
//! failures poison the token instead of failing the request.
//!
//! # Example
//!
//! ```rust
//! use revtag_core::ports::MemoryPorts;
//! use revtag_core::{
//!     AccountId, EntityId, EntityState, Fingerprinter, PortSet, ScopeConfig, ScopeId, Viewer,
//! };
//! use chrono::{TimeZone, Utc};
//!
//! let mut ports = MemoryPorts::new();
//! ports.put_entity(EntityId(1), EntityState {
//!     revision: 5,
//!     last_modified: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
//!     owner: AccountId(1000),
//!     assignee: None,
//!     namespace: ScopeId::new("All-Projects"),
//! });
//! ports.put_scope(ScopeConfig { id: ScopeId::new("All-Projects"), parent: None, revision: None });
//!
//! let engine = Fingerprinter::new(PortSet::uniform(&ports));
//! let a = futures::executor::block_on(engine.compute(EntityId(1), Viewer::Anonymous)).unwrap();
//! let b = futures::executor::block_on(engine.compute(EntityId(1), Viewer::Anonymous)).unwrap();
//! assert_eq!(a, b);
//! assert_eq!(a.to_hex().len(), 32);
//! ```

pub mod config;
pub mod digest;
pub mod entity;
pub mod error;
pub mod fingerprint;
pub mod ids;
pub mod marker;
pub mod ports;
pub mod resolve;
pub mod scope;
pub mod viewer;

// Re-export main types at crate root
pub use config::{FingerprintConfig, FORMAT_VERSION};
pub use digest::{DigestAccumulator, FeedValue, Fingerprint, ParseFingerprintError};
pub use entity::{AccountRevision, EntityState, ExternalIdMarker, ScopeConfig, Viewer};
pub use error::{FingerprintError, FingerprintResult};
pub use fingerprint::{Fingerprinter, PortSet};
pub use ids::{AccountId, EntityId, GroupId, ObjectId, ParseObjectIdError, ScopeId};
pub use marker::Marker;
pub use ports::{MemoryPorts, PortError};
pub use resolve::{RelatedEntityResolver, ResolveError};
pub use scope::{ScopeHierarchyWalker, ScopeLink, WalkError};
pub use viewer::{BindError, ViewerContextBinder};
