//! # revtag Shared Rust Library
//!
//! Infrastructure shared by hosts of the fingerprint engine:
//! - **error**: Common error type wrapping engine, I/O and parse failures
//! - **config**: Loading [`FingerprintConfig`](revtag_core::FingerprintConfig) from TOML
//! - **tracing**: Logging setup with revtag segment prefixes
//!
//! ## Usage
//!
//! ```rust,ignore
//! use revtag::config::load_config;
//! use revtag::error::Error;
//!
//! revtag::tracing::init();
//! let config = load_config(Some("revtag.toml".as_ref()))?;
//! ```

pub mod config;
pub mod error;
pub mod tracing;

// Re-export commonly used items at crate root
pub use config::load_config;
pub use error::{Error, Result};
