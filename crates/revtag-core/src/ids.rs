//! Identifier types for entities, accounts, groups, scopes and revisions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Numeric identity of the aggregate being fingerprinted (e.g. a change).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub i32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numeric account identity.
///
/// Real accounts are positive; `0` is reserved as the anonymous discriminator
/// fed for viewers without an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub i32);

impl AccountId {
    pub fn get(self) -> i32 {
        self.0
    }

    /// Whether this can name a real account.
    pub fn is_valid(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Group UUID as issued by the authorization subsystem.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub String);

impl GroupId {
    pub fn new(uuid: impl Into<String>) -> Self {
        Self(uuid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of a configuration scope (namespace).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeId(pub String);

impl ScopeId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error parsing an [`ObjectId`] from its hex form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid object id '{input}': expected {expected} hex characters")]
pub struct ParseObjectIdError {
    pub input: String,
    pub expected: usize,
}

/// Content-addressed revision identifier (20 raw bytes, 40 hex characters).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId([u8; ObjectId::LEN]);

impl ObjectId {
    pub const LEN: usize = 20;

    /// The all-zero id.
    pub const ZERO: ObjectId = ObjectId([0u8; ObjectId::LEN]);

    pub const fn from_bytes(bytes: [u8; ObjectId::LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ObjectId::LEN] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ObjectId::LEN]
    }

    /// Lowercase hex rendering.
    pub fn name(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for ObjectId {
    type Err = ParseObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseObjectIdError {
            input: s.to_string(),
            expected: ObjectId::LEN * 2,
        };
        if s.len() != ObjectId::LEN * 2 {
            return Err(err());
        }
        let mut out = [0u8; ObjectId::LEN];
        hex::decode_to_slice(s, &mut out).map_err(|_| err())?;
        Ok(Self(out))
    }
}

impl TryFrom<String> for ObjectId {
    type Error = ParseObjectIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.name()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "0123456789abcdef0123456789abcdef01234567";

    #[test]
    fn parse_and_render() {
        let id: ObjectId = SAMPLE.parse().unwrap();
        assert_eq!(id.name(), SAMPLE);
        assert_eq!(id.to_string(), SAMPLE);
        assert!(!id.is_zero());
    }

    #[test]
    fn parse_accepts_uppercase() {
        let id: ObjectId = SAMPLE.to_uppercase().parse().unwrap();
        assert_eq!(id.name(), SAMPLE);
    }

    #[test]
    fn parse_rejects_wrong_length() {
        let err = "abcd".parse::<ObjectId>().unwrap_err();
        assert_eq!(err.expected, 40);
    }

    #[test]
    fn parse_rejects_non_hex() {
        let bad = "zz23456789abcdef0123456789abcdef01234567";
        assert!(bad.parse::<ObjectId>().is_err());
    }

    #[test]
    fn zero_id() {
        assert!(ObjectId::ZERO.is_zero());
        assert_eq!(ObjectId::ZERO.name(), "0".repeat(40));
    }

    #[test]
    fn only_positive_accounts_are_valid() {
        assert!(AccountId(1).is_valid());
        assert!(!AccountId(0).is_valid());
        assert!(!AccountId(-3).is_valid());
    }

    #[test]
    fn serde_as_hex_string() {
        let id: ObjectId = SAMPLE.parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", SAMPLE));
        let back: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
