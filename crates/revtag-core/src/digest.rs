//! Order-sensitive digest accumulator for fingerprints.
//!
//! Values are fed one at a time and folded into an XXH3-128 state. Each feed
//! is written as a type tag followed by a fixed-width or length-prefixed body,
//! so the byte stream is prefix-free: two different feed sequences never hash
//! the same bytes. The hash is not cryptographic. Collisions between distinct
//! entity states are possible in principle and accepted.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use xxhash_rust::xxh3::Xxh3;

use crate::marker::Marker;

const TAG_INT: u8 = 0x10;
const TAG_TIMESTAMP: u8 = 0x11;
const TAG_BYTES: u8 = 0x12;
const TAG_IDENT: u8 = 0x13;
const TAG_MARKER: u8 = 0x20;

/// A single typed value accepted by [`DigestAccumulator::feed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedValue {
    Int(i64),
    /// Fed as milliseconds since the Unix epoch.
    Timestamp(DateTime<Utc>),
    Bytes(Vec<u8>),
    Ident(String),
    Marker(Marker),
}

impl From<Marker> for FeedValue {
    fn from(marker: Marker) -> Self {
        FeedValue::Marker(marker)
    }
}

/// Incremental hash builder. Output depends on feed order.
pub struct DigestAccumulator {
    hasher: Xxh3,
    scratch: Vec<u8>,
    fed: usize,
}

impl DigestAccumulator {
    pub fn open() -> Self {
        Self {
            hasher: Xxh3::new(),
            scratch: Vec::with_capacity(64),
            fed: 0,
        }
    }

    /// Feed one value.
    pub fn feed(&mut self, value: &FeedValue) -> &mut Self {
        match value {
            FeedValue::Int(v) => self.feed_int(*v),
            FeedValue::Timestamp(ts) => self.feed_timestamp(*ts),
            FeedValue::Bytes(b) => self.feed_bytes(b),
            FeedValue::Ident(s) => self.feed_ident(s),
            FeedValue::Marker(m) => self.feed_marker(*m),
        }
    }

    /// Feed every value in order.
    pub fn feed_all<'a>(&mut self, values: impl IntoIterator<Item = &'a FeedValue>) -> &mut Self {
        for value in values {
            self.feed(value);
        }
        self
    }

    pub fn feed_int(&mut self, v: i64) -> &mut Self {
        self.scratch.clear();
        self.scratch.push(TAG_INT);
        self.scratch.extend_from_slice(&v.to_be_bytes());
        self.flush()
    }

    pub fn feed_timestamp(&mut self, ts: DateTime<Utc>) -> &mut Self {
        self.scratch.clear();
        self.scratch.push(TAG_TIMESTAMP);
        self.scratch.extend_from_slice(&ts.timestamp_millis().to_be_bytes());
        self.flush()
    }

    pub fn feed_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.write_prefixed(TAG_BYTES, bytes)
    }

    pub fn feed_ident(&mut self, ident: &str) -> &mut Self {
        self.write_prefixed(TAG_IDENT, ident.as_bytes())
    }

    pub fn feed_marker(&mut self, marker: Marker) -> &mut Self {
        self.scratch.clear();
        self.scratch.push(TAG_MARKER);
        marker.encode_into(&mut self.scratch);
        self.flush()
    }

    /// Number of values fed so far.
    pub fn len(&self) -> usize {
        self.fed
    }

    pub fn is_empty(&self) -> bool {
        self.fed == 0
    }

    pub fn finalize(self) -> Fingerprint {
        Fingerprint(self.hasher.digest128().to_be_bytes())
    }

    fn write_prefixed(&mut self, tag: u8, body: &[u8]) -> &mut Self {
        let mut header = [0u8; 9];
        header[0] = tag;
        header[1..].copy_from_slice(&(body.len() as u64).to_be_bytes());
        self.hasher.update(&header);
        self.hasher.update(body);
        self.fed += 1;
        self
    }

    fn flush(&mut self) -> &mut Self {
        self.hasher.update(&self.scratch);
        self.fed += 1;
        self
    }
}

impl Default for DigestAccumulator {
    fn default() -> Self {
        Self::open()
    }
}

impl fmt::Debug for DigestAccumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestAccumulator")
            .field("fed", &self.fed)
            .finish()
    }
}

/// Error parsing a [`Fingerprint`] from hex.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid fingerprint '{0}': expected 32 hex characters")]
pub struct ParseFingerprintError(pub String);

/// Opaque 128-bit token summarising an entity's observable state.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 16]);

impl Fingerprint {
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Quoted entity-tag form used in `ETag` / `If-None-Match` headers.
    pub fn header_value(&self) -> String {
        format!("\"{}\"", self.to_hex())
    }
}

impl FromStr for Fingerprint {
    type Err = ParseFingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut out = [0u8; 16];
        hex::decode_to_slice(s, &mut out).map_err(|_| ParseFingerprintError(s.to_string()))?;
        Ok(Self(out))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}
