//! Revision markers fed into the digest.
//!
//! Every revision-bearing value (account metadata, external ids, content log,
//! scope configuration, private viewer state) is folded in as a [`Marker`].
//! The two reserved variants are encoded with their own tag byte, so no real
//! [`ObjectId`] can ever produce the same feed bytes as `Absent` or `Poisoned`.

use crate::ids::ObjectId;

/// Revision signal of a single observed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// A real content revision.
    Present(ObjectId),
    /// Never initialised, empty, or unknown. Stable across computations.
    Absent,
    /// The value could not be read. Never equal to any real or absent marker.
    Poisoned,
}

impl Marker {
    pub(crate) const TAG_ABSENT: u8 = 0x00;
    pub(crate) const TAG_PRESENT: u8 = 0x01;
    pub(crate) const TAG_POISONED: u8 = 0xff;

    /// Write the tagged encoding of this marker into `out`.
    pub(crate) fn encode_into(&self, out: &mut Vec<u8>) {
        match self {
            Marker::Present(id) => {
                out.push(Self::TAG_PRESENT);
                out.extend_from_slice(id.as_bytes());
            }
            Marker::Absent => out.push(Self::TAG_ABSENT),
            Marker::Poisoned => out.push(Self::TAG_POISONED),
        }
    }
}

impl From<Option<ObjectId>> for Marker {
    fn from(id: Option<ObjectId>) -> Self {
        id.map_or(Marker::Absent, Marker::Present)
    }
}

impl From<ObjectId> for Marker {
    fn from(id: ObjectId) -> Self {
        Marker::Present(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(marker: Marker) -> Vec<u8> {
        let mut out = Vec::new();
        marker.encode_into(&mut out);
        out
    }

    #[test]
    fn reserved_markers_have_distinct_encodings() {
        let zero = encoded(Marker::Present(ObjectId::ZERO));
        let absent = encoded(Marker::Absent);
        let poisoned = encoded(Marker::Poisoned);

        assert_ne!(zero, absent);
        assert_ne!(zero, poisoned);
        assert_ne!(absent, poisoned);
        assert_eq!(zero.len(), 1 + ObjectId::LEN);
    }

    #[test]
    fn option_conversion() {
        assert_eq!(Marker::from(None), Marker::Absent);
        assert_eq!(
            Marker::from(Some(ObjectId::ZERO)),
            Marker::Present(ObjectId::ZERO)
        );
    }
}
