use serde::{Deserialize, Serialize};
use std::fmt;

///
/// TypeOrdinal
///
/// Dense ordinal of a node type. The ordinal space is owned by the type
/// hierarchy and only ever grows.
///

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub struct TypeOrdinal(pub u16);

impl TypeOrdinal {
    #[must_use]
    pub const fn new(ordinal: u16) -> Self {
        Self(ordinal)
    }

    /// Slot position of this type inside a per-type array.
    #[must_use]
    pub const fn as_index(self) -> usize {
        self.0 as usize
    }

    /// Ordinal for a slot position, if it fits the ordinal space.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        u16::try_from(index).ok().map(Self)
    }
}

impl From<u16> for TypeOrdinal {
    fn from(ordinal: u16) -> Self {
        Self(ordinal)
    }
}

impl fmt::Display for TypeOrdinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

///
/// Handle
///
/// Opaque, copyable reference to a node in the authoritative store.
/// Absence is expressed as `Option<Handle>`; `UNDEFINED` is the raw
/// sentinel used by stores that hand out bare integers and is never indexed.
///

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub struct Handle(pub u64);

impl Handle {
    pub const UNDEFINED: Self = Self(0);

    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn is_undefined(self) -> bool {
        self.0 == Self::UNDEFINED.0
    }

    /// Map the raw sentinel to `None`.
    #[must_use]
    pub const fn defined(self) -> Option<Self> {
        if self.is_undefined() { None } else { Some(self) }
    }
}

impl From<u64> for Handle {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

///
/// TESTS
///
