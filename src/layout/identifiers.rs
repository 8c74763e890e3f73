//! Identifier newtypes for height overrides and whitespace zones.
//!
//! `DecorationId` validates non-empty strings at construction time.
//! `WhitespaceId` is minted by `LinesLayout` only; callers receive it from
//! `WhitespaceAccessor::insert_whitespace` and hand it back for changes.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Owner key of a custom line height override.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DecorationId(String);

/// Error returned when a decoration id is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("DecorationId must be non-empty")]
pub struct InvalidDecorationId;

impl DecorationId {
    /// Smart constructor: validates non-empty decoration id
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidDecorationId> {
        let raw = raw.into();
        if raw.is_empty() {
            Err(InvalidDecorationId)
        } else {
            Ok(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DecorationId {
    type Error = InvalidDecorationId;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<DecorationId> for String {
    fn from(id: DecorationId) -> Self {
        id.0
    }
}

impl fmt::Display for DecorationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique id of a whitespace zone.
///
/// Scoped to the `LinesLayout` instance that minted it: `instance` tells
/// layouts apart, `sequence` counts insertions within one layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WhitespaceId {
    instance: u32,
    sequence: u32,
}

impl WhitespaceId {
    pub(crate) fn new(instance: u32, sequence: u32) -> Self {
        Self { instance, sequence }
    }

    /// Tag of the layout that minted this id.
    pub fn instance(&self) -> u32 {
        self.instance
    }

    /// Position in the minting layout's insertion order (1-based).
    pub fn sequence(&self) -> u32 {
        self.sequence
    }
}

impl fmt::Display for WhitespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ws{}.{}", self.instance, self.sequence)
    }
}

impl Serialize for WhitespaceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
