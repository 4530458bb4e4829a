//! `Reference` and its supporting `Key`/`KeyType` (spec §3).

use serde::{Deserialize, Serialize};

/// Discriminates whether a [`Reference`] points into the model space
/// (`ModelReference`) or to an external concept (`ExternalReference`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceType {
    ExternalReference,
    ModelReference,
}

/// One of the ~25 AAS key types. Kept as a string-backed enum rather than a
/// bespoke integer code so unknown-but-syntactically-valid keys round-trip
/// without data loss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyType(pub String);

impl KeyType {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for KeyType {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// A single element of a [`Reference`]'s `keys` path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    #[serde(rename = "type")]
    pub key_type: KeyType,
    pub value: String,
}

/// An ordered sequence of typed [`Key`]s, optionally chained to another
/// `Reference` via `referredSemanticId` (spec §3, invariant I1: `keys` is
/// non-empty).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "type")]
    pub reference_type: ReferenceType,
    pub keys: Vec<Key>,
    #[serde(rename = "referredSemanticId", skip_serializing_if = "Option::is_none")]
    pub referred_semantic_id: Option<Box<Reference>>,
}

impl Reference {
    /// Depth of the `referredSemanticId` chain, including `self` (i.e. a
    /// reference with no chained parent has depth 1).
    #[must_use]
    pub fn chain_len(&self) -> usize {
        1 + self
            .referred_semantic_id
            .as_deref()
            .map_or(0, Reference::chain_len)
    }
}
