//! C4: reconstructs `Reference`/`referredSemanticId` chains from flat
//! `reference`/`reference_key` rows.
//!
//! Grounded on spec §4.4's algorithm plus the teacher's `snapshot/mod.rs`
//! channel/fan-out shape (`tokio::sync::RwLock`-guarded shared state, built
//! up from many independent scans then stitched together once scanning
//! completes) — here the "channel" is a registry of partially-built
//! references keyed by database id, filled in during a scan pass and then
//! fanned out to resolve `referredSemanticId` pointers.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio_postgres::Row;

use crate::error::RepositoryError;
use crate::model::{Key, Reference, ReferenceType};

/// A `reference` row plus its ordered `reference_key` rows, prior to
/// resolving its `referredSemanticId` pointer.
#[derive(Debug, Clone)]
pub struct ReferenceRow {
    pub id: i64,
    pub reference_type: ReferenceType,
    pub parent_reference: Option<i64>,
    pub root_reference: Option<i64>,
    pub keys: Vec<Key>,
}

impl ReferenceRow {
    /// Decodes one row of [`super::reference_query::compile`]'s result set:
    /// `reference.*` (id, type, parent_reference, root_reference) plus the
    /// `keys_json` side-column.
    pub fn from_row(row: &Row) -> error_stack::Result<Self, RepositoryError> {
        let reference_type = match row.get::<_, &str>("type") {
            "ExternalReference" => ReferenceType::ExternalReference,
            "ModelReference" => ReferenceType::ModelReference,
            other => {
                return Err(error_stack::Report::new(RepositoryError::corrupt(format!(
                    "reference {} has unknown type {other}",
                    row.get::<_, i64>("id")
                ))))
            }
        };
        let keys: Vec<Key> = serde_json::from_value(row.get("keys_json")).map_err(|error| {
            error_stack::Report::new(RepositoryError::corrupt("malformed reference_key rows"))
                .attach(error)
        })?;
        Ok(Self {
            id: row.get("id"),
            reference_type,
            parent_reference: row.get("parent_reference"),
            root_reference: row.get("root_reference"),
            keys,
        })
    }
}

/// Builds the full set of [`Reference`] trees from flat rows in two passes:
/// first every row is parsed into a [`Reference`] with no chained parent,
/// registered under its database id; then each reference's
/// `parent_reference` pointer is resolved against the registry to attach
/// the `referredSemanticId` chain. A reference that (transitively) points
/// back to itself is reported as [`RepositoryError::corrupt`] rather than
/// recursing forever.
pub struct ReferenceBuilder {
    registry: Arc<RwLock<HashMap<i64, Reference>>>,
    parents: HashMap<i64, i64>,
}

impl ReferenceBuilder {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(RwLock::new(HashMap::new())),
            parents: HashMap::new(),
        }
    }

    /// First pass: register every row's own keys, without yet attaching a
    /// chained parent.
    #[tracing::instrument(level = "trace", skip(self, rows))]
    pub async fn scan(&mut self, rows: &[ReferenceRow]) {
        let mut registry = self.registry.write().await;
        for row in rows {
            registry.insert(
                row.id,
                Reference {
                    reference_type: row.reference_type,
                    keys: row.keys.clone(),
                    referred_semantic_id: None,
                },
            );
            if let Some(parent) = row.parent_reference {
                self.parents.insert(row.id, parent);
            }
        }
    }

    /// Second pass: attach each reference's `referredSemanticId` chain by
    /// walking `parents` from `id` up to the chain's root, then folding the
    /// visited references back together from the root inward. A chain that
    /// revisits an id before terminating is reported as [`RepositoryError::corrupt`]
    /// rather than walked forever.
    #[tracing::instrument(level = "trace", skip(self))]
    pub async fn resolve(&self, id: i64) -> error_stack::Result<Reference, RepositoryError> {
        let registry = self.registry.read().await;

        let mut chain_ids = vec![id];
        let mut cursor = self.parents.get(&id).copied();
        while let Some(parent_id) = cursor {
            if chain_ids.contains(&parent_id) {
                return Err(error_stack::Report::new(RepositoryError::corrupt(
                    format!("reference chain starting at {id} cycles back to {parent_id}"),
                )));
            }
            chain_ids.push(parent_id);
            cursor = self.parents.get(&parent_id).copied();
        }

        let mut built: Option<Reference> = None;
        for chain_id in chain_ids.into_iter().rev() {
            let mut reference = registry.get(&chain_id).cloned().ok_or_else(|| {
                error_stack::Report::new(RepositoryError::corrupt(format!(
                    "reference {chain_id} referenced but never scanned"
                )))
            })?;
            reference.referred_semantic_id = built.take().map(Box::new);
            built = Some(reference);
        }

        built.ok_or_else(|| {
            error_stack::Report::new(RepositoryError::corrupt(format!(
                "reference {id} resolved to an empty chain"
            )))
        })
    }
}

impl Default for ReferenceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
