//! C3: the row scanner that turns a single `tokio_postgres::Row` into the
//! raw-JSON intermediate shapes consumed by the C5/C6 builders.
//!
//! Grounded on the teacher's `store/postgres/knowledge/entity/read.rs`
//! positional `row.get(n)` scan style for the outer `submodel` row: columns
//! are read by index in the fixed order C1 selects them in, rather than by
//! name, matching the teacher's own comment that column order is load-bearing
//! there too. Submodel elements, nested inside that row's JSON aggregate
//! rather than returned as rows of their own, are decoded via `serde`
//! instead.

use serde::Deserialize;
use serde_json::Value;
use tokio_postgres::Row;

use crate::error::{CorruptData, RepositoryError};

/// One `submodel` row plus its aggregated JSON side-columns, exactly as
/// produced by [`super::builder::SubmodelQueryBuilder`].
#[derive(Debug)]
pub struct SubmodelRow {
    pub id: i64,
    pub global_id: String,
    pub id_short: String,
    pub category: Option<String>,
    pub kind: String,
    pub semantic_id: Option<i64>,
    pub display_name_json: Value,
    pub description_json: Value,
    pub supplemental_semantic_ids_json: Value,
    pub qualifiers_json: Value,
    pub extensions_json: Value,
    pub embedded_data_specifications_json: Value,
    pub administration_json: Option<Value>,
    pub submodel_elements_json: Value,
}

impl SubmodelRow {
    /// Column order matches `SubmodelQueryBuilder::compile`'s `SELECT` list:
    /// `submodel.*` (id, global_id, id_short, category, kind, semantic_id,
    /// ...) followed by the aggregated JSON columns in
    /// `SUBMODEL_JSON_FRAGMENTS` order.
    pub fn from_row(row: &Row) -> Self {
        Self {
            id: row.get(0),
            global_id: row.get(1),
            id_short: row.get(2),
            category: row.get(3),
            kind: row.get(4),
            semantic_id: row.get(5),
            display_name_json: row.get("display_name_json"),
            description_json: row.get("description_json"),
            supplemental_semantic_ids_json: row.get("supplemental_semantic_ids_json"),
            qualifiers_json: row.get("qualifiers_json"),
            extensions_json: row.get("extensions_json"),
            embedded_data_specifications_json: row.get("embedded_data_specifications_json"),
            administration_json: row.get("administration_json"),
            submodel_elements_json: row.get("submodel_elements_json"),
        }
    }

    /// Gate used throughout C5: an aggregated `jsonb_agg` column is either a
    /// non-empty JSON array or the `'[]'::jsonb` sentinel emitted for no
    /// matching rows (spec §4.1).
    pub fn non_empty_array(value: &Value) -> Option<&Vec<Value>> {
        value.as_array().filter(|array| !array.is_empty())
    }
}

/// One `submodel_element` row, still bearing its storage bookkeeping
/// columns (`parent_sme_id`, `root_sme_id`, `position`, `idshort_path`)
/// needed by C6 to rebuild the parent/child tree.
///
/// Unlike [`SubmodelRow`], these never arrive as their own top-level
/// `tokio_postgres::Row` — C1's single-round-trip strategy nests every
/// submodel's elements inside that submodel row's `submodel_elements_json`
/// array, so each element is decoded from a `serde_json::Value` instead
/// (spec §4.1).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SubmodelElementRow {
    pub id: i64,
    pub submodel_id: i64,
    pub parent_sme_id: Option<i64>,
    pub root_sme_id: Option<i64>,
    pub id_short: String,
    pub idshort_path: String,
    pub model_type: String,
    pub category: Option<String>,
    pub position: Option<i32>,
    pub semantic_id: Option<i64>,
    pub payload_json: Value,
}

impl SubmodelElementRow {
    /// Decodes one element of a submodel row's `submodel_elements_json`
    /// array (see [`SubmodelRow::submodel_elements_json`]).
    pub fn from_value(value: Value) -> error_stack::Result<Self, RepositoryError> {
        decode_json(value, "malformed submodel_element entry")
    }

    pub fn validate_container_position(&self) -> Result<(), CorruptData> {
        if self.is_container() && self.position.is_none() {
            return Err(CorruptData::new(format!(
                "submodel_element {} ({}) is a container but has no position",
                self.id, self.model_type
            )));
        }
        Ok(())
    }

    fn is_container(&self) -> bool {
        matches!(
            self.model_type.as_str(),
            "SubmodelElementCollection"
                | "SubmodelElementList"
                | "Entity"
                | "AnnotatedRelationshipElement"
        )
    }
}

/// One `concept_description` row plus its `administration_json` side-column
/// (spec §3): much flatter than [`SubmodelRow`], since a `ConceptDescription`
/// carries no semantic id, qualifiers, extensions, or element tree.
#[derive(Debug)]
pub struct ConceptDescriptionRow {
    pub id: i64,
    pub global_id: String,
    pub id_short: String,
    pub category: Option<String>,
    pub is_case_of: Value,
    pub embedded_data_specifications: Value,
    pub display_name_json: Value,
    pub description_json: Value,
    pub administration_json: Option<Value>,
}

impl ConceptDescriptionRow {
    /// Column order matches `ConceptDescriptionQueryBuilder::compile`'s
    /// `SELECT` list: `concept_description.*` (id, global_id, id_short,
    /// category, administration_id, displayname_id, description_id,
    /// is_case_of, embedded_data_specifications) followed by
    /// `display_name_json`, `description_json`, `administration_json`.
    pub fn from_row(row: &Row) -> Self {
        Self {
            id: row.get(0),
            global_id: row.get(1),
            id_short: row.get(2),
            category: row.get(3),
            is_case_of: row.get("is_case_of"),
            embedded_data_specifications: row.get("embedded_data_specifications"),
            display_name_json: row.get("display_name_json"),
            description_json: row.get("description_json"),
            administration_json: row.get("administration_json"),
        }
    }
}

/// Decodes a single raw JSON side-column into `T`, wrapping a decode failure
/// as [`RepositoryError::corrupt`] rather than propagating the raw
/// `serde_json::Error` (the domain model never sees a decode error that
/// isn't already classified, per spec §7).
pub fn decode_json<T: serde::de::DeserializeOwned>(
    value: Value,
    context: &str,
) -> error_stack::Result<T, RepositoryError> {
    serde_json::from_value(value)
        .map_err(|error| error_stack::Report::new(RepositoryError::corrupt(context)).attach(error))
}
