//! C5: builds the public [`Qualifier`] shape from raw `qualifier` rows.
//!
//! Grounded on the teacher's `store/postgres/knowledge/entity/read.rs`
//! small-free-function-per-aspect style: one function per attribute family,
//! taking the decoded intermediate rows and an already-resolved reference
//! lookup, rather than one monolithic "build everything" function.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::RepositoryError;
use crate::model::{Qualifier, QualifierKind, Reference, TypedValue, ValueType};

#[derive(Debug, Deserialize)]
struct QualifierRow {
    kind: QualifierKind,
    qualifier_type: String,
    value_type: ValueType,
    value_text: Option<String>,
    value_num: Option<f64>,
    value_bool: Option<bool>,
    semantic_id: Option<i64>,
    value_id: Option<i64>,
    #[serde(default)]
    supplemental_semantic_ids: Vec<i64>,
}

/// Decodes the `qualifiers_json` column (already validated non-empty by
/// [`crate::postgres::rows::SubmodelRow::non_empty_array`]) into
/// `Vec<Qualifier>`, resolving each embedded reference id against
/// `references` (built by [`crate::postgres::reference_graph::ReferenceBuilder`]).
pub fn build(
    array: &[Value],
    references: &HashMap<i64, Reference>,
) -> error_stack::Result<Vec<Qualifier>, RepositoryError> {
    array
        .iter()
        .map(|entry| build_one(entry, references))
        .collect()
}

fn build_one(
    entry: &Value,
    references: &HashMap<i64, Reference>,
) -> error_stack::Result<Qualifier, RepositoryError> {
    let row: QualifierRow = serde_json::from_value(entry.clone())
        .map_err(|error| error_stack::Report::new(RepositoryError::corrupt("malformed qualifier row")).attach(error))?;

    let value = typed_value(&row);
    let semantic_id = row
        .semantic_id
        .map(|id| resolve(references, id))
        .transpose()?;
    let value_id = row.value_id.map(|id| resolve(references, id)).transpose()?;
    let supplemental_semantic_ids = row
        .supplemental_semantic_ids
        .iter()
        .map(|id| resolve(references, *id))
        .collect::<error_stack::Result<Vec<_>, _>>()?;

    Ok(Qualifier {
        kind: row.kind,
        qualifier_type: row.qualifier_type,
        value_type: row.value_type,
        value,
        semantic_id,
        value_id,
        supplemental_semantic_ids,
    })
}

fn typed_value(row: &QualifierRow) -> Option<TypedValue> {
    if let Some(value) = row.value_bool {
        return Some(TypedValue::Bool(value));
    }
    if let Some(value) = row.value_num {
        return Some(TypedValue::Number(value));
    }
    row.value_text
        .as_deref()
        .map(|text| TypedValue::coerce(text, Some(row.value_type)))
}

fn resolve(
    references: &HashMap<i64, Reference>,
    id: i64,
) -> error_stack::Result<Reference, RepositoryError> {
    references.get(&id).cloned().ok_or_else(|| {
        error_stack::Report::new(RepositoryError::corrupt(format!(
            "qualifier references unresolved reference {id}"
        )))
    })
}
