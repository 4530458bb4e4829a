//! C5: builds the public [`Extension`] shape from raw `extension` rows.
//!
//! Shares the typed-value-column and reference-resolution discipline with
//! [`super::qualifiers`]; see that module for the rationale.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::RepositoryError;
use crate::model::{Extension, Reference, TypedValue, ValueType};

#[derive(Debug, Deserialize)]
struct ExtensionRow {
    name: String,
    value_type: ValueType,
    value_text: Option<String>,
    value_num: Option<f64>,
    value_bool: Option<bool>,
    semantic_id: Option<i64>,
    #[serde(default)]
    refers_to: Vec<i64>,
    #[serde(default)]
    supplemental_semantic_ids: Vec<i64>,
}

pub fn build(
    array: &[Value],
    references: &HashMap<i64, Reference>,
) -> error_stack::Result<Vec<Extension>, RepositoryError> {
    array
        .iter()
        .map(|entry| build_one(entry, references))
        .collect()
}

fn build_one(
    entry: &Value,
    references: &HashMap<i64, Reference>,
) -> error_stack::Result<Extension, RepositoryError> {
    let row: ExtensionRow = serde_json::from_value(entry.clone()).map_err(|error| {
        error_stack::Report::new(RepositoryError::corrupt("malformed extension row")).attach(error)
    })?;

    let value = if let Some(value) = row.value_bool {
        Some(TypedValue::Bool(value))
    } else if let Some(value) = row.value_num {
        Some(TypedValue::Number(value))
    } else {
        row.value_text
            .as_deref()
            .map(|text| TypedValue::coerce(text, Some(row.value_type)))
    };

    let semantic_id = row
        .semantic_id
        .map(|id| resolve(references, id))
        .transpose()?;
    let refers_to = row
        .refers_to
        .iter()
        .map(|id| resolve(references, *id))
        .collect::<error_stack::Result<Vec<_>, _>>()?;
    let supplemental_semantic_ids = row
        .supplemental_semantic_ids
        .iter()
        .map(|id| resolve(references, *id))
        .collect::<error_stack::Result<Vec<_>, _>>()?;

    Ok(Extension {
        name: row.name,
        value_type: row.value_type,
        value,
        semantic_id,
        refers_to,
        supplemental_semantic_ids,
    })
}

fn resolve(
    references: &HashMap<i64, Reference>,
    id: i64,
) -> error_stack::Result<Reference, RepositoryError> {
    references.get(&id).cloned().ok_or_else(|| {
        error_stack::Report::new(RepositoryError::corrupt(format!(
            "extension references unresolved reference {id}"
        )))
    })
}
