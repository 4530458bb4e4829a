//! C5: builds the public [`EmbeddedDataSpecification`] shape.
//!
//! Only the IEC 61360 content kind is persisted (spec §3). The raw row
//! mirrors [`DataSpecificationIec61360`] field-for-field but keeps its
//! reference-typed slots (`data_specification`, `unit_id`, each
//! `value_list[].value_id`) as bare database ids, resolved against the
//! lookup built by C4 rather than decoded directly.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::RepositoryError;
use crate::model::{
    DataSpecificationContent, DataSpecificationIec61360, EmbeddedDataSpecification, LangString,
    LevelType, Reference, ValueReferencePair,
};

#[derive(Debug, Deserialize)]
struct EmbeddedDataSpecificationRow {
    data_specification: i64,
    content: Iec61360Row,
}

#[derive(Debug, Deserialize)]
struct Iec61360Row {
    #[serde(default)]
    preferred_name: Vec<LangString>,
    #[serde(default)]
    short_name: Vec<LangString>,
    #[serde(default)]
    definition: Vec<LangString>,
    unit: Option<String>,
    unit_id: Option<i64>,
    data_type: Option<String>,
    #[serde(default)]
    value_list: Vec<ValueReferencePairRow>,
    level_type: Option<LevelType>,
    symbol: Option<String>,
    source_of_definition: Option<String>,
    value_format: Option<String>,
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ValueReferencePairRow {
    value: String,
    value_id: Option<i64>,
}

pub fn build(
    array: &[Value],
    references: &HashMap<i64, Reference>,
) -> error_stack::Result<Vec<EmbeddedDataSpecification>, RepositoryError> {
    array
        .iter()
        .map(|entry| build_one(entry, references))
        .collect()
}

fn build_one(
    entry: &Value,
    references: &HashMap<i64, Reference>,
) -> error_stack::Result<EmbeddedDataSpecification, RepositoryError> {
    let row: EmbeddedDataSpecificationRow = serde_json::from_value(entry.clone()).map_err(|error| {
        error_stack::Report::new(RepositoryError::corrupt(
            "malformed embedded data specification row",
        ))
        .attach(error)
    })?;

    let data_specification = resolve(references, row.data_specification)?;
    let content = row.content;
    let unit_id = content.unit_id.map(|id| resolve(references, id)).transpose()?;
    let value_list = content
        .value_list
        .into_iter()
        .map(|pair| {
            Ok(ValueReferencePair {
                value: pair.value,
                value_id: pair.value_id.map(|id| resolve(references, id)).transpose()?,
            })
        })
        .collect::<error_stack::Result<Vec<_>, RepositoryError>>()?;

    Ok(EmbeddedDataSpecification {
        data_specification,
        content: DataSpecificationContent::Iec61360(DataSpecificationIec61360 {
            preferred_name: content.preferred_name,
            short_name: content.short_name,
            definition: content.definition,
            unit: content.unit,
            unit_id,
            data_type: content.data_type,
            value_list,
            level_type: content.level_type,
            symbol: content.symbol,
            source_of_definition: content.source_of_definition,
            value_format: content.value_format,
            value: content.value,
        }),
    })
}

fn resolve(
    references: &HashMap<i64, Reference>,
    id: i64,
) -> error_stack::Result<Reference, RepositoryError> {
    references.get(&id).cloned().ok_or_else(|| {
        error_stack::Report::new(RepositoryError::corrupt(format!(
            "embedded data specification references unresolved reference {id}"
        )))
    })
}
