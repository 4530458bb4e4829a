//! C5: builds [`AdministrativeInformation`] from the `administration_json`
//! column produced by C1's scalar subquery, plus its own embedded data
//! specs (resolved separately by [`super::data_spec`]).

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::RepositoryError;
use crate::model::{AdministrativeInformation, EmbeddedDataSpecification, Reference};

#[derive(Debug, Deserialize)]
struct AdministrationRow {
    version: Option<String>,
    revision: Option<String>,
    template_id: Option<String>,
    creator: Option<i64>,
    embedded_data_specification_cache: Option<Value>,
}

/// `administration_json` is `NULL` when a Submodel carries no
/// `AdministrativeInformation` at all, distinct from an
/// `AdministrativeInformation` with every field absent.
pub fn build(
    value: Option<&Value>,
    embedded_data_specifications: Vec<EmbeddedDataSpecification>,
    references: &HashMap<i64, Reference>,
) -> error_stack::Result<Option<AdministrativeInformation>, RepositoryError> {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return Ok(None);
    };

    let row: AdministrationRow = serde_json::from_value(value.clone()).map_err(|error| {
        error_stack::Report::new(RepositoryError::corrupt("malformed administration row"))
            .attach(error)
    })?;

    let creator = row
        .creator
        .map(|id| {
            references.get(&id).cloned().ok_or_else(|| {
                error_stack::Report::new(RepositoryError::corrupt(format!(
                    "administration references unresolved reference {id}"
                )))
            })
        })
        .transpose()?;

    Ok(Some(AdministrativeInformation {
        version: row.version,
        revision: row.revision,
        template_id: row.template_id,
        creator,
        embedded_data_specifications,
        embedded_data_specification_cache: row.embedded_data_specification_cache,
    }))
}
