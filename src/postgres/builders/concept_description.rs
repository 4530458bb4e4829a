//! C5 for `ConceptDescription`: a flatter counterpart to
//! [`super::submodel::build`] — no semantic id, qualifiers, extensions, or
//! element tree to stitch in, just the administration block and the two
//! fields the model keeps opaque (spec §3 Non-goals: IEC 61360 content is
//! not decomposed by this crate).

use std::collections::HashMap;

use crate::error::RepositoryError;
use crate::model::{ConceptDescription, LangString, Reference};
use crate::postgres::rows::ConceptDescriptionRow;

use super::administration;

fn lang_strings(value: &serde_json::Value) -> error_stack::Result<Vec<LangString>, RepositoryError> {
    value
        .as_array()
        .filter(|array| !array.is_empty())
        .map(|array| {
            serde_json::from_value(serde_json::Value::Array(array.clone())).map_err(|error| {
                error_stack::Report::new(RepositoryError::corrupt("malformed lang string array"))
                    .attach(error)
            })
        })
        .transpose()
        .map(Option::unwrap_or_default)
}

pub fn build(
    row: ConceptDescriptionRow,
    references: &HashMap<i64, Reference>,
) -> error_stack::Result<ConceptDescription, RepositoryError> {
    let administration = administration::build(row.administration_json.as_ref(), Vec::new(), references)?;

    let is_case_of = row
        .is_case_of
        .as_array()
        .cloned()
        .unwrap_or_default();

    let display_name = lang_strings(&row.display_name_json)?;
    let description = lang_strings(&row.description_json)?;

    Ok(ConceptDescription {
        id: row.global_id,
        id_short: row.id_short,
        category: row.category,
        display_name,
        description,
        administration,
        is_case_of,
        embedded_data_specifications: row.embedded_data_specifications,
    })
}
