//! C5: assembles a [`Submodel`] from its scanned [`SubmodelRow`] plus the
//! already-built attribute families (C4's resolved references, C5's
//! qualifiers/extensions/data-specs/administration, C6's element tree).
//!
//! Grounded on spec §4.5's "one builder per attribute family, then stitch"
//! design and the teacher's `knowledge/entity/read.rs` free-function style.

use std::collections::HashMap;

use crate::error::RepositoryError;
use crate::model::{LangString, Reference, Submodel, SubmodelElement, SubmodelKind};
use crate::postgres::rows::SubmodelRow;

use super::{administration, data_spec, extensions, qualifiers};

fn lang_strings(value: &serde_json::Value) -> error_stack::Result<Vec<LangString>, RepositoryError> {
    SubmodelRow::non_empty_array(value)
        .map(|array| {
            serde_json::from_value(serde_json::Value::Array(array.clone())).map_err(|error| {
                error_stack::Report::new(RepositoryError::corrupt("malformed lang string array"))
                    .attach(error)
            })
        })
        .transpose()
        .map(Option::unwrap_or_default)
}

fn supplemental_semantic_ids(
    value: &serde_json::Value,
    references: &HashMap<i64, Reference>,
) -> error_stack::Result<Vec<Reference>, RepositoryError> {
    value
        .get("supplemental_semantic_ids")
        .and_then(serde_json::Value::as_array)
        .filter(|array| !array.is_empty())
        .map(|array| {
            array
                .iter()
                .filter_map(serde_json::Value::as_i64)
                .map(|id| {
                    references.get(&id).cloned().ok_or_else(|| {
                        error_stack::Report::new(RepositoryError::corrupt(format!(
                            "supplementalSemanticIds references unresolved reference {id}"
                        )))
                    })
                })
                .collect::<error_stack::Result<Vec<_>, _>>()
        })
        .transpose()
        .map(Option::unwrap_or_default)
}

pub fn build(
    row: SubmodelRow,
    references: &HashMap<i64, Reference>,
    submodel_elements: Vec<SubmodelElement>,
) -> error_stack::Result<Submodel, RepositoryError> {
    let kind = match row.kind.as_str() {
        "Template" => SubmodelKind::Template,
        "Instance" => SubmodelKind::Instance,
        other => {
            return Err(error_stack::Report::new(RepositoryError::corrupt(format!(
                "submodel {} has unknown kind {other}",
                row.id
            ))))
        }
    };

    let semantic_id = row
        .semantic_id
        .map(|semantic_id| {
            references.get(&semantic_id).cloned().ok_or_else(|| {
                error_stack::Report::new(RepositoryError::corrupt(format!(
                    "submodel {} references unresolved reference {semantic_id}",
                    row.id
                )))
            })
        })
        .transpose()?;

    let qualifiers = SubmodelRow::non_empty_array(&row.qualifiers_json)
        .map(|array| qualifiers::build(array, references))
        .transpose()?
        .unwrap_or_default();
    let extensions = SubmodelRow::non_empty_array(&row.extensions_json)
        .map(|array| extensions::build(array, references))
        .transpose()?
        .unwrap_or_default();
    let embedded_data_specifications = SubmodelRow::non_empty_array(
        &row.embedded_data_specifications_json,
    )
    .map(|array| data_spec::build(array, references))
    .transpose()?
    .unwrap_or_default();
    let administration = administration::build(
        row.administration_json.as_ref(),
        embedded_data_specifications.clone(),
        references,
    )?;

    let display_name = lang_strings(&row.display_name_json)?;
    let description = lang_strings(&row.description_json)?;
    let supplemental_semantic_ids =
        supplemental_semantic_ids(&row.supplemental_semantic_ids_json, references)?;

    let submodel = Submodel {
        id: row.global_id,
        id_short: row.id_short,
        category: row.category,
        kind,
        display_name,
        description,
        semantic_id,
        supplemental_semantic_ids,
        qualifiers,
        extensions,
        embedded_data_specifications,
        administration,
        submodel_elements,
    };

    submodel
        .validate()
        .map_err(|reason| error_stack::Report::new(RepositoryError::corrupt(reason)))?;

    Ok(submodel)
}
