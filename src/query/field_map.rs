//! The canonical field map (spec §4.2): `$field` operand strings like
//! `$sm#idShort` resolve to a concrete SQL column, never a user-supplied
//! identifier, so the translator can never be tricked into emitting
//! arbitrary column references.

use crate::error::InvalidQuery;
use crate::postgres::table::{submodel, submodel_element};
use crate::postgres::{Expression, Transpile};

/// The first key's value of a semantic id reference, correlated against
/// `owner_column` (`submodel.semantic_id` or `submodel_element.semantic_id`).
/// Spec §4.2 names this projection `semantic_id_reference_key.value`; there
/// is no such table, so it is resolved as a scalar subquery the same way
/// C1's attribute-family fragments are (`src/postgres/builder.rs`).
fn semantic_id_value(owner_column: &str) -> String {
    format!(
        "(SELECT rk.value FROM reference_key rk \
         WHERE rk.reference_id = {owner_column} AND rk.position = 0)"
    )
}

/// `$field` path → SQL column (spec §4.2's canonical field map).
pub fn resolve(path: &str) -> Result<Expression, InvalidQuery> {
    let column = match path {
        "$sm#idShort" => submodel::ID_SHORT.transpile_to_string(),
        "$sm#category" => submodel::CATEGORY.transpile_to_string(),
        "$sm#kind" => submodel::KIND.transpile_to_string(),
        "$sm#id" => submodel::ID.transpile_to_string(),
        "$sme#idShort" => submodel_element::ID_SHORT.transpile_to_string(),
        "$sme#category" => submodel_element::CATEGORY.transpile_to_string(),
        "$sme#modelType" => submodel_element::MODEL_TYPE.transpile_to_string(),
        "$sm#semanticId" => semantic_id_value(&submodel::SEMANTIC_ID.transpile_to_string()),
        "$sme#semanticId" => semantic_id_value(&submodel_element::SEMANTIC_ID.transpile_to_string()),
        other => {
            return Err(InvalidQuery::new(format!(
                "unknown field path {other}; not present in the canonical field map"
            )))
        }
    };
    Ok(Expression::Column(column))
}
