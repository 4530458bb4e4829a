//! Integration coverage for C2 (spec §4.2): parse → translate → transpile,
//! end to end through the public `query` module into the SQL text C1
//! produces from it (P1/P2 from spec §8).

use aas_repository_core::postgres::Transpile;
use aas_repository_core::query::{QueryDocument, Translator};
use pretty_assertions::assert_eq;
use serde_json::json;

fn translate(document_json: serde_json::Value) -> (String, usize) {
    let document: QueryDocument = serde_json::from_value(document_json).unwrap();
    let ast = document.parse_condition().unwrap();
    let mut translator = Translator::new();
    let condition = translator.translate(&ast).unwrap();
    let parameter_count = translator.into_parameters().len();
    (condition.transpile_to_string(), parameter_count)
}

#[test]
fn eq_on_id_short_binds_one_parameter() {
    let (sql, parameters) = translate(json!({
        "Query": {
            "$condition": {
                "$eq": [{ "$field": "$sm#idShort" }, { "$strVal": "Nameplate" }]
            }
        }
    }));
    assert_eq!(sql, "(submodel.id_short = $1)");
    assert_eq!(parameters, 1);
}

#[test]
fn and_of_two_comparisons_parenthesizes_each_branch() {
    let (sql, parameters) = translate(json!({
        "Query": {
            "$condition": {
                "$and": [
                    { "$eq": [{ "$field": "$sm#category" }, { "$strVal": "CONSTANT" }] },
                    { "$ne": [{ "$field": "$sm#kind" }, { "$strVal": "Template" }] }
                ]
            }
        }
    }));
    assert_eq!(
        sql,
        "((submodel.category = $1) AND (submodel.kind != $2))"
    );
    assert_eq!(parameters, 2);
}

#[test]
fn not_wraps_its_child() {
    let (sql, _) = translate(json!({
        "Query": {
            "$condition": {
                "$not": { "$eq": [{ "$field": "$sme#modelType" }, { "$strVal": "Property" }] }
            }
        }
    }));
    assert_eq!(sql, "NOT ((submodel_element.model_type = $1))");
}

#[test]
fn numeric_and_boolean_operands_are_inlined_not_bound() {
    let (sql, parameters) = translate(json!({
        "Query": {
            "$condition": {
                "$gt": [{ "$field": "$sm#idShort" }, { "$numVal": 3.5 }]
            }
        }
    }));
    assert_eq!(sql, "(submodel.id_short > 3.5)");
    assert_eq!(parameters, 0);
}

#[test]
fn two_field_operands_compare_column_to_column() {
    let (sql, parameters) = translate(json!({
        "Query": {
            "$condition": {
                "$eq": [{ "$field": "$sm#idShort" }, { "$field": "$sm#category" }]
            }
        }
    }));
    assert_eq!(sql, "(submodel.id_short = submodel.category)");
    assert_eq!(parameters, 0);
}

#[test]
fn two_value_operands_compare_verbatim() {
    let (sql, parameters) = translate(json!({
        "Query": {
            "$condition": {
                "$eq": [{ "$numVal": 1.0 }, { "$numVal": 1.0 }]
            }
        }
    }));
    assert_eq!(sql, "(1 = 1)");
    assert_eq!(parameters, 0);
}

#[test]
fn mismatched_value_operand_types_are_rejected() {
    let document: QueryDocument = serde_json::from_value(json!({
        "Query": {
            "$condition": {
                "$eq": [{ "$numVal": 1.0 }, { "$strVal": "1" }]
            }
        }
    }))
    .unwrap();
    let ast = document.parse_condition().unwrap();
    let error = Translator::new().translate(&ast).unwrap_err();
    assert!(error.reason.contains("same type"));
}

#[test]
fn unknown_field_path_is_rejected() {
    let document: QueryDocument = serde_json::from_value(json!({
        "Query": {
            "$condition": {
                "$eq": [{ "$field": "$sm#notAField" }, { "$strVal": "x" }]
            }
        }
    }))
    .unwrap();
    let ast = document.parse_condition().unwrap();
    let error = Translator::new().translate(&ast).unwrap_err();
    assert!(error.reason.contains("canonical field map"));
}

#[test]
fn empty_and_array_is_rejected_at_parse_time() {
    let document: QueryDocument = serde_json::from_value(json!({
        "Query": {
            "$condition": { "$and": [] }
        }
    }))
    .unwrap();
    let error = document.parse_condition().unwrap_err();
    assert!(error.reason.contains("at least one child"));
}

#[test]
fn operand_with_two_discriminators_is_rejected() {
    let document: QueryDocument = serde_json::from_value(json!({
        "Query": {
            "$condition": {
                "$eq": [{ "$field": "$sm#idShort", "$strVal": "x" }, { "$strVal": "y" }]
            }
        }
    }))
    .unwrap();
    let error = document.parse_condition().unwrap_err();
    assert!(error.reason.contains("exactly one discriminator"));
}
