//! The SQL that feeds C4: one recursive query that, given a set of
//! directly-referenced `reference.id` values, walks `parent_reference`
//! pointers up to each chain's root and returns every row touched (seeds
//! and ancestors alike) with its ordered keys pre-aggregated.
//!
//! A `WITH RECURSIVE` ancestor walk rather than N follow-up queries: it
//! keeps reference resolution inside the same single-round-trip spirit as
//! C1's `jsonb_agg` strategy (spec §4.1, §4.4) instead of one query per
//! chain link.

use postgres_types::ToSql;
use serde_json::Value;

use super::table::{reference, reference_key, Table};

/// Keys under which a raw JSON fragment (submodel, submodel element,
/// administration, qualifier, ...) embeds a single `reference.id` pointer.
const SCALAR_ID_KEYS: &[&str] = &[
    "semantic_id",
    "value_id",
    "first",
    "second",
    "observed",
    "message_broker",
    "creator",
    "unit_id",
    "data_specification",
    "semantic_id_list_element",
];

/// Keys under which a raw JSON fragment embeds an array of `reference.id`
/// pointers.
const ARRAY_ID_KEYS: &[&str] = &["supplemental_semantic_ids", "refers_to", "specific_asset_ids"];

/// Walks an arbitrarily-nested JSON fragment collecting every
/// `reference.id` it embeds under one of the known attribute-family keys
/// (spec §4.4). A generic walk rather than one extractor per builder: every
/// attribute family stores its reference pointers under the same small set
/// of key names regardless of which table they came from.
pub fn collect_ids(value: &Value, out: &mut Vec<i64>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if SCALAR_ID_KEYS.contains(&key.as_str()) {
                    if let Some(id) = child.as_i64() {
                        out.push(id);
                    }
                } else if ARRAY_ID_KEYS.contains(&key.as_str()) {
                    if let Some(array) = child.as_array() {
                        out.extend(array.iter().filter_map(Value::as_i64));
                    }
                }
                collect_ids(child, out);
            }
        }
        Value::Array(array) => {
            for child in array {
                collect_ids(child, out);
            }
        }
        _ => {}
    }
}

/// Renders the ancestor-closure query for `seed_ids`. Returns `None` if
/// `seed_ids` is empty (nothing to resolve, no point querying).
pub fn compile(seed_ids: &[i64]) -> Option<(String, Vec<&(dyn ToSql + Sync)>)> {
    if seed_ids.is_empty() {
        return None;
    }

    let params: Vec<&(dyn ToSql + Sync)> = seed_ids
        .iter()
        .map(|id| id as &(dyn ToSql + Sync))
        .collect();

    let sql = format!(
        "WITH RECURSIVE ancestry AS ( \
           SELECT seed.* FROM {reference} seed WHERE seed.{id_col} = ANY($1) \
           UNION \
           SELECT parent.* FROM {reference} parent \
           JOIN ancestry ON parent.{id_col} = ancestry.{parent_col} \
         ) \
         SELECT ancestry.*, \
           COALESCE(( \
             SELECT jsonb_agg(jsonb_build_object('type', rk.{key_type}, 'value', rk.{key_value}) \
                    ORDER BY rk.{key_position}) \
             FROM {reference_key} rk WHERE rk.{key_reference_id} = ancestry.{id_col} \
           ), '[]'::jsonb) AS keys_json \
         FROM ancestry",
        reference = Table::Reference.name(),
        id_col = reference::ID.name,
        parent_col = reference::PARENT_REFERENCE.name,
        reference_key = Table::ReferenceKey.name(),
        key_type = reference_key::TYPE.name,
        key_value = reference_key::VALUE.name,
        key_position = reference_key::POSITION.name,
        key_reference_id = reference_key::REFERENCE_ID.name,
    );

    Some((sql, params))
}
