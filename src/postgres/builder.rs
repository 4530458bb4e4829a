//! C1: the query builder that renders a single-round-trip, JSON-aggregating
//! SQL statement per spec §4.1.
//!
//! Grounded on the teacher's `store/postgres/query/compile.rs` `SelectCompiler`:
//! a stateful builder that accumulates parameters in a `Vec<&'p (dyn ToSql +
//! Sync)>` alongside a `WHERE` condition, then renders through `Transpile`.
//! Unlike the teacher's compiler this builder does not assemble a join graph:
//! C1's strategy is a tree of correlated `jsonb_agg` subqueries, one per
//! attribute family, so the "join" step the teacher's compiler performs is
//! replaced by a fixed set of subquery fragments this module owns outright.

use postgres_types::ToSql;

use super::condition::Condition;
use super::expression::Transpile;
use super::table::{submodel, Table};

/// Fixed correlated-subquery fragments, one per attribute family hanging off
/// `submodel`. Each selects a `jsonb_agg(...)` (or a scalar `jsonb_build_object`
/// for a to-one relation) correlated on the outer `submodel.id`, wrapped in
/// `COALESCE(..., '[]'::jsonb)` for the to-many cases (spec §4.1).
const SUBMODEL_JSON_FRAGMENTS: &[(&str, &str)] = &[
    (
        "display_name_json",
        "COALESCE((SELECT jsonb_agg(jsonb_build_object('language', ls.language, 'text', ls.text) \
         ORDER BY ls.id) FROM lang_string_name_type ls \
         WHERE ls.parent_id = submodel.displayname_id), '[]'::jsonb)",
    ),
    (
        "description_json",
        "COALESCE((SELECT jsonb_agg(jsonb_build_object('language', ls.language, 'text', ls.text) \
         ORDER BY ls.id) FROM lang_string_text_type ls \
         WHERE ls.parent_id = submodel.description_id), '[]'::jsonb)",
    ),
    (
        "supplemental_semantic_ids_json",
        "jsonb_build_object('supplemental_semantic_ids', \
         COALESCE(to_jsonb(submodel.supplemental_semantic_ids), '[]'::jsonb))",
    ),
    (
        "qualifiers_json",
        "COALESCE((SELECT jsonb_agg(q.* ORDER BY q.id) FROM qualifier q \
         WHERE q.parent_id = submodel.id), '[]'::jsonb)",
    ),
    (
        "extensions_json",
        "COALESCE((SELECT jsonb_agg(e.* ORDER BY e.id) FROM extension e \
         WHERE e.parent_id = submodel.id), '[]'::jsonb)",
    ),
    (
        "embedded_data_specifications_json",
        "COALESCE((SELECT jsonb_agg(eds.* ORDER BY eds.id) FROM \
         embedded_data_specification eds WHERE eds.parent_id = submodel.id), '[]'::jsonb)",
    ),
    (
        "administration_json",
        "(SELECT jsonb_build_object('version', ai.version, 'revision', ai.revision, \
         'templateId', ai.template_id) FROM administrative_information ai \
         WHERE ai.id = submodel.administration_id)",
    ),
    (
        "submodel_elements_json",
        "COALESCE((SELECT jsonb_agg(jsonb_build_object( \
         'id', sme.id, 'submodel_id', sme.submodel_id, 'parent_sme_id', sme.parent_sme_id, \
         'root_sme_id', sme.root_sme_id, 'id_short', sme.id_short, \
         'idshort_path', sme.idshort_path, 'model_type', sme.model_type, \
         'category', sme.category, 'position', sme.position, 'semantic_id', sme.semantic_id, \
         'payload_json', to_jsonb(sme.*) || jsonb_build_object( \
           'display_name_json', COALESCE((SELECT jsonb_agg(jsonb_build_object( \
             'language', ls.language, 'text', ls.text) ORDER BY ls.id) \
             FROM lang_string_name_type ls WHERE ls.parent_id = sme.displayname_id), '[]'::jsonb), \
           'description_json', COALESCE((SELECT jsonb_agg(jsonb_build_object( \
             'language', ls.language, 'text', ls.text) ORDER BY ls.id) \
             FROM lang_string_text_type ls WHERE ls.parent_id = sme.description_id), '[]'::jsonb), \
           'qualifiers_json', COALESCE((SELECT jsonb_agg(q.* ORDER BY q.id) FROM qualifier q \
             WHERE q.parent_id = sme.id), '[]'::jsonb), \
           'extensions_json', COALESCE((SELECT jsonb_agg(e.* ORDER BY e.id) FROM extension e \
             WHERE e.parent_id = sme.id), '[]'::jsonb), \
           'embedded_data_specifications_json', COALESCE((SELECT jsonb_agg(eds.* ORDER BY eds.id) \
             FROM embedded_data_specification eds WHERE eds.parent_id = sme.id), '[]'::jsonb) \
         )) ORDER BY sme.position, sme.idshort_path) \
         FROM submodel_element sme WHERE sme.submodel_id = submodel.id), '[]'::jsonb)",
    ),
];

/// Accumulates a `WHERE` condition and its bound parameters while rendering
/// a `SELECT` over `submodel` with the fixed JSON-aggregation fragments
/// above. One builder instance per query; not reusable across statements.
pub struct SubmodelQueryBuilder<'p> {
    condition: Condition,
    parameters: Vec<&'p (dyn ToSql + Sync)>,
    limit: Option<i64>,
    cursor: Option<i64>,
}

impl<'p> SubmodelQueryBuilder<'p> {
    pub fn new() -> Self {
        Self {
            condition: Condition::All(Vec::new()),
            parameters: Vec::new(),
            limit: None,
            cursor: None,
        }
    }

    /// Adds a parameter and returns its 1-indexed placeholder.
    pub fn push_parameter(&mut self, value: &'p (dyn ToSql + Sync)) -> usize {
        self.parameters.push(value);
        self.parameters.len()
    }

    /// Conjoins an additional condition, e.g. the translated C2 predicate.
    pub fn and_where(&mut self, condition: Condition) {
        match &mut self.condition {
            Condition::All(conditions) => conditions.push(condition),
            existing => {
                let previous = std::mem::replace(existing, Condition::All(Vec::new()));
                *existing = Condition::All(vec![previous, condition]);
            }
        }
    }

    /// C7: peek-ahead pagination. Requests `limit + 1` rows starting strictly
    /// after `cursor` (spec §9's chosen `id > cursor` semantics). Cursor
    /// values are already range-checked by [`crate::util::base64`] before
    /// they reach the builder, so they are rendered as literals rather than
    /// bound parameters.
    pub fn paginate(&mut self, cursor: Option<i64>, limit: i64) {
        self.cursor = cursor;
        self.limit = Some(limit + 1);
        if let Some(cursor) = cursor {
            self.and_where(Condition::Greater(
                super::expression::Expression::Column(submodel::ID.transpile_to_string()),
                super::expression::Expression::Literal(super::expression::Literal::Number(
                    cursor as f64,
                )),
            ));
        }
    }

    pub fn compile(&self) -> (String, &[&'p (dyn ToSql + Sync)]) {
        let mut sql = String::from("SELECT submodel.*");
        for (alias, _) in SUBMODEL_JSON_FRAGMENTS {
            sql.push_str(", ");
            sql.push_str(alias);
        }
        sql.push_str(" FROM (SELECT submodel.*");
        for (alias, fragment) in SUBMODEL_JSON_FRAGMENTS {
            sql.push_str(", (");
            sql.push_str(fragment);
            sql.push_str(") AS ");
            sql.push_str(alias);
        }
        sql.push_str(" FROM ");
        sql.push_str(Table::Submodel.name());
        sql.push_str(") AS submodel WHERE ");
        sql.push_str(&self.condition.transpile_to_string());
        sql.push_str(" ORDER BY ");
        sql.push_str(submodel::ID.transpile_to_string().as_str());
        sql.push_str(" ASC");
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        (sql, &self.parameters)
    }
}

impl Default for SubmodelQueryBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}
