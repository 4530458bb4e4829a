//! C1 for `ConceptDescription`: the same single-round-trip strategy as
//! [`super::builder::SubmodelQueryBuilder`], scaled down to the entity's
//! much flatter shape (no element tree, no semantic id, display_name /
//! description / is_case_of / embedded_data_specifications stored directly
//! as opaque JSON columns per the model — spec §3).

use postgres_types::ToSql;

use super::condition::Condition;
use super::expression::{Expression, Literal, Transpile};
use super::table::{concept_description, Table};

const CONCEPT_DESCRIPTION_JSON_FRAGMENTS: &[(&str, &str)] = &[
    (
        "display_name_json",
        "COALESCE((SELECT jsonb_agg(jsonb_build_object('language', ls.language, 'text', ls.text) \
         ORDER BY ls.id) FROM lang_string_name_type ls \
         WHERE ls.parent_id = concept_description.displayname_id), '[]'::jsonb)",
    ),
    (
        "description_json",
        "COALESCE((SELECT jsonb_agg(jsonb_build_object('language', ls.language, 'text', ls.text) \
         ORDER BY ls.id) FROM lang_string_text_type ls \
         WHERE ls.parent_id = concept_description.description_id), '[]'::jsonb)",
    ),
    (
        "administration_json",
        "(SELECT jsonb_build_object('version', ai.version, 'revision', ai.revision, \
         'templateId', ai.template_id) FROM administrative_information ai \
         WHERE ai.id = concept_description.administration_id)",
    ),
];

pub struct ConceptDescriptionQueryBuilder<'p> {
    condition: Condition,
    parameters: Vec<&'p (dyn ToSql + Sync)>,
    limit: Option<i64>,
    cursor: Option<i64>,
}

impl<'p> ConceptDescriptionQueryBuilder<'p> {
    pub fn new() -> Self {
        Self {
            condition: Condition::All(Vec::new()),
            parameters: Vec::new(),
            limit: None,
            cursor: None,
        }
    }

    pub fn push_parameter(&mut self, value: &'p (dyn ToSql + Sync)) -> usize {
        self.parameters.push(value);
        self.parameters.len()
    }

    pub fn and_where(&mut self, condition: Condition) {
        match &mut self.condition {
            Condition::All(conditions) => conditions.push(condition),
            existing => {
                let previous = std::mem::replace(existing, Condition::All(Vec::new()));
                *existing = Condition::All(vec![previous, condition]);
            }
        }
    }

    /// See [`super::builder::SubmodelQueryBuilder::paginate`]: same `id >
    /// cursor` / peek-ahead semantics (spec §9).
    pub fn paginate(&mut self, cursor: Option<i64>, limit: i64) {
        self.cursor = cursor;
        self.limit = Some(limit + 1);
        if let Some(cursor) = cursor {
            self.and_where(Condition::Greater(
                Expression::Column(concept_description::ID.transpile_to_string()),
                Expression::Literal(Literal::Number(cursor as f64)),
            ));
        }
    }

    pub fn compile(&self) -> (String, &[&'p (dyn ToSql + Sync)]) {
        let mut sql = String::from("SELECT concept_description.*");
        for (alias, _) in CONCEPT_DESCRIPTION_JSON_FRAGMENTS {
            sql.push_str(", ");
            sql.push_str(alias);
        }
        sql.push_str(" FROM (SELECT concept_description.*");
        for (alias, fragment) in CONCEPT_DESCRIPTION_JSON_FRAGMENTS {
            sql.push_str(", (");
            sql.push_str(fragment);
            sql.push_str(") AS ");
            sql.push_str(alias);
        }
        sql.push_str(" FROM ");
        sql.push_str(Table::ConceptDescription.name());
        sql.push_str(") AS concept_description WHERE ");
        sql.push_str(&self.condition.transpile_to_string());
        sql.push_str(" ORDER BY ");
        sql.push_str(concept_description::ID.transpile_to_string().as_str());
        sql.push_str(" ASC");
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        (sql, &self.parameters)
    }
}

impl Default for ConceptDescriptionQueryBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}
