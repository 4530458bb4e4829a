//! The read-path entry points (spec §6): `SubmodelRepository` and
//! `ConceptDescriptionRepository` tie C1 (query builder) through C7
//! (pagination) together behind `get_by_id`/`get_all`/`query`, the shape a
//! controller actually calls.
//!
//! Grounded on the teacher's `PostgresStore<C>` as the thing a caller holds
//! one of per request, parameterized over the `Storage` it was handed
//! rather than owning a connection itself.

use std::collections::HashMap;

use error_stack::{Report, ResultExt};

use crate::config::RepositoryConfig;
use crate::error::RepositoryError;
use crate::model::{ConceptDescription, Reference, Submodel};
use crate::query::{QueryDocument, Translator};
use crate::storage::Storage;

use super::builder::SubmodelQueryBuilder;
use super::builders;
use super::cd_builder::ConceptDescriptionQueryBuilder;
use super::concurrency::{CancellationContext, WorkerPool};
use super::condition::Condition;
use super::element_tree;
use super::expression::{Expression, Literal, Transpile};
use super::pagination::{self, decode_cursor, encode_cursor};
use super::reference_graph::{ReferenceBuilder, ReferenceRow};
use super::reference_query;
use super::rows::{ConceptDescriptionRow, SubmodelElementRow, SubmodelRow};
use super::table::{concept_description, submodel};

/// A page of `T` with its cursor as the opaque client-facing token rather
/// than the raw surrogate id (spec §9).
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

fn external_page<T>(internal: pagination::Page<T>) -> Page<T> {
    Page {
        items: internal.items,
        next_cursor: internal.next_cursor.map(encode_cursor),
    }
}

/// Resolves every `reference.id` embedded anywhere in `fragments` (spec
/// §4.4), returning a lookup from id to its fully-chained [`Reference`].
async fn resolve_references<S: Storage + ?Sized>(
    storage: &S,
    ctx: &CancellationContext,
    fragments: &[&serde_json::Value],
) -> Result<HashMap<i64, Reference>, Report<RepositoryError>> {
    let mut ids = Vec::new();
    for fragment in fragments {
        reference_query::collect_ids(fragment, &mut ids);
    }
    ids.sort_unstable();
    ids.dedup();

    let Some((sql, params)) = reference_query::compile(&ids) else {
        return Ok(HashMap::new());
    };
    let rows = storage.query(ctx, &sql, &params).await?;
    let reference_rows = rows
        .iter()
        .map(ReferenceRow::from_row)
        .collect::<error_stack::Result<Vec<_>, RepositoryError>>()?;

    let mut builder = ReferenceBuilder::new();
    builder.scan(&reference_rows).await;

    let mut resolved = HashMap::with_capacity(ids.len());
    for id in ids {
        resolved.insert(id, builder.resolve(id).await?);
    }
    Ok(resolved)
}

/// Read-path entry point for `Submodel` (spec §6).
pub struct SubmodelRepository<'s, S: Storage> {
    storage: &'s S,
    config: &'s RepositoryConfig,
}

impl<'s, S: Storage> SubmodelRepository<'s, S> {
    pub fn new(storage: &'s S, config: &'s RepositoryConfig) -> Self {
        Self { storage, config }
    }

    #[tracing::instrument(level = "trace", skip(self, ctx))]
    pub async fn get_by_id(
        &self,
        ctx: &CancellationContext,
        id: &str,
    ) -> Result<Submodel, Report<RepositoryError>> {
        let mut builder = SubmodelQueryBuilder::new();
        let placeholder = builder.push_parameter(id);
        builder.and_where(Condition::Equal(
            Expression::Column(submodel::GLOBAL_ID.transpile_to_string()),
            Expression::Parameter(placeholder),
        ));
        let (sql, params) = builder.compile();

        let row = self
            .storage
            .query_one_opt(ctx, &sql, params)
            .await?
            .ok_or_else(|| Report::new(RepositoryError::not_found(format!("submodel {id} not found"))))?;

        self.assemble(ctx, SubmodelRow::from_row(&row)).await
    }

    #[tracing::instrument(level = "trace", skip(self, ctx))]
    pub async fn get_all(
        &self,
        ctx: &CancellationContext,
        cursor: Option<&str>,
        limit: Option<i64>,
    ) -> Result<Page<Submodel>, Report<RepositoryError>> {
        self.query_with_condition(ctx, Condition::All(Vec::new()), Vec::new(), cursor, limit)
            .await
    }

    #[tracing::instrument(level = "trace", skip(self, ctx, document))]
    pub async fn query(
        &self,
        ctx: &CancellationContext,
        document: &QueryDocument,
        cursor: Option<&str>,
        limit: Option<i64>,
    ) -> Result<Page<Submodel>, Report<RepositoryError>> {
        let ast_condition = document
            .parse_condition()
            .map_err(|error| Report::new(RepositoryError::bad_request(error.reason)))?;
        let mut translator = Translator::new();
        let condition = translator
            .translate(&ast_condition)
            .map_err(|error| Report::new(RepositoryError::bad_request(error.reason)))?;
        self.query_with_condition(ctx, condition, translator.into_parameters(), cursor, limit)
            .await
    }

    async fn query_with_condition(
        &self,
        ctx: &CancellationContext,
        condition: Condition,
        bound_parameters: Vec<Box<dyn postgres_types::ToSql + Sync>>,
        cursor: Option<&str>,
        limit: Option<i64>,
    ) -> Result<Page<Submodel>, Report<RepositoryError>> {
        let cursor_id = cursor.map(decode_cursor).transpose()?;
        let effective_limit = pagination::clamp_limit(limit, self.config.max_limit);

        let mut builder = SubmodelQueryBuilder::new();
        builder.and_where(condition);
        for parameter in &bound_parameters {
            builder.push_parameter(parameter.as_ref());
        }
        builder.paginate(cursor_id, effective_limit);
        let (sql, params) = builder.compile();

        let rows = self.storage.query(ctx, &sql, params).await?;
        let submodel_rows: Vec<SubmodelRow> = rows.iter().map(SubmodelRow::from_row).collect();
        let ids: Vec<i64> = submodel_rows.iter().map(|row| row.id).collect();

        let mut submodels = Vec::with_capacity(submodel_rows.len());
        for row in submodel_rows {
            submodels.push(self.assemble(ctx, row).await?);
        }

        // `Submodel` carries no surrogate id of its own (spec §3), so the
        // cursor is read off the pre-assembly id list rather than `paginate`'s
        // usual by-item key closure: same peek-ahead semantics (spec §4.7),
        // keyed on the row the item was built from instead of the item.
        let has_more = ids.len() as i64 > effective_limit;
        let limit = usize::try_from(effective_limit).unwrap_or(0);
        submodels.truncate(limit);
        let next_cursor = has_more
            .then(|| ids.get(limit.saturating_sub(1)).copied())
            .flatten();
        Ok(external_page(pagination::Page {
            items: submodels,
            next_cursor,
        }))
    }

    async fn assemble(
        &self,
        ctx: &CancellationContext,
        row: SubmodelRow,
    ) -> Result<Submodel, Report<RepositoryError>> {
        let no_administration = serde_json::Value::Null;
        let references = resolve_references(
            self.storage,
            ctx,
            &[
                &row.supplemental_semantic_ids_json,
                &row.qualifiers_json,
                &row.extensions_json,
                &row.embedded_data_specifications_json,
                row.administration_json.as_ref().unwrap_or(&no_administration),
                &row.submodel_elements_json,
            ],
        )
        .await?;

        let element_rows = row
            .submodel_elements_json
            .as_array()
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(SubmodelElementRow::from_value)
            .collect::<error_stack::Result<Vec<_>, RepositoryError>>()?;

        let pool = WorkerPool::new(self.config.decode_concurrency);
        let submodel_elements = element_tree::build(&pool, element_rows, &references).await?;

        builders::submodel::build(row, &references, submodel_elements)
    }
}

/// Read-path entry point for `ConceptDescription` (spec §6), mirroring
/// [`SubmodelRepository`] without the element tree.
pub struct ConceptDescriptionRepository<'s, S: Storage> {
    storage: &'s S,
    config: &'s RepositoryConfig,
}

impl<'s, S: Storage> ConceptDescriptionRepository<'s, S> {
    pub fn new(storage: &'s S, config: &'s RepositoryConfig) -> Self {
        Self { storage, config }
    }

    #[tracing::instrument(level = "trace", skip(self, ctx))]
    pub async fn get_by_id(
        &self,
        ctx: &CancellationContext,
        id: &str,
    ) -> Result<ConceptDescription, Report<RepositoryError>> {
        let mut builder = ConceptDescriptionQueryBuilder::new();
        let placeholder = builder.push_parameter(id);
        builder.and_where(Condition::Equal(
            Expression::Column(concept_description::GLOBAL_ID.transpile_to_string()),
            Expression::Parameter(placeholder),
        ));
        let (sql, params) = builder.compile();

        let row = self
            .storage
            .query_one_opt(ctx, &sql, params)
            .await?
            .ok_or_else(|| {
                Report::new(RepositoryError::not_found(format!(
                    "concept description {id} not found"
                )))
            })?;

        self.assemble(ctx, ConceptDescriptionRow::from_row(&row)).await
    }

    #[tracing::instrument(level = "trace", skip(self, ctx))]
    pub async fn get_all(
        &self,
        ctx: &CancellationContext,
        cursor: Option<&str>,
        limit: Option<i64>,
    ) -> Result<Page<ConceptDescription>, Report<RepositoryError>> {
        let cursor_id = cursor.map(decode_cursor).transpose()?;
        let effective_limit = pagination::clamp_limit(limit, self.config.max_limit);

        let mut builder = ConceptDescriptionQueryBuilder::new();
        builder.paginate(cursor_id, effective_limit);
        let (sql, params) = builder.compile();

        let rows = self.storage.query(ctx, &sql, params).await?;
        let cd_rows: Vec<ConceptDescriptionRow> =
            rows.iter().map(ConceptDescriptionRow::from_row).collect();
        let ids: Vec<i64> = cd_rows.iter().map(|row| row.id).collect();

        let mut concept_descriptions = Vec::with_capacity(cd_rows.len());
        for row in cd_rows {
            concept_descriptions.push(self.assemble(ctx, row).await?);
        }

        let next_cursor = (ids.len() as i64 > effective_limit)
            .then(|| ids.get(effective_limit as usize - 1).copied())
            .flatten();
        Ok(external_page(pagination::Page {
            items: concept_descriptions,
            next_cursor,
        }))
    }

    async fn assemble(
        &self,
        ctx: &CancellationContext,
        row: ConceptDescriptionRow,
    ) -> Result<ConceptDescription, Report<RepositoryError>> {
        let no_administration = serde_json::Value::Null;
        let references = resolve_references(
            self.storage,
            ctx,
            &[row
                .administration_json
                .as_ref()
                .unwrap_or(&no_administration)],
        )
        .await?;
        builders::concept_description::build(row, &references)
    }
}
