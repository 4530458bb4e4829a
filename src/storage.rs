//! The `Storage`/`Transaction` contract consumed from an external driver
//! (spec §6): `query`/`query_one_opt`/`execute`/`begin`, the same three
//! (minus `begin`) on an open transaction. Narrowed from the teacher's
//! `AsClient`/`PostgresStore<C, A>` pattern: authorization is delegated
//! (spec.md Non-goals), so this crate only needs a plain connection
//! capability, not the teacher's `AuthorizationApi`-carrying store wrapper.

use async_trait::async_trait;
use error_stack::{Report, ResultExt};
use postgres_types::ToSql;
use tokio_postgres::Row;

use crate::error::RepositoryError;
use crate::postgres::concurrency::CancellationContext;

/// A connection (or an already-open transaction) C1-C7 can run queries
/// against. Every method carries a `CancellationContext` so an aborted
/// request stops the in-flight query instead of running it to completion
/// for nothing.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn query(
        &self,
        ctx: &CancellationContext,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, Report<RepositoryError>>;

    /// Like `query`, but expects at most one row; `Ok(None)` on zero rows.
    async fn query_one_opt(
        &self,
        ctx: &CancellationContext,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, Report<RepositoryError>>;

    async fn execute(
        &self,
        ctx: &CancellationContext,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, Report<RepositoryError>>;
}

/// A `Storage` that can additionally start a transaction (an already-open
/// [`Transaction`] cannot be nested further, matching Postgres).
#[async_trait]
pub trait Connection: Storage {
    type Tx<'a>: Transaction
    where
        Self: 'a;

    async fn begin(&mut self, ctx: &CancellationContext) -> Result<Self::Tx<'_>, Report<RepositoryError>>;
}

#[async_trait]
pub trait Transaction: Storage {
    async fn commit(self) -> Result<(), Report<RepositoryError>>;
    async fn rollback(self) -> Result<(), Report<RepositoryError>>;
}

#[async_trait]
impl Storage for tokio_postgres::Client {
    async fn query(
        &self,
        ctx: &CancellationContext,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, Report<RepositoryError>> {
        ctx.guard(tokio_postgres::Client::query(self, sql, params))
            .await?
            .change_context_lazy(|| RepositoryError::internal("query execution failed"))
    }

    async fn query_one_opt(
        &self,
        ctx: &CancellationContext,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, Report<RepositoryError>> {
        ctx.guard(tokio_postgres::Client::query_opt(self, sql, params))
            .await?
            .change_context_lazy(|| RepositoryError::internal("query execution failed"))
    }

    async fn execute(
        &self,
        ctx: &CancellationContext,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, Report<RepositoryError>> {
        ctx.guard(tokio_postgres::Client::execute(self, sql, params))
            .await?
            .change_context_lazy(|| RepositoryError::internal("statement execution failed"))
    }
}
