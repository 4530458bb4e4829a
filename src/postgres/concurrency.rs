//! Cooperative cancellation and the bounded decode worker pool (spec §5).
//!
//! `CancellationContext` is a thin, cloneable wrapper around
//! `tokio_util::sync::CancellationToken` threaded through every `Storage`
//! call so an aborted request stops in-flight queries and decode workers
//! instead of running them to completion for nothing.

use std::future::Future;

use error_stack::Report;
use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::error::RepositoryError;

/// Propagates request cancellation down into query execution and the C6
/// fan-out decode pool. Cloning shares the same underlying token.
#[derive(Debug, Clone, Default)]
pub struct CancellationContext(CancellationToken);

impl CancellationContext {
    #[must_use]
    pub fn new() -> Self {
        Self(CancellationToken::new())
    }

    #[must_use]
    pub fn child(&self) -> Self {
        Self(self.0.child_token())
    }

    pub fn cancel(&self) {
        self.0.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.is_cancelled()
    }

    /// Runs `future` to completion unless cancelled first, in which case
    /// this resolves to a `RepositoryError::Internal` (the operation it
    /// guarded never produced a usable result).
    #[tracing::instrument(level = "trace", skip(self, future))]
    pub async fn guard<F, T>(&self, future: F) -> Result<T, Report<RepositoryError>>
    where
        F: Future<Output = T>,
    {
        tokio::select! {
            biased;
            () = self.0.cancelled() => Err(Report::new(RepositoryError::internal(
                "operation cancelled",
            ))),
            value = future => Ok(value),
        }
    }
}

/// Bounded fan-out over row-decode futures (C6), sized from
/// `RepositoryConfig::decode_concurrency`. A thin wrapper over
/// `buffer_unordered` rather than a hand-rolled pool of worker tasks,
/// matching how the teacher caps snapshot-dump concurrency.
pub struct WorkerPool {
    concurrency: usize,
}

impl WorkerPool {
    #[must_use]
    pub fn new(concurrency: std::num::NonZeroU32) -> Self {
        Self {
            concurrency: concurrency.get() as usize,
        }
    }

    /// Runs every future in `tasks` with at most `concurrency` in flight at
    /// once, returning results in completion order (not input order —
    /// callers that need row order sort afterwards, as C6 already does).
    #[tracing::instrument(level = "trace", skip(self, tasks))]
    pub async fn run<I>(&self, tasks: I) -> Vec<I::Item>
    where
        I: IntoIterator,
        I::Item: Future,
    {
        stream::iter(tasks)
            .buffer_unordered(self.concurrency)
            .collect()
            .await
    }
}
