//! Ambient configuration (spec §9's "configurable schema name" Non-goal
//! carve-out, plus the pool/pagination knobs the engine itself needs).
//!
//! Grounded on the teacher's `store::config::DatabasePoolConfig`: a plain
//! struct of `NonZero` knobs with a non-`derive`d `Default`, rather than a
//! builder, since every field has a sane out-of-the-box value.

use std::num::NonZeroU32;

/// Schema-qualification and retrieval-engine tuning, independent of how the
/// caller obtains its Postgres connection (spec.md Non-goals: config
/// *loading* — env vars, files, CLI flags — is a boundary concern).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// The Postgres schema the normalized tables live under (spec.md
    /// Non-goals: "multi-tenant isolation beyond a configurable schema
    /// name" — this is that configurable name).
    pub schema: String,
    /// Hard ceiling C7 clamps every requested page size to.
    pub max_limit: i64,
    /// Bound on concurrent row-decode tasks in C6's fan-out
    /// (`futures::stream::buffer_unordered`).
    pub decode_concurrency: NonZeroU32,
    pub pool: PostgresPoolConfig,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            schema: "public".to_owned(),
            max_limit: 100,
            decode_concurrency: NonZeroU32::new(16).expect("16 is non-zero"),
            pool: PostgresPoolConfig::default(),
        }
    }
}

/// Sizing knobs passed straight through to `deadpool_postgres::PoolConfig`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresPoolConfig {
    pub max_open: NonZeroU32,
    pub max_idle: Option<NonZeroU32>,
    /// Seconds; connections are recycled once they exceed this age.
    pub max_lifetime_secs: NonZeroU32,
}

impl Default for PostgresPoolConfig {
    fn default() -> Self {
        Self {
            max_open: NonZeroU32::new(10).expect("10 is non-zero"),
            max_idle: None,
            max_lifetime_secs: NonZeroU32::new(30 * 60).expect("non-zero"),
        }
    }
}
