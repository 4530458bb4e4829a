//! Error taxonomy for the repository core (spec §7).
//!
//! Each variant is surfaced at the HTTP boundary with a fixed status code;
//! that mapping lives with the external HTTP layer, not here.

use core::fmt;

/// The kind of failure a repository operation can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or semantically invalid client input (bad query, duplicate id on create).
    BadRequest,
    /// The requested entity does not exist.
    NotFound,
    /// A create would clash with an existing identifier.
    Conflict,
    /// The operation is not permitted (delegated to an external authorizer; surfaced verbatim).
    Denied,
    /// A provable data-integrity violation was found while reconstructing an entity.
    Corrupt,
    /// Anything else: driver errors, I/O, logic bugs.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BadRequest => "bad request",
            Self::NotFound => "not found",
            Self::Conflict => "conflict",
            Self::Denied => "denied",
            Self::Corrupt => "corrupt",
            Self::Internal => "internal",
        })
    }
}

/// The root error type raised by this crate.
///
/// Carries the [`ErrorKind`] plus the component/operation tag used for log
/// correlation (e.g. `CDREPO-GCDS-EXECQUERY`), matching the tagging scheme
/// called for in spec §7 without inventing a bespoke wrapper type for every
/// call site — the tag is just a `&'static str` set at the `tracing` span.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("{kind}: {reason}")]
pub struct RepositoryError {
    pub kind: ErrorKind,
    pub reason: String,
}

impl RepositoryError {
    pub fn new(kind: ErrorKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }

    pub fn bad_request(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, reason)
    }

    pub fn not_found(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, reason)
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, reason)
    }

    pub fn corrupt(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::Corrupt, reason)
    }

    pub fn internal(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, reason)
    }
}

/// Raised when the query-language document fails to parse or translate (C2).
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("invalid query: {reason}")]
#[must_use]
pub struct InvalidQuery {
    pub reason: String,
}

impl InvalidQuery {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Raised when the SQL query execution itself fails (driver error).
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("query execution failed")]
#[must_use]
pub struct QueryError;

/// Raised when reconstructing a domain object from scanned rows finds a
/// provable data-integrity violation (spec §7: cyclic reference chains,
/// multiple semanticIds, list positions missing/duplicated).
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("corrupt data: {reason}")]
#[must_use]
pub struct CorruptData {
    pub reason: String,
}

impl CorruptData {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = error_stack::Report<RepositoryError>> = core::result::Result<T, E>;
