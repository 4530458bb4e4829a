//! C7: cursor-based, peek-ahead pagination with a stable sort key (spec §4.7).
//!
//! Grounded on spec §4.7's algorithm and the teacher's `compile.rs`
//! `add_cursor_selection` shape: the query requests one extra row past the
//! page size, and the caller uses its presence (and its sort key) to decide
//! whether a next page exists, without a second round trip.

use crate::error::RepositoryError;
use crate::util::base64;

/// Opaque cursor tokens are just the surrogate `id` base64url-encoded
/// through the same codec as entity identifiers (spec §9), so a cursor and
/// an identifier look the same to a client and neither leaks a raw integer.
#[must_use]
pub fn encode_cursor(id: i64) -> String {
    base64::encode_id(&id.to_string())
}

pub fn decode_cursor(token: &str) -> error_stack::Result<i64, RepositoryError> {
    let decoded = base64::decode_id(token)?;
    decoded.parse().map_err(|_| {
        error_stack::Report::new(RepositoryError::bad_request(format!(
            "{token} does not decode to a valid pagination cursor"
        )))
    })
}

/// The effective, server-clamped page size (spec §4.7: clamp to `[1,
/// MAX_LIMIT]`, silently correcting out-of-range client input rather than
/// rejecting it). A requested limit of `0` means "server default", same as
/// an absent limit, not a page of size zero.
#[must_use]
pub fn clamp_limit(requested: Option<i64>, max_limit: i64) -> i64 {
    match requested {
        None | Some(0) => max_limit,
        Some(requested) => requested.clamp(1, max_limit),
    }
}

/// A page of `T` plus the cursor for the next page, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<i64>,
}

/// Splits a peek-ahead result set (`limit + 1` rows, or fewer if exhausted)
/// into the page the caller asked for plus the next cursor, using `key` to
/// read each item's stable sort key (spec §9: the chosen `id > cursor`
/// semantics — the next cursor is simply the last *returned* item's key).
pub fn paginate<T>(mut rows: Vec<T>, limit: i64, key: impl Fn(&T) -> i64) -> Page<T> {
    let limit = usize::try_from(limit).unwrap_or(0);
    let has_more = rows.len() > limit;
    rows.truncate(limit);
    let next_cursor = has_more.then(|| rows.last().map(&key)).flatten();
    Page {
        items: rows,
        next_cursor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_falls_back_to_max_when_unset() {
        assert_eq!(clamp_limit(None, 100), 100);
    }

    #[test]
    fn clamp_treats_zero_as_server_default() {
        assert_eq!(clamp_limit(Some(0), 100), 100);
    }

    #[test]
    fn clamp_rejects_negative() {
        assert_eq!(clamp_limit(Some(-5), 100), 1);
    }

    #[test]
    fn clamp_caps_at_max_limit() {
        assert_eq!(clamp_limit(Some(10_000), 100), 100);
    }

    #[test]
    fn paginate_returns_no_next_cursor_when_exhausted() {
        let page = paginate(vec![1, 2, 3], 5, |value| *value);
        assert_eq!(page.items, vec![1, 2, 3]);
        assert_eq!(page.next_cursor, None);
    }

    #[test]
    fn paginate_truncates_and_sets_next_cursor_from_last_returned_item() {
        let page = paginate(vec![1, 2, 3], 2, |value| *value);
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.next_cursor, Some(2));
    }
}
