//! Integration coverage for C7 (spec §4.7, §9): the external cursor codec
//! wraps the internal numeric cursor in the same base64url identifier
//! encoding used elsewhere (P3 from spec §8: a cursor round-trips to the
//! same position it was cut from).

use aas_repository_core::postgres::{decode_cursor, encode_cursor};

#[test]
fn cursor_round_trips_through_encode_and_decode() {
    let token = encode_cursor(42);
    assert_eq!(decode_cursor(&token).unwrap(), 42);
}

#[test]
fn distinct_ids_never_collide_on_the_wire() {
    let tokens: Vec<String> = (0..50).map(encode_cursor).collect();
    let mut unique = tokens.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), tokens.len());
}

#[test]
fn decode_rejects_non_base64_garbage() {
    let error = decode_cursor("not valid base64!!").unwrap_err();
    assert_eq!(error.current_context().kind, aas_repository_core::ErrorKind::BadRequest);
}

#[test]
fn decode_rejects_a_token_that_is_valid_base64_but_not_a_number() {
    use base64::Engine;
    let token = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(b"definitely-not-a-number");
    let error = decode_cursor(&token).unwrap_err();
    assert_eq!(error.current_context().kind, aas_repository_core::ErrorKind::BadRequest);
}
