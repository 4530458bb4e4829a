//! URL-safe, unpadded base64 identifier codec (spec §6): `base64url(id)`
//! path segments, `-`/`_` alphabet, trailing `=` stripped.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::error::RepositoryError;

#[must_use]
pub fn encode_id(id: &str) -> String {
    URL_SAFE_NO_PAD.encode(id.as_bytes())
}

pub fn decode_id(encoded: &str) -> error_stack::Result<String, RepositoryError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|error| {
            error_stack::Report::new(RepositoryError::bad_request(format!(
                "{encoded} is not valid URL-safe base64 without padding"
            )))
            .attach(error)
        })?;
    String::from_utf8(bytes).map_err(|error| {
        error_stack::Report::new(RepositoryError::bad_request(format!(
            "{encoded} decodes to bytes that are not valid UTF-8"
        )))
        .attach(error)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_an_urn_identifier() {
        let id = "urn:x:sm1";
        assert_eq!(decode_id(&encode_id(id)).unwrap(), id);
    }

    #[test]
    fn encoding_never_pads() {
        assert!(!encode_id("a").contains('='));
        assert!(!encode_id("ab").contains('='));
        assert!(!encode_id("abc").contains('='));
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(decode_id("not valid base64!!").is_err());
    }
}
