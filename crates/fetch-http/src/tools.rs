//! Helpers for call sites that do not care about the error.

use bytes::Bytes;

/// The string, or an empty string if the read failed.
pub fn must_string<E>(result: Result<String, E>) -> String {
    result.unwrap_or_default()
}

/// The bytes, or an empty (never absent) buffer if the read failed.
pub fn must_bytes<E>(result: Result<Bytes, E>) -> Bytes {
    result.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResponseError;

    #[test]
    fn test_must_string() {
        assert_eq!(must_string::<ResponseError>(Ok("body".to_string())), "body");
        assert_eq!(must_string(Err(ResponseError::EmptyBody)), "");
    }

    #[test]
    fn test_must_bytes_on_error_is_empty() {
        let bytes = must_bytes(Err(ResponseError::EmptyBody));
        assert!(bytes.is_empty());
        assert_eq!(bytes.len(), 0);
    }

    #[test]
    fn test_must_bytes_passes_value_through() {
        let bytes = must_bytes::<ResponseError>(Ok(Bytes::from_static(b"abc")));
        assert_eq!(&bytes[..], b"abc");
    }
}
