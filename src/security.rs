use subtle::ConstantTimeEq;

/// Header carrying the client's API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Check a request's API key against the configured one.
///
/// With no configured key every request is allowed. Keys are compared in
/// constant time.
pub fn is_authorized(expected: Option<&str>, provided: Option<&str>) -> bool {
    match (expected, provided) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(expected), Some(provided)) => {
            expected.len() == provided.len()
                && bool::from(expected.as_bytes().ct_eq(provided.as_bytes()))
        }
    }
}
