use http::header::AUTHORIZATION;
use http::HeaderMap;

use super::errors::CredentialError;

const BEARER_PREFIX: &str = "Bearer ";

/// Extract the raw token from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-sensitively and must be followed by exactly one
/// space. The token itself is not inspected beyond being non-empty and free
/// of whitespace.
///
/// # Errors
/// * `Missing` - Header is absent, not UTF-8, uses another scheme, or carries no token
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, CredentialError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(CredentialError::Missing)?
        .to_str()
        .map_err(|_| CredentialError::Missing)?;

    parse_bearer(value)
}

/// Parse the value of an `Authorization` header.
pub fn parse_bearer(value: &str) -> Result<&str, CredentialError> {
    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(CredentialError::Missing)?;

    if token.is_empty() || token.chars().any(char::is_whitespace) {
        return Err(CredentialError::Missing);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer() {
        let headers = headers("Bearer abc123");
        assert_eq!(extract_bearer(&headers), Ok("abc123"));
    }

    #[test]
    fn test_extract_jwt_shaped_token() {
        let headers = headers("Bearer aaa.bbb.ccc");
        assert_eq!(extract_bearer(&headers), Ok("aaa.bbb.ccc"));
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(extract_bearer(&HeaderMap::new()), Err(CredentialError::Missing));
    }

    #[test]
    fn test_wrong_scheme() {
        assert_eq!(
            extract_bearer(&headers("Basic abc123")),
            Err(CredentialError::Missing)
        );
    }

    #[test]
    fn test_missing_separator() {
        assert_eq!(
            extract_bearer(&headers("Bearerabc123")),
            Err(CredentialError::Missing)
        );
    }

    #[test]
    fn test_scheme_is_case_sensitive() {
        assert_eq!(
            extract_bearer(&headers("bearer abc123")),
            Err(CredentialError::Missing)
        );
    }

    #[test]
    fn test_empty_token() {
        assert_eq!(parse_bearer("Bearer "), Err(CredentialError::Missing));
        assert_eq!(parse_bearer("Bearer"), Err(CredentialError::Missing));
    }

    #[test]
    fn test_extra_whitespace() {
        assert_eq!(parse_bearer("Bearer  abc123"), Err(CredentialError::Missing));
        assert_eq!(parse_bearer("Bearer abc 123"), Err(CredentialError::Missing));
    }

    #[test]
    fn test_non_utf8_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xffabc").unwrap(),
        );
        assert_eq!(extract_bearer(&headers), Err(CredentialError::Missing));
    }
}
