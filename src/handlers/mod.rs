pub mod auth;
pub mod bookings;
pub mod cart;
pub mod catalog;
pub mod health;

use axum::http::{header, HeaderMap};

use crate::errors::{AppError, AppResult};

/// Every route except the health probe requires the static API key.
pub(crate) fn check_auth(headers: &HeaderMap, expected_key: &str) -> AppResult<()> {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token.is_empty() || token != expected_key {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

/// Optional `If-Match: <version>` guard for cart writes.
pub(crate) fn expected_version(headers: &HeaderMap) -> AppResult<Option<i64>> {
    let Some(raw) = headers.get(header::IF_MATCH) else {
        return Ok(None);
    };
    let raw = raw
        .to_str()
        .map_err(|_| AppError::Validation("If-Match header is not valid text".to_string()))?
        .trim()
        .trim_start_matches("W/")
        .trim_matches('"');
    raw.parse::<i64>()
        .map(Some)
        .map_err(|_| AppError::Validation(format!("If-Match must be a cart version, got {raw:?}")))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_check_auth() {
        let mut headers = HeaderMap::new();
        assert!(check_auth(&headers, "key").is_err());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer nope"));
        assert!(check_auth(&headers, "key").is_err());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer key"));
        assert!(check_auth(&headers, "key").is_ok());
    }

    #[test]
    fn test_expected_version() {
        let mut headers = HeaderMap::new();
        assert_eq!(expected_version(&headers).unwrap(), None);

        headers.insert(header::IF_MATCH, HeaderValue::from_static("\"7\""));
        assert_eq!(expected_version(&headers).unwrap(), Some(7));

        headers.insert(header::IF_MATCH, HeaderValue::from_static("3"));
        assert_eq!(expected_version(&headers).unwrap(), Some(3));

        headers.insert(header::IF_MATCH, HeaderValue::from_static("abc"));
        assert!(expected_version(&headers).is_err());
    }
}
