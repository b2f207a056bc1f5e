//! Identity header constants and accessors.
//!
//! Downstream handlers read resolved identity through `caller_id` /
//! `client_id` rather than touching the raw headers. The identity headers
//! are only trustworthy because `Authenticator::authenticate_request`
//! strips any client-supplied values before setting its own.

use axum::http::{HeaderMap, Request};
use url::form_urlencoded;

/// Marks a request as public; only the literal value `"true"` counts.
pub const X_PUBLIC: &str = "x-public";

/// Identity of the application the token was issued to.
pub const X_CLIENT_ID: &str = "x-client-id";

/// Identity of the account that owns the token.
pub const X_CALLER_ID: &str = "x-caller-id";

/// Query parameter carrying the bearer access token.
pub const ACCESS_TOKEN_PARAM: &str = "access_token";

/// Whether the request is public and may skip authentication.
///
/// An absent request is public. Otherwise the `X-Public` header must equal
/// the literal string `"true"`; any other value, including `"TRUE"` or
/// `"1"`, does not count.
pub fn is_public<B>(request: Option<&Request<B>>) -> bool {
    let Some(request) = request else {
        return true;
    };

    request
        .headers()
        .get(X_PUBLIC)
        .and_then(|v| v.to_str().ok())
        == Some("true")
}

/// Resolved caller (account) id, or `0` when no identity is present.
///
/// Missing or unparseable header values degrade to the no-identity
/// sentinel rather than failing.
pub fn caller_id<B>(request: Option<&Request<B>>) -> i64 {
    header_i64(request, X_CALLER_ID)
}

/// Resolved client (application) id, or `0` when no identity is present.
pub fn client_id<B>(request: Option<&Request<B>>) -> i64 {
    header_i64(request, X_CLIENT_ID)
}

fn header_i64<B>(request: Option<&Request<B>>, name: &str) -> i64 {
    let Some(request) = request else {
        return 0;
    };

    request
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(0)
}

/// Remove any pre-existing identity headers.
///
/// Callers must never be able to forge identity by presenting these
/// headers directly; they are only valid if freshly set by the
/// authenticator. Looped because a forged request may repeat a header.
pub fn strip_identity_headers(headers: &mut HeaderMap) {
    while headers.remove(X_CLIENT_ID).is_some() {}
    while headers.remove(X_CALLER_ID).is_some() {}
}

/// Extract the trimmed `access_token` query parameter.
///
/// Returns `None` when the parameter is absent or empty after trimming;
/// an anonymous request is a normal outcome, not an error.
pub fn access_token_param<B>(request: &Request<B>) -> Option<String> {
    let query = request.uri().query()?;

    let token = form_urlencoded::parse(query.as_bytes())
        .find(|(name, _)| name == ACCESS_TOKEN_PARAM)
        .map(|(_, value)| value.trim().to_string())?;

    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn request_with_header(name: &str, value: &str) -> Request<()> {
        Request::builder()
            .uri("/")
            .header(name, value)
            .body(())
            .unwrap()
    }

    fn request_with_uri(uri: &str) -> Request<()> {
        Request::builder().uri(uri).body(()).unwrap()
    }

    #[test]
    fn test_is_public_absent_request() {
        assert!(is_public::<()>(None));
    }

    #[test]
    fn test_is_public_true_header() {
        let request = request_with_header(X_PUBLIC, "true");
        assert!(is_public(Some(&request)));
    }

    #[test]
    fn test_is_public_rejects_other_values() {
        for value in ["false", "TRUE", "True", "1", ""] {
            let request = request_with_header(X_PUBLIC, value);
            assert!(!is_public(Some(&request)), "value {:?}", value);
        }
    }

    #[test]
    fn test_is_public_missing_header() {
        let request = request_with_uri("/");
        assert!(!is_public(Some(&request)));
    }

    #[test]
    fn test_caller_id_absent_request() {
        assert_eq!(caller_id::<()>(None), 0);
    }

    #[test]
    fn test_caller_id_missing_header() {
        let request = request_with_uri("/");
        assert_eq!(caller_id(Some(&request)), 0);
    }

    #[test]
    fn test_caller_id_non_numeric() {
        let request = request_with_header(X_CALLER_ID, "not-a-number");
        assert_eq!(caller_id(Some(&request)), 0);
    }

    #[test]
    fn test_caller_id_parses_value() {
        let request = request_with_header(X_CALLER_ID, "7");
        assert_eq!(caller_id(Some(&request)), 7);
    }

    #[test]
    fn test_client_id_parses_value() {
        let request = request_with_header(X_CLIENT_ID, "42");
        assert_eq!(client_id(Some(&request)), 42);
    }

    #[test]
    fn test_client_id_negative_value() {
        let request = request_with_header(X_CLIENT_ID, "-3");
        assert_eq!(client_id(Some(&request)), -3);
    }

    #[test]
    fn test_strip_identity_headers() {
        let mut request = request_with_uri("/");
        request
            .headers_mut()
            .append(X_CLIENT_ID, "1".parse().unwrap());
        request
            .headers_mut()
            .append(X_CLIENT_ID, "2".parse().unwrap());
        request
            .headers_mut()
            .append(X_CALLER_ID, "3".parse().unwrap());

        strip_identity_headers(request.headers_mut());

        assert!(request.headers().get(X_CLIENT_ID).is_none());
        assert!(request.headers().get(X_CALLER_ID).is_none());
    }

    #[test]
    fn test_access_token_param_present() {
        let request = request_with_uri("/items?access_token=abc123");
        assert_eq!(access_token_param(&request).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_access_token_param_missing() {
        let request = request_with_uri("/items?limit=10");
        assert_eq!(access_token_param(&request), None);
    }

    #[test]
    fn test_access_token_param_no_query() {
        let request = request_with_uri("/items");
        assert_eq!(access_token_param(&request), None);
    }

    #[test]
    fn test_access_token_param_trims_whitespace() {
        let request = request_with_uri("/items?access_token=%20abc%20");
        assert_eq!(access_token_param(&request).as_deref(), Some("abc"));
    }

    #[test]
    fn test_access_token_param_empty_after_trim() {
        let request = request_with_uri("/items?access_token=%20%20");
        assert_eq!(access_token_param(&request), None);
    }

    #[test]
    fn test_access_token_param_percent_decoded() {
        let request = request_with_uri("/items?access_token=a%2Bb");
        assert_eq!(access_token_param(&request).as_deref(), Some("a+b"));
    }
}
