//! Request Policy Middleware
//!
//! Cross-cutting policy applied to every request before route dispatch:
//! protective response headers, cross-origin policy and JSON body parsing.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use serde_json::Value;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{debug, warn};

use crate::config::CorsPolicy;
use crate::error::ApiError;

/// Parsed JSON request body, available to handlers as a request extension.
#[derive(Debug, Clone)]
pub struct JsonBody(pub Value);

// == Security Headers ==
/// Adds protective headers to every response.
pub async fn security_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(header::X_XSS_PROTECTION, HeaderValue::from_static("0"));
    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=15552000; includeSubDomains"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("no-referrer"),
    );
    headers.insert(
        HeaderName::from_static("cross-origin-resource-policy"),
        HeaderValue::from_static("same-origin"),
    );

    response
}

// == CORS ==
/// Builds the CORS layer for the configured policy.
pub fn cors_layer(policy: &CorsPolicy) -> CorsLayer {
    let origin = match policy {
        CorsPolicy::Permissive => AllowOrigin::any(),
        CorsPolicy::AllowList(origins) => AllowOrigin::list(origins.iter().filter_map(|o| {
            HeaderValue::from_str(o)
                .map_err(|_| warn!(origin = %o, "Ignoring invalid CORS origin"))
                .ok()
        })),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

// == JSON Body ==
/// Parses JSON request bodies before dispatch.
///
/// Requests without a JSON content type, or with an empty body, pass through
/// untouched. A JSON body that fails to parse, or whose top-level value is
/// not an object or array, is rejected with `400`; one larger than `limit`
/// bytes with `413`. On success the body is restored for
/// the handler and the parsed value is attached as [`JsonBody`].
pub async fn json_body_guard(
    State(limit): State<usize>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !is_json(req.headers()) || declared_empty(req.headers()) {
        return Ok(next.run(req).await);
    }

    if declared_length(req.headers()).is_some_and(|len| len > limit) {
        return Err(ApiError::PayloadTooLarge(limit));
    }

    let (parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, limit)
        .await
        .map_err(|_| ApiError::PayloadTooLarge(limit))?;

    let mut req = Request::from_parts(parts, Body::from(bytes.clone()));
    if !bytes.is_empty() {
        let value = parse_strict(&bytes)
            .inspect_err(|e| debug!(error = %e, "Rejecting malformed JSON body"))?;
        req.extensions_mut().insert(JsonBody(value));
    }

    Ok(next.run(req).await)
}

/// Parses a JSON body, accepting only an object or array at the top level.
fn parse_strict(bytes: &[u8]) -> Result<Value, ApiError> {
    match serde_json::from_slice(bytes) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Ok(value),
        Ok(_) => Err(ApiError::MalformedBody(
            "top-level value must be an object or array".to_string(),
        )),
        Err(e) => Err(ApiError::MalformedBody(e.to_string())),
    }
}

/// Returns true for `application/json` and `*/*+json` content types.
fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| ct.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

fn declared_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

fn declared_empty(headers: &HeaderMap) -> bool {
    declared_length(headers) == Some(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(header::HeaderName, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(name.clone(), HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_is_json_content_types() {
        assert!(is_json(&headers(&[(
            header::CONTENT_TYPE,
            "application/json"
        )])));
        assert!(is_json(&headers(&[(
            header::CONTENT_TYPE,
            "Application/JSON; charset=utf-8"
        )])));
        assert!(is_json(&headers(&[(
            header::CONTENT_TYPE,
            "application/merge-patch+json"
        )])));
        assert!(!is_json(&headers(&[(header::CONTENT_TYPE, "text/plain")])));
        assert!(!is_json(&HeaderMap::new()));
    }

    #[test]
    fn test_parse_strict_top_level() {
        assert!(parse_strict(br#"{"a":1}"#).is_ok());
        assert!(parse_strict(b"[1,2]").is_ok());

        for body in [&b"123"[..], br#""x""#, b"true", b"null", b"{oops"] {
            assert!(
                matches!(parse_strict(body), Err(ApiError::MalformedBody(_))),
                "{:?} should be rejected",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn test_declared_length() {
        assert_eq!(
            declared_length(&headers(&[(header::CONTENT_LENGTH, "42")])),
            Some(42)
        );
        assert!(declared_empty(&headers(&[(header::CONTENT_LENGTH, "0")])));
        assert_eq!(declared_length(&HeaderMap::new()), None);
    }
}
