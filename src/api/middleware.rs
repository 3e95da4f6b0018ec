//! API Middleware
//!
//! Authentication and request logging middleware.

use std::collections::HashMap;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::domain::OperationContext;
use crate::error::AppError;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const API_KEY_QUERY_PARAM: &str = "api_key";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// =========================================================================
// API Key Authentication Middleware
// =========================================================================

/// Presented key: the `X-API-Key` header, else the `api_key` query parameter.
fn presented_key(request: &Request<Body>) -> Option<String> {
    if let Some(key) = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
    {
        return Some(key.to_string());
    }

    Query::<HashMap<String, String>>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(mut params)| params.remove(API_KEY_QUERY_PARAM))
}

/// Resolve the caller and attach `User` and `OperationContext` extensions.
///
/// Rejected requests never reach a handler.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let presented = presented_key(&request);

    let user = state
        .auth
        .authenticate(presented.as_deref())
        .map_err(|err| {
            tracing::warn!(
                reason = err.reason(),
                method = %request.method(),
                path = %request.uri().path(),
                "Authentication rejected"
            );
            err
        })?;

    // Correlate with the request id when it is a UUID
    let correlation_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    let context = OperationContext::new()
        .with_user(user.id)
        .with_correlation_id(correlation_id)
        .with_route(request.uri().path());

    request.extensions_mut().insert(user);
    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}

// =========================================================================
// mask_headers_for_logging
// =========================================================================

/// Headers that should be masked in logs
const SENSITIVE_HEADERS: &[&str] = &["x-api-key", "authorization", "cookie", "set-cookie"];

/// Mask sensitive headers for logging
pub fn mask_headers_for_logging(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let name_lower = name.as_str().to_lowercase();
            let masked_value = if SENSITIVE_HEADERS.contains(&name_lower.as_str()) {
                "[REDACTED]".to_string()
            } else {
                value.to_str().unwrap_or("[invalid utf8]").to_string()
            };
            (name.to_string(), masked_value)
        })
        .collect()
}

/// Path and query with the `api_key` parameter value hidden.
pub fn mask_query_for_logging(path_and_query: &str) -> String {
    let Some((path, query)) = path_and_query.split_once('?') else {
        return path_and_query.to_string();
    };
    let masked: Vec<String> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((API_KEY_QUERY_PARAM, _)) => format!("{}=[REDACTED]", API_KEY_QUERY_PARAM),
            _ => pair.to_string(),
        })
        .collect();
    format!("{}?{}", path, masked.join("&"))
}

// =========================================================================
// Request Logging Middleware
// =========================================================================

/// Request logging middleware
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request
        .uri()
        .path_and_query()
        .map(|pq| mask_query_for_logging(pq.as_str()))
        .unwrap_or_else(|| request.uri().path().to_string());
    let version = request.version();

    // Mask sensitive headers
    let headers = mask_headers_for_logging(request.headers());

    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let start = std::time::Instant::now();

    tracing::info!(
        method = %method,
        uri = %uri,
        version = ?version,
        request_id = ?request_id,
        headers = ?headers,
        "Incoming request"
    );

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %status,
        duration_ms = %duration.as_millis(),
        request_id = ?request_id,
        "Request completed"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_headers_for_logging() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/json".parse().unwrap());
        headers.insert("x-api-key", "api_key_john_123456789".parse().unwrap());
        headers.insert("x-request-id", "req-123".parse().unwrap());

        let masked = mask_headers_for_logging(&headers);

        let api_key = masked.iter().find(|(k, _)| k == "x-api-key");
        let content_type = masked.iter().find(|(k, _)| k == "content-type");
        let request_id = masked.iter().find(|(k, _)| k == "x-request-id");

        assert_eq!(api_key.unwrap().1, "[REDACTED]");
        assert_eq!(content_type.unwrap().1, "application/json");
        assert_eq!(request_id.unwrap().1, "req-123");
    }

    #[test]
    fn test_sensitive_headers_list() {
        assert!(SENSITIVE_HEADERS.contains(&"x-api-key"));
        assert!(SENSITIVE_HEADERS.contains(&"authorization"));
        assert!(!SENSITIVE_HEADERS.contains(&"content-type"));
    }

    #[test]
    fn test_mask_query_for_logging() {
        assert_eq!(
            mask_query_for_logging("/api/commissions?api_key=secret&page=2"),
            "/api/commissions?api_key=[REDACTED]&page=2"
        );
        assert_eq!(mask_query_for_logging("/api/products"), "/api/products");
    }

    #[test]
    fn test_presented_key_prefers_header() {
        let request = Request::builder()
            .uri("/api/auth/me?api_key=from_query")
            .header("X-API-Key", "from_header")
            .body(Body::empty())
            .unwrap();
        assert_eq!(presented_key(&request).as_deref(), Some("from_header"));

        let request = Request::builder()
            .uri("/api/auth/me?api_key=from_query")
            .body(Body::empty())
            .unwrap();
        assert_eq!(presented_key(&request).as_deref(), Some("from_query"));

        let request = Request::builder()
            .uri("/api/auth/me")
            .body(Body::empty())
            .unwrap();
        assert_eq!(presented_key(&request), None);
    }
}
