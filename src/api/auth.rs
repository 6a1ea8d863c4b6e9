//! Bearer-token authentication for service endpoints
//!
//! A single static token, shared between services, gates the orchestration
//! endpoint. The required variant rejects unauthenticated callers; the
//! optional variant only records whether the caller authenticated and lets
//! the request through either way.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use super::error::ApiError;
use super::state::AppState;

/// Request extension recording the outcome of authentication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authenticated(pub bool);

/// Middleware for endpoints that require the shared service token
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match check_auth(state.config.auth.service_token.as_deref(), request.headers()) {
        Ok(()) => {
            request.extensions_mut().insert(Authenticated(true));
            next.run(request).await
        }
        Err(err) => err.into_response(),
    }
}

/// Middleware for endpoints that degrade gracefully: a matching token
/// marks the request authenticated, anything else (including evaluation
/// errors) passes through unauthenticated.
pub async fn optional_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let authenticated = check_optional_auth(
        state.config.auth.service_token.as_deref(),
        request.headers(),
    );

    request.extensions_mut().insert(Authenticated(authenticated));
    next.run(request).await
}

/// Evaluate the optional-auth policy: true only on an exact token match,
/// false for everything else including evaluation errors
fn check_optional_auth(expected: Option<&str>, headers: &HeaderMap) -> bool {
    matches!(
        (expected, bearer_token(headers)),
        (Some(expected), Ok(Some(token))) if token == expected
    )
}

/// Evaluate the required-auth policy against a header map.
///
/// A missing expected token is an operator error and is reported before
/// the caller's credentials are even looked at.
fn check_auth(expected: Option<&str>, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = expected else {
        warn!("SERVICE_AUTH_TOKEN not configured");
        return Err(ApiError::AuthNotConfigured);
    };

    let token = bearer_token(headers)?.ok_or(ApiError::MissingToken)?;

    if token != expected {
        return Err(ApiError::InvalidToken);
    }

    Ok(())
}

/// Extract a bearer token from the `Authorization` header.
///
/// Only the exact two-token `Bearer <token>` form yields a token; any
/// other shape yields `None`. A header that is not valid UTF-8 is an
/// evaluation error, not a missing token.
fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, ApiError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|e| ApiError::AuthError(e.to_string()))?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(Some(token)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_token_accepts_exact_form() {
        let headers = headers_with_auth("Bearer secret-token");
        assert_eq!(bearer_token(&headers).unwrap(), Some("secret-token"));
    }

    #[test]
    fn bearer_token_rejects_other_shapes() {
        assert_eq!(bearer_token(&HeaderMap::new()).unwrap(), None);
        assert_eq!(
            bearer_token(&headers_with_auth("secret-token")).unwrap(),
            None
        );
        assert_eq!(
            bearer_token(&headers_with_auth("Basic secret-token")).unwrap(),
            None
        );
        assert_eq!(
            bearer_token(&headers_with_auth("Bearer a b")).unwrap(),
            None
        );
        assert_eq!(bearer_token(&headers_with_auth("Bearer ")).unwrap(), None);
    }

    #[test]
    fn check_auth_requires_configured_token_first() {
        // Even a well-formed caller token fails when the expected token
        // is not configured.
        let headers = headers_with_auth("Bearer secret-token");
        let err = check_auth(None, &headers).unwrap_err();
        assert_eq!(err.code(), "auth_not_configured");
    }

    #[test]
    fn check_auth_reports_missing_token() {
        let err = check_auth(Some("secret-token"), &HeaderMap::new()).unwrap_err();
        assert_eq!(err.code(), "missing_token");

        // Malformed scheme also counts as missing
        let headers = headers_with_auth("Token secret-token");
        let err = check_auth(Some("secret-token"), &headers).unwrap_err();
        assert_eq!(err.code(), "missing_token");
    }

    #[test]
    fn check_auth_reports_invalid_token() {
        let headers = headers_with_auth("Bearer wrong-token");
        let err = check_auth(Some("secret-token"), &headers).unwrap_err();
        assert_eq!(err.code(), "invalid_token");
    }

    #[test]
    fn check_auth_accepts_exact_match() {
        let headers = headers_with_auth("Bearer secret-token");
        assert!(check_auth(Some("secret-token"), &headers).is_ok());
    }

    #[test]
    fn optional_auth_never_rejects() {
        let headers = headers_with_auth("Bearer secret-token");
        assert!(check_optional_auth(Some("secret-token"), &headers));

        // Wrong token, missing token, and missing configuration all
        // evaluate to unauthenticated instead of failing
        assert!(!check_optional_auth(
            Some("secret-token"),
            &headers_with_auth("Bearer wrong-token")
        ));
        assert!(!check_optional_auth(Some("secret-token"), &HeaderMap::new()));
        assert!(!check_optional_auth(None, &headers));
    }
}
