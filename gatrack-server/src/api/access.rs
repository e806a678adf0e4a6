//! Access control for registered routes
//!
//! Every route in the route table declares an [`Access`] level. The router
//! wraps each route with [`enforce_access`] for its level:
//! - `Public`: passes through, no credentials required
//! - `Admin`: requires `timestamp` + `hash` query parameters signing the
//!   request path and full query with the shared secret (0 disables the check)

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use gatrack_common::api::{now_millis, verify_request, ApiAuthError, AuthErrorResponse};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Access level required by a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Public,
    Admin,
}

/// Middleware state for one route
#[derive(Debug, Clone, Copy)]
pub struct AccessGuard {
    pub access: Access,
    pub shared_secret: i64,
}

/// Access check middleware
///
/// Returns 400 when the auth parameters are missing or malformed and
/// 401 when the timestamp or hash is rejected.
pub async fn enforce_access(
    State(guard): State<AccessGuard>,
    request: Request,
    next: Next,
) -> Result<Response, AccessError> {
    if guard.access == Access::Public {
        return Ok(next.run(request).await);
    }

    if guard.shared_secret == 0 {
        debug!("Auth disabled, allowing {}", request.uri().path());
        return Ok(next.run(request).await);
    }

    let Query(params) = Query::<BTreeMap<String, String>>::try_from_uri(request.uri())
        .map_err(|e| AccessError::MissingFields(e.body_text()))?;

    let path = request.uri().path();
    verify_request(path, &params, guard.shared_secret, now_millis()).map_err(|e| {
        if matches!(e, ApiAuthError::InvalidHash) {
            warn!("Rejected signature for {}", path);
        }
        AccessError::from(e)
    })?;

    Ok(next.run(request).await)
}

/// Access check failures
#[derive(Debug)]
pub enum AccessError {
    InvalidTimestamp(String),
    InvalidHash,
    MissingFields(String),
    Other(String),
}

impl From<ApiAuthError> for AccessError {
    fn from(err: ApiAuthError) -> Self {
        match err {
            ApiAuthError::MissingParameter(name) => {
                AccessError::MissingFields(format!("missing '{}'", name))
            }
            ApiAuthError::InvalidTimestamp(reason) => AccessError::InvalidTimestamp(reason),
            ApiAuthError::InvalidHash => AccessError::InvalidHash,
            other => AccessError::Other(other.to_string()),
        }
    }
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AccessError::InvalidTimestamp(reason) => (
                StatusCode::UNAUTHORIZED,
                AuthErrorResponse::new("timestamp_invalid", reason),
            ),
            AccessError::InvalidHash => (
                StatusCode::UNAUTHORIZED,
                AuthErrorResponse::new("hash_invalid", "Invalid hash"),
            ),
            AccessError::MissingFields(msg) => (
                StatusCode::BAD_REQUEST,
                AuthErrorResponse::new("auth_missing", msg),
            ),
            AccessError::Other(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                AuthErrorResponse::new("auth_error", msg),
            ),
        };

        (status, Json(body)).into_response()
    }
}
