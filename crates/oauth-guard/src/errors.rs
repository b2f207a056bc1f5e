//! Authentication error types.
//!
//! Two classifications cover every abort-worthy outcome: `Api` carries an
//! upstream-declared failure verbatim (status + message from the
//! introspection service's error body), and `Internal` covers transport
//! failures and malformed responses. A 404-classified `Api` error is not an
//! abort — the authenticator treats it as "token not found, proceed
//! anonymous" via `is_not_found`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Authentication failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Upstream-declared failure, propagated verbatim from the
    /// introspection service's error body.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Transport failure or malformed remote response.
    #[error("{0}")]
    Internal(String),
}

impl AuthError {
    /// Whether this is the "token not found" outcome (remote status 404),
    /// which resolves to an anonymous request rather than an abort.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AuthError::Api { status: 404, .. })
    }

    /// The HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::Api { status, .. } => *status,
            AuthError::Internal(_) => 500,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AuthError::Api { status, message } => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                "UPSTREAM_ERROR",
                message.clone(),
            ),
            AuthError::Internal(message) => {
                // Log the detail server-side, return it as-is; this layer
                // owns no user-facing copy of its own.
                tracing::error!(target: "oauth_guard.errors", error = %message, "Internal authentication failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    message.clone(),
                )
            }
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(error_response)).into_response()
    }
}
