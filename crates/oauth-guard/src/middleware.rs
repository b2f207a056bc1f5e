//! Axum middleware adapter.
//!
//! Installs the [`Authenticator`](crate::Authenticator) in front of a
//! router via `axum::middleware::from_fn_with_state`. Public requests
//! pass through untouched; protected requests are authenticated in place,
//! and abort-classified failures are converted to HTTP responses through
//! the [`AuthError`](crate::AuthError) `IntoResponse` impl. Downstream
//! handlers read resolved identity with the
//! [`headers`](crate::headers) accessors.

use crate::authenticator::Authenticator;
use crate::errors::AuthError;
use crate::headers;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::instrument;

/// State for the authentication middleware.
#[derive(Clone)]
pub struct AuthState {
    /// The request authenticator.
    pub authenticator: Authenticator,
}

/// Authentication middleware.
///
/// # Response
///
/// - Public requests and anonymous requests continue unchanged
/// - Introspection failures other than "token not found" surface as the
///   upstream status (or 500 for internal failures)
#[instrument(skip_all, name = "oauth_guard.middleware")]
pub async fn authenticate(
    State(state): State<Arc<AuthState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, AuthError> {
    if headers::is_public(Some(&req)) {
        return Ok(next.run(req).await);
    }

    state
        .authenticator
        .authenticate_request(Some(&mut req))
        .await?;

    Ok(next.run(req).await)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AuthState>();
    }
}
