//! The authentication decision flow.
//!
//! `Authenticator` owns no request state: each call mutates only the
//! request it is handed, performs at most one introspection round trip,
//! and leaves retries, caching, and deadlines to its collaborators.

use crate::errors::AuthError;
use crate::headers::{self, X_CALLER_ID, X_CLIENT_ID};
use crate::introspection::TokenIntrospector;
use axum::http::{HeaderValue, Request};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Inbound-request authenticator.
///
/// Exchanges the `access_token` query parameter for caller/client
/// identity through the injected [`TokenIntrospector`] and stamps the
/// result onto the request as trusted headers.
#[derive(Clone)]
pub struct Authenticator {
    introspector: Arc<dyn TokenIntrospector>,
}

impl Authenticator {
    /// Create a new authenticator around an introspection backend.
    pub fn new(introspector: Arc<dyn TokenIntrospector>) -> Self {
        Self { introspector }
    }

    /// Authenticate a request in place.
    ///
    /// Any pre-existing `X-Client-Id` / `X-Caller-Id` headers are
    /// stripped unconditionally; they are only trustworthy when freshly
    /// set here. A missing or empty `access_token` parameter, and a token
    /// the introspection service does not know (remote status 404), both
    /// resolve to an anonymous request and succeed. Every other
    /// introspection failure aborts.
    ///
    /// # Errors
    ///
    /// - `AuthError::Internal` on transport failure or a malformed remote
    ///   response
    /// - `AuthError::Api` when the service declares a non-404 failure
    #[instrument(skip_all, name = "oauth_guard.authenticate")]
    pub async fn authenticate_request<B>(
        &self,
        request: Option<&mut Request<B>>,
    ) -> Result<(), AuthError> {
        let Some(request) = request else {
            return Ok(());
        };

        headers::strip_identity_headers(request.headers_mut());

        let Some(token) = headers::access_token_param(request) else {
            return Ok(());
        };

        match self.introspector.fetch(&token).await {
            Ok(access_token) => {
                request
                    .headers_mut()
                    .insert(X_CLIENT_ID, HeaderValue::from(access_token.client_id));
                request
                    .headers_mut()
                    .insert(X_CALLER_ID, HeaderValue::from(access_token.user_id));
                Ok(())
            }
            Err(err) if err.is_not_found() => {
                debug!(target: "oauth_guard.authenticator", "Token not found, proceeding anonymous");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}
