//! HTTP client for the token-introspection endpoint.
//!
//! The client performs exactly one
//! `GET {base_url}/oauth/access_token/{token}` round trip per call and
//! classifies the outcome: transport failures and undecodable bodies are
//! internal errors, while a well-formed upstream error body is propagated
//! verbatim (carrying the 404-vs-other distinction up to the
//! authenticator). No retry, no backoff, no caching — resilience belongs
//! to the transport or the caller, not this policy layer.

use crate::config::Config;
use crate::errors::AuthError;
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, warn};

/// Path template for the introspection endpoint, relative to the base URL.
const ACCESS_TOKEN_ENDPOINT: &str = "/oauth/access_token";

/// A resolved access token.
///
/// `user_id` and `client_id` tolerate both JSON number and numeric-string
/// wire forms; introspection services disagree on the representation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    /// The token value itself.
    pub access_token: String,

    /// Identity of the account that owns the token.
    #[serde(deserialize_with = "lenient_i64")]
    pub user_id: i64,

    /// Identity of the application the token was issued to.
    #[serde(deserialize_with = "lenient_i64")]
    pub client_id: i64,
}

/// Error body returned by the introspection service on failure.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    status: u16,
    message: String,
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(i64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::String(value) => value.parse().map_err(serde::de::Error::custom),
    }
}

/// Token introspection: exchange a token for the identity behind it.
#[async_trait::async_trait]
pub trait TokenIntrospector: Send + Sync {
    /// Resolve a token to an [`AccessToken`].
    async fn fetch(&self, token: &str) -> Result<AccessToken, AuthError>;
}

/// Reqwest-backed introspection client.
#[derive(Clone)]
pub struct IntrospectionClient {
    /// HTTP client with configured timeouts.
    client: reqwest::Client,

    /// Base URL of the introspection service.
    base_url: String,
}

impl IntrospectionClient {
    /// Create a new introspection client.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Internal` if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| {
                error!(target: "oauth_guard.introspection", error = %e, "Failed to build HTTP client");
                AuthError::Internal("unable to build introspection client".to_string())
            })?;

        Ok(Self {
            client,
            base_url: config.introspection_base_url.clone(),
        })
    }
}

#[async_trait::async_trait]
impl TokenIntrospector for IntrospectionClient {
    async fn fetch(&self, token: &str) -> Result<AccessToken, AuthError> {
        let url = format!("{}{}/{}", self.base_url, ACCESS_TOKEN_ENDPOINT, token);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                warn!(target: "oauth_guard.introspection", error = %e, "Introspection request failed");
                AuthError::Internal("unable to get access token".to_string())
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            warn!(target: "oauth_guard.introspection", error = %e, "Failed to read introspection response");
            AuthError::Internal("unable to get access token".to_string())
        })?;

        if status.as_u16() > 299 {
            let api_error: ApiErrorBody = serde_json::from_slice(&body).map_err(|e| {
                warn!(target: "oauth_guard.introspection", status = %status, error = %e, "Undecodable error response");
                AuthError::Internal(
                    "invalid error response when getting access token".to_string(),
                )
            })?;

            return Err(AuthError::Api {
                status: api_error.status,
                message: api_error.message,
            });
        }

        serde_json::from_slice(&body).map_err(|e| {
            error!(target: "oauth_guard.introspection", error = %e, "Undecodable access token response");
            AuthError::Internal("error when trying to unmarshal access token data".to_string())
        })
    }
}

/// Mock introspector module for testing.
///
/// Provides a scripted [`TokenIntrospector`] so the authenticator can be
/// exercised without a network.
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted introspector for unit testing.
    pub struct MockIntrospector {
        /// Response returned for every call.
        response: Result<AccessToken, AuthError>,
        /// Number of calls made.
        call_count: AtomicUsize,
    }

    impl MockIntrospector {
        /// Create a mock that resolves every token to the given identity.
        pub fn resolving(access_token: &str, user_id: i64, client_id: i64) -> Self {
            Self {
                response: Ok(AccessToken {
                    access_token: access_token.to_string(),
                    user_id,
                    client_id,
                }),
                call_count: AtomicUsize::new(0),
            }
        }

        /// Create a mock that reports every token as not found.
        pub fn not_found() -> Self {
            Self {
                response: Err(AuthError::Api {
                    status: 404,
                    message: "token not found".to_string(),
                }),
                call_count: AtomicUsize::new(0),
            }
        }

        /// Create a mock that fails every call with the given error.
        pub fn failing(error: AuthError) -> Self {
            Self {
                response: Err(error),
                call_count: AtomicUsize::new(0),
            }
        }

        /// Get the number of calls made.
        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl TokenIntrospector for MockIntrospector {
        async fn fetch(&self, _token: &str) -> Result<AccessToken, AuthError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            self.response.clone()
        }
    }
}
