//! OAuth Guard — inbound-request authentication via token introspection.
//!
//! Given an inbound HTTP request, this library decides whether the request
//! is public, and if not, exchanges its `access_token` query parameter for
//! caller/client identity by calling a remote token-introspection service.
//! Resolved identity is stamped onto the request as trusted headers
//! (`X-Caller-Id`, `X-Client-Id`) for downstream handlers to read.
//!
//! # Flow
//!
//! ```text
//! request -> is_public? -> access_token param -> IntrospectionClient::fetch
//!         -> 404: proceed anonymous | other failure: abort
//!         -> success: X-Client-Id / X-Caller-Id set on the request
//! ```
//!
//! This layer establishes *identity*, not rights; authorization decisions
//! belong to whatever sits above it. It performs at most one outbound call
//! per inbound request and keeps no state across requests.
//!
//! # Modules
//!
//! - `authenticator` - The authentication decision flow
//! - `config` - Configuration from environment variables
//! - `errors` - Error taxonomy with HTTP status code mapping
//! - `headers` - Identity header constants and accessors
//! - `introspection` - HTTP client for the token-introspection endpoint
//! - `middleware` - Axum middleware adapter

pub mod authenticator;
pub mod config;
pub mod errors;
pub mod headers;
pub mod introspection;
pub mod middleware;

pub use authenticator::Authenticator;
pub use config::Config;
pub use errors::AuthError;
pub use introspection::{AccessToken, IntrospectionClient, TokenIntrospector};
