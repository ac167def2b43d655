// ABOUTME: Resource operations layer over the controller's OpenAPI
// ABOUTME: Shared precondition checks and request plumbing for user and role operations
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resource operations.
//!
//! Each operation is a pure function of (client, access token, parameters)
//! returning a normalized [`ApiResponse`]. Preconditions are explicit
//! contract, not accidental guards: a missing token or empty identifier fails
//! locally before any network call. Transport failures and malformed bodies
//! normalize to the reserved `-1` sentinel so callers always get a
//! `(data, errorCode)` pair for anything that reached the wire.

pub mod roles;
pub mod users;

use http::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use http::Method;
use serde_json::Value;
use tracing::warn;

use crate::client::VendorClient;
use crate::constants::wire;
use crate::errors::{GatewayError, GatewayResult};
use crate::vendor::ApiResponse;

/// Authenticated operations require a non-empty access token; no network
/// call is issued otherwise.
fn require_token(token: &str) -> GatewayResult<()> {
    if token.is_empty() {
        return Err(GatewayError::MissingToken);
    }
    Ok(())
}

/// Required identifiers must be non-empty; the controller would reject the
/// request anyway, so fail locally instead.
fn require_id(value: &str, what: &str) -> GatewayResult<()> {
    if value.trim().is_empty() {
        return Err(GatewayError::InvalidArgument(format!(
            "{what} must not be empty"
        )));
    }
    Ok(())
}

/// Issue an authenticated request and normalize the outcome.
async fn run(
    client: &VendorClient,
    method: Method,
    path: &str,
    query: &[(String, String)],
    token: &str,
    body: Option<&Value>,
) -> GatewayResult<ApiResponse> {
    let mut headers = HeaderMap::new();
    let authorization = format!("{}={token}", wire::ACCESS_TOKEN_SCHEME);
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&authorization)
            .map_err(|_| GatewayError::InvalidArgument("access token".into()))?,
    );

    match client.execute(method, path, query, headers, body).await {
        Ok((status, bytes)) => Ok(ApiResponse::from_http(status, &bytes)),
        Err(GatewayError::Transport(reason)) => {
            warn!(path, %reason, "controller unreachable");
            Ok(ApiResponse::no_response())
        }
        Err(other) => Err(other),
    }
}
