// ABOUTME: The four handshake steps against the controller's authorize endpoints
// ABOUTME: Login, authorization code, code exchange, and the refresh grant
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stateless handshake operations. Each step validates its preconditions
//! locally and never sends a partial request; failures carry the specific
//! reason so callers can tell "bad password" apart from "controller down".

use http::header::{HeaderMap, HeaderValue, COOKIE};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{OAuthCredentials, SessionKeys, TokenPair};
use crate::client::VendorClient;
use crate::constants::{endpoints, wire};
use crate::errors::{GatewayError, GatewayResult};
use crate::vendor::{Envelope, VendorCode};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResult {
    csrf_token: String,
    session_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResult {
    access_token: String,
    refresh_token: String,
}

/// Step 1: credentialed login. Yields the csrf token and session id that buy
/// the authorization code.
///
/// # Errors
///
/// [`GatewayError::InvalidCredentials`] when the controller rejects the
/// credentials (vendor message preserved), [`GatewayError::Transport`] when
/// it cannot be reached at all.
pub async fn login(
    client: &VendorClient,
    credentials: &OAuthCredentials,
    username: &str,
    password: &str,
) -> GatewayResult<SessionKeys> {
    let query = scope_query(client, credentials);
    let body = json!({ "username": username, "password": password });

    let envelope = client
        .post_envelope(endpoints::AUTHORIZE_LOGIN, &query, HeaderMap::new(), Some(&body))
        .await?;

    match envelope.code() {
        VendorCode::Success => {
            let result: LoginResult = parse_result(envelope)?;
            debug!("controller login succeeded");
            Ok(SessionKeys {
                csrf_token: result.csrf_token,
                session_id: result.session_id,
            })
        }
        _ => Err(GatewayError::InvalidCredentials(envelope.message())),
    }
}

/// Step 2: request the single-use authorization code.
///
/// The csrf token travels in a custom header and the session id in a cookie
/// header; no other channel is valid. Fails fast with
/// [`GatewayError::MissingSession`] when either value is absent — a partial
/// request is never sent.
pub async fn authorization_code(
    client: &VendorClient,
    credentials: &OAuthCredentials,
    keys: Option<&SessionKeys>,
) -> GatewayResult<String> {
    let keys = keys.ok_or(GatewayError::MissingSession)?;
    if keys.csrf_token.is_empty() || keys.session_id.is_empty() {
        return Err(GatewayError::MissingSession);
    }

    let mut query = scope_query(client, credentials);
    query.push(("response_type".into(), "code".into()));

    let mut headers = HeaderMap::new();
    headers.insert(
        wire::CSRF_HEADER,
        HeaderValue::from_str(&keys.csrf_token)
            .map_err(|_| GatewayError::InvalidArgument("csrf token".into()))?,
    );
    let cookie = format!("{}={}", wire::VENDOR_SESSION_COOKIE, keys.session_id);
    headers.insert(
        COOKIE,
        HeaderValue::from_str(&cookie)
            .map_err(|_| GatewayError::InvalidArgument("session id".into()))?,
    );

    let envelope = client
        .post_envelope(endpoints::AUTHORIZE_CODE, &query, headers, None)
        .await?;

    match envelope.code() {
        VendorCode::Success => {
            // The result is the code itself, a bare string.
            envelope
                .result
                .as_ref()
                .and_then(serde_json::Value::as_str)
                .map(ToOwned::to_owned)
                .ok_or_else(|| {
                    GatewayError::MalformedResponse(
                        "authorization code missing from envelope".into(),
                    )
                })
        }
        _ => Err(GatewayError::from_vendor(
            envelope.error_code,
            envelope.message(),
        )),
    }
}

/// Step 3: exchange the authorization code for the first token pair.
///
/// The code is single-use; the controller invalidates it on first exchange,
/// so this call is never retried with the same code.
pub async fn exchange_code(
    client: &VendorClient,
    credentials: &OAuthCredentials,
    code: &str,
) -> GatewayResult<TokenPair> {
    if code.is_empty() {
        return Err(GatewayError::MissingCode);
    }

    let query = vec![
        ("grant_type".into(), wire::GRANT_AUTHORIZATION_CODE.into()),
        ("code".into(), code.to_owned()),
    ];
    mint_tokens(client, credentials, query).await
}

/// Step 4: mint a replacement token pair from the refresh grant. The old
/// refresh token becomes invalid.
pub async fn refresh_access_token(
    client: &VendorClient,
    credentials: &OAuthCredentials,
    refresh_token: &str,
) -> GatewayResult<TokenPair> {
    if refresh_token.is_empty() {
        return Err(GatewayError::MissingRefreshToken);
    }

    let query = vec![
        ("grant_type".into(), wire::GRANT_REFRESH_TOKEN.into()),
        ("refresh_token".into(), refresh_token.to_owned()),
    ];
    mint_tokens(client, credentials, query).await
}

async fn mint_tokens(
    client: &VendorClient,
    credentials: &OAuthCredentials,
    query: Vec<(String, String)>,
) -> GatewayResult<TokenPair> {
    let body = json!({
        "client_id": credentials.client_id,
        "client_secret": credentials.client_secret,
    });

    let envelope = client
        .post_envelope(endpoints::AUTHORIZE_TOKEN, &query, HeaderMap::new(), Some(&body))
        .await?;

    match envelope.code() {
        VendorCode::Success => {
            let result: TokenResult = parse_result(envelope)?;
            Ok(TokenPair::new(result.access_token, result.refresh_token))
        }
        _ => Err(GatewayError::from_vendor(
            envelope.error_code,
            envelope.message(),
        )),
    }
}

fn scope_query(client: &VendorClient, credentials: &OAuthCredentials) -> Vec<(String, String)> {
    vec![
        ("client_id".into(), credentials.client_id.clone()),
        (
            wire::CONTROLLER_ID_PARAM.into(),
            client.controller_id().to_owned(),
        ),
    ]
}

fn parse_result<T: DeserializeOwned>(envelope: Envelope) -> GatewayResult<T> {
    let result = envelope.result.ok_or_else(|| {
        GatewayError::MalformedResponse("result missing from success envelope".into())
    })?;
    serde_json::from_value(result)
        .map_err(|e| GatewayError::MalformedResponse(format!("unexpected result shape: {e}")))
}
