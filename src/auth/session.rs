// ABOUTME: Per-caller controller session owning the token pair
// ABOUTME: Applies the single refresh-and-retry pass to every authenticated operation
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One [`ControllerSession`] exists per logical caller: the web layer creates
//! one per browser session and keys it by the gateway cookie. The session is
//! never a process-wide singleton, so tokens cannot leak across callers.

use std::future::Future;
use tracing::{debug, info, warn};

use super::{handshake, OAuthCredentials, SessionKeys, TokenPair};
use crate::api::users::{CreateUserRequest, ModifyUserRequest, UserListQuery};
use crate::api::{roles, users};
use crate::client::VendorClient;
use crate::errors::{GatewayError, GatewayResult};
use crate::vendor::{ApiResponse, VendorCode};

/// Session state for one authenticated principal.
///
/// Holds at most one active token pair at a time; the pair is always replaced
/// as a unit so an access token can never outlive the refresh token it was
/// minted with.
#[derive(Debug)]
pub struct ControllerSession {
    credentials: OAuthCredentials,
    handshake: Option<SessionKeys>,
    tokens: Option<TokenPair>,
}

impl ControllerSession {
    #[must_use]
    pub fn new(credentials: OAuthCredentials) -> Self {
        Self {
            credentials,
            handshake: None,
            tokens: None,
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.tokens.is_some()
    }

    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.tokens.as_ref().map(|t| t.access_token.as_str())
    }

    #[must_use]
    pub fn token_pair(&self) -> Option<&TokenPair> {
        self.tokens.as_ref()
    }

    /// Run the full four-step handshake and store the resulting token pair.
    ///
    /// The login session keys are discarded as soon as the authorization code
    /// is issued; the code itself is consumed exactly once.
    pub async fn establish(
        &mut self,
        client: &VendorClient,
        username: &str,
        password: &str,
    ) -> GatewayResult<()> {
        let keys = handshake::login(client, &self.credentials, username, password).await?;
        self.handshake = Some(keys);

        let code =
            handshake::authorization_code(client, &self.credentials, self.handshake.as_ref())
                .await?;
        // Single-use artifacts; never resent.
        self.handshake = None;

        let pair = handshake::exchange_code(client, &self.credentials, &code).await?;
        self.tokens = Some(pair);
        info!("controller session established");
        Ok(())
    }

    /// Mint a replacement token pair from the refresh grant and store it
    /// atomically as a unit.
    pub async fn refresh(&mut self, client: &VendorClient) -> GatewayResult<()> {
        let refresh_token = self
            .tokens
            .as_ref()
            .map(|t| t.refresh_token.clone())
            .ok_or(GatewayError::MissingRefreshToken)?;
        let pair =
            handshake::refresh_access_token(client, &self.credentials, &refresh_token).await?;
        self.tokens = Some(pair);
        debug!("token pair refreshed");
        Ok(())
    }

    /// Invalidate all session state. Requires a full re-login afterwards.
    pub fn logout(&mut self) {
        self.handshake = None;
        self.tokens = None;
    }

    /// The central retry wrapper.
    ///
    /// Invokes `op` once with the current access token. When the controller
    /// reports the token expired, refreshes the pair and re-invokes `op`
    /// exactly once with the new token; a second expiry signal surfaces as
    /// [`GatewayError::TokenExpired`] rather than looping. A refresh failure
    /// clears the token pair and surfaces [`GatewayError::AuthExpired`] — the
    /// caller must prompt for a full re-login. Every other vendor code,
    /// including "authorization-code mode required", passes through verbatim.
    pub async fn with_auto_refresh<F, Fut>(
        &mut self,
        client: &VendorClient,
        op: F,
    ) -> GatewayResult<ApiResponse>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = GatewayResult<ApiResponse>>,
    {
        let token = self
            .tokens
            .as_ref()
            .map(|t| t.access_token.clone())
            .ok_or(GatewayError::MissingToken)?;

        let first = op(token).await?;
        if first.code() != VendorCode::TokenExpired {
            return Ok(first);
        }

        debug!("access token reported expired, refreshing once");
        if let Err(err) = self.refresh(client).await {
            warn!(error = %err, "token refresh failed, session invalidated");
            self.tokens = None;
            return Err(GatewayError::AuthExpired);
        }

        let token = self
            .tokens
            .as_ref()
            .map(|t| t.access_token.clone())
            .ok_or(GatewayError::MissingToken)?;
        let second = op(token).await?;
        if second.code() == VendorCode::TokenExpired {
            return Err(GatewayError::TokenExpired);
        }
        Ok(second)
    }

    // ── Exposed resource surface ────────────────────────────────────────
    // Each authenticated operation gets exactly one auto-refresh pass.

    pub async fn list_users(
        &mut self,
        client: &VendorClient,
        query: &UserListQuery,
    ) -> GatewayResult<ApiResponse> {
        self.with_auto_refresh(client, |token| users::list_users(client, token, query))
            .await
    }

    pub async fn get_user(
        &mut self,
        client: &VendorClient,
        user_id: &str,
    ) -> GatewayResult<ApiResponse> {
        self.with_auto_refresh(client, |token| users::get_user(client, token, user_id))
            .await
    }

    pub async fn list_local_users(&mut self, client: &VendorClient) -> GatewayResult<ApiResponse> {
        self.with_auto_refresh(client, |token| users::list_local_users(client, token))
            .await
    }

    pub async fn list_cloud_users(&mut self, client: &VendorClient) -> GatewayResult<ApiResponse> {
        self.with_auto_refresh(client, |token| users::list_cloud_users(client, token))
            .await
    }

    pub async fn create_user(
        &mut self,
        client: &VendorClient,
        request: &CreateUserRequest,
    ) -> GatewayResult<ApiResponse> {
        self.with_auto_refresh(client, |token| users::create_user(client, token, request))
            .await
    }

    pub async fn modify_user(
        &mut self,
        client: &VendorClient,
        user_id: &str,
        request: &ModifyUserRequest,
    ) -> GatewayResult<ApiResponse> {
        self.with_auto_refresh(client, |token| {
            users::modify_user(client, token, user_id, request)
        })
        .await
    }

    pub async fn delete_user(
        &mut self,
        client: &VendorClient,
        user_id: &str,
        force: Option<bool>,
    ) -> GatewayResult<ApiResponse> {
        self.with_auto_refresh(client, |token| {
            users::delete_user(client, token, user_id, force)
        })
        .await
    }

    pub async fn list_roles(&mut self, client: &VendorClient) -> GatewayResult<ApiResponse> {
        self.with_auto_refresh(client, |token| roles::list_roles(client, token))
            .await
    }

    pub async fn get_role(
        &mut self,
        client: &VendorClient,
        role_id: &str,
    ) -> GatewayResult<ApiResponse> {
        self.with_auto_refresh(client, |token| roles::get_role(client, token, role_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GatewayConfig, LogFormat, LogLevel};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_client() -> VendorClient {
        let config = GatewayConfig {
            controller_url: url::Url::parse("https://127.0.0.1:1").unwrap(),
            client_id: "cid".into(),
            client_secret: "secret".into(),
            controller_id: "tenant".into(),
            http_port: 0,
            accept_invalid_certs: true,
            log_level: LogLevel::Info,
            log_format: LogFormat::Pretty,
        };
        VendorClient::new(&config).unwrap()
    }

    fn authenticated_session() -> ControllerSession {
        let mut session = ControllerSession::new(OAuthCredentials {
            client_id: "cid".into(),
            client_secret: "secret".into(),
        });
        session.tokens = Some(TokenPair::new("at-1".into(), "rt-1".into()));
        session
    }

    #[tokio::test]
    async fn wrapper_requires_a_token() {
        let client = test_client();
        let mut session = ControllerSession::new(OAuthCredentials {
            client_id: "cid".into(),
            client_secret: "secret".into(),
        });
        let result = session
            .with_auto_refresh(&client, |_| async { Ok(ApiResponse::empty_success()) })
            .await;
        assert!(matches!(result, Err(GatewayError::MissingToken)));
    }

    #[tokio::test]
    async fn successful_operation_runs_exactly_once() {
        let client = test_client();
        let mut session = authenticated_session();
        let calls = AtomicUsize::new(0);
        let result = session
            .with_auto_refresh(&client, |token| {
                calls.fetch_add(1, Ordering::SeqCst);
                assert_eq!(token, "at-1");
                async { Ok(ApiResponse::success(json!({"ok": true}))) }
            })
            .await
            .unwrap();
        assert_eq!(result.error_code, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn wrong_token_mode_passes_through_without_retry() {
        let client = test_client();
        let mut session = authenticated_session();
        let calls = AtomicUsize::new(0);
        let result = session
            .with_auto_refresh(&client, |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Ok(ApiResponse::from_http(
                        http::StatusCode::OK,
                        json!({"errorCode": -44118, "msg": "authorization code mode only"})
                            .to_string()
                            .as_bytes(),
                    ))
                }
            })
            .await
            .unwrap();
        assert_eq!(result.code(), VendorCode::AuthCodeModeRequired);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn logout_clears_all_state() {
        let mut session = authenticated_session();
        assert!(session.is_authenticated());
        session.logout();
        assert!(!session.is_authenticated());
        assert!(session.access_token().is_none());
    }
}
