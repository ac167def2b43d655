// ABOUTME: Application constants for vendor endpoints, wire names, and defaults
// ABOUTME: Centralizes the controller's OpenAPI paths and the gateway's environment keys
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Constants shared across the gateway

/// Controller OpenAPI endpoint paths
pub mod endpoints {
    /// Credentialed login; yields the csrf token and session id
    pub const AUTHORIZE_LOGIN: &str = "/openapi/authorize/login";
    /// Authorization-code request; consumes the login session
    pub const AUTHORIZE_CODE: &str = "/openapi/authorize/code";
    /// Token endpoint for both the code exchange and the refresh grant
    pub const AUTHORIZE_TOKEN: &str = "/openapi/authorize/token";

    /// User collection path scoped to one controller instance
    #[must_use]
    pub fn users(controller_id: &str) -> String {
        format!("/openapi/v1/{controller_id}/users")
    }

    /// Single-user path
    #[must_use]
    pub fn user(controller_id: &str, user_id: &str) -> String {
        format!("/openapi/v1/{controller_id}/users/{user_id}")
    }

    /// Local (password) users, excluding the owner
    #[must_use]
    pub fn local_users(controller_id: &str) -> String {
        format!("/openapi/v1/{controller_id}/users/local")
    }

    /// Cloud-account users, excluding the owner
    #[must_use]
    pub fn cloud_users(controller_id: &str) -> String {
        format!("/openapi/v1/{controller_id}/users/cloud")
    }

    /// Role collection path
    #[must_use]
    pub fn roles(controller_id: &str) -> String {
        format!("/openapi/v1/{controller_id}/roles")
    }

    /// Single-role path
    #[must_use]
    pub fn role(controller_id: &str, role_id: &str) -> String {
        format!("/openapi/v1/{controller_id}/roles/{role_id}")
    }
}

/// Wire names the controller expects on handshake requests
pub mod wire {
    /// Header carrying the csrf token on the authorization-code request
    pub const CSRF_HEADER: &str = "Csrf-Token";
    /// Cookie name carrying the login session id
    pub const VENDOR_SESSION_COOKIE: &str = "TPOMADA_SESSIONID";
    /// Query parameter scoping requests to one controller instance
    pub const CONTROLLER_ID_PARAM: &str = "omadac_id";
    /// Authorization scheme for access tokens
    pub const ACCESS_TOKEN_SCHEME: &str = "AccessToken";
    /// Grant type for the one-shot code exchange
    pub const GRANT_AUTHORIZATION_CODE: &str = "authorization_code";
    /// Grant type for minting a new token pair
    pub const GRANT_REFRESH_TOKEN: &str = "refresh_token";
}

/// Environment variable names read by [`crate::config::GatewayConfig`]
pub mod env_keys {
    pub const CONTROLLER_URL: &str = "SDN_CONTROLLER_URL";
    pub const CLIENT_ID: &str = "SDN_CLIENT_ID";
    pub const CLIENT_SECRET: &str = "SDN_CLIENT_SECRET";
    pub const CONTROLLER_ID: &str = "SDN_CONTROLLER_ID";
    pub const HTTP_PORT: &str = "HTTP_PORT";
    pub const ACCEPT_INVALID_CERTS: &str = "SDN_ACCEPT_INVALID_CERTS";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
}

/// Deployment defaults
pub mod defaults {
    /// Default HTTP listen port for the gateway
    pub const HTTP_PORT: u16 = 8095;
    /// Per-request timeout for controller calls
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
    /// Connect timeout for controller calls
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;
    /// Lifetime of a browser session in the server-side store
    pub const SESSION_TTL_HOURS: i64 = 8;
}

/// Cookie name for the gateway's own browser session
pub const GATEWAY_SESSION_COOKIE: &str = "GATEWAY_SESSIONID";
