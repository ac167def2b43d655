// ABOUTME: Library entry point for the SDN controller OpenAPI gateway
// ABOUTME: Wires the token-lifecycle core, resource operations, and the web session layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![deny(unsafe_code)]

//! # SDN Gateway
//!
//! A session-scoped gateway around an SDN cloud controller's OpenAPI.
//!
//! The controller exposes an OAuth-like authorization-code flow: a credentialed
//! login yields a csrf token and session id, those buy a single-use
//! authorization code, and the code is exchanged for an access/refresh token
//! pair. Every authenticated call is eligible for exactly one transparent
//! refresh-and-retry pass when the controller reports the token expired.
//!
//! ## Architecture
//!
//! - **`auth`**: the four-step handshake and the per-caller
//!   [`ControllerSession`](auth::ControllerSession) that owns the token pair
//!   and the refresh-and-retry wrapper.
//! - **`api`**: parameterized user and role operations, each normalizing the
//!   controller's `{errorCode, result, msg}` envelope.
//! - **`client`**: the HTTP client wrapper with bounded timeouts.
//! - **`routes`** / **`session_store`**: an axum surface that maps browser
//!   sessions (server-side store keyed by a session cookie) onto controller
//!   sessions. Tokens never leak across sessions.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sdn_gateway::auth::{ControllerSession, OAuthCredentials};
//! use sdn_gateway::client::VendorClient;
//! use sdn_gateway::config::GatewayConfig;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = GatewayConfig::from_env()?;
//! let client = VendorClient::new(&config)?;
//! let mut session = ControllerSession::new(OAuthCredentials {
//!     client_id: config.client_id.clone(),
//!     client_secret: config.client_secret.clone(),
//! });
//! session.establish(&client, "admin", "secret").await?;
//! let users = session
//!     .list_users(&client, &sdn_gateway::api::users::UserListQuery::new(1, 10))
//!     .await?;
//! println!("{users:?}");
//! # Ok(())
//! # }
//! ```

/// Resource operations over controller users and roles
pub mod api;

/// Authorization handshake and session/token lifecycle
pub mod auth;

/// HTTP client wrapper for the controller's OpenAPI
pub mod client;

/// Environment-based configuration
pub mod config;

/// Endpoint paths, wire names, and deployment defaults
pub mod constants;

/// Unified error taxonomy with HTTP response mapping
pub mod errors;

/// Structured logging setup
pub mod logging;

/// HTTP routes exposing the gateway to browser clients
pub mod routes;

/// Server-side session store keyed by the gateway session cookie
pub mod session_store;

/// Vendor response envelope and distinguished error codes
pub mod vendor;
