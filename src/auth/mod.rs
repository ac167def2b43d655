// ABOUTME: Authorization handshake types and session/token lifecycle
// ABOUTME: Owns the csrf/session keys, the token pair, and per-caller session state
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session/token manager.
//!
//! The controller's authorization flow is a four-step handshake:
//!
//! 1. credentialed login → csrf token + session id,
//! 2. authorization-code request (csrf header + session cookie) → single-use
//!    code,
//! 3. code exchange → access/refresh token pair,
//! 4. refresh grant → replacement token pair, on demand.
//!
//! Per session the lifecycle is `Unauthenticated → SessionEstablished →
//! CodeIssued → Authenticated`, with `Authenticated → Refreshing →
//! Authenticated` on expiry and a fall back to `Unauthenticated` when the
//! refresh itself fails.

pub mod handshake;
pub mod session;

use chrono::{DateTime, Utc};

pub use session::ControllerSession;

/// OAuth client credentials issued by the controller. Supplied once per
/// process; immutable afterwards.
#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Short-lived login artifacts. Produced by the login step, consumed only by
/// the authorization-code request, and discarded afterwards.
#[derive(Debug, Clone)]
pub struct SessionKeys {
    pub csrf_token: String,
    pub session_id: String,
}

/// Access/refresh token pair. Replaced wholesale on refresh; the old refresh
/// token becomes invalid the moment a new pair is minted.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub issued_at: DateTime<Utc>,
}

impl TokenPair {
    #[must_use]
    pub fn new(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
            issued_at: Utc::now(),
        }
    }
}
