// ABOUTME: Unified error taxonomy for the gateway with HTTP response mapping
// ABOUTME: Distinguishes transport, vendor, precondition, and session failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error handling for the token lifecycle and resource operations.
//!
//! Handshake failures abort the login sequence with the specific reason and
//! are never silently retried. Resource-operation failures propagate as
//! normalized `(data, errorCode)` pairs; the only place a retry happens is the
//! auto-refresh wrapper in [`crate::auth::session`], and it retries at most
//! once.

use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde_json::json;
use thiserror::Error;

use crate::vendor::{VendorCode, NO_RESPONSE};

/// Convenience alias used throughout the crate.
pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Connect/TLS/timeout failure talking to the controller.
    #[error("controller unreachable: {0}")]
    Transport(String),

    /// Non-zero vendor code other than the two distinguished ones.
    #[error("controller rejected request: {msg} (code {code})")]
    VendorRejected { code: i64, msg: String },

    /// The controller still reported the access token expired after the one
    /// permitted refresh-and-retry pass.
    #[error("access token expired")]
    TokenExpired,

    /// The endpoint requires authorization-code-mode tokens; never retried.
    #[error("endpoint requires authorization-code mode tokens")]
    UnsupportedTokenMode,

    /// A required identifier was empty; checked before any network call.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An authenticated operation was attempted without an access token.
    #[error("missing access token, log in first")]
    MissingToken,

    /// The authorization-code request needs both the csrf token and session
    /// id from a prior login.
    #[error("missing csrf token or session id, log in first")]
    MissingSession,

    /// The token exchange was attempted without an authorization code.
    #[error("missing authorization code")]
    MissingCode,

    /// A refresh was attempted with no stored refresh token.
    #[error("missing refresh token")]
    MissingRefreshToken,

    /// Login rejected by the controller; carries the vendor message.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Token refresh failed; the session was invalidated and the caller must
    /// perform a full re-login.
    #[error("authentication expired, log in again")]
    AuthExpired,

    /// The controller returned something other than the expected JSON
    /// envelope where one was required.
    #[error("malformed controller response: {0}")]
    MalformedResponse(String),

    /// A web request arrived without a valid gateway session cookie.
    #[error("session required")]
    SessionRequired,

    /// Local configuration problem (bad URL, unbuildable client, ...).
    #[error("configuration error: {0}")]
    Config(String),
}

impl GatewayError {
    /// HTTP status for the web layer.
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::SessionRequired
            | Self::MissingToken
            | Self::TokenExpired
            | Self::AuthExpired
            | Self::InvalidCredentials(_) => StatusCode::UNAUTHORIZED,

            Self::UnsupportedTokenMode => StatusCode::FORBIDDEN,

            Self::InvalidArgument(_)
            | Self::MissingSession
            | Self::MissingCode
            | Self::MissingRefreshToken => StatusCode::BAD_REQUEST,

            Self::Transport(_) | Self::VendorRejected { .. } | Self::MalformedResponse(_) => {
                StatusCode::BAD_GATEWAY
            }

            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Error code for JSON error bodies: the vendor's own code where one
    /// exists, the reserved sentinel otherwise.
    #[must_use]
    pub const fn wire_code(&self) -> i64 {
        match self {
            Self::VendorRejected { code, .. } => *code,
            _ => NO_RESPONSE,
        }
    }

    /// Typed error for a non-zero vendor code, used on handshake paths where
    /// a rejection aborts the sequence. The two distinguished codes map to
    /// their own variants; everything else stays a [`Self::VendorRejected`].
    #[must_use]
    pub fn from_vendor(code: i64, msg: String) -> Self {
        match VendorCode::from_raw(code) {
            VendorCode::TokenExpired => Self::TokenExpired,
            VendorCode::AuthCodeModeRequired => Self::UnsupportedTokenMode,
            _ => Self::VendorRejected { code, msg },
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = json!({
            "errorCode": self.wire_code(),
            "msg": self.to_string(),
        });
        (self.http_status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_map_to_unauthorized() {
        assert_eq!(
            GatewayError::SessionRequired.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            GatewayError::TokenExpired.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            GatewayError::AuthExpired.http_status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn precondition_failures_map_to_bad_request() {
        assert_eq!(
            GatewayError::InvalidArgument("user id".into()).http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::MissingSession.http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn vendor_rejection_keeps_its_code_on_the_wire() {
        let err = GatewayError::VendorRejected {
            code: -33004,
            msg: "exists".into(),
        };
        assert_eq!(err.wire_code(), -33004);
        assert_eq!(err.http_status(), StatusCode::BAD_GATEWAY);
        assert_eq!(GatewayError::Transport("x".into()).wire_code(), NO_RESPONSE);
    }

    #[test]
    fn distinguished_vendor_codes_map_to_typed_variants() {
        assert!(matches!(
            GatewayError::from_vendor(-44112, "expired".into()),
            GatewayError::TokenExpired
        ));
        let err = GatewayError::from_vendor(-44118, "wrong mode".into());
        assert!(matches!(err, GatewayError::UnsupportedTokenMode));
        assert_eq!(err.http_status(), StatusCode::FORBIDDEN);
        assert!(matches!(
            GatewayError::from_vendor(-33004, "exists".into()),
            GatewayError::VendorRejected { code: -33004, .. }
        ));
    }
}
