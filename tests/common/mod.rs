// ABOUTME: Shared helpers for integration tests against a mock controller
// ABOUTME: Config builders and canned vendor envelopes
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(dead_code, clippy::unwrap_used)]

use serde_json::{json, Value};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sdn_gateway::auth::{ControllerSession, OAuthCredentials};
use sdn_gateway::client::VendorClient;
use sdn_gateway::config::{GatewayConfig, LogFormat, LogLevel};

pub const CONTROLLER_ID: &str = "ctl-1";

pub fn config_for(base: &str) -> GatewayConfig {
    GatewayConfig {
        controller_url: Url::parse(base).unwrap(),
        client_id: "client-1".into(),
        client_secret: "secret-1".into(),
        controller_id: CONTROLLER_ID.into(),
        http_port: 0,
        accept_invalid_certs: false,
        log_level: LogLevel::Info,
        log_format: LogFormat::Pretty,
    }
}

pub fn client_for(base: &str) -> VendorClient {
    VendorClient::new(&config_for(base)).unwrap()
}

pub fn credentials() -> OAuthCredentials {
    OAuthCredentials {
        client_id: "client-1".into(),
        client_secret: "secret-1".into(),
    }
}

/// Success envelope.
pub fn ok(result: Value) -> Value {
    json!({ "errorCode": 0, "result": result, "msg": "Success." })
}

/// Error envelope.
pub fn err(code: i64, msg: &str) -> Value {
    json!({ "errorCode": code, "msg": msg })
}

/// Mount the three handshake endpoints for a successful login flow that
/// mints the pair `at-1`/`rt-1`.
pub async fn mount_handshake(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/openapi/authorize/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "csrfToken": "csrf-1",
            "sessionId": "sess-1",
        }))))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/openapi/authorize/code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!("code-1"))))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/openapi/authorize/token"))
        .and(query_param("grant_type", "authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "accessToken": "at-1",
            "refreshToken": "rt-1",
        }))))
        .mount(server)
        .await;
}

/// Mount a refresh grant that rotates the pair to `at-2`/`rt-2`.
pub async fn mount_refresh(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/openapi/authorize/token"))
        .and(query_param("grant_type", "refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "accessToken": "at-2",
            "refreshToken": "rt-2",
        }))))
        .mount(server)
        .await;
}

/// Run the full handshake against the mock controller and hand back an
/// authenticated session.
pub async fn establish_session(server: &MockServer) -> (VendorClient, ControllerSession) {
    mount_handshake(server).await;
    let client = client_for(&server.uri());
    let mut session = ControllerSession::new(credentials());
    session.establish(&client, "admin", "password").await.unwrap();
    (client, session)
}
