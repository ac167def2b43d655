// ABOUTME: Integration tests for the refresh-and-retry wrapper around resource operations
// ABOUTME: Covers expiry recovery, the single-retry limit, and refresh failure invalidation
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sdn_gateway::api::users::UserListQuery;
use sdn_gateway::errors::GatewayError;
use sdn_gateway::vendor::VendorCode;

use common::{err, establish_session, mount_refresh, ok, CONTROLLER_ID};

fn users_path() -> String {
    format!("/openapi/v1/{CONTROLLER_ID}/users")
}

fn user_path(id: &str) -> String {
    format!("/openapi/v1/{CONTROLLER_ID}/users/{id}")
}

#[tokio::test]
async fn expired_token_is_refreshed_and_the_call_retried_once() {
    let server = MockServer::start().await;
    let (client, mut session) = establish_session(&server).await;
    mount_refresh(&server).await;

    // First attempt sees the stale token and reports expiry.
    Mock::given(method("GET"))
        .and(path(users_path()))
        .and(header("Authorization", "AccessToken=at-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(err(-44112, "Token expired.")))
        .expect(1)
        .mount(&server)
        .await;
    // Retry with the rotated token succeeds.
    Mock::given(method("GET"))
        .and(path(users_path()))
        .and(header("Authorization", "AccessToken=at-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "users": [{"name": "alice"}],
            "totalRows": 1,
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let response = session
        .list_users(&client, &UserListQuery::new(1, 10))
        .await
        .unwrap();
    assert_eq!(response.error_code, 0);
    assert_eq!(response.data.unwrap()["totalRows"], json!(1));
    assert_eq!(session.access_token(), Some("at-2"));
}

#[tokio::test]
async fn persistent_expiry_stops_after_exactly_two_attempts() {
    let server = MockServer::start().await;
    let (client, mut session) = establish_session(&server).await;
    mount_refresh(&server).await;

    Mock::given(method("GET"))
        .and(path(users_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(err(-44112, "Token expired.")))
        .expect(2)
        .mount(&server)
        .await;

    let result = session.list_users(&client, &UserListQuery::new(1, 10)).await;
    assert!(matches!(result, Err(GatewayError::TokenExpired)));

    let resource_calls = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == users_path())
        .count();
    assert_eq!(resource_calls, 2);
}

#[tokio::test]
async fn refresh_failure_invalidates_the_session() {
    let server = MockServer::start().await;
    let (client, mut session) = establish_session(&server).await;

    Mock::given(method("GET"))
        .and(path(users_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(err(-44112, "Token expired.")))
        .expect(1)
        .mount(&server)
        .await;
    // The refresh token is already invalid on the controller side.
    Mock::given(method("POST"))
        .and(path("/openapi/authorize/token"))
        .and(query_param("grant_type", "refresh_token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(err(-44111, "Invalid refresh token.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = session.list_users(&client, &UserListQuery::new(1, 10)).await;
    assert!(matches!(result, Err(GatewayError::AuthExpired)));
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn delete_after_refresh_uses_the_rotated_token() {
    let server = MockServer::start().await;
    let (client, mut session) = establish_session(&server).await;
    mount_refresh(&server).await;

    Mock::given(method("DELETE"))
        .and(path(user_path("u-1")))
        .and(header("Authorization", "AccessToken=at-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(err(-44112, "Token expired.")))
        .expect(1)
        .mount(&server)
        .await;
    // Retry succeeds with a bare 200 and no body, which normalizes to ({}, 0).
    Mock::given(method("DELETE"))
        .and(path(user_path("u-1")))
        .and(header("Authorization", "AccessToken=at-2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let response = session.delete_user(&client, "u-1", None).await.unwrap();
    assert_eq!(response.error_code, 0);
    assert_eq!(response.data, Some(json!({})));
    assert_eq!(session.access_token(), Some("at-2"));
}

#[tokio::test]
async fn auth_code_mode_rejection_passes_through_without_retry() {
    let server = MockServer::start().await;
    let (client, mut session) = establish_session(&server).await;

    Mock::given(method("GET"))
        .and(path(users_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(err(
            -44118,
            "This interface only supports authorization code mode.",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let response = session
        .list_users(&client, &UserListQuery::new(1, 10))
        .await
        .unwrap();
    assert_eq!(response.code(), VendorCode::AuthCodeModeRequired);
    // The original pair is untouched; no refresh grant was attempted.
    assert_eq!(session.access_token(), Some("at-1"));
    let refresh_calls = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.query().is_some_and(|q| q.contains("refresh_token")))
        .count();
    assert_eq!(refresh_calls, 0);
}

#[tokio::test]
async fn other_vendor_errors_are_reported_not_retried() {
    let server = MockServer::start().await;
    let (client, mut session) = establish_session(&server).await;

    Mock::given(method("GET"))
        .and(path(users_path()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(err(-33000, "Operation not permitted.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let response = session
        .list_users(&client, &UserListQuery::new(1, 10))
        .await
        .unwrap();
    assert_eq!(response.error_code, -33000);
    assert_eq!(response.message(), Some("Operation not permitted."));
}
