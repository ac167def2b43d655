// ABOUTME: HTTP route handlers exposing the gateway to browser clients
// ABOUTME: Cookie-keyed session auth in front of the user and role operations
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Web surface for the gateway.
//!
//! A login creates a server-side [`ControllerSession`] and hands the browser
//! an opaque session cookie; every other endpoint resolves that cookie back
//! to the session and forwards to the resource operations. A missing or
//! unknown cookie maps to an authentication-required response, never a crash.

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use http::header::{HeaderMap, HeaderValue, COOKIE, SET_COOKIE};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::users::{CreateUserRequest, ModifyUserRequest, SortOrder, UserListQuery};
use crate::auth::{ControllerSession, OAuthCredentials};
use crate::client::VendorClient;
use crate::constants::GATEWAY_SESSION_COOKIE;
use crate::errors::{GatewayError, GatewayResult};
use crate::session_store::{SessionStore, SharedSession};
use crate::vendor::ApiResponse;

/// Shared state for all handlers.
pub struct GatewayState {
    pub client: VendorClient,
    pub credentials: OAuthCredentials,
    pub sessions: SessionStore,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteUserParams {
    pub force: Option<bool>,
}

/// Gateway routes implementation
pub struct GatewayRoutes;

impl GatewayRoutes {
    /// Build the full router, including trace and CORS layers (the gateway
    /// fronts a single-page app served from a different origin).
    pub fn router(state: Arc<GatewayState>) -> Router {
        Router::new()
            .route("/health", get(handle_health))
            .route("/api/auth/login", post(handle_login))
            .route("/api/auth/logout", post(handle_logout))
            .route("/api/users", get(handle_list_users).post(handle_create_user))
            .route("/api/users/local", get(handle_list_local_users))
            .route("/api/users/cloud", get(handle_list_cloud_users))
            .route(
                "/api/users/:id",
                get(handle_get_user)
                    .put(handle_modify_user)
                    .delete(handle_delete_user),
            )
            .route("/api/roles", get(handle_list_roles))
            .route("/api/roles/:id", get(handle_get_role))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(state)
    }
}

async fn handle_health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn handle_login(
    State(state): State<Arc<GatewayState>>,
    Json(request): Json<LoginRequest>,
) -> GatewayResult<Response> {
    let mut session = ControllerSession::new(state.credentials.clone());
    session
        .establish(&state.client, &request.username, &request.password)
        .await?;

    let session_id = state.sessions.insert(session);
    info!("browser session created");

    let cookie = format!("{GATEWAY_SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax");
    let mut response = (
        StatusCode::OK,
        Json(StatusResponse {
            message: "logged in".into(),
        }),
    )
        .into_response();
    response.headers_mut().insert(
        SET_COOKIE,
        HeaderValue::from_str(&cookie)
            .map_err(|_| GatewayError::Config("unrepresentable session cookie".into()))?,
    );
    Ok(response)
}

async fn handle_logout(
    State(state): State<Arc<GatewayState>>,
    headers: HeaderMap,
) -> GatewayResult<Response> {
    if let Some(session_id) = cookie_value(&headers, GATEWAY_SESSION_COOKIE) {
        if let Some(session) = state.sessions.remove(&session_id) {
            session.lock().await.logout();
            info!("browser session terminated");
        }
    }

    let cookie = format!("{GATEWAY_SESSION_COOKIE}=; Path=/; HttpOnly; Max-Age=0");
    let mut response = (
        StatusCode::OK,
        Json(StatusResponse {
            message: "logged out".into(),
        }),
    )
        .into_response();
    response.headers_mut().insert(
        SET_COOKIE,
        HeaderValue::from_str(&cookie)
            .map_err(|_| GatewayError::Config("unrepresentable session cookie".into()))?,
    );
    Ok(response)
}

async fn handle_list_users(
    State(state): State<Arc<GatewayState>>,
    headers: HeaderMap,
    Query(params): Query<BTreeMap<String, String>>,
) -> GatewayResult<Json<ApiResponse>> {
    let session = require_session(&state, &headers)?;
    let query = parse_user_list_query(&params)?;
    let mut session = session.lock().await;
    let response = session.list_users(&state.client, &query).await?;
    Ok(Json(response))
}

async fn handle_get_user(
    State(state): State<Arc<GatewayState>>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
) -> GatewayResult<Json<ApiResponse>> {
    let session = require_session(&state, &headers)?;
    let mut session = session.lock().await;
    let response = session.get_user(&state.client, &user_id).await?;
    Ok(Json(response))
}

async fn handle_list_local_users(
    State(state): State<Arc<GatewayState>>,
    headers: HeaderMap,
) -> GatewayResult<Json<ApiResponse>> {
    let session = require_session(&state, &headers)?;
    let mut session = session.lock().await;
    let response = session.list_local_users(&state.client).await?;
    Ok(Json(response))
}

async fn handle_list_cloud_users(
    State(state): State<Arc<GatewayState>>,
    headers: HeaderMap,
) -> GatewayResult<Json<ApiResponse>> {
    let session = require_session(&state, &headers)?;
    let mut session = session.lock().await;
    let response = session.list_cloud_users(&state.client).await?;
    Ok(Json(response))
}

async fn handle_create_user(
    State(state): State<Arc<GatewayState>>,
    headers: HeaderMap,
    Json(request): Json<CreateUserRequest>,
) -> GatewayResult<Json<ApiResponse>> {
    let session = require_session(&state, &headers)?;
    let mut session = session.lock().await;
    let response = session.create_user(&state.client, &request).await?;
    Ok(Json(response))
}

async fn handle_modify_user(
    State(state): State<Arc<GatewayState>>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
    Json(request): Json<ModifyUserRequest>,
) -> GatewayResult<Json<ApiResponse>> {
    let session = require_session(&state, &headers)?;
    let mut session = session.lock().await;
    let response = session
        .modify_user(&state.client, &user_id, &request)
        .await?;
    Ok(Json(response))
}

async fn handle_delete_user(
    State(state): State<Arc<GatewayState>>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
    Query(params): Query<DeleteUserParams>,
) -> GatewayResult<Json<ApiResponse>> {
    let session = require_session(&state, &headers)?;
    let mut session = session.lock().await;
    let response = session
        .delete_user(&state.client, &user_id, params.force)
        .await?;
    Ok(Json(response))
}

async fn handle_list_roles(
    State(state): State<Arc<GatewayState>>,
    headers: HeaderMap,
) -> GatewayResult<Json<ApiResponse>> {
    let session = require_session(&state, &headers)?;
    let mut session = session.lock().await;
    let response = session.list_roles(&state.client).await?;
    Ok(Json(response))
}

async fn handle_get_role(
    State(state): State<Arc<GatewayState>>,
    headers: HeaderMap,
    Path(role_id): Path<String>,
) -> GatewayResult<Json<ApiResponse>> {
    let session = require_session(&state, &headers)?;
    let mut session = session.lock().await;
    let response = session.get_role(&state.client, &role_id).await?;
    Ok(Json(response))
}

/// Resolve the gateway cookie to a live session or fail with 401.
fn require_session(state: &GatewayState, headers: &HeaderMap) -> GatewayResult<SharedSession> {
    let session_id =
        cookie_value(headers, GATEWAY_SESSION_COOKIE).ok_or(GatewayError::SessionRequired)?;
    state
        .sessions
        .get(&session_id)
        .ok_or(GatewayError::SessionRequired)
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(COOKIE)?.to_str().ok()?;
    raw.split(';').map(str::trim).find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then(|| value.to_owned())
    })
}

/// Translate raw query parameters into a [`UserListQuery`]. Sort directives
/// arrive as `sorts.{field}={asc|desc}` keys, one per field.
fn parse_user_list_query(params: &BTreeMap<String, String>) -> GatewayResult<UserListQuery> {
    let page = match params.get("page") {
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|_| GatewayError::InvalidArgument("page must be a positive integer".into()))?,
        None => 1,
    };
    let page_size = match params.get("pageSize") {
        Some(raw) => raw.parse::<u32>().map_err(|_| {
            GatewayError::InvalidArgument("pageSize must be a positive integer".into())
        })?,
        None => 10,
    };

    let mut query = UserListQuery::new(page, page_size);
    for (key, value) in params {
        if let Some(field) = key.strip_prefix("sorts.") {
            let order = match value.as_str() {
                "asc" => SortOrder::Asc,
                "desc" => SortOrder::Desc,
                other => {
                    return Err(GatewayError::InvalidArgument(format!(
                        "sort order for {field} must be asc or desc, got {other}"
                    )))
                }
            };
            query = query.sort(field, order);
        }
    }
    if let Some(key) = params.get("searchKey") {
        query = query.search(key.clone());
    }
    Ok(query)
}
