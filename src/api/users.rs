// ABOUTME: User resource operations: list, get, local/cloud views, create, modify, delete
// ABOUTME: Tri-state payload construction so unset fields are omitted from the wire
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User operations.
//!
//! Optional fields are tri-state: `None` means "unset" and is omitted from
//! the outgoing payload, while an explicit value — including `Some(false)` —
//! is always serialized. The controller treats absence as "leave unchanged"
//! on modify and "use default" on create, so the two must never be conflated.

use http::Method;
use serde::{Deserialize, Serialize};

use super::{require_id, require_token, run};
use crate::client::VendorClient;
use crate::constants::endpoints;
use crate::errors::GatewayResult;
use crate::vendor::ApiResponse;

/// Controller account type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserType {
    Local,
    Cloud,
}

impl Serialize for UserType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(match self {
            Self::Local => 0,
            Self::Cloud => 1,
        })
    }
}

impl<'de> Deserialize<'de> for UserType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(Self::Local),
            1 => Ok(Self::Cloud),
            other => Err(serde::de::Error::custom(format!(
                "user type must be 0 (local) or 1 (cloud), got {other}"
            ))),
        }
    }
}

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Pagination, sort, and search parameters for the user list.
#[derive(Debug, Clone)]
pub struct UserListQuery {
    pub page: u32,
    pub page_size: u32,
    /// Sort directives, serialized as one `sorts.{field}` query parameter per
    /// field, in order.
    pub sorts: Vec<(String, SortOrder)>,
    pub search_key: Option<String>,
}

impl UserListQuery {
    #[must_use]
    pub const fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            sorts: Vec::new(),
            search_key: None,
        }
    }

    #[must_use]
    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sorts.push((field.into(), order));
        self
    }

    #[must_use]
    pub fn search(mut self, key: impl Into<String>) -> Self {
        self.search_key = Some(key.into());
        self
    }

    fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".into(), self.page.to_string()),
            ("pageSize".into(), self.page_size.to_string()),
        ];
        for (field, order) in &self.sorts {
            pairs.push((format!("sorts.{field}"), order.as_str().into()));
        }
        if let Some(key) = &self.search_key {
            pairs.push(("searchKey".into(), key.clone()));
        }
        pairs
    }
}

/// Payload for creating a user. Mandatory fields are plain; everything else
/// is tri-state and omitted from the wire when unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub role_id: String,
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub all_site: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_notification: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sites: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporary_enable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
}

impl CreateUserRequest {
    /// The validity window is only meaningful under an explicit
    /// `temporaryEnable: true`; otherwise it must not reach the wire.
    fn sanitized(mut self) -> Self {
        if self.temporary_enable != Some(true) {
            self.start_time = None;
            self.end_time = None;
        }
        self
    }
}

/// Payload for modifying a user. Absent optional fields leave the
/// corresponding setting unchanged on the controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyUserRequest {
    pub name: String,
    pub role_id: String,
    pub all_site: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_modify: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_notification: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sites: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporary_enable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
}

impl ModifyUserRequest {
    fn sanitized(mut self) -> Self {
        if self.temporary_enable != Some(true) {
            self.start_time = None;
            self.end_time = None;
        }
        self
    }
}

/// List users with pagination, optional sorts, and an optional search key.
pub async fn list_users(
    client: &VendorClient,
    token: String,
    query: &UserListQuery,
) -> GatewayResult<ApiResponse> {
    require_token(&token)?;
    let path = endpoints::users(client.controller_id());
    run(
        client,
        Method::GET,
        &path,
        &query.to_query_pairs(),
        &token,
        None,
    )
    .await
}

/// Fetch a single user by id.
pub async fn get_user(
    client: &VendorClient,
    token: String,
    user_id: &str,
) -> GatewayResult<ApiResponse> {
    require_token(&token)?;
    require_id(user_id, "user id")?;
    let path = endpoints::user(client.controller_id(), user_id);
    run(client, Method::GET, &path, &[], &token, None).await
}

/// List local (password) users, excluding the owner.
pub async fn list_local_users(client: &VendorClient, token: String) -> GatewayResult<ApiResponse> {
    require_token(&token)?;
    let path = endpoints::local_users(client.controller_id());
    run(client, Method::GET, &path, &[], &token, None).await
}

/// List cloud-account users, excluding the owner.
pub async fn list_cloud_users(client: &VendorClient, token: String) -> GatewayResult<ApiResponse> {
    require_token(&token)?;
    let path = endpoints::cloud_users(client.controller_id());
    run(client, Method::GET, &path, &[], &token, None).await
}

/// Create a user.
pub async fn create_user(
    client: &VendorClient,
    token: String,
    request: &CreateUserRequest,
) -> GatewayResult<ApiResponse> {
    require_token(&token)?;
    require_id(&request.name, "user name")?;
    require_id(&request.role_id, "role id")?;
    let payload = serde_json::to_value(request.clone().sanitized())
        .map_err(|e| crate::errors::GatewayError::Config(format!("unserializable payload: {e}")))?;
    let path = endpoints::users(client.controller_id());
    run(client, Method::POST, &path, &[], &token, Some(&payload)).await
}

/// Modify an existing user.
pub async fn modify_user(
    client: &VendorClient,
    token: String,
    user_id: &str,
    request: &ModifyUserRequest,
) -> GatewayResult<ApiResponse> {
    require_token(&token)?;
    require_id(user_id, "user id")?;
    require_id(&request.name, "user name")?;
    require_id(&request.role_id, "role id")?;
    let payload = serde_json::to_value(request.clone().sanitized())
        .map_err(|e| crate::errors::GatewayError::Config(format!("unserializable payload: {e}")))?;
    let path = endpoints::user(client.controller_id(), user_id);
    run(client, Method::PUT, &path, &[], &token, Some(&payload)).await
}

/// Delete a user, optionally forcing the removal. The controller sometimes
/// omits the JSON body on delete; a bare 2xx normalizes to `({}, 0)`.
pub async fn delete_user(
    client: &VendorClient,
    token: String,
    user_id: &str,
    force: Option<bool>,
) -> GatewayResult<ApiResponse> {
    require_token(&token)?;
    require_id(user_id, "user id")?;
    let body = force.map(|f| serde_json::json!({ "forceDelete": f }));
    let path = endpoints::user(client.controller_id(), user_id);
    run(client, Method::DELETE, &path, &[], &token, body.as_ref()).await
}
