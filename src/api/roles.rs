// ABOUTME: Role resource operations: list and fetch by id
// ABOUTME: Read-only views used to discover role ids for user management
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use http::Method;

use super::{require_id, require_token, run};
use crate::client::VendorClient;
use crate::constants::endpoints;
use crate::errors::GatewayResult;
use crate::vendor::ApiResponse;

/// List all roles on the controller.
pub async fn list_roles(client: &VendorClient, token: String) -> GatewayResult<ApiResponse> {
    require_token(&token)?;
    let path = endpoints::roles(client.controller_id());
    run(client, Method::GET, &path, &[], &token, None).await
}

/// Fetch a single role by id.
pub async fn get_role(
    client: &VendorClient,
    token: String,
    role_id: &str,
) -> GatewayResult<ApiResponse> {
    require_token(&token)?;
    require_id(role_id, "role id")?;
    let path = endpoints::role(client.controller_id(), role_id);
    run(client, Method::GET, &path, &[], &token, None).await
}
