// ABOUTME: HTTP client wrapper for the controller's OpenAPI
// ABOUTME: Pooled reqwest client with bounded timeouts and envelope parsing helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport layer for controller calls.
//!
//! Every call is bounded by explicit request and connect timeouts so the
//! retry wrapper can never block indefinitely.

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::trace;
use url::Url;

use crate::config::GatewayConfig;
use crate::constants::defaults;
use crate::errors::{GatewayError, GatewayResult};
use crate::vendor::Envelope;

/// HTTP client scoped to one controller instance.
#[derive(Debug, Clone)]
pub struct VendorClient {
    http: reqwest::Client,
    base_url: Url,
    controller_id: String,
}

impl VendorClient {
    /// Build a client from the gateway configuration.
    ///
    /// # Errors
    ///
    /// Fails when the underlying HTTP client cannot be constructed.
    pub fn new(config: &GatewayConfig) -> GatewayResult<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(defaults::CONNECT_TIMEOUT_SECS));
        if config.accept_invalid_certs {
            // Lab controllers ship self-signed certificates.
            builder = builder.danger_accept_invalid_certs(true);
        }
        let http = builder
            .build()
            .map_err(|e| GatewayError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.controller_url.clone(),
            controller_id: config.controller_id.clone(),
        })
    }

    /// Controller (tenant) id scoping resource paths.
    #[must_use]
    pub fn controller_id(&self) -> &str {
        &self.controller_id
    }

    /// Issue a request and return the raw status and body.
    ///
    /// Transport failures (connect/TLS/timeout) surface as
    /// [`GatewayError::Transport`] so callers can tell "controller down"
    /// apart from a vendor rejection.
    pub(crate) async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        headers: HeaderMap,
        body: Option<&Value>,
    ) -> GatewayResult<(StatusCode, Bytes)> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| GatewayError::Config(format!("invalid request path {path}: {e}")))?;

        let mut request = self.http.request(method.clone(), url).headers(headers);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Transport(transport_reason(&e)))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| GatewayError::Transport(transport_reason(&e)))?;
        trace!(%method, path, %status, "controller response");
        Ok((status, bytes))
    }

    /// POST and parse the vendor envelope, for handshake endpoints where a
    /// missing or non-JSON body is itself an error.
    pub(crate) async fn post_envelope(
        &self,
        path: &str,
        query: &[(String, String)],
        headers: HeaderMap,
        body: Option<&Value>,
    ) -> GatewayResult<Envelope> {
        let (status, bytes) = self
            .execute(Method::POST, path, query, headers, body)
            .await?;
        if bytes.is_empty() {
            return Err(GatewayError::MalformedResponse(format!(
                "empty body from {path} (status {status})"
            )));
        }
        serde_json::from_slice(&bytes).map_err(|e| {
            GatewayError::MalformedResponse(format!("unparseable envelope from {path}: {e}"))
        })
    }
}

fn transport_reason(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("timed out: {err}")
    } else if err.is_connect() {
        format!("connect failed: {err}")
    } else {
        err.to_string()
    }
}
