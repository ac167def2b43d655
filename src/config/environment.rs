// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses controller credentials, bind port, and logging options from env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment-based configuration for the gateway process.
//!
//! Credentials are supplied once per process and are immutable afterwards;
//! each browser session gets its own token lifecycle on top of them.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use url::Url;

use crate::constants::{defaults, env_keys};

/// Strongly typed log level
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        };
        write!(f, "{s}")
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// JSON lines for production log shipping
    Json,
    /// Human-readable output for development
    #[default]
    Pretty,
}

/// Gateway process configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Controller base URL, e.g. `https://10.30.31.159:8043`
    pub controller_url: Url,
    /// OAuth client id issued by the controller
    pub client_id: String,
    /// OAuth client secret issued by the controller
    pub client_secret: String,
    /// Controller (tenant) id scoping all resource paths
    pub controller_id: String,
    /// HTTP listen port for the gateway's own API
    pub http_port: u16,
    /// Skip TLS verification for lab controllers running self-signed certs
    pub accept_invalid_certs: bool,
    pub log_level: LogLevel,
    pub log_format: LogFormat,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Fails when a mandatory variable is missing or the controller URL does
    /// not parse as an absolute http(s) URL.
    pub fn from_env() -> Result<Self> {
        let raw_url = env::var(env_keys::CONTROLLER_URL)
            .with_context(|| format!("{} must be set", env_keys::CONTROLLER_URL))?;
        let controller_url = Url::parse(&raw_url)
            .with_context(|| format!("{} is not a valid URL", env_keys::CONTROLLER_URL))?;
        if !matches!(controller_url.scheme(), "http" | "https") {
            bail!(
                "{} must be an http(s) URL, got scheme {}",
                env_keys::CONTROLLER_URL,
                controller_url.scheme()
            );
        }

        let client_id = env::var(env_keys::CLIENT_ID)
            .with_context(|| format!("{} must be set", env_keys::CLIENT_ID))?;
        let client_secret = env::var(env_keys::CLIENT_SECRET)
            .with_context(|| format!("{} must be set", env_keys::CLIENT_SECRET))?;
        let controller_id = env::var(env_keys::CONTROLLER_ID)
            .with_context(|| format!("{} must be set", env_keys::CONTROLLER_ID))?;

        let http_port = match env::var(env_keys::HTTP_PORT) {
            Ok(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("{} is not a valid port", env_keys::HTTP_PORT))?,
            Err(_) => defaults::HTTP_PORT,
        };

        let accept_invalid_certs = env::var(env_keys::ACCEPT_INVALID_CERTS)
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let log_level = env::var(env_keys::LOG_LEVEL)
            .map(|v| LogLevel::from_str_or_default(&v))
            .unwrap_or_default();
        let log_format = match env::var(env_keys::LOG_FORMAT).as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            controller_url,
            client_id,
            client_secret,
            controller_id,
            http_port,
            accept_invalid_certs,
            log_level,
            log_format,
        })
    }
}
