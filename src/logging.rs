// ABOUTME: Structured logging setup for the gateway process
// ABOUTME: EnvFilter-driven tracing with pretty or JSON output
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Logging initialization. `RUST_LOG` overrides the configured level.

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{GatewayConfig, LogFormat};

/// Initialize the global tracing subscriber. Call once at startup.
pub fn init(config: &GatewayConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()?,
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .try_init()?,
    }
    Ok(())
}
