// ABOUTME: Gateway server binary
// ABOUTME: Loads configuration, wires the vendor client, and serves the web API
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use sdn_gateway::auth::OAuthCredentials;
use sdn_gateway::client::VendorClient;
use sdn_gateway::config::{GatewayConfig, LogLevel};
use sdn_gateway::constants::defaults;
use sdn_gateway::logging;
use sdn_gateway::routes::{GatewayRoutes, GatewayState};
use sdn_gateway::session_store::SessionStore;

#[derive(Debug, Parser)]
#[command(
    name = "sdn-gateway",
    about = "Session-scoped gateway for an SDN controller's OpenAPI"
)]
struct Args {
    /// Override the HTTP listen port from the environment
    #[arg(long)]
    port: Option<u16>,

    /// Override the log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = GatewayConfig::from_env()?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    if let Some(level) = args.log_level.as_deref() {
        config.log_level = LogLevel::from_str_or_default(level);
    }
    logging::init(&config)?;

    info!(
        controller = %config.controller_url,
        port = config.http_port,
        "starting sdn gateway"
    );

    let client = VendorClient::new(&config)?;
    let state = Arc::new(GatewayState {
        client,
        credentials: OAuthCredentials {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        },
        sessions: SessionStore::new(defaults::SESSION_TTL_HOURS),
    });

    let app = GatewayRoutes::router(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.http_port)).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
