// ABOUTME: Configuration module for the gateway
// ABOUTME: Re-exports the environment-driven configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration management

pub mod environment;

pub use environment::{GatewayConfig, LogFormat, LogLevel};
