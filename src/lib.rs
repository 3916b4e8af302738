//! Watchtower Metrics Relay
//!
//! Exposes a liveness probe and relays `/v1/metrics` to a single upstream
//! API, injecting the configured `Authorization` header.

pub mod config;
pub mod health;
pub mod relay;
pub mod server;
pub mod telemetry;

pub use config::{Config, ConfigError};
pub use server::{router, serve, AppState};
