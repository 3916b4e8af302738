//! Watchtower Metrics Relay
//!
//! Reads `WATCHTOWER_API_ADDRESS` and `WATCHTOWER_API_TOKEN`, then serves
//! `/health` and `/v1/metrics` on port 8080.

use anyhow::Result;
use std::process;
use tracing::error;
use watchtower_relay::{serve, telemetry, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            println!("Error: {}", e);
            process::exit(1);
        }
    };

    // A bind failure ends the process without forcing a non-zero exit.
    if let Err(e) = serve(AppState::new(config)).await {
        error!("Error starting server: {}", e);
        println!("Error starting server: {}", e);
    }

    Ok(())
}
