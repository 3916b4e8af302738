use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// JSON logs, level taken from `RUST_LOG` (default `info`).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .json()
        .init();
}
