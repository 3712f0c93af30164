//! Telemetry initialization: tracing-subscriber with env-filter and console output.
//!
//! Log verbosity is controlled with the standard `RUST_LOG` environment
//! variable (default: `info`). Request-level spans come from the
//! `tower_http::trace::TraceLayer` installed on the router.

use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize the global tracing subscriber.
pub fn init_telemetry() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    info!("Telemetry initialized");

    Ok(())
}
