//! Entry point for the ROI engine binary.
//!
//! Running this binary starts an HTTP server exposing the calculation
//! API.  Settings come from the environment: `ROI_BIND_ADDR`,
//! `ROI_COUNTRY_TABLE` (a JSON rate table; the built-in table is used
//! when unset), `ROI_AGENT_HOURS_PER_MONTH` and `ROI_INCLUDE_BREAKDOWN`.
//! Log verbosity follows `RUST_LOG`.

use roi_engine::api;
use roi_engine::config::ServerConfig;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roi_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("invalid configuration: {:#}", err);
            std::process::exit(1);
        }
    };
    if let Err(err) = api::serve(config).await {
        error!("error running server: {:#}", err);
        std::process::exit(1);
    }
}
