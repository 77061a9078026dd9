use std::process::ExitCode;

use phonebook::{open_store, start_server, Config};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    info!(store = %config.store, "Connecting to contact store");
    let store = match open_store(&config.store) {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "Error connecting to contact store");
            return ExitCode::FAILURE;
        }
    };
    match store.count() {
        Ok(count) => info!(count, "Connected to contact store"),
        Err(e) => error!(error = %e, "Error counting contacts"),
    }

    if let Err(e) = start_server(&config, store).await {
        error!(error = %e, "Server error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
