use std::sync::Arc;

use minnowd::config::Config;
use minnowd::handlers::Registry;
use minnowd::network::Gateway;
use minnowd::state::Roster;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration; defaults apply when no path is given
    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path).map_err(|e| {
            error!(path = %path, error = %e, "Failed to load config");
            e
        })?,
        None => Config::default(),
    };
    config.validate()?;

    info!(
        server = %config.server.name,
        listen = %config.listen.address,
        "Starting minnowd"
    );

    let roster = Arc::new(Roster::new(&config));
    let registry = Arc::new(Registry::new());

    let gateway = Gateway::bind(config.listen.address, roster, registry).await?;

    // Run until interrupted. Dropping the gateway stops accepting; sessions
    // already in flight close on their own connections.
    tokio::select! {
        result = gateway.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Received interrupt - shutting down");
        }
    }

    Ok(())
}
