mod agent;
mod config;

use anyhow::{Context, Result};
use arrowhead_client::ArrowheadClient;
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("arrowhead_providerd=info,arrowhead_client=info")
            }),
        )
        .init();

    tracing::info!("Starting arrowhead-providerd");

    // Load config
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/etc/arrowhead/providerd.toml".to_string());

    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path))?;

    tracing::info!("Loaded config from {}", config_path);

    let system = config.system.to_system()?;
    let mut client = ArrowheadClient::pkcs12_with_timeout(
        system,
        &config.certificates,
        config.core.clone(),
        config.timeout(),
    )
    .context("Failed to set up Core connector")?;

    tracing::info!(
        "System {} at {}:{}",
        client.system().name,
        client.system().address,
        client.system().port
    );

    let registered = agent::register_all(&mut client, &config.services).await;
    agent::discover_all(&client, &config.consume).await;

    // Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;

    tracing::info!("Shutdown signal received");

    agent::unregister_all(&client, &registered).await;

    tracing::info!("Shutdown complete");
    Ok(())
}
