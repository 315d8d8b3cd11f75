use anyhow::{Context, Result};
use ratchet_server::ServerConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment variables
    let config = ServerConfig::load().context("Failed to load configuration")?;

    // Set up logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_filter)
                .context("Invalid log filter")?,
        )
        .init();

    // Run the server using the library's run function
    ratchet_server::run(config).await.context("Server error")?;

    Ok(())
}
