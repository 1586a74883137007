use anyhow::Context;
use archmetrics_api::{logging, Server};
use archmetrics_core::ConfigManager;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match std::env::var("ARCHMETRICS_CONFIG") {
        Ok(path) => ConfigManager::load_from_path(path.as_ref())
            .with_context(|| format!("loading config from {}", path))?,
        Err(_) => ConfigManager::load().context("loading configuration")?,
    };

    logging::init_tracing(&config.config().logging)?;

    let server = Server::new(&config)?;
    tracing::debug!(addr = %server.addr(), "listen address resolved");
    server.run().await?;
    Ok(())
}
