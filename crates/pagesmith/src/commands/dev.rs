//! Development server command.

use anyhow::Result;
use pagesmith_server::DevServer;

use super::{pipeline, Overrides};

/// Run the dev server until interrupted.
pub async fn run(overrides: &Overrides, port: Option<u16>, open: bool) -> Result<()> {
    let file = overrides.resolve()?;
    let pipeline = pipeline(&file)?;

    let mut config = file.server.to_dev_config();
    if let Some(port) = port {
        config.port = port;
    }
    config.open = config.open && open;

    tracing::info!("Starting development server on port {}", config.port);

    DevServer::new(config, pipeline).start().await?;

    Ok(())
}
