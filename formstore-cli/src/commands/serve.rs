use anyhow::Result;
use formstore_core::app::FormstoreServerBuilder;
use formstore_core::logging::init_logging;
use std::path::PathBuf;

pub struct ServeArgs {
    pub config: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database: Option<String>,
}

/// Load configuration, apply CLI overrides, then serve until interrupted.
pub fn run(args: ServeArgs) -> Result<()> {
    let mut config = super::load_config(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(database) = args.database {
        config.storage.database = database;
    }
    config.validate()?;
    init_logging(&config.logging)?;

    super::runtime()?.block_on(async move {
        let server = FormstoreServerBuilder::with_config(config).build().await?;
        tokio::select! {
            result = server.serve() => result,
            _ = tokio::signal::ctrl_c() => {
                log::info!("👋 Shutting down");
                Ok(())
            }
        }
    })
}
