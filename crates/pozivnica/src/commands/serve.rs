//! Static server command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use pozivnica_server::{ServerConfig, StaticServer};

use crate::config::load_config;

/// Run the serve command.
pub async fn run(config_path: &Path, port: Option<u16>, dir: Option<PathBuf>, open: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let root = dir.unwrap_or(config.paths.public);

    if !root.exists() {
        anyhow::bail!(
            "Directory not found: {}. Run 'pozivnica preview <slug>' first.",
            root.display()
        );
    }

    let config = ServerConfig {
        root,
        port: port.unwrap_or(config.server.port),
        open,
        ..Default::default()
    };

    StaticServer::new(config).start().await?;

    Ok(())
}
