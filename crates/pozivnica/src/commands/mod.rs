//! CLI command implementations.

pub mod cleanup;
pub mod finalize;
pub mod init;
pub mod layout;
pub mod preview;
pub mod serve;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use pozivnica_static::{load_wedding, validate_slug, InvitationBuilder, WeddingData};

use crate::config::{load_config, ConfigFile};
use crate::GenerateOptions;

/// Loaded configuration and a builder made from it.
pub(crate) struct Workspace {
    pub config: ConfigFile,
    pub builder: InvitationBuilder,
}

impl Workspace {
    pub fn load(config_path: &Path, options: &GenerateOptions) -> Result<Self> {
        let config = load_config(config_path)?;
        let builder = InvitationBuilder::new(config.build_config(options.minify), config.registry());
        Ok(Self { config, builder })
    }

    /// Wedding data for `slug`, from `--data` or the data directory.
    pub fn wedding(&self, slug: &str, options: &GenerateOptions) -> Result<WeddingData> {
        validate_slug(slug)?;
        let loaded = load_wedding(
            &self.config.paths.data,
            slug,
            options.data.as_deref(),
            self.config.build.sample_fallback,
        )
        .with_context(|| format!("No wedding data for {slug}"))?;

        tracing::debug!("Loaded wedding data from {}", loaded.origin);
        Ok(loaded.data)
    }

    /// Local URL of a path under the public directory.
    pub fn local_url(&self, dir: &Path) -> String {
        let rel = dir
            .strip_prefix(&self.config.paths.public)
            .unwrap_or(dir)
            .to_string_lossy()
            .replace('\\', "/");
        format!("http://localhost:{}/{}/", self.config.server.port, rel)
    }
}

pub(crate) fn format_time(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M UTC").to_string()
}
