//! Classic preview command.

use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use pozivnica_static::registry::DEFAULT_LAYOUT;

use super::{format_time, Workspace};
use crate::GenerateOptions;

/// Run the preview command.
pub async fn run(config_path: &Path, slug: &str, options: GenerateOptions) -> Result<()> {
    let ws = Workspace::load(config_path, &options)?;
    let data = ws.wedding(slug, &options)?;

    tracing::info!("Generating preview for {}", slug);
    let result = ws
        .builder
        .build_preview(DEFAULT_LAYOUT, slug, &data, Utc::now())?;

    tracing::info!(
        "Built {} pages in {}ms",
        result.pages,
        result.duration_ms
    );
    println!("Preview URL: {}", ws.local_url(&result.output_dir));
    if let Some(expires_at) = result.expires_at {
        println!("Expires: {}", format_time(expires_at));
    }

    Ok(())
}
