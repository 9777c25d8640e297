//! Final site command.

use std::path::Path;

use anyhow::Result;
use chrono::Utc;

use super::Workspace;
use crate::GenerateOptions;

/// Run the final command.
pub async fn run(
    config_path: &Path,
    slug: &str,
    theme: &str,
    layout: &str,
    cleanup: bool,
    options: GenerateOptions,
) -> Result<()> {
    let ws = Workspace::load(config_path, &options)?;
    let data = ws.wedding(slug, &options)?;

    tracing::info!("Generating final site for {} with {} theme", slug, theme);
    let result = ws
        .builder
        .build_final(layout, theme, slug, &data, Utc::now())?;

    if cleanup && ws.builder.remove_preview(layout, slug)? {
        tracing::info!("Deleted preview of {}", slug);
    }

    println!("Site URL: https://{}/{}/", ws.config.site.domain, slug);
    println!("Local: {}", ws.local_url(&result.output_dir));

    Ok(())
}
