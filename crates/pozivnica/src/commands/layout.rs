//! Layout preview command.

use std::path::Path;

use anyhow::{bail, Result};
use chrono::Utc;
use pozivnica_static::LayoutRegistry;

use super::{format_time, Workspace};
use crate::config::load_config;
use crate::GenerateOptions;

const DEFAULT_SLUG: &str = "demo";

/// What the layout command should do.
#[derive(Debug)]
pub enum Target {
    List,
    All { slug: Option<String> },
    One { name: Option<String>, slug: Option<String> },
}

/// Run the layout command.
pub async fn run(config_path: &Path, target: Target, options: GenerateOptions) -> Result<()> {
    match target {
        Target::List => {
            let config = load_config(config_path)?;
            print!("{}", list(&config.registry()));
            Ok(())
        }
        Target::One { name: None, .. } => {
            bail!("Name a layout, or use --all or --list")
        }
        Target::One {
            name: Some(name),
            slug,
        } => {
            let ws = Workspace::load(config_path, &options)?;
            let slug = slug.as_deref().unwrap_or(DEFAULT_SLUG);
            generate(&ws, &name, slug, &options)
        }
        Target::All { slug } => {
            let ws = Workspace::load(config_path, &options)?;
            let slug = slug.as_deref().unwrap_or(DEFAULT_SLUG);
            let names: Vec<String> = ws
                .builder
                .registry()
                .iter()
                .filter(|layout| layout.suffix_output)
                .map(|layout| layout.name.clone())
                .collect();

            let mut failed = Vec::new();
            for name in &names {
                if let Err(e) = generate(&ws, name, slug, &options) {
                    tracing::error!("{}: {:#}", name, e);
                    failed.push(name.as_str());
                }
            }

            println!(
                "Generated {} of {} layouts",
                names.len() - failed.len(),
                names.len()
            );
            if !failed.is_empty() {
                bail!("Failed layouts: {}", failed.join(", "));
            }
            Ok(())
        }
    }
}

fn generate(ws: &Workspace, name: &str, slug: &str, options: &GenerateOptions) -> Result<()> {
    let layout = ws.builder.layout(name)?;
    let data = ws.wedding(slug, options)?;

    tracing::info!("Generating {} preview for {}", layout.display_name, slug);
    let result = ws.builder.build_preview(name, slug, &data, Utc::now())?;

    println!("{}: {}", name, ws.local_url(&result.output_dir));
    if let Some(expires_at) = result.expires_at {
        println!("  Expires: {}", format_time(expires_at));
    }
    Ok(())
}

/// One line per layout with its themes.
pub fn list(registry: &LayoutRegistry) -> String {
    let width = registry.names().iter().map(|n| n.len()).max().unwrap_or(0);

    let mut out = String::from("Available layouts:\n");
    for layout in registry.iter() {
        out.push_str(&format!(
            "  {:width$}  {} {} [{}]\n",
            layout.name,
            layout.emoji,
            layout.display_name,
            layout.theme_ids().join(", "),
        ));
    }
    out
}
