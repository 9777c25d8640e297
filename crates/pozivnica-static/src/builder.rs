//! Invitation builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use pozivnica_lifecycle::{remove_artifact, ArtifactRecord, RecordError};
use pozivnica_template::{html_escape, Renderer, TemplateError};

use crate::assets::{AssetPipeline, LayoutAssets};
use crate::mapping::{prepare, PageContext};
use crate::registry::{ExpiryKind, LayoutConfig, LayoutRegistry, ThemeConfig};
use crate::templates::{SelectorPage, TemplateEngine};
use crate::wedding::{validate_slug, DataError, WeddingData};

const SITE_INFO_FILE: &str = "site-info.json";

/// Deployment settings substituted into every page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSettings {
    /// Public domain of the final sites
    pub domain: String,

    /// IANA zone the wedding times are given in
    pub timezone: String,

    pub rsvp_script_url: String,

    pub rsvp_count_script_url: String,

    /// Endpoint receiving the theme chosen on a selector page
    pub theme_selection_url: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            domain: "pozivnice.rs".to_string(),
            timezone: "Europe/Belgrade".to_string(),
            rsvp_script_url: String::new(),
            rsvp_count_script_url: String::new(),
            theme_selection_url: String::new(),
        }
    }
}

/// Configuration for building invitations.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Template and stylesheet directory
    pub templates_dir: PathBuf,

    /// Root of preview artifacts
    pub preview_dir: PathBuf,

    /// Root of final sites
    pub site_dir: PathBuf,

    /// Lifetime of previews of hour-based layouts
    pub preview_ttl: Duration,

    /// Lifetime of previews of day-based layouts
    pub layout_ttl: Duration,

    pub site: SiteSettings,

    /// Minify stylesheets
    pub minify: bool,
}

impl BuildConfig {
    /// Preview lifetime for a layout's expiry kind.
    pub fn ttl_for(&self, kind: ExpiryKind) -> Duration {
        match kind {
            ExpiryKind::Hours => self.preview_ttl,
            ExpiryKind::Days => self.layout_ttl,
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("templates"),
            preview_dir: PathBuf::from("public/preview"),
            site_dir: PathBuf::from("public/site"),
            preview_ttl: Duration::hours(24),
            layout_ttl: Duration::days(30),
            site: SiteSettings::default(),
            minify: false,
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    pub slug: String,

    /// Published artifact directory
    pub output_dir: PathBuf,

    /// Number of pages rendered
    pub pages: usize,

    /// Expiry of a preview, `None` for final sites
    pub expires_at: Option<DateTime<Utc>>,

    /// Total build time in milliseconds
    pub duration_ms: u64,
}

/// Metadata written next to a final site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteInfo {
    pub slug: String,
    pub bride_name: String,
    pub groom_name: String,
    pub layout: String,
    pub theme: String,
    pub generated_at: DateTime<Utc>,
    pub wedding_date: String,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing template asset: {}", .0.display())]
    MissingTemplateAsset(PathBuf),

    #[error("Failed to read template asset: {0}")]
    ReadError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("Unknown layout: {name}. Available layouts: {available}")]
    UnknownLayout { name: String, available: String },

    #[error("Invalid theme {theme} for layout {layout}. Available themes: {available}")]
    UnknownTheme {
        theme: String,
        layout: String,
        available: String,
    },

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

/// Builds previews and final sites.
pub struct InvitationBuilder {
    config: BuildConfig,
    registry: LayoutRegistry,
    renderer: Renderer,
    templates: TemplateEngine,
}

impl InvitationBuilder {
    pub fn new(config: BuildConfig, registry: LayoutRegistry) -> Self {
        Self {
            config,
            registry,
            renderer: Renderer::new(),
            templates: TemplateEngine::new(),
        }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn registry(&self) -> &LayoutRegistry {
        &self.registry
    }

    /// Look up a layout by name.
    pub fn layout(&self, name: &str) -> Result<&LayoutConfig, BuildError> {
        self.registry
            .get(name)
            .ok_or_else(|| BuildError::UnknownLayout {
                name: name.to_string(),
                available: self.registry.names().join(", "),
            })
    }

    /// Render every theme of a layout, the selector page, the calendar file
    /// and the expiry record, and publish them as `<preview_dir>/<output name>`.
    ///
    /// Data and assets are checked before anything is written, and an
    /// existing preview for the same slug is replaced as a whole.
    pub fn build_preview(
        &self,
        layout: &str,
        slug: &str,
        data: &WeddingData,
        now: DateTime<Utc>,
    ) -> Result<BuildResult, BuildError> {
        let start = Instant::now();
        let layout = self.layout(layout)?;
        validate_slug(slug)?;
        let date = data.validate()?;
        let assets = LayoutAssets::load(&self.config.templates_dir, layout, self.config.minify)?;

        let ctx = PageContext {
            data,
            date,
            slug,
            layout,
            site: &self.config.site,
            now,
        };

        let mut files: Vec<(String, String)> = layout
            .themes
            .par_iter()
            .map(|theme| (format!("{}.html", theme.id), self.render_page(&ctx, &assets, theme)))
            .collect();
        let pages = files.len();

        let mut record = ArtifactRecord::create(slug, now, self.config.ttl_for(layout.expiry))?
            .with_names(data.bride_name.as_str(), data.groom_name.as_str())
            .with_themes(layout.theme_ids());
        if layout.suffix_output {
            record = record.with_layout(layout.name.as_str());
        }
        let expires_at = record.expires_at;

        let selector = SelectorPage {
            slug: slug.to_string(),
            bride_name: data.bride_name.clone(),
            groom_name: data.groom_name.clone(),
            layout: layout.name.clone(),
            layout_name: layout.display_name.clone(),
            layout_description: layout.description.clone(),
            emoji: layout.emoji.clone(),
            css_vars: layout.css_vars.clone(),
            expires_at: expires_at
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
                .unwrap_or_default(),
            endpoint: self.config.site.theme_selection_url.clone(),
            themes: SelectorPage::cards(layout),
        };
        let index = self
            .templates
            .render_selector(&selector)
            .map_err(|e| BuildError::RenderError(e.to_string()))?;
        files.push(("index.html".to_string(), index));
        files.push((ctx.ics_filename(), ctx.ics()));

        let output_dir = publish(
            &self.config.preview_dir,
            &layout.output_name(slug),
            &files,
            Some(&record),
        )?;

        tracing::info!(
            "Generated {} {} themes in {}",
            pages,
            layout.name,
            output_dir.display()
        );

        Ok(BuildResult {
            slug: slug.to_string(),
            output_dir,
            pages,
            expires_at,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Render the chosen theme as `<site_dir>/<slug>/index.html` with a
    /// `site-info.json` and the calendar file.
    pub fn build_final(
        &self,
        layout: &str,
        theme: &str,
        slug: &str,
        data: &WeddingData,
        now: DateTime<Utc>,
    ) -> Result<BuildResult, BuildError> {
        let start = Instant::now();
        let layout = self.layout(layout)?;
        let theme_config = layout.theme(theme).ok_or_else(|| BuildError::UnknownTheme {
            theme: theme.to_string(),
            layout: layout.name.clone(),
            available: layout.theme_ids().join(", "),
        })?;
        validate_slug(slug)?;
        let date = data.validate()?;
        let assets = LayoutAssets::load(&self.config.templates_dir, layout, self.config.minify)?;

        let ctx = PageContext {
            data,
            date,
            slug,
            layout,
            site: &self.config.site,
            now,
        };

        let info = SiteInfo {
            slug: slug.to_string(),
            bride_name: data.bride_name.clone(),
            groom_name: data.groom_name.clone(),
            layout: layout.name.clone(),
            theme: theme.to_string(),
            generated_at: now,
            wedding_date: data.wedding_date.clone(),
        };
        let info_json = serde_json::to_string_pretty(&info)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let files = vec![
            ("index.html".to_string(), self.render_page(&ctx, &assets, theme_config)),
            (SITE_INFO_FILE.to_string(), info_json),
            (ctx.ics_filename(), ctx.ics()),
        ];
        let output_dir = publish(&self.config.site_dir, slug, &files, None)?;

        tracing::info!("Generated final site in {}", output_dir.display());

        Ok(BuildResult {
            slug: slug.to_string(),
            output_dir,
            pages: 1,
            expires_at: None,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Delete the preview of `slug` for a layout. Returns whether one existed.
    pub fn remove_preview(&self, layout: &str, slug: &str) -> Result<bool, BuildError> {
        let layout = self.layout(layout)?;
        validate_slug(slug)?;

        let name = layout.output_name(slug);
        if !self.config.preview_dir.join(&name).is_dir() {
            return Ok(false);
        }
        remove_artifact(&self.config.preview_dir, &name)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;
        tracing::info!("Removed preview {}", name);
        Ok(true)
    }

    fn render_page(&self, ctx: &PageContext<'_>, assets: &LayoutAssets, theme: &ThemeConfig) -> String {
        let mut data = prepare(ctx, theme);

        let theme_css = assets
            .theme_css
            .get(&theme.id)
            .map(String::as_str)
            .unwrap_or_default();
        data.insert("THEME_CSS", AssetPipeline::style_block(theme_css));

        let shared = if assets.shared_css.is_empty() {
            String::new()
        } else {
            AssetPipeline::style_block(&assets.shared_css)
        };
        data.insert("ANIMATIONS_CSS", shared);

        let script = assets.render_script(&data);
        data.insert("INLINE_SCRIPT", script);

        let html = self.renderer.render(&assets.base, &data);
        if ctx.layout.body_theme_class {
            html.replacen(
                "<body>",
                &format!("<body class=\"theme-{}\">", html_escape(&theme.id)),
                1,
            )
        } else {
            html
        }
    }
}

/// Write `files` into a hidden staging directory under `root` and move it
/// into place as `root/dir_name`, replacing any previous artifact.
fn publish(
    root: &Path,
    dir_name: &str,
    files: &[(String, String)],
    record: Option<&ArtifactRecord>,
) -> Result<PathBuf, BuildError> {
    fs::create_dir_all(root).map_err(|e| BuildError::WriteError(e.to_string()))?;

    let staging = tempfile::Builder::new()
        .prefix(&format!(".{dir_name}.staging-"))
        .tempdir_in(root)
        .map_err(|e| BuildError::WriteError(e.to_string()))?;

    for (name, content) in files {
        fs::write(staging.path().join(name), content)
            .map_err(|e| BuildError::WriteError(format!("{}: {}", name, e)))?;
    }
    if let Some(record) = record {
        record.save(staging.path())?;
    }

    let target = root.join(dir_name);
    if target.exists() {
        remove_artifact(root, dir_name).map_err(|e| BuildError::WriteError(e.to_string()))?;
    }
    fs::rename(staging.path(), &target)
        .map_err(|e| BuildError::WriteError(format!("{}: {}", target.display(), e)))?;

    // The staging path no longer exists, so dropping it is a no-op.
    drop(staging);
    Ok(target)
}
