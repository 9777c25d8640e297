//! Configuration file (`pozivnica.toml`) and environment overrides.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Duration;
use serde::Deserialize;

use pozivnica_static::{BuildConfig, LayoutOverride, LayoutRegistry, SiteSettings};

const MAX_EXPIRY_DAYS: i64 = 3650;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub build: BuildSettings,
    /// Overrides of built-in layouts, or new layouts
    #[serde(default)]
    pub layouts: BTreeMap<String, LayoutOverride>,
}

#[derive(Debug, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_templates")]
    pub templates: PathBuf,
    #[serde(default = "default_public")]
    pub public: PathBuf,
    #[serde(default = "default_preview")]
    pub preview: PathBuf,
    #[serde(default = "default_site")]
    pub site: PathBuf,
    #[serde(default = "default_data")]
    pub data: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct PreviewConfig {
    /// Lifetime of classic previews
    #[serde(default = "default_expiry_hours")]
    pub expiry_hours: i64,
    /// Lifetime of layout previews
    #[serde(default = "default_expiry_days")]
    pub expiry_days: i64,
}

#[derive(Debug, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_domain")]
    pub domain: String,
    #[serde(default)]
    pub rsvp_script_url: String,
    #[serde(default)]
    pub rsvp_count_script_url: String,
    #[serde(default)]
    pub theme_selection_url: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct BuildSettings {
    #[serde(default)]
    pub minify: bool,
    /// Use `sample-wedding.json` when a slug has no data
    #[serde(default = "default_sample_fallback")]
    pub sample_fallback: bool,
}

fn default_templates() -> PathBuf {
    PathBuf::from("templates")
}
fn default_public() -> PathBuf {
    PathBuf::from("public")
}
fn default_preview() -> PathBuf {
    PathBuf::from("public/preview")
}
fn default_site() -> PathBuf {
    PathBuf::from("public/site")
}
fn default_data() -> PathBuf {
    PathBuf::from("data")
}
fn default_expiry_hours() -> i64 {
    24
}
fn default_expiry_days() -> i64 {
    30
}
fn default_domain() -> String {
    "pozivnice.rs".to_string()
}
fn default_timezone() -> String {
    "Europe/Belgrade".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_sample_fallback() -> bool {
    true
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            templates: default_templates(),
            public: default_public(),
            preview: default_preview(),
            site: default_site(),
            data: default_data(),
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            expiry_hours: default_expiry_hours(),
            expiry_days: default_expiry_days(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            rsvp_script_url: String::new(),
            rsvp_count_script_url: String::new(),
            theme_selection_url: String::new(),
            timezone: default_timezone(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            minify: false,
            sample_fallback: default_sample_fallback(),
        }
    }
}

/// Load configuration from `path`, apply environment overrides and validate.
///
/// A missing file means defaults; a malformed one is an error.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    let mut config = if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        config
    } else {
        tracing::debug!("No {} found, using defaults", path.display());
        ConfigFile::default()
    };

    config.apply_env(|key| std::env::var(key).ok())?;
    for warning in config.validate()? {
        tracing::warn!("{}", warning);
    }
    Ok(config)
}

impl ConfigFile {
    /// Override settings from environment variables, looked up through `var`.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        let text = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = text("RSVP_SCRIPT_URL") {
            self.site.rsvp_script_url = v;
        }
        if let Some(v) = text("RSVP_COUNT_SCRIPT_URL") {
            self.site.rsvp_count_script_url = v;
        }
        if let Some(v) = text("THEME_SELECTION_URL") {
            self.site.theme_selection_url = v;
        }
        if let Some(v) = text("DOMAIN") {
            self.site.domain = v;
        }
        if let Some(v) = text("PREVIEW_EXPIRY_HOURS") {
            self.preview.expiry_hours = v
                .trim()
                .parse()
                .with_context(|| format!("PREVIEW_EXPIRY_HOURS is not a number: {v}"))?;
        }
        if let Some(v) = text("PREVIEW_EXPIRY_DAYS") {
            self.preview.expiry_days = v
                .trim()
                .parse()
                .with_context(|| format!("PREVIEW_EXPIRY_DAYS is not a number: {v}"))?;
        }
        Ok(())
    }

    /// Check settings, returning warnings for the ones that are usable but
    /// probably unintended.
    pub fn validate(&self) -> Result<Vec<String>> {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if !(1..=MAX_EXPIRY_DAYS * 24).contains(&self.preview.expiry_hours) {
            errors.push(format!(
                "preview.expiry_hours must be between 1 and {}",
                MAX_EXPIRY_DAYS * 24
            ));
        }
        if !(1..=MAX_EXPIRY_DAYS).contains(&self.preview.expiry_days) {
            errors.push(format!(
                "preview.expiry_days must be between 1 and {MAX_EXPIRY_DAYS}"
            ));
        }
        if self.server.port == 0 {
            errors.push("server.port must not be 0".to_string());
        }
        if self.site.domain.trim().is_empty() {
            errors.push("site.domain must not be empty".to_string());
        }

        if !errors.is_empty() {
            bail!("Invalid configuration: {}", errors.join("; "));
        }

        if self.site.rsvp_script_url.is_empty() {
            warnings.push("site.rsvp_script_url is not set, RSVP forms will not submit".to_string());
        }
        if self.site.theme_selection_url.is_empty() {
            warnings.push(
                "site.theme_selection_url is not set, theme choices stay in the browser".to_string(),
            );
        }

        Ok(warnings)
    }

    /// Built-in layouts merged with `[layouts.*]`.
    pub fn registry(&self) -> LayoutRegistry {
        let mut registry = LayoutRegistry::builtin();
        for (name, o) in &self.layouts {
            registry.apply_override(name, o.clone());
        }
        registry
    }

    pub fn build_config(&self, minify: bool) -> BuildConfig {
        BuildConfig {
            templates_dir: self.paths.templates.clone(),
            preview_dir: self.paths.preview.clone(),
            site_dir: self.paths.site.clone(),
            preview_ttl: Duration::hours(self.preview.expiry_hours),
            layout_ttl: Duration::days(self.preview.expiry_days),
            site: SiteSettings {
                domain: self.site.domain.clone(),
                timezone: self.site.timezone.clone(),
                rsvp_script_url: self.site.rsvp_script_url.clone(),
                rsvp_count_script_url: self.site.rsvp_count_script_url.clone(),
                theme_selection_url: self.site.theme_selection_url.clone(),
            },
            minify: minify || self.build.minify,
        }
    }
}
