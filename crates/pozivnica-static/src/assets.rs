//! Template assets: base templates, stylesheets and the client script.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use pozivnica_template::{render_conditionals, render_placeholders, RawKeys, Template, TemplateData};

use crate::builder::BuildError;
use crate::registry::LayoutConfig;

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }

    /// Wrap CSS in a `<style>` element.
    pub fn style_block(css: &str) -> String {
        format!("<style>\n{css}\n</style>")
    }

    /// Escape a value for use inside a JavaScript string literal.
    pub fn js_escape(s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '\'' => out.push_str("\\'"),
                '"' => out.push_str("\\\""),
                '`' => out.push_str("\\`"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '<' => out.push_str("\\u003C"),
                '>' => out.push_str("\\u003E"),
                '\u{2028}' => out.push_str("\\u2028"),
                '\u{2029}' => out.push_str("\\u2029"),
                _ => out.push(c),
            }
        }
        out
    }
}

/// Everything a layout reads from the templates directory.
#[derive(Debug)]
pub struct LayoutAssets {
    /// Validated base template
    pub base: Template,

    /// Shared stylesheets, concatenated
    pub shared_css: String,

    /// Client script source, not yet rendered
    pub script: String,

    /// Stylesheet per theme id
    pub theme_css: BTreeMap<String, String>,
}

impl LayoutAssets {
    /// Read and validate every asset of `layout`.
    ///
    /// Any missing file fails the whole load, before anything is written.
    pub fn load(templates_dir: &Path, layout: &LayoutConfig, minify: bool) -> Result<Self, BuildError> {
        let base_path = templates_dir.join(&layout.base_template);
        let base = Template::parse(
            layout.base_template.display().to_string(),
            read_asset(&base_path)?,
        )?;

        let mut shared = Vec::with_capacity(layout.shared_styles.len());
        for style in &layout.shared_styles {
            shared.push(read_asset(&templates_dir.join(style))?);
        }
        let shared_css = process_css(&shared.join("\n"), minify);

        let script = match &layout.script {
            Some(path) => read_asset(&templates_dir.join(path))?,
            None => String::new(),
        };

        let mut theme_css = BTreeMap::new();
        for theme in &layout.themes {
            let path = templates_dir
                .join(&layout.theme_dir)
                .join(&theme.id)
                .join("style.css");
            theme_css.insert(theme.id.clone(), process_css(&read_asset(&path)?, minify));
        }

        Ok(Self {
            base,
            shared_css,
            script,
            theme_css,
        })
    }

    /// Render the client script with JavaScript-escaped values.
    ///
    /// The result is substituted under a raw key, so it is fully resolved
    /// here and never scanned again.
    pub fn render_script(&self, data: &TemplateData) -> String {
        if self.script.is_empty() {
            return String::new();
        }

        let escaped: TemplateData = data
            .iter()
            .map(|(k, v)| (k.clone(), AssetPipeline::js_escape(v.as_text())))
            .collect();
        let raw: RawKeys = data.iter().map(|(k, _)| k.as_str()).collect();

        let resolved = render_conditionals(&self.script, data);
        render_placeholders(&resolved, &escaped, &raw)
    }
}

fn read_asset(path: &Path) -> Result<String, BuildError> {
    if !path.is_file() {
        return Err(BuildError::MissingTemplateAsset(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(|e| BuildError::ReadError(format!("{}: {}", path.display(), e)))
}

fn process_css(css: &str, minify: bool) -> String {
    if !minify || css.trim().is_empty() {
        return css.to_string();
    }
    match AssetPipeline::minify_css(css) {
        Ok(minified) => minified,
        Err(e) => {
            tracing::warn!("Keeping unminified CSS: {}", e);
            css.to_string()
        }
    }
}
