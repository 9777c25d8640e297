//! Two-phase rendering: conditional blocks, then placeholders.

use regex::Captures;

use crate::data::{TemplateData, TemplateValue};
use crate::escape::{html_escape, RawKeys};
use crate::template::{Template, TemplateError, PLACEHOLDER_RE};

const OPEN_PREFIX: &str = "{{#IF_";

/// Whether a value keeps its conditional block.
///
/// Absent, null, empty, `"false"` and `"0"` are falsy. The string `"0"` being
/// falsy is kept for compatibility with existing templates and data; a meal
/// option or count of `"0"` will hide its section.
pub fn is_truthy(value: Option<&TemplateValue>) -> bool {
    match value {
        Some(TemplateValue::Text(s)) => !s.is_empty() && s != "false" && s != "0",
        Some(TemplateValue::Flag(flag)) => *flag,
        Some(TemplateValue::Null) | None => false,
    }
}

/// Resolve every `{{#IF_X}}...{{/IF_X}}` block against `data`.
///
/// Truthy blocks are replaced by their body, falsy ones are removed with
/// their markers. Blocks nested inside a kept body are resolved as well.
/// Placeholders are left untouched.
pub fn render_conditionals(template: &str, data: &TemplateData) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(OPEN_PREFIX) {
        let after_prefix = pos + OPEN_PREFIX.len();
        let Some(name) = marker_name(&rest[after_prefix..]) else {
            out.push_str(&rest[..after_prefix]);
            rest = &rest[after_prefix..];
            continue;
        };

        let body_start = after_prefix + name.len() + 2;
        let close = format!("{{{{/IF_{name}}}}}");

        let Some(body_len) = rest[body_start..].find(&close) else {
            // Unclosed blocks are rejected by `Template::parse`; a raw string
            // that still has one keeps it verbatim.
            out.push_str(&rest[..body_start]);
            rest = &rest[body_start..];
            continue;
        };

        out.push_str(&rest[..pos]);
        if is_truthy(data.get(name)) {
            let body = &rest[body_start..body_start + body_len];
            out.push_str(&render_conditionals(body, data));
        }
        rest = &rest[body_start + body_len + close.len()..];
    }

    out.push_str(rest);
    out
}

/// Substitute every known `{{KEY}}` in a single pass.
///
/// Inserted text is never scanned again, so a value containing `{{OTHER}}`
/// stays literal. Values are escaped unless their key is in `raw_keys`.
/// Unknown placeholders are left as they are.
pub fn render_placeholders(template: &str, data: &TemplateData, raw_keys: &RawKeys) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures<'_>| {
            let key = &caps[1];
            match data.get(key) {
                Some(value) if raw_keys.is_raw(key) => value.as_text().to_string(),
                Some(value) => html_escape(value.as_text()),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Name of a conditional marker, given the text right after `{{#IF_`.
fn marker_name(s: &str) -> Option<&str> {
    let end = s
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(s.len());
    if end == 0 || !s[end..].starts_with("}}") {
        return None;
    }
    Some(&s[..end])
}

/// Renders templates with a fixed raw-key allow-list.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    raw_keys: RawKeys,
}

impl Renderer {
    /// Create a renderer with the default raw-key allow-list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer with a custom allow-list.
    pub fn with_raw_keys(raw_keys: RawKeys) -> Self {
        Self { raw_keys }
    }

    pub fn raw_keys(&self) -> &RawKeys {
        &self.raw_keys
    }

    /// Render a validated template.
    pub fn render(&self, template: &Template, data: &TemplateData) -> String {
        self.render_unchecked(template.source(), data)
    }

    /// Validate `source` and render it.
    pub fn render_str(
        &self,
        name: &str,
        source: &str,
        data: &TemplateData,
    ) -> Result<String, TemplateError> {
        let template = Template::parse(name, source)?;
        Ok(self.render(&template, data))
    }

    fn render_unchecked(&self, source: &str, data: &TemplateData) -> String {
        let resolved = render_conditionals(source, data);
        render_placeholders(&resolved, data, &self.raw_keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const GREETING: &str = "Hello {{NAME}}, {{#IF_VIP}}VIP access{{/IF_VIP}}";

    fn render(source: &str, data: &TemplateData) -> String {
        Renderer::new().render_str("test", source, data).unwrap()
    }

    #[test]
    fn greeting_with_truthy_flag() {
        let data = TemplateData::new().with("NAME", "Ana").with("VIP", "yes");
        assert_eq!(render(GREETING, &data), "Hello Ana, VIP access");
    }

    #[test]
    fn greeting_with_empty_flag() {
        let data = TemplateData::new().with("NAME", "Ana").with("VIP", "");
        assert_eq!(render(GREETING, &data), "Hello Ana, ");
    }

    #[test]
    fn falsy_values_drop_block_and_markers() {
        let source = "[{{#IF_X}}body{{/IF_X}}]";
        let falsy = [
            TemplateData::new().with("X", ""),
            TemplateData::new().with("X", "false"),
            TemplateData::new().with("X", "0"),
            TemplateData::new().with("X", false),
            TemplateData::new().with("X", None::<String>),
            TemplateData::new(),
        ];

        for data in &falsy {
            let out = render(source, data);
            assert_eq!(out, "[]", "data: {data:?}");
        }
    }

    #[test]
    fn truthy_values_keep_exactly_the_body() {
        let source = "[{{#IF_X}}body{{/IF_X}}]";
        for value in ["true", "yes", "1", "00", "False", " ", "ne"] {
            let data = TemplateData::new().with("X", value);
            assert_eq!(render(source, &data), "[body]", "value: {value:?}");
        }
        assert_eq!(render(source, &TemplateData::new().with("X", true)), "[body]");
    }

    #[test]
    fn resolves_nested_blocks_inside_kept_body() {
        let source = "{{#IF_STORY}}<p>story</p>{{#IF_STORY_PHOTO}}<img>{{/IF_STORY_PHOTO}}{{/IF_STORY}}";
        let with_photo = TemplateData::new().with("STORY", "x").with("STORY_PHOTO", "y");
        let without_photo = TemplateData::new().with("STORY", "x");

        assert_eq!(render(source, &with_photo), "<p>story</p><img>");
        assert_eq!(render(source, &without_photo), "<p>story</p>");
        assert_eq!(render(source, &TemplateData::new()), "");
    }

    #[test]
    fn repeated_blocks_are_each_resolved() {
        let source = "{{#IF_A}}1{{/IF_A}}-{{#IF_B}}2{{/IF_B}}-{{#IF_A}}3{{/IF_A}}";
        let data = TemplateData::new().with("A", "on");
        assert_eq!(render(source, &data), "1--3");
    }

    #[test]
    fn conditional_pass_keeps_placeholders() {
        let data = TemplateData::new().with("X", "on").with("NAME", "Ana");
        assert_eq!(
            render_conditionals("{{#IF_X}}{{NAME}}{{/IF_X}}", &data),
            "{{NAME}}"
        );
    }

    #[test]
    fn escapes_values_under_non_raw_keys() {
        let data = TemplateData::new().with("BRIDE_NAME", r#"<script>alert("x")</script> & co"#);
        let out = render("<h1>{{BRIDE_NAME}}</h1>", &data);

        assert_eq!(
            out,
            "<h1>&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; co</h1>"
        );
        assert!(!out.contains("<script>"));
    }

    #[test]
    fn escapes_values_in_attributes() {
        let data = TemplateData::new().with("CEREMONY_MAP_URL", r#"x" onmouseover="alert(1)"#);
        let out = render(r#"<a href="{{CEREMONY_MAP_URL}}">"#, &data);

        assert_eq!(out, r#"<a href="x&quot; onmouseover=&quot;alert(1)">"#);
    }

    #[test]
    fn raw_keys_are_inserted_verbatim() {
        let data = TemplateData::new().with("MEAL_OPTIONS", r#"<option value="fish">Riba</option>"#);
        assert_eq!(
            render("<select>{{MEAL_OPTIONS}}</select>", &data),
            r#"<select><option value="fish">Riba</option></select>"#
        );
    }

    #[test]
    fn substitution_is_single_pass() {
        let data = TemplateData::new()
            .with("A", "{{B}}")
            .with("B", "boom")
            .with("C", "{{A}}");
        let renderer = Renderer::with_raw_keys(RawKeys::none().allow("C"));

        let out = renderer.render_str("t", "{{A}}|{{B}}|{{C}}", &data).unwrap();

        assert_eq!(out, "{{B}}|boom|{{A}}");
    }

    #[test]
    fn unknown_placeholders_stay_literal() {
        let data = TemplateData::new().with("NAME", "Ana");
        assert_eq!(render("{{NAME}} {{MISSING}}", &data), "Ana {{MISSING}}");
    }

    #[test]
    fn flags_render_as_empty_text() {
        let data = TemplateData::new().with("GALLERY", true);
        assert_eq!(render("[{{GALLERY}}]", &data), "[]");
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let source = "<h1>{{BRIDE_NAME}} &amp; {{GROOM_NAME}}</h1>{{#IF_HASHTAG}}<p>#{{WEDDING_HASHTAG}}</p>{{/IF_HASHTAG}}{{#IF_MUSIC}}x{{/IF_MUSIC}}";
        let data = TemplateData::new()
            .with("BRIDE_NAME", "Ана <3")
            .with("GROOM_NAME", "Марко & syn")
            .with("HASHTAG", "true")
            .with("WEDDING_HASHTAG", "AnaIMarko2025");

        let once = render(source, &data);
        let twice = render(&once, &data);

        assert_eq!(once, twice);
    }

    #[test]
    fn malformed_markers_are_copied_through() {
        let data = TemplateData::new().with("X", "on");
        assert_eq!(
            render_conditionals("{{#IF_}} {{#IF_X y}}", &data),
            "{{#IF_}} {{#IF_X y}}"
        );
    }
}
