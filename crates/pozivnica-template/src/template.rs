//! Template loading and structural validation.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// Matches `{{#IF_NAME}}` and `{{/IF_NAME}}` markers.
static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([#/])IF_([A-Za-z0-9_]+)\}\}").expect("Invalid conditional marker regex")
});

/// Matches `{{NAME}}` placeholders.
pub(crate) static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").expect("Invalid placeholder regex"));

/// Errors found while validating a template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("{template}:{line}: block `IF_{name}` is never closed")]
    Unclosed {
        template: String,
        name: String,
        line: usize,
    },

    #[error("{template}:{line}: closing `IF_{name}` has no matching opening marker")]
    UnexpectedClose {
        template: String,
        name: String,
        line: usize,
    },

    #[error("{template}:{line}: closing `IF_{found}` while `IF_{expected}` is still open")]
    Mismatched {
        template: String,
        expected: String,
        found: String,
        line: usize,
    },

    #[error("{template}:{line}: block `IF_{name}` is nested inside itself")]
    NestedSameName {
        template: String,
        name: String,
        line: usize,
    },
}

/// A validated template.
///
/// Construction checks that every conditional block is closed, that blocks
/// close in order, and that no block nests inside one of the same name.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    source: String,
    conditionals: BTreeSet<String>,
    placeholders: BTreeSet<String>,
}

impl Template {
    /// Parse and validate a template.
    pub fn parse(name: impl Into<String>, source: impl Into<String>) -> Result<Self, TemplateError> {
        let name = name.into();
        let source = source.into();

        let mut open: Vec<(&str, usize)> = Vec::new();
        let mut conditionals = BTreeSet::new();

        for caps in MARKER_RE.captures_iter(&source) {
            let (Some(whole), Some(block)) = (caps.get(0), caps.get(2)) else {
                continue;
            };
            let block = block.as_str();
            let line = line_of(&source, whole.start());

            if &caps[1] == "#" {
                if open.iter().any(|(n, _)| *n == block) {
                    return Err(TemplateError::NestedSameName {
                        template: name,
                        name: block.to_string(),
                        line,
                    });
                }
                open.push((block, line));
                conditionals.insert(block.to_string());
                continue;
            }

            match open.last() {
                Some(&(top, _)) if top == block => {
                    open.pop();
                }
                Some(&(top, _)) => {
                    return Err(TemplateError::Mismatched {
                        template: name,
                        expected: top.to_string(),
                        found: block.to_string(),
                        line,
                    });
                }
                None => {
                    return Err(TemplateError::UnexpectedClose {
                        template: name,
                        name: block.to_string(),
                        line,
                    });
                }
            }
        }

        if let Some(&(block, line)) = open.last() {
            return Err(TemplateError::Unclosed {
                template: name,
                name: block.to_string(),
                line,
            });
        }

        let placeholders = PLACEHOLDER_RE
            .captures_iter(&source)
            .map(|caps| caps[1].to_string())
            .collect();

        Ok(Self {
            name,
            source,
            conditionals,
            placeholders,
        })
    }

    /// Template name, usually its path relative to the templates directory.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Names used by conditional blocks, without the `IF_` prefix.
    pub fn conditionals(&self) -> impl Iterator<Item = &str> {
        self.conditionals.iter().map(String::as_str)
    }

    /// Names used by placeholders.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.placeholders.iter().map(String::as_str)
    }
}

fn line_of(source: &str, offset: usize) -> usize {
    source[..offset].matches('\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_nested_blocks_with_different_names() {
        let tmpl = Template::parse(
            "base.html",
            "{{#IF_STORY}}<p>{{STORY_TEXT}}</p>{{#IF_STORY_PHOTO}}<img>{{/IF_STORY_PHOTO}}{{/IF_STORY}}",
        )
        .unwrap();

        assert_eq!(tmpl.conditionals().collect::<Vec<_>>(), ["STORY", "STORY_PHOTO"]);
        assert_eq!(tmpl.placeholders().collect::<Vec<_>>(), ["STORY_TEXT"]);
    }

    #[test]
    fn rejects_unclosed_block() {
        let err = Template::parse("base.html", "a\n{{#IF_MUSIC}}<audio>").unwrap_err();

        assert_eq!(
            err,
            TemplateError::Unclosed {
                template: "base.html".to_string(),
                name: "MUSIC".to_string(),
                line: 2,
            }
        );
    }

    #[test]
    fn rejects_stray_close() {
        let err = Template::parse("t", "text{{/IF_GALLERY}}").unwrap_err();
        assert!(matches!(err, TemplateError::UnexpectedClose { .. }));
    }

    #[test]
    fn rejects_interleaved_blocks() {
        let err = Template::parse("t", "{{#IF_A}}{{#IF_B}}{{/IF_A}}{{/IF_B}}").unwrap_err();
        assert!(matches!(err, TemplateError::Mismatched { .. }));
    }

    #[test]
    fn rejects_same_name_nesting() {
        let err = Template::parse("t", "{{#IF_A}}{{#IF_A}}x{{/IF_A}}{{/IF_A}}").unwrap_err();
        assert!(matches!(err, TemplateError::NestedSameName { .. }));
    }

    #[test]
    fn sequential_blocks_of_same_name_are_fine() {
        assert!(Template::parse("t", "{{#IF_A}}1{{/IF_A}} {{#IF_A}}2{{/IF_A}}").is_ok());
    }
}
