//! HTML escaping and the raw-key allow-list.

use std::collections::BTreeSet;

/// Keys whose values are trusted HTML and are substituted without escaping.
pub const DEFAULT_RAW_KEYS: &[&str] = &[
    "THEME_CSS",
    "ANIMATIONS_CSS",
    "THEME_FONTS",
    "INLINE_SCRIPT",
    "MEAL_OPTIONS",
    "TIMELINE_ITEMS",
    "GALLERY_ITEMS",
    "DRESS_CODE_COLOR_SWATCHES",
    "CALENDAR_BUTTONS",
];

/// Escape HTML special characters, including both quote styles so the result
/// is safe in body text and in quoted attributes.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Allow-list of keys that bypass escaping.
///
/// Everything not listed here is escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawKeys {
    keys: BTreeSet<String>,
}

impl RawKeys {
    /// An empty allow-list: every value is escaped.
    pub fn none() -> Self {
        Self {
            keys: BTreeSet::new(),
        }
    }

    /// Add a key to the allow-list.
    pub fn allow(mut self, key: impl Into<String>) -> Self {
        self.keys.insert(key.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>) {
        self.keys.insert(key.into());
    }

    /// Whether the key's value is substituted verbatim.
    pub fn is_raw(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

impl Default for RawKeys {
    fn default() -> Self {
        DEFAULT_RAW_KEYS.iter().copied().collect()
    }
}

impl<'a> FromIterator<&'a str> for RawKeys {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(str::to_string).collect(),
        }
    }
}
