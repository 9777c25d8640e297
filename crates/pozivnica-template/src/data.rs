//! Data mapping consumed by the renderer.

use std::collections::btree_map::{self, BTreeMap};

/// A single value in a [`TemplateData`] mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateValue {
    /// Text substituted into placeholders and evaluated for conditionals
    Text(String),

    /// Flag used only by conditional blocks; renders as nothing
    Flag(bool),

    /// Explicitly empty value
    Null,
}

impl TemplateValue {
    /// The text this value renders as.
    pub fn as_text(&self) -> &str {
        match self {
            TemplateValue::Text(s) => s,
            TemplateValue::Flag(_) | TemplateValue::Null => "",
        }
    }
}

impl From<String> for TemplateValue {
    fn from(value: String) -> Self {
        TemplateValue::Text(value)
    }
}

impl From<&str> for TemplateValue {
    fn from(value: &str) -> Self {
        TemplateValue::Text(value.to_string())
    }
}

impl From<bool> for TemplateValue {
    fn from(value: bool) -> Self {
        TemplateValue::Flag(value)
    }
}

impl<T: Into<TemplateValue>> From<Option<T>> for TemplateValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(TemplateValue::Null)
    }
}

/// Flat key-to-value mapping used to render a template.
///
/// A key holds exactly one value, so a text value and a flag can never share
/// a name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateData {
    values: BTreeMap<String, TemplateValue>,
}

impl TemplateData {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the one it replaced.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<TemplateValue>,
    ) -> Option<TemplateValue> {
        self.values.insert(key.into(), value.into())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<TemplateValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up a value.
    pub fn get(&self, key: &str) -> Option<&TemplateValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Copy every entry of `other` into this mapping, overwriting on conflict.
    pub fn extend(&mut self, other: TemplateData) {
        self.values.extend(other.values);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, TemplateValue> {
        self.values.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for TemplateData
where
    K: Into<String>,
    V: Into<TemplateValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = TemplateData::new();
        for (key, value) in iter {
            data.insert(key, value);
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_existing_value() {
        let mut data = TemplateData::new();
        data.insert("MEAL_OPTIONS", true);
        let previous = data.insert("MEAL_OPTIONS", "<option>Riba</option>");

        assert_eq!(previous, Some(TemplateValue::Flag(true)));
        assert_eq!(data.len(), 1);
        assert_eq!(
            data.get("MEAL_OPTIONS").map(TemplateValue::as_text),
            Some("<option>Riba</option>")
        );
    }

    #[test]
    fn flags_and_nulls_render_empty() {
        assert_eq!(TemplateValue::Flag(true).as_text(), "");
        assert_eq!(TemplateValue::Null.as_text(), "");
        assert_eq!(TemplateValue::from(None::<String>), TemplateValue::Null);
    }

    #[test]
    fn collects_from_pairs() {
        let data: TemplateData = [("NAME", "Ana"), ("VIP", "")].into_iter().collect();

        assert!(data.contains_key("NAME"));
        assert_eq!(data.get("VIP"), Some(&TemplateValue::Text(String::new())));
    }
}
