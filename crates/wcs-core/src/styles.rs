//! The global styles document.
//!
//! One document shared by every widget, with four fixed categories:
//! - `colors`: themed colors, each a map with at least `light`/`dark`
//! - `sizes`: numeric sizes
//! - `textStyles`: nested text-style attribute maps
//! - `custom`: free-form values
//!
//! Updates are a shallow merge at category granularity: a category present in
//! the incoming payload replaces the stored one in full, others are kept.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The categories every styles document starts with.
pub const STYLE_CATEGORIES: [&str; 4] = ["colors", "sizes", "textStyles", "custom"];

/// The styles document, serialized as a plain JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Styles(serde_json::Map<String, Value>);

impl Default for Styles {
    fn default() -> Self {
        let categories = STYLE_CATEGORIES
            .iter()
            .map(|name| (name.to_string(), Value::Object(serde_json::Map::new())))
            .collect();
        Self(categories)
    }
}

impl Styles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `patch` into the document; keys in `patch` overwrite.
    ///
    /// Keys outside the four categories are stored like any other.
    pub fn merge(&mut self, patch: serde_json::Map<String, Value>) {
        for (category, value) in patch {
            self.0.insert(category, value);
        }
    }

    pub fn get(&self, category: &str) -> Option<&Value> {
        self.0.get(category)
    }

    pub fn colors(&self) -> Option<&Value> {
        self.get("colors")
    }

    pub fn sizes(&self) -> Option<&Value> {
        self.get("sizes")
    }

    pub fn text_styles(&self) -> Option<&Value> {
        self.get("textStyles")
    }

    pub fn custom(&self) -> Option<&Value> {
        self.get("custom")
    }

    /// Category names in document order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_patch() -> serde_json::Map<String, Value> {
        let value = json!({
            "colors": {
                "primary": {"light": "#6200ee", "dark": "#bb86fc"},
                "secondary": {"light": "#03dac6", "dark": "#03dac6"}
            },
            "sizes": {"padding-sm": 8.0, "padding-md": 16.0, "padding-lg": 24.0},
            "textStyles": {
                "heading": {"fontSize": 24, "fontWeight": "bold"},
                "body": {"fontSize": 16, "fontWeight": "normal"}
            }
        });
        match value {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        }
    }

    #[test]
    fn test_default_has_empty_categories() {
        let styles = Styles::new();
        assert_eq!(
            serde_json::to_value(&styles).unwrap(),
            json!({"colors": {}, "sizes": {}, "textStyles": {}, "custom": {}})
        );
    }

    #[test]
    fn test_merge_sample_styles() {
        let mut styles = Styles::new();
        styles.merge(sample_patch());

        let colors = styles.colors().unwrap();
        assert_eq!(colors["primary"]["light"], json!("#6200ee"));
        assert_ne!(colors["primary"]["light"], colors["primary"]["dark"]);
        assert_eq!(styles.sizes().unwrap()["padding-md"], json!(16.0));
        assert_eq!(styles.text_styles().unwrap()["heading"]["fontSize"], json!(24));
        assert_eq!(styles.custom(), Some(&json!({})));
    }

    #[test]
    fn test_merge_replaces_whole_category() {
        let mut styles = Styles::new();
        styles.merge(sample_patch());

        let mut patch = serde_json::Map::new();
        patch.insert("colors".to_string(), json!({"accent": {"light": "#000", "dark": "#fff"}}));
        styles.merge(patch);

        let colors = styles.colors().unwrap();
        assert!(colors.get("primary").is_none());
        assert!(colors.get("accent").is_some());
        // Untouched categories survive
        assert_eq!(styles.sizes().unwrap()["padding-sm"], json!(8.0));
    }

    #[test]
    fn test_merge_keeps_extra_keys() {
        let mut styles = Styles::new();
        let mut patch = serde_json::Map::new();
        patch.insert("spacing".to_string(), json!({"gutter": 12}));
        styles.merge(patch);

        let categories: Vec<_> = styles.categories().collect();
        assert_eq!(categories, vec!["colors", "sizes", "textStyles", "custom", "spacing"]);
    }
}
