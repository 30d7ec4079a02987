//! Color bundles and the library's theme table.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The color fields handed to the SVG renderer.
///
/// `bg` and `fg` are always present. The remaining channels are optional;
/// a missing channel is left out of the serialized bundle so the library
/// falls back to its own derived color. Keys a theme preset carries beyond
/// these seven are kept in `extra` and sent back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorBundle {
    pub bg: String,
    pub fg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Named theme presets, kept in the order the library declares them.
///
/// Deserializes from an array of `[name, bundle]` pairs, which is how the
/// bridge ships `Object.entries(THEMES)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ThemeTable {
    entries: Vec<(String, ColorBundle)>,
}

impl ThemeTable {
    #[cfg(test)]
    pub fn new(entries: Vec<(String, ColorBundle)>) -> Self {
        Self { entries }
    }

    /// Looks up a theme by exact name.
    pub fn get(&self, name: &str) -> Option<&ColorBundle> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, bundle)| bundle)
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }
}
