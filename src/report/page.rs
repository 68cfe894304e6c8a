use serde::{Deserialize, Serialize};

/// Page geometry in millimetres. Defaults to A4 portrait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageSettings {
    pub width: f64,
    pub height: f64,
    pub orientation: Orientation,
    pub margins: Margins,
    #[serde(alias = "background_color")]
    pub background_color: String,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            width: 210.0,
            height: 297.0,
            orientation: Orientation::Portrait,
            margins: Margins::default(),
            background_color: "#ffffff".to_string(),
        }
    }
}

impl PageSettings {
    /// Height left between the top and bottom margins.
    pub fn content_height(&self) -> f64 {
        (self.height - self.margins.top - self.margins.bottom).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 15.0,
            bottom: 20.0,
            left: 15.0,
        }
    }
}
