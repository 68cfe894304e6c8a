use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::page::PageSettings;
use super::{DocumentError, DocumentResult};
use crate::dataset::Dataset;
use crate::element::ReportElement;

/// Document format version written by this crate.
pub const LAYOUT_VERSION: &str = "1.0";

/// The persisted report document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportLayout {
    pub version: String,
    #[serde(default)]
    pub page_settings: PageSettings,
    #[serde(default)]
    pub datasets: Vec<Dataset>,
    #[serde(default)]
    pub bands: Vec<Band>,
}

impl Default for ReportLayout {
    fn default() -> Self {
        Self::new(PageSettings::default())
    }
}

impl ReportLayout {
    /// Empty document with no bands.
    pub fn new(page_settings: PageSettings) -> Self {
        Self {
            version: LAYOUT_VERSION.to_string(),
            page_settings,
            datasets: Vec::new(),
            bands: Vec::new(),
        }
    }

    pub fn from_json(json: &str) -> DocumentResult<Self> {
        let layout: Self = serde_json::from_str(json)?;
        layout.check_version()?;
        Ok(layout)
    }

    pub fn to_json(&self) -> DocumentResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> DocumentResult<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> DocumentResult<()> {
        fs::write(path, self.to_json()? + "\n")?;
        Ok(())
    }

    /// All elements across bands, in band order then paint order.
    pub fn elements(&self) -> Vec<ReportElement> {
        self.bands
            .iter()
            .flat_map(|band| band.elements.iter().cloned())
            .collect()
    }

    /// Element id to the id of the band holding it.
    pub fn band_assignments(&self) -> HashMap<String, String> {
        self.bands
            .iter()
            .flat_map(|band| {
                band.elements
                    .iter()
                    .map(|el| (el.id().to_string(), band.id.clone()))
            })
            .collect()
    }

    /// Replace band contents with `elements`, keeping the band shells.
    ///
    /// Bands stack top to bottom; each element lands in the band whose
    /// vertical span contains its `y`. Anything below the last band goes to
    /// the last band. With no bands, a single detail band covering the
    /// page content area is created.
    pub fn set_elements(&mut self, elements: &[ReportElement]) {
        self.place_elements(elements, &HashMap::new());
    }

    /// Like [`set_elements`](Self::set_elements), but an element listed in
    /// `assignments` goes back to its band while that band still exists.
    /// Only unlisted elements are placed by position.
    pub fn place_elements(
        &mut self,
        elements: &[ReportElement],
        assignments: &HashMap<String, String>,
    ) {
        if self.bands.is_empty() {
            self.bands
                .push(Band::new(BandType::Detail, self.page_settings.content_height()));
        }
        for band in &mut self.bands {
            band.elements.clear();
        }

        let mut bottoms = Vec::with_capacity(self.bands.len());
        let mut top = 0.0;
        for band in &self.bands {
            top += band.height;
            bottoms.push(top);
        }
        let last = self.bands.len() - 1;

        for element in elements {
            let index = assignments
                .get(element.id())
                .and_then(|band_id| self.bands.iter().position(|b| &b.id == band_id))
                .unwrap_or_else(|| {
                    let y = element.position().y;
                    bottoms.iter().position(|&bottom| y < bottom).unwrap_or(last)
                });
            self.bands[index].elements.push(element.clone());
        }
    }

    fn check_version(&self) -> DocumentResult<()> {
        let major = self.version.split('.').next().unwrap_or_default();
        if major == "1" {
            Ok(())
        } else {
            Err(DocumentError::UnsupportedVersion(self.version.clone()))
        }
    }
}

/// A horizontal page region holding elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub id: String,
    #[serde(rename = "type")]
    pub band_type: BandType,
    pub height: f64,
    #[serde(default)]
    pub elements: Vec<ReportElement>,
}

impl Band {
    pub fn new(band_type: BandType, height: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            band_type,
            height,
            elements: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BandType {
    PageHeader,
    Detail,
    PageFooter,
}
