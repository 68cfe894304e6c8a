//! Per-report editing context.
//!
//! A [`ReportSession`] is created when a report is opened and dropped when
//! it is closed. It owns the canvas and the dataset registry for that one
//! document; nothing is shared between sessions.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::canvas::Canvas;
use crate::config::{CanvasSettings, Settings};
use crate::dataset::{DatasetRegistry, Record};
use crate::element::{numeric_value, ElementBody, ReportElement};
use crate::executor::QueryExecutor;
use crate::report::{Band, PageSettings, ReportLayout};

pub struct ReportSession {
    page_settings: PageSettings,
    bands: Vec<Band>,
    /// Band each loaded element was saved in, by element id.
    band_assignments: HashMap<String, String>,
    canvas: Canvas,
    datasets: DatasetRegistry,
}

impl ReportSession {
    /// Blank report using the configured page and canvas defaults.
    pub fn new(executor: Arc<dyn QueryExecutor>, settings: &Settings) -> Self {
        Self::open(
            ReportLayout::new(settings.page.clone()),
            executor,
            &settings.canvas,
        )
    }

    /// Hydrate a session from a saved document.
    ///
    /// The canvas history starts fresh at the loaded state. Loaded
    /// elements keep their band when the session is saved again.
    pub fn open(
        layout: ReportLayout,
        executor: Arc<dyn QueryExecutor>,
        canvas_settings: &CanvasSettings,
    ) -> Self {
        let band_assignments = layout.band_assignments();
        let mut canvas = Canvas::with_settings(canvas_settings);
        canvas.load_elements(layout.elements());

        let mut datasets = DatasetRegistry::new(executor);
        datasets.load_datasets(layout.datasets);

        let bands = layout
            .bands
            .into_iter()
            .map(|mut band| {
                band.elements.clear();
                band
            })
            .collect();

        Self {
            page_settings: layout.page_settings,
            bands,
            band_assignments,
            canvas,
            datasets,
        }
    }

    /// Current state as a persistable document.
    pub fn to_layout(&self) -> ReportLayout {
        let mut layout = ReportLayout::new(self.page_settings.clone());
        layout.datasets = self.datasets.datasets().to_vec();
        layout.bands = self.bands.clone();
        layout.place_elements(self.canvas.elements(), &self.band_assignments);
        layout
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn datasets(&self) -> &DatasetRegistry {
        &self.datasets
    }

    pub fn datasets_mut(&mut self) -> &mut DatasetRegistry {
        &mut self.datasets
    }

    pub fn page_settings(&self) -> &PageSettings {
        &self.page_settings
    }

    pub fn set_page_settings(&mut self, page_settings: PageSettings) {
        self.page_settings = page_settings;
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Replace the band shells used when saving.
    pub fn set_bands(&mut self, bands: Vec<Band>) {
        self.bands = bands;
    }

    // =========================================================================
    // Element data views
    // =========================================================================

    /// Rows an element displays.
    ///
    /// Unknown elements, unbound elements, and dangling dataset references
    /// all give an empty view. List elements apply their `order_by` and
    /// `limit`.
    pub fn element_rows(&self, element_id: &str) -> Vec<&Record> {
        let Some(element) = self.canvas.element(element_id) else {
            return Vec::new();
        };
        let Some(dataset_id) = element.dataset_id() else {
            return Vec::new();
        };

        let mut rows: Vec<&Record> = self.datasets.get_dataset_data(dataset_id).iter().collect();

        if let ElementBody::List { data_source, .. } = element.body() {
            if let Some(field) = data_source.order_by.as_deref() {
                rows.sort_by(|a, b| compare_values(a.get(field), b.get(field)));
            }
            if let Some(limit) = data_source.limit {
                rows.truncate(limit);
            }
        }
        rows
    }

    /// Numeric value of a number element.
    ///
    /// Bound elements aggregate their field over the cached rows, or read
    /// the first row when no aggregation is set. Unbound elements return
    /// their static value.
    pub fn element_value(&self, element_id: &str) -> Option<f64> {
        let element = self.canvas.element(element_id)?;
        let ElementBody::Number {
            properties,
            data_source,
        } = element.body()
        else {
            return None;
        };

        let Some(source) = data_source.as_ref().filter(|s| s.dataset_id.is_some()) else {
            return properties.value;
        };
        let field = source.field.as_deref()?;
        let rows = source
            .dataset_id
            .as_deref()
            .map(|id| self.datasets.get_dataset_data(id))
            .unwrap_or_default();

        match source.aggregation {
            Some(aggregation) => aggregation.apply(rows, field),
            None => rows.first().and_then(|row| numeric_value(row.get(field)?)),
        }
    }

    /// Text an element shows, for text and number elements.
    pub fn element_text(&self, element_id: &str) -> Option<String> {
        let element = self.canvas.element(element_id)?;
        match element.body() {
            ElementBody::Text {
                properties,
                data_binding,
            } => {
                let bound = data_binding
                    .as_ref()
                    .filter(|b| b.enabled)
                    .and_then(|b| Some((b.dataset_id.as_deref()?, b.field.as_deref()?)));
                match bound {
                    Some((dataset_id, field)) => Some(
                        self.datasets
                            .get_dataset_data(dataset_id)
                            .first()
                            .and_then(|row| row.get(field))
                            .map(display_value)
                            .unwrap_or_default(),
                    ),
                    None => Some(properties.content.clone()),
                }
            }
            ElementBody::Number { properties, .. } => self
                .element_value(element_id)
                .map(|value| properties.format(value)),
            _ => None,
        }
    }

    /// Elements whose dataset reference no longer resolves.
    pub fn dangling_elements(&self) -> Vec<&ReportElement> {
        self.canvas
            .elements()
            .iter()
            .filter(|el| {
                el.dataset_id()
                    .is_some_and(|id| self.datasets.get_dataset(id).is_none())
            })
            .collect()
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Nulls first, then numbers, then everything else by text.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let rank = |v: Option<&Value>| match v {
        None | Some(Value::Null) => 0,
        Some(Value::Number(_)) => 1,
        Some(_) => 2,
    };
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(x), Some(y)) if rank(a) == 2 && rank(b) == 2 => display_value(x).cmp(&display_value(y)),
        _ => rank(a).cmp(&rank(b)),
    }
}
