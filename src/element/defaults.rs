//! The element factory: the single place new elements get their defaults.

use super::types::*;
use super::{ElementBody, ElementKind, ElementResult, ReportElement};

const DEFAULT_FONT: &str = "Inter";
const DEFAULT_TEXT_COLOR: &str = "#1f2937";

/// Palette used by new charts.
pub const DEFAULT_CHART_COLORS: [&str; 5] = ["#d97706", "#3b82f6", "#10b981", "#ef4444", "#8b5cf6"];

/// Create a default element of `kind` at `position` with a fresh id.
pub fn create_element(kind: ElementKind, position: Position) -> ReportElement {
    let (size, body) = match kind {
        ElementKind::Text => (Size::new(150.0, 30.0), default_text()),
        ElementKind::Number => (Size::new(100.0, 30.0), default_number()),
        ElementKind::List => (Size::new(400.0, 200.0), default_list()),
        ElementKind::Chart => (Size::new(350.0, 250.0), default_chart()),
    };

    ReportElement::from_parts(
        new_element_id(),
        position,
        size,
        ElementStyle::default(),
        body,
    )
}

/// Create a default element from its type name (`"text"`, `"number"`, ...).
///
/// # Errors
///
/// Returns [`super::ElementError::UnknownElementType`] for any other name.
pub fn create_element_named(type_name: &str, position: Position) -> ElementResult<ReportElement> {
    let kind = type_name.parse::<ElementKind>()?;
    Ok(create_element(kind, position))
}

pub(crate) fn new_element_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn default_text() -> ElementBody {
    ElementBody::Text {
        properties: TextProperties {
            content: "Label Text".to_string(),
            font_family: DEFAULT_FONT.to_string(),
            font_size: 14.0,
            font_weight: FontWeight::Normal,
            font_style: FontStyle::Normal,
            text_align: TextAlign::Left,
            color: DEFAULT_TEXT_COLOR.to_string(),
            line_height: None,
        },
        data_binding: None,
    }
}

fn default_number() -> ElementBody {
    ElementBody::Number {
        properties: NumberProperties {
            value: None,
            format: "#,##0.00".to_string(),
            decimal_places: 2,
            thousands_separator: ".".to_string(),
            decimal_separator: ",".to_string(),
            prefix: None,
            suffix: None,
            font_family: DEFAULT_FONT.to_string(),
            font_size: 14.0,
            font_weight: FontWeight::Normal,
            color: DEFAULT_TEXT_COLOR.to_string(),
            text_align: TextAlign::Right,
        },
        data_source: None,
    }
}

fn default_list() -> ElementBody {
    ElementBody::List {
        properties: ListProperties {
            columns: Vec::new(),
            show_header: true,
            header_style: HeaderStyle {
                background_color: "#f3f4f6".to_string(),
                color: DEFAULT_TEXT_COLOR.to_string(),
                font_weight: FontWeight::Bold,
                font_size: 12.0,
            },
            row_style: RowStyle {
                background_color: "#ffffff".to_string(),
                alternate_background_color: Some("#f9fafb".to_string()),
                color: "#374151".to_string(),
                font_size: 12.0,
            },
            border_style: TableBorder::Horizontal,
            border_color: "#e5e7eb".to_string(),
        },
        // Placeholder until the user picks a dataset
        data_source: ListSource::default(),
    }
}

fn default_chart() -> ElementBody {
    ElementBody::Chart {
        properties: ChartProperties {
            chart_type: ChartType::Bar,
            title: None,
            show_legend: true,
            legend_position: LegendPosition::Bottom,
            colors: DEFAULT_CHART_COLORS.iter().map(|c| c.to_string()).collect(),
            x_axis: None,
            y_axis: None,
            animation: true,
        },
        data_source: ChartSource {
            dataset_id: None,
            label_field: "category".to_string(),
            value_fields: vec!["total".to_string()],
        },
    }
}
