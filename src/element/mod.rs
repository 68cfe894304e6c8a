//! Typed report elements.
//!
//! A [`ReportElement`] is a box on the canvas (id, position, size, style)
//! carrying one of four closed variants in its [`ElementBody`]:
//!
//! | kind     | default size | data reference              |
//! |----------|--------------|-----------------------------|
//! | `text`   | 150 × 30     | optional field binding      |
//! | `number` | 100 × 30     | field + aggregation         |
//! | `list`   | 400 × 200    | dataset rows                |
//! | `chart`  | 350 × 250    | label field + value fields  |
//!
//! New elements are only ever created by [`create_element`], which assigns a
//! fresh id and the variant defaults. Elements reference datasets by id and
//! never own them.

mod defaults;
mod format;
mod types;

pub use defaults::{create_element, create_element_named, DEFAULT_CHART_COLORS};
pub(crate) use defaults::new_element_id;
pub use format::{numeric_value, Aggregation, MAX_DECIMAL_PLACES};
pub use types::*;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors raised while constructing or patching elements.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ElementError {
    #[error("Unknown element type: {0}")]
    UnknownElementType(String),

    #[error("Cannot apply {found} properties to a {expected} element")]
    KindMismatch {
        expected: ElementKind,
        found: ElementKind,
    },
}

pub type ElementResult<T> = Result<T, ElementError>;

/// The closed set of element variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Number,
    List,
    Chart,
}

impl ElementKind {
    pub const ALL: [ElementKind; 4] = [
        ElementKind::Text,
        ElementKind::Number,
        ElementKind::List,
        ElementKind::Chart,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Text => "text",
            ElementKind::Number => "number",
            ElementKind::List => "list",
            ElementKind::Chart => "chart",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementKind {
    type Err = ElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(ElementKind::Text),
            "number" => Ok(ElementKind::Number),
            "list" => Ok(ElementKind::List),
            "chart" => Ok(ElementKind::Chart),
            other => Err(ElementError::UnknownElementType(other.to_string())),
        }
    }
}

/// Variant-specific properties and data reference.
///
/// Serialized inline with the element, discriminated by `"type"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementBody {
    Text {
        properties: TextProperties,
        #[serde(
            rename = "dataBinding",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        data_binding: Option<TextBinding>,
    },
    Number {
        properties: NumberProperties,
        #[serde(rename = "dataSource", default, skip_serializing_if = "Option::is_none")]
        data_source: Option<NumberSource>,
    },
    List {
        properties: ListProperties,
        #[serde(rename = "dataSource")]
        data_source: ListSource,
    },
    Chart {
        properties: ChartProperties,
        #[serde(rename = "dataSource")]
        data_source: ChartSource,
    },
}

impl ElementBody {
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementBody::Text { .. } => ElementKind::Text,
            ElementBody::Number { .. } => ElementKind::Number,
            ElementBody::List { .. } => ElementKind::List,
            ElementBody::Chart { .. } => ElementKind::Chart,
        }
    }

    /// Dataset this body reads from, if any.
    pub fn dataset_id(&self) -> Option<&str> {
        match self {
            ElementBody::Text { data_binding, .. } => data_binding
                .as_ref()
                .filter(|b| b.enabled)
                .and_then(|b| b.dataset_id.as_deref()),
            ElementBody::Number { data_source, .. } => {
                data_source.as_ref().and_then(|s| s.dataset_id.as_deref())
            }
            ElementBody::List { data_source, .. } => data_source.dataset_id.as_deref(),
            ElementBody::Chart { data_source, .. } => data_source.dataset_id.as_deref(),
        }
    }
}

/// A single element placed on the report canvas.
///
/// `id` and the body's kind are fixed at creation. Geometry is changed
/// through the canvas so grid snapping is applied consistently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportElement {
    id: String,
    position: Position,
    size: Size,
    #[serde(default)]
    style: ElementStyle,
    #[serde(flatten)]
    body: ElementBody,
}

impl ReportElement {
    pub(crate) fn from_parts(
        id: String,
        position: Position,
        size: Size,
        style: ElementStyle,
        body: ElementBody,
    ) -> Self {
        Self {
            id,
            position,
            size,
            style,
            body,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.body.kind()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn style(&self) -> &ElementStyle {
        &self.style
    }

    pub fn body(&self) -> &ElementBody {
        &self.body
    }

    pub fn dataset_id(&self) -> Option<&str> {
        self.body.dataset_id()
    }

    /// Deep copy under a fresh id.
    pub(crate) fn duplicate_as(&self, id: String, position: Position) -> Self {
        Self {
            id,
            position,
            ..self.clone()
        }
    }

    /// Shallow merge of the patch's top-level fields.
    ///
    /// The patch is rejected as a whole if it carries a body of another kind.
    pub(crate) fn apply(&mut self, patch: ElementPatch) -> ElementResult<()> {
        if let Some(body) = &patch.body {
            if body.kind() != self.kind() {
                return Err(ElementError::KindMismatch {
                    expected: self.kind(),
                    found: body.kind(),
                });
            }
        }

        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(size) = patch.size {
            self.size = size;
        }
        if let Some(style) = patch.style {
            self.style = style;
        }
        if let Some(body) = patch.body {
            self.body = body;
        }
        Ok(())
    }
}

/// Partial update for an element. `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementPatch {
    pub position: Option<Position>,
    pub size: Option<Size>,
    pub style: Option<ElementStyle>,
    pub body: Option<ElementBody>,
}

impl ElementPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_style(mut self, style: ElementStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_body(mut self, body: ElementBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_none() && self.size.is_none() && self.style.is_none() && self.body.is_none()
    }
}
