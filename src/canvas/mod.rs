//! The canvas editing engine.
//!
//! [`Canvas`] owns the live element collection (in paint order), the single
//! selection, the grid/zoom view state, and the undo/redo [`History`].
//!
//! Every mutating edit commits a snapshot after the mutation; true no-ops
//! (unknown ids) never commit. Selection and view changes never commit.
//!
//! ```text
//!   add / update / delete / duplicate / clear
//!                  │
//!                  ▼
//!        elements mutated ──► History::push(snapshot)
//!                  ▲
//!   undo / redo ───┘  (restore deep copy of history[index])
//! ```

mod grid;
mod history;

pub use grid::Grid;
pub use history::{History, HistoryEntry, MAX_HISTORY};

use serde::Serialize;
use tracing::debug;

use crate::config::CanvasSettings;
use crate::element::{
    create_element, create_element_named, new_element_id, ElementKind, ElementPatch,
    ElementResult, Position, ReportElement, Size,
};

/// Offset applied to a duplicated element.
pub const DUPLICATE_OFFSET: f64 = 20.0;

/// Serializable view of the canvas for the UI boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasState {
    pub elements: Vec<ReportElement>,
    pub selected_element_id: Option<String>,
    pub zoom: u32,
    pub grid_size: f64,
    pub show_grid: bool,
    pub snap_to_grid: bool,
}

/// Live document editing state with snapshot undo/redo.
#[derive(Debug, Clone)]
pub struct Canvas {
    elements: Vec<ReportElement>,
    selected: Option<String>,
    zoom: u32,
    grid_size: f64,
    show_grid: bool,
    snap_to_grid: bool,
    history: History,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Empty canvas with default view settings and a single history entry.
    pub fn new() -> Self {
        Self::with_settings(&CanvasSettings::default())
    }

    pub fn with_settings(settings: &CanvasSettings) -> Self {
        Self {
            elements: Vec::new(),
            selected: None,
            zoom: settings.zoom,
            grid_size: settings.grid_size,
            show_grid: settings.show_grid,
            snap_to_grid: settings.snap_to_grid,
            history: History::new(&[]),
        }
    }

    // =========================================================================
    // Element edits (commit history)
    // =========================================================================

    /// Create a default element at `position` (grid-snapped), select it, and commit.
    pub fn add_element(&mut self, kind: ElementKind, position: Position) -> ReportElement {
        let element = create_element(kind, self.grid().snap_position(position));
        self.push_selected(element)
    }

    /// Like [`Canvas::add_element`] but takes the type by name.
    ///
    /// # Errors
    ///
    /// Fails with `UnknownElementType` before touching any state.
    pub fn add_element_named(
        &mut self,
        type_name: &str,
        position: Position,
    ) -> ElementResult<ReportElement> {
        let element = create_element_named(type_name, self.grid().snap_position(position))?;
        Ok(self.push_selected(element))
    }

    /// Merge `patch` into the element with `id` and commit.
    ///
    /// Returns `Ok(false)` without committing if `id` is unknown.
    ///
    /// # Errors
    ///
    /// Rejects a patch whose body is of a different element kind.
    pub fn update_element(&mut self, id: &str, patch: ElementPatch) -> ElementResult<bool> {
        let Some(element) = self.elements.iter_mut().find(|el| el.id() == id) else {
            return Ok(false);
        };
        element.apply(patch)?;
        self.commit("update");
        Ok(true)
    }

    /// Move an element, snapping to the grid when enabled.
    pub fn update_element_position(&mut self, id: &str, position: Position) -> bool {
        let patch = ElementPatch::new().with_position(self.grid().snap_position(position));
        self.apply_geometry(id, patch)
    }

    /// Resize an element, snapping to the grid when enabled.
    pub fn update_element_size(&mut self, id: &str, size: Size) -> bool {
        let patch = ElementPatch::new().with_size(self.grid().snap_size(size));
        self.apply_geometry(id, patch)
    }

    /// Remove an element. Commits only if something was removed.
    pub fn delete_element(&mut self, id: &str) -> bool {
        let before = self.elements.len();
        self.elements.retain(|el| el.id() != id);
        if self.elements.len() == before {
            return false;
        }

        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        self.commit("delete");
        true
    }

    /// Deep-copy an element under a fresh id, offset by (+20, +20), and select it.
    pub fn duplicate_element(&mut self, id: &str) -> Option<ReportElement> {
        let source = self.element(id)?;
        let copy = source.duplicate_as(
            new_element_id(),
            source
                .position()
                .offset(DUPLICATE_OFFSET, DUPLICATE_OFFSET),
        );
        Some(self.push_selected(copy))
    }

    /// Remove every element. Undoable like any other edit.
    pub fn clear_canvas(&mut self) {
        self.elements.clear();
        self.selected = None;
        self.commit("clear");
    }

    /// Replace the collection wholesale and reset history to a single snapshot.
    pub fn load_elements(&mut self, elements: Vec<ReportElement>) {
        self.elements = elements;
        self.selected = None;
        self.history = History::new(&self.elements);
        debug!(count = self.elements.len(), "canvas loaded");
    }

    // =========================================================================
    // Undo / redo
    // =========================================================================

    /// Restore the previous snapshot. Returns `false` at the oldest entry.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(elements) => {
                self.elements = elements;
                true
            }
            None => false,
        }
    }

    /// Restore the next snapshot. Returns `false` at the newest entry.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(elements) => {
                self.elements = elements;
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    // =========================================================================
    // Selection (no history)
    // =========================================================================

    pub fn select_element(&mut self, id: Option<&str>) {
        self.selected = id.map(str::to_string);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_element_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The selected element, if the selection still points at a live element.
    pub fn selected_element(&self) -> Option<&ReportElement> {
        self.selected.as_deref().and_then(|id| self.element(id))
    }

    // =========================================================================
    // View state (no history)
    // =========================================================================

    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: u32) {
        self.zoom = zoom;
    }

    pub fn grid_size(&self) -> f64 {
        self.grid_size
    }

    pub fn set_grid_size(&mut self, grid_size: f64) {
        self.grid_size = grid_size;
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn set_show_grid(&mut self, show: bool) {
        self.show_grid = show;
    }

    pub fn snap_to_grid(&self) -> bool {
        self.snap_to_grid
    }

    pub fn set_snap_to_grid(&mut self, snap: bool) {
        self.snap_to_grid = snap;
    }

    pub fn grid(&self) -> Grid {
        Grid {
            size: self.grid_size,
            snap: self.snap_to_grid,
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Elements in paint order.
    pub fn elements(&self) -> &[ReportElement] {
        &self.elements
    }

    pub fn element(&self, id: &str) -> Option<&ReportElement> {
        self.elements.iter().find(|el| el.id() == id)
    }

    pub fn state(&self) -> CanvasState {
        CanvasState {
            elements: self.elements.clone(),
            selected_element_id: self.selected.clone(),
            zoom: self.zoom,
            grid_size: self.grid_size,
            show_grid: self.show_grid,
            snap_to_grid: self.snap_to_grid,
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn push_selected(&mut self, element: ReportElement) -> ReportElement {
        self.selected = Some(element.id().to_string());
        self.elements.push(element.clone());
        self.commit("add");
        element
    }

    fn apply_geometry(&mut self, id: &str, patch: ElementPatch) -> bool {
        // Geometry-only patches carry no body, so they cannot be rejected.
        matches!(self.update_element(id, patch), Ok(true))
    }

    fn commit(&mut self, action: &'static str) {
        self.history.push(&self.elements);
        debug!(
            action,
            elements = self.elements.len(),
            index = self.history.index(),
            "canvas commit"
        );
    }
}
