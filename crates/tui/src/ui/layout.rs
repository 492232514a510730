//! Geometry captured from the last rendered frame.
//!
//! The view records where it drew the input and how big the terminal was;
//! the controller reads it back through [`LayoutProbe`] when it decides on
//! placement or hit-tests a click.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ratatui::layout::Rect;
use typeahead_engine::LayoutProbe;
use typeahead_types::Bounds;

/// Most rows the dropdown shows at once.
pub const MAX_VISIBLE_ROWS: usize = 10;
/// Top and bottom border of the dropdown block.
const PANEL_CHROME: u16 = 2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct FrameGeometry {
    input: Option<Rect>,
    viewport: Option<Rect>,
}

/// Shared handle on the last frame's geometry.
#[derive(Clone, Debug, Default)]
pub struct TerminalLayout {
    geometry: Arc<Mutex<FrameGeometry>>,
}

impl TerminalLayout {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FrameGeometry> {
        self.geometry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record(&self, input: Rect, viewport: Rect) {
        let mut geometry = self.lock();
        geometry.input = Some(input);
        geometry.viewport = Some(viewport);
    }

    pub fn input_area(&self) -> Option<Rect> {
        self.lock().input
    }

    pub fn viewport(&self) -> Option<Rect> {
        self.lock().viewport
    }
}

/// Height in cells of a dropdown listing `rows` options.
pub fn panel_rows(rows: usize) -> u16 {
    rows.min(MAX_VISIBLE_ROWS) as u16 + PANEL_CHROME
}

pub fn rect_to_bounds(rect: Rect) -> Bounds {
    Bounds::new(rect.x as f32, rect.y as f32, rect.width as f32, rect.height as f32)
}

/// Snap `bounds` to the cell grid and keep it inside `clip`.
pub fn bounds_to_rect(bounds: Bounds, clip: Rect) -> Rect {
    let x = bounds.x.round().max(0.0) as u16;
    let y = bounds.y.round().max(0.0) as u16;
    let width = bounds.width.round().max(0.0) as u16;
    let height = bounds.height.round().max(0.0) as u16;
    Rect::new(x, y, width, height).intersection(clip)
}

impl LayoutProbe for TerminalLayout {
    fn anchor_bounds(&self) -> Option<Bounds> {
        self.input_area().map(rect_to_bounds)
    }

    fn panel_height(&self, rows: usize) -> Option<f32> {
        Some(panel_rows(rows) as f32)
    }

    fn viewport_height(&self) -> Option<f32> {
        self.viewport().map(|viewport| (viewport.y + viewport.height) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_is_known_before_the_first_frame() {
        let layout = TerminalLayout::new();
        assert_eq!(layout.anchor_bounds(), None);
        assert_eq!(layout.viewport_height(), None);
    }

    #[test]
    fn recorded_geometry_is_shared_between_clones() {
        let layout = TerminalLayout::new();
        let probe = layout.clone();
        layout.record(Rect::new(2, 10, 30, 3), Rect::new(0, 0, 80, 24));
        assert_eq!(probe.anchor_bounds(), Some(Bounds::new(2.0, 10.0, 30.0, 3.0)));
        assert_eq!(probe.viewport_height(), Some(24.0));
    }

    #[test]
    fn panel_height_caps_visible_rows() {
        assert_eq!(panel_rows(3), 5);
        assert_eq!(panel_rows(40), MAX_VISIBLE_ROWS as u16 + 2);
    }

    #[test]
    fn bounds_are_clipped_to_the_viewport() {
        let clip = Rect::new(0, 0, 80, 24);
        let rect = bounds_to_rect(Bounds::new(0.0, 20.0, 30.0, 8.0), clip);
        assert_eq!(rect, Rect::new(0, 20, 30, 4));
    }
}
