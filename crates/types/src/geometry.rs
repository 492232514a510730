//! Minimal geometry used for dropdown placement and hit testing.
//!
//! Coordinates follow screen conventions: `y` grows downward, so `top` is the
//! smaller edge. Units are whatever the host measures in (terminal cells,
//! pixels); only their relative sizes matter.

use serde::Serialize;

/// A position in viewport coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box in viewport coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left() && point.x < self.right() && point.y >= self.top() && point.y < self.bottom()
    }
}

/// Which side of the anchor the dropdown panel is drawn on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum Placement {
    Above,
    #[default]
    Below,
}

/// Where a pointer event landed relative to the widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerTarget {
    Input,
    Panel,
    Outside,
}

impl PointerTarget {
    /// Classify `point` against the input and (optional) panel bounds.
    ///
    /// Without any known input geometry nothing can be called outside, so the
    /// point is attributed to the input and the click is ignored by
    /// outside-click handling.
    pub fn classify(point: Point, input: Option<Bounds>, panel: Option<Bounds>) -> Self {
        let Some(input) = input else {
            return PointerTarget::Input;
        };
        if input.contains(point) {
            PointerTarget::Input
        } else if panel.is_some_and(|panel| panel.contains(point)) {
            PointerTarget::Panel
        } else {
            PointerTarget::Outside
        }
    }
}
