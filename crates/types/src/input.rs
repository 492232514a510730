use crate::geometry::Point;

/// Keys the controller reacts to.
///
/// Hosts translate their native key events into this enum; anything not
/// listed here is not the controller's business.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Enter,
    Esc,
    Tab,
    Backspace,
    Left,
    Right,
    Home,
    End,
    Char(char),
}

/// Document/window level notifications delivered to every mounted
/// controller through its subscription.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WindowEvent {
    /// A pointer press anywhere in the viewport
    PointerDown(Point),
    /// The viewport changed size
    Resize { width: f32, height: f32 },
    /// Content scrolled, moving the anchor
    Scroll,
}
