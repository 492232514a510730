//! Nord palette mapped onto the view's theme roles.

use ratatui::style::Color;

use super::roles::{Theme, ThemeRoles};

// Polar Night
pub const N1: Color = Color::Rgb(0x3B, 0x42, 0x52);
pub const N3: Color = Color::Rgb(0x4C, 0x56, 0x6A);

// Snow Storm
pub const S0: Color = Color::Rgb(0xD8, 0xDE, 0xE9);
pub const S1: Color = Color::Rgb(0xE5, 0xE9, 0xF0);
pub const S2: Color = Color::Rgb(0xEC, 0xEF, 0xF4);

// Frost
pub const F1: Color = Color::Rgb(0x88, 0xC0, 0xD0);
pub const F2: Color = Color::Rgb(0x81, 0xA1, 0xC1);

pub const A_RED: Color = Color::Rgb(0xBF, 0x61, 0x6A);
pub const TEXT_MUTED: Color = Color::Rgb(0x61, 0x6E, 0x88);

fn build_nord_roles() -> ThemeRoles {
    ThemeRoles {
        surface: N1,
        border: N3,
        text: S0,
        text_secondary: S1,
        text_muted: TEXT_MUTED,
        accent_primary: F1,
        accent_secondary: F2,
        error: A_RED,
        selection_bg: N3,
        selection_fg: S2,
        focus: F1,
    }
}

/// Default theme tuned for dark terminals.
#[derive(Debug, Clone)]
pub struct NordTheme {
    roles: ThemeRoles,
}

impl NordTheme {
    pub fn new() -> Self {
        Self { roles: build_nord_roles() }
    }
}

impl Default for NordTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for NordTheme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}
