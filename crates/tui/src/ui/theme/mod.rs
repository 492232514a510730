//! Theme styling for the typeahead view.
//!
//! Prefer these helpers over hard-coded colors so the input and the
//! dropdown stay consistent.

pub mod nord;
pub mod roles;
pub mod theme_helpers;

pub use nord::NordTheme;
pub use roles::Theme;
