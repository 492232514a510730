//! Shared type definitions for the typeahead controller and its hosts.
//!
//! Everything here is framework agnostic: the engine produces and consumes
//! these values, and a view layer (the terminal host, or any other) maps its
//! own events and geometry onto them.

mod effect;
mod geometry;
mod input;
mod option;

pub use effect::{Effect, SearchEvent};
pub use geometry::{Bounds, Placement, Point, PointerTarget};
pub use input::{Key, WindowEvent};
pub use option::{OptionWrapper, create_new_label};
