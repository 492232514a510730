//! # Typeahead Engine
//!
//! Framework-agnostic interaction logic for an autocomplete input.
//!
//! The [`Controller`] is a state machine: hosts feed it focus, text, key and
//! pointer events and receive [`Effect`](typeahead_types::Effect)s back. It
//! narrows a candidate list as the user types, offers a create-new row when
//! nothing matches, drives keyboard highlighting, decides on which side of
//! the input the dropdown goes, and gates an optional external search behind
//! a debounce/throttle limiter.
//!
//! ## Usage
//!
//! ```rust
//! use typeahead_engine::{Controller, ControllerConfig, WindowEventHub};
//! use typeahead_types::{Effect, Key};
//!
//! let hub = WindowEventHub::new();
//! let config = ControllerConfig::new(vec!["Apple".to_string(), "Banana".to_string()], |s: &String| s.clone());
//! let mut controller = Controller::mount(config, &hub);
//!
//! controller.on_focus();
//! controller.on_input_change("an");
//! assert_eq!(controller.state().filtered_options().len(), 1);
//!
//! controller.on_key(Key::Down);
//! let effects = controller.on_key(Key::Enter);
//! assert_eq!(effects[0], Effect::Select(Some("Banana".to_string())));
//! assert_eq!(controller.state().input_value(), "Banana");
//! ```
//!
//! ## Architecture
//!
//! - **`filter`**: case-insensitive substring filtering and the create-new row
//! - **`selection`**: open/closed mode and arrow-key highlighting
//! - **`positioner`**: above/below placement from host geometry
//! - **`window`**: window event fan-out with subscribe/unsubscribe handles
//! - **`search`**: the external search hook
//! - **`controller`**: ties the above together

pub mod config;
pub mod controller;
pub mod filter;
pub mod positioner;
pub mod search;
pub mod selection;
pub mod state;
pub mod text_input;
pub mod window;

pub use config::{ControllerConfig, LabelResolver, clamp_min_search_chars};
pub use controller::{Controller, SharedLayout};
pub use filter::filter_options;
pub use positioner::{FixedLayout, LayoutProbe, compute_placement, panel_bounds};
pub use search::{FnSearch, SearchError, SearchHandler, search_fn};
pub use selection::{SelectionState, Step};
pub use state::ControllerState;
pub use text_input::TextInputState;
pub use window::{WindowEventHub, WindowSubscription};
