//! # Typeahead TUI
//!
//! A terminal host for the typeahead controller, built on Ratatui and
//! Crossterm. It paints the controller's state, translates terminal input
//! into controller events, feeds window level events (clicks, resizes,
//! scrolling) through a [`WindowEventHub`](typeahead_engine::WindowEventHub)
//! and reports geometry back through a [`TerminalLayout`].
//!
//! ## Example
//!
//! ```no_run
//! use typeahead_engine::{Controller, ControllerConfig, WindowEventHub};
//! use typeahead_tui::{TypeaheadView, run_picker};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let hub = WindowEventHub::new();
//!     let config = ControllerConfig::new(vec!["Apple".to_string()], |s: &String| s.clone());
//!     let controller = Controller::mount(config, &hub);
//!     let effects = run_picker(controller, hub, TypeaheadView::default(), None).await?;
//!     println!("{effects:?}");
//!     Ok(())
//! }
//! ```

mod ui;

pub use ui::keys::{KeyAction, map_key_event};
pub use ui::layout::{MAX_VISIBLE_ROWS, TerminalLayout};
pub use ui::runtime::{RemoteResults, merge_candidates, run_picker};
pub use ui::theme::{NordTheme, Theme};
pub use ui::typeahead_view::{InputRow, TypeaheadView};
