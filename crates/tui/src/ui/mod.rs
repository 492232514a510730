pub mod keys;
pub mod layout;
pub mod runtime;
pub mod theme;
pub mod typeahead_view;
