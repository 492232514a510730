//! Render state exposed by the controller.
//!
//! Views read everything through the selectors; only the controller mutates
//! it, through the reducers.

use typeahead_types::{OptionWrapper, Placement};

use crate::selection::SelectionState;
use crate::text_input::TextInputState;

#[derive(Clone, Debug)]
pub struct ControllerState<T> {
    /// Text and cursor of the input line
    input: TextInputState,
    /// Rows for the current query, rebuilt on every refilter
    filtered_options: Vec<OptionWrapper<T>>,
    /// Open/closed mode and highlighted row
    selection: SelectionState,
    /// Last committed row
    selected_option: Option<OptionWrapper<T>>,
    placement: Placement,
    placeholder: String,
    /// Whether a scheduled search has not reported back yet
    search_pending: bool,
    /// Message of the most recent failed search
    search_error: Option<String>,
    disabled: bool,
}

impl<T> ControllerState<T> {
    pub(crate) fn new(placeholder: String, disabled: bool) -> Self {
        Self {
            input: TextInputState::new(),
            filtered_options: Vec::new(),
            selection: SelectionState::Closed,
            selected_option: None,
            placement: Placement::default(),
            placeholder,
            search_pending: false,
            search_error: None,
            disabled,
        }
    }

    // ===== SELECTORS =====

    pub fn input_value(&self) -> &str {
        self.input.text()
    }

    /// Byte offset of the cursor in [`input_value`](Self::input_value)
    pub fn cursor(&self) -> usize {
        self.input.cursor()
    }

    pub fn text_input(&self) -> &TextInputState {
        &self.input
    }

    pub fn filtered_options(&self) -> &[OptionWrapper<T>] {
        &self.filtered_options
    }

    /// Highlighted row, `None` when nothing is highlighted
    pub fn selected_index(&self) -> Option<usize> {
        self.selection.highlighted()
    }

    pub fn highlighted_option(&self) -> Option<&OptionWrapper<T>> {
        self.selected_index().and_then(|index| self.filtered_options.get(index))
    }

    pub fn selected_option(&self) -> Option<&OptionWrapper<T>> {
        self.selected_option.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.selection.is_open()
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn search_pending(&self) -> bool {
        self.search_pending
    }

    pub fn search_error(&self) -> Option<&str> {
        self.search_error.as_deref()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Whether the clear affordance should be shown
    pub fn show_clear(&self) -> bool {
        self.selected_option.is_some()
    }

    // ===== REDUCERS =====

    pub(crate) fn input_mut(&mut self) -> &mut TextInputState {
        &mut self.input
    }

    pub(crate) fn selection_mut(&mut self) -> &mut SelectionState {
        &mut self.selection
    }

    pub(crate) fn apply_options(&mut self, options: Vec<OptionWrapper<T>>) {
        self.filtered_options = options;
    }

    pub(crate) fn reduce_clear_options(&mut self) {
        self.filtered_options.clear();
    }

    pub(crate) fn apply_selected(&mut self, selected: Option<OptionWrapper<T>>) {
        self.selected_option = selected;
    }

    pub(crate) fn apply_placement(&mut self, placement: Placement) {
        self.placement = placement;
    }

    pub(crate) fn apply_search_pending(&mut self, pending: bool) {
        self.search_pending = pending;
    }

    pub(crate) fn apply_search_error(&mut self, error: Option<String>) {
        self.search_error = error;
    }

    pub(crate) fn apply_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_closed_and_empty() {
        let state: ControllerState<String> = ControllerState::new("Type and select".into(), false);
        assert!(!state.is_open());
        assert_eq!(state.input_value(), "");
        assert_eq!(state.selected_index(), None);
        assert_eq!(state.placement(), Placement::Below);
        assert!(!state.show_clear());
    }

    #[test]
    fn clear_affordance_follows_the_selection() {
        let mut state: ControllerState<String> = ControllerState::new(String::new(), false);
        state.apply_selected(Some(OptionWrapper::candidate("Apple".into(), "Apple")));
        assert!(state.show_clear());
    }

    #[test]
    fn highlighted_option_reads_the_highlighted_row() {
        let mut state: ControllerState<&str> = ControllerState::new(String::new(), false);
        state.apply_options(vec![OptionWrapper::candidate("a", "a"), OptionWrapper::candidate("b", "b")]);
        state.selection_mut().move_down(2);
        state.selection_mut().move_down(2);
        assert_eq!(state.highlighted_option().map(|row| row.actual_label.as_str()), Some("b"));
    }
}
