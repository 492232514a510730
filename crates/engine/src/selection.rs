//! Keyboard-driven dropdown selection state.
//!
//! The machine only knows whether the dropdown is open and which row is
//! highlighted. Filtering and committing are the controller's job; it feeds
//! the current row count into the transitions that need it.

/// Open/closed mode plus the highlighted row.
///
/// `Open { highlighted: None }` is the "nothing highlighted" state (the
/// original `-1` index). A highlighted row only exists while open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectionState {
    #[default]
    Closed,
    Open {
        highlighted: Option<usize>,
    },
}

/// Result of an arrow-key transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// The highlight now sits on this row
    Highlighted(usize),
    /// Moving up past the first row closed the dropdown
    Closed,
    /// Nothing to move over
    Unchanged,
}

impl SelectionState {
    pub fn is_open(&self) -> bool {
        matches!(self, SelectionState::Open { .. })
    }

    pub fn highlighted(&self) -> Option<usize> {
        match self {
            SelectionState::Open { highlighted } => *highlighted,
            SelectionState::Closed => None,
        }
    }

    /// Open with nothing highlighted. Returns `true` if it was closed.
    pub fn open(&mut self) -> bool {
        let was_closed = !self.is_open();
        *self = SelectionState::Open { highlighted: None };
        was_closed
    }

    /// Returns `true` if it was open.
    pub fn close(&mut self) -> bool {
        let was_open = self.is_open();
        *self = SelectionState::Closed;
        was_open
    }

    /// Drop the highlight but keep the mode.
    pub fn reset_highlight(&mut self) {
        if let SelectionState::Open { highlighted } = self {
            *highlighted = None;
        }
    }

    /// Open (if needed) with the first row highlighted. Returns `true` if it
    /// was closed.
    pub fn highlight_first(&mut self) -> bool {
        let was_closed = !self.is_open();
        *self = SelectionState::Open { highlighted: Some(0) };
        was_closed
    }

    /// ArrowDown over `len` rows: advance and stop at the last row.
    pub fn move_down(&mut self, len: usize) -> Step {
        if len == 0 {
            return Step::Unchanged;
        }
        let next = match self.highlighted() {
            Some(index) => (index + 1).min(len - 1),
            None => 0,
        };
        *self = SelectionState::Open { highlighted: Some(next) };
        Step::Highlighted(next)
    }

    /// ArrowUp over `len` rows: step back, closing when leaving the first
    /// row. With nothing highlighted the first row is selected.
    pub fn move_up(&mut self, len: usize) -> Step {
        if !self.is_open() || len == 0 {
            return Step::Unchanged;
        }
        match self.highlighted() {
            Some(0) => {
                *self = SelectionState::Closed;
                Step::Closed
            }
            Some(index) => {
                let previous = (index - 1).min(len - 1);
                *self = SelectionState::Open { highlighted: Some(previous) };
                Step::Highlighted(previous)
            }
            None => {
                *self = SelectionState::Open { highlighted: Some(0) };
                Step::Highlighted(0)
            }
        }
    }
}
