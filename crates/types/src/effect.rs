/// Side effects produced by controller event handlers.
///
/// Handlers return these in emission order instead of invoking callbacks, so
/// the host decides how to act on a selection. For a commit the order is
/// always `Select`, then `Create` (only for create-new rows), then
/// `DropdownClosed`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect<T> {
    /// The committed value changed; `None` when cleared or when a
    /// create-new row was committed
    Select(Option<T>),
    /// A create-new row was committed with this raw label
    Create(String),
    /// The dropdown went from closed to open
    DropdownOpened,
    /// The dropdown went from open to closed
    DropdownClosed,
}

/// Outcome of one external search invocation, reported back to the
/// controller that scheduled it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchEvent {
    /// The search handler finished for `query`
    Completed { query: String },
    /// The search handler failed for `query`
    Failed { query: String, message: String },
}

impl SearchEvent {
    pub fn query(&self) -> &str {
        match self {
            SearchEvent::Completed { query } | SearchEvent::Failed { query, .. } => query,
        }
    }
}
