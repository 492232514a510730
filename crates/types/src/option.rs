use serde::Serialize;

/// Format the decorated label shown for a synthetic create-new row.
///
/// The decoration is display-only; committing the row always uses the raw
/// label.
pub fn create_new_label(prompt: &str, label: &str) -> String {
    format!("{prompt} \"{label}\"")
}

/// A single row in the dropdown, bridging a raw candidate and its display
/// form.
///
/// Candidate rows carry the caller's value in `option` and display their
/// resolved label unchanged. Synthetic create-new rows carry no value and
/// display the create prompt around the typed text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OptionWrapper<T> {
    /// The wrapped candidate, `None` for a create-new row
    pub option: Option<T>,
    /// Label resolved from the candidate (or the typed text for new rows)
    pub actual_label: String,
    /// Whether this row represents a not-yet-existing entry
    pub is_new: bool,
    /// Label painted by the view
    pub displayed_label: String,
}

impl<T> OptionWrapper<T> {
    /// Wrap an existing candidate under its resolved label.
    pub fn candidate(option: T, label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            option: Some(option),
            displayed_label: label.clone(),
            actual_label: label,
            is_new: false,
        }
    }

    /// Build the synthetic row offered when nothing matches `label`.
    pub fn create_new(label: impl Into<String>, prompt: &str) -> Self {
        let label = label.into();
        Self {
            option: None,
            displayed_label: create_new_label(prompt, &label),
            actual_label: label,
            is_new: true,
        }
    }

    /// Label to paint, falling back to the actual label when the display
    /// label was never filled.
    pub fn display_label(&self) -> &str {
        if self.displayed_label.is_empty() {
            &self.actual_label
        } else {
            &self.displayed_label
        }
    }
}
