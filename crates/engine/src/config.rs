//! Construction-time configuration for a [`Controller`](crate::Controller).

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use typeahead_util::{DEFAULT_RATE_LIMIT_DELAY, TypeaheadSettings};

use crate::search::SearchHandler;

/// Extracts the display/match label from a candidate.
pub type LabelResolver<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

pub const DEFAULT_MIN_SEARCH_CHARS: usize = 3;
pub const DEFAULT_PLACEHOLDER: &str = "Type and select";
pub const DEFAULT_NEW_ITEM_PROMPT: &str = "Create";

/// Clamp a possibly negative minimum query length.
pub fn clamp_min_search_chars(value: i64) -> usize {
    usize::try_from(value.max(0)).unwrap_or(usize::MAX)
}

/// Named, independently defaulted controller options.
///
/// Build with [`ControllerConfig::new`] and the `with_*` methods:
///
/// ```
/// use typeahead_engine::ControllerConfig;
///
/// let config = ControllerConfig::new(vec!["Apple".to_string(), "Banana".to_string()], |s: &String| s.clone())
///     .with_create_new(true)
///     .with_placeholder("Pick a fruit");
/// assert_eq!(config.placeholder, "Pick a fruit");
/// ```
pub struct ControllerConfig<T> {
    pub candidates: Vec<T>,
    pub label_resolver: LabelResolver<T>,
    /// Offer a create-new row when nothing matches
    pub create_new: bool,
    pub search: Option<Arc<dyn SearchHandler>>,
    pub min_search_chars: usize,
    /// Pre-selection applied on mount without emitting effects
    pub selected_option: Option<T>,
    pub throttle_delay: Duration,
    pub placeholder: String,
    pub new_item_prompt: String,
    pub disabled: bool,
}

impl<T> ControllerConfig<T> {
    pub fn new(candidates: Vec<T>, label_resolver: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        Self {
            candidates,
            label_resolver: Arc::new(label_resolver),
            create_new: false,
            search: None,
            min_search_chars: DEFAULT_MIN_SEARCH_CHARS,
            selected_option: None,
            throttle_delay: DEFAULT_RATE_LIMIT_DELAY,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            new_item_prompt: DEFAULT_NEW_ITEM_PROMPT.to_string(),
            disabled: false,
        }
    }

    pub fn with_create_new(mut self, enabled: bool) -> Self {
        self.create_new = enabled;
        self
    }

    pub fn with_search(mut self, handler: Arc<dyn SearchHandler>) -> Self {
        self.search = Some(handler);
        self
    }

    /// Negative values are treated as zero.
    pub fn with_min_search_chars(mut self, value: i64) -> Self {
        self.min_search_chars = clamp_min_search_chars(value);
        self
    }

    pub fn with_selected_option(mut self, option: Option<T>) -> Self {
        self.selected_option = option;
        self
    }

    pub fn with_throttle_delay(mut self, delay: Duration) -> Self {
        self.throttle_delay = delay;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_new_item_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.new_item_prompt = prompt.into();
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Overlay values read from the settings file.
    pub fn apply_settings(mut self, settings: &TypeaheadSettings) -> Self {
        self.min_search_chars = clamp_min_search_chars(settings.min_search_chars);
        self.throttle_delay = Duration::from_millis(settings.throttle_delay_ms);
        self.placeholder = settings.placeholder.clone();
        self.new_item_prompt = settings.new_item_prompt.clone();
        self.create_new = settings.allow_create;
        self
    }

    /// Prompt for the create-new row, or `None` when creating is disabled.
    pub fn create_prompt(&self) -> Option<&str> {
        self.create_new.then_some(self.new_item_prompt.as_str())
    }

    /// Throttle window actually used; a zero delay is raised to one
    /// millisecond so the timers still order calls.
    pub(crate) fn effective_delay(&self) -> Duration {
        self.throttle_delay.max(Duration::from_millis(1))
    }

    pub fn label_of(&self, candidate: &T) -> String {
        (self.label_resolver)(candidate)
    }
}

impl<T: fmt::Debug> fmt::Debug for ControllerConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerConfig")
            .field("candidates", &self.candidates)
            .field("create_new", &self.create_new)
            .field("search", &self.search.is_some())
            .field("min_search_chars", &self.min_search_chars)
            .field("selected_option", &self.selected_option)
            .field("throttle_delay", &self.throttle_delay)
            .field("placeholder", &self.placeholder)
            .field("new_item_prompt", &self.new_item_prompt)
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}
