//! The typeahead interaction controller.
//!
//! A [`Controller`] owns the render state, the rate-limited search hook and
//! a window event subscription. Hosts feed it input through the `on_*`
//! handlers and act on the [`Effect`]s each handler returns; the controller
//! never calls back into the host.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};
use typeahead_types::{Bounds, Effect, Key, OptionWrapper, Point, PointerTarget, SearchEvent, WindowEvent};
use typeahead_util::{RateLimiter, RateLimiterConfig};

use crate::config::ControllerConfig;
use crate::filter::filter_options;
use crate::positioner::{LayoutProbe, compute_placement, panel_bounds};
use crate::search::run_search;
use crate::selection::Step;
use crate::state::ControllerState;
use crate::window::{WindowEventHub, WindowSubscription};

/// Shared geometry source for placement and hit testing.
pub type SharedLayout = Arc<dyn LayoutProbe + Send + Sync>;

pub struct Controller<T> {
    config: ControllerConfig<T>,
    state: ControllerState<T>,
    limiter: RateLimiter,
    search_tx: UnboundedSender<SearchEvent>,
    search_rx: UnboundedReceiver<SearchEvent>,
    /// Query of the most recent scheduled search
    latest_query: Option<String>,
    /// Last externally supplied selection, for change detection
    external_selection: Option<T>,
    subscription: Option<WindowSubscription>,
    layout: Option<SharedLayout>,
}

impl<T: Clone + PartialEq> Controller<T> {
    /// Create a controller and subscribe it to `hub`.
    ///
    /// A pre-selection in `config` is applied silently: the input shows its
    /// label and no effects are produced.
    pub fn mount(config: ControllerConfig<T>, hub: &WindowEventHub) -> Self {
        let (search_tx, search_rx) = mpsc::unbounded_channel();
        let limiter = RateLimiter::new(RateLimiterConfig::uniform(config.effective_delay()));
        let mut state = ControllerState::new(config.placeholder.clone(), config.disabled);
        let external_selection = config.selected_option.clone();
        if let Some(option) = external_selection.clone() {
            let label = config.label_of(&option);
            state.input_mut().replace(label.clone());
            state.apply_selected(Some(OptionWrapper::candidate(option, label)));
        }
        debug!(candidates = config.candidates.len(), "typeahead mounted");
        Self {
            config,
            state,
            limiter,
            search_tx,
            search_rx,
            latest_query: None,
            external_selection,
            subscription: Some(hub.subscribe()),
            layout: None,
        }
    }

    pub fn with_layout(mut self, layout: SharedLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn set_layout(&mut self, layout: SharedLayout) {
        self.layout = Some(layout);
    }

    pub fn state(&self) -> &ControllerState<T> {
        &self.state
    }

    pub fn config(&self) -> &ControllerConfig<T> {
        &self.config
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    /// Release the window subscription and stop every pending or running
    /// search. Idempotent.
    pub fn unmount(&mut self) {
        if self.subscription.take().is_some() {
            debug!("typeahead unmounted");
        }
        self.limiter.shutdown();
        self.latest_query = None;
        self.state.apply_search_pending(false);
    }

    // ----- input handlers -----

    /// Focus or click on the input: open and filter the current text.
    pub fn on_focus(&mut self) -> Vec<Effect<T>> {
        if self.state.is_disabled() {
            return Vec::new();
        }
        let was_closed = self.state.selection_mut().open();
        self.refilter();
        self.reposition();
        if was_closed {
            debug!("dropdown opened on focus");
            vec![Effect::DropdownOpened]
        } else {
            Vec::new()
        }
    }

    /// Replace the input text, as a host-owned text field would report it.
    pub fn on_input_change(&mut self, text: &str) -> Vec<Effect<T>> {
        if self.state.is_disabled() {
            return Vec::new();
        }
        self.state.input_mut().replace(text);
        self.input_changed()
    }

    pub fn on_key(&mut self, key: Key) -> Vec<Effect<T>> {
        if self.state.is_disabled() {
            return Vec::new();
        }
        match key {
            Key::Down => self.arrow_down(),
            Key::Up => self.arrow_up(),
            Key::Enter => match self.state.highlighted_option().cloned() {
                Some(row) => self.commit(row),
                None => Vec::new(),
            },
            Key::Esc | Key::Tab => self.close(),
            Key::Backspace => {
                if self.state.input_value().is_empty() {
                    self.clear_selection()
                } else if self.state.input_mut().backspace() {
                    self.input_changed()
                } else {
                    Vec::new()
                }
            }
            Key::Char(c) => {
                self.state.input_mut().insert_char(c);
                self.input_changed()
            }
            Key::Left => {
                self.state.input_mut().move_left();
                Vec::new()
            }
            Key::Right => {
                self.state.input_mut().move_right();
                Vec::new()
            }
            Key::Home => {
                self.state.input_mut().move_home();
                Vec::new()
            }
            Key::End => {
                self.state.input_mut().move_end();
                Vec::new()
            }
        }
    }

    /// Direct click on the row at `index`.
    pub fn on_option_click(&mut self, index: usize) -> Vec<Effect<T>> {
        if self.state.is_disabled() {
            return Vec::new();
        }
        match self.state.filtered_options().get(index).cloned() {
            Some(row) => self.commit(row),
            None => Vec::new(),
        }
    }

    /// Document-wide pointer press. Presses outside both the input and the
    /// panel close the dropdown.
    pub fn on_pointer_down(&mut self, point: Point) -> Vec<Effect<T>> {
        if !self.state.is_open() {
            return Vec::new();
        }
        let anchor = self.layout.as_ref().and_then(|layout| layout.anchor_bounds());
        match PointerTarget::classify(point, anchor, self.panel_bounds()) {
            PointerTarget::Outside => {
                debug!(x = point.x, y = point.y, "pointer down outside the typeahead");
                self.close()
            }
            PointerTarget::Input | PointerTarget::Panel => Vec::new(),
        }
    }

    /// Apply every window event published since the last call.
    pub fn pump_window_events(&mut self) -> Vec<Effect<T>> {
        let events = match self.subscription.as_mut() {
            Some(subscription) => subscription.drain(),
            None => return Vec::new(),
        };
        let mut effects = Vec::new();
        for event in events {
            match event {
                WindowEvent::PointerDown(point) => effects.extend(self.on_pointer_down(point)),
                WindowEvent::Resize { .. } => self.on_resize(),
                WindowEvent::Scroll => self.on_scroll(),
            }
        }
        effects
    }

    pub fn on_resize(&mut self) {
        self.reposition();
    }

    pub fn on_scroll(&mut self) {
        self.reposition();
    }

    /// Recompute the dropdown side from the current geometry. Leaves the
    /// placement alone while the host has no geometry to offer.
    pub fn reposition(&mut self) {
        let Some(layout) = self.layout.as_ref() else {
            return;
        };
        let rows = self.state.filtered_options().len();
        let (Some(anchor), Some(panel_height), Some(viewport_height)) =
            (layout.anchor_bounds(), layout.panel_height(rows), layout.viewport_height())
        else {
            return;
        };
        let placement = compute_placement(anchor, panel_height, viewport_height);
        if placement != self.state.placement() {
            debug!(?placement, "dropdown placement changed");
        }
        self.state.apply_placement(placement);
    }

    /// Where the open panel is drawn, if it is open and geometry is known.
    pub fn panel_bounds(&self) -> Option<Bounds> {
        let rows = self.state.filtered_options().len();
        if !self.state.is_open() || rows == 0 {
            return None;
        }
        let layout = self.layout.as_ref()?;
        let anchor = layout.anchor_bounds()?;
        let height = layout.panel_height(rows)?;
        Some(panel_bounds(anchor, height, self.state.placement()))
    }

    // ----- external updates -----

    /// Replace the candidate list. Re-filters whenever text is present and
    /// opens the dropdown when the new list has matches.
    pub fn set_candidates(&mut self, candidates: Vec<T>) -> Vec<Effect<T>> {
        self.config.candidates = candidates;
        if self.state.input_value().is_empty() {
            return Vec::new();
        }
        self.state.selection_mut().reset_highlight();
        self.refilter();
        let mut effects = Vec::new();
        if !self.state.is_disabled() && !self.state.filtered_options().is_empty() && self.state.selection_mut().open() {
            debug!("dropdown opened by updated candidates");
            effects.push(Effect::DropdownOpened);
        }
        self.reposition();
        effects
    }

    /// Apply an externally controlled selection. A changed value commits
    /// (or clears when `None`); an unchanged one is ignored.
    pub fn set_selected_option(&mut self, option: Option<T>) -> Vec<Effect<T>> {
        if option == self.external_selection {
            return Vec::new();
        }
        self.external_selection = option.clone();
        match option {
            Some(option) => {
                let label = self.config.label_of(&option);
                self.commit(OptionWrapper::candidate(option, label))
            }
            None => self.clear_selection(),
        }
    }

    pub fn set_disabled(&mut self, disabled: bool) -> Vec<Effect<T>> {
        self.state.apply_disabled(disabled);
        if !disabled {
            return Vec::new();
        }
        self.cancel_search();
        self.close()
    }

    /// Clear affordance: empty the input and drop the selection.
    pub fn clear(&mut self) -> Vec<Effect<T>> {
        if self.state.is_disabled() {
            return Vec::new();
        }
        self.clear_selection()
    }

    // ----- search results -----

    /// Apply every search outcome reported so far.
    pub fn drain_search_events(&mut self) -> Vec<SearchEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.search_rx.try_recv() {
            self.apply_search_event(&event);
            events.push(event);
        }
        events
    }

    /// Wait for the next search outcome and apply it.
    pub async fn next_search_event(&mut self) -> Option<SearchEvent> {
        let event = self.search_rx.recv().await?;
        self.apply_search_event(&event);
        Some(event)
    }

    fn apply_search_event(&mut self, event: &SearchEvent) {
        if self.latest_query.as_deref() == Some(event.query()) {
            self.latest_query = None;
            self.state.apply_search_pending(false);
        }
        match event {
            SearchEvent::Completed { query } => {
                debug!(%query, "search completed");
                self.state.apply_search_error(None);
            }
            SearchEvent::Failed { query, message } => {
                warn!(%query, error = %message, "search failed");
                self.state.apply_search_error(Some(message.clone()));
            }
        }
    }

    // ----- transitions -----

    fn input_changed(&mut self) -> Vec<Effect<T>> {
        self.state.selection_mut().reset_highlight();
        self.refilter();
        let mut effects = Vec::new();
        if !self.state.filtered_options().is_empty() && self.state.selection_mut().open() {
            debug!("dropdown opened by matches");
            effects.push(Effect::DropdownOpened);
        }
        let query = self.state.input_value().to_string();
        self.maybe_search(query);
        self.reposition();
        effects
    }

    fn arrow_down(&mut self) -> Vec<Effect<T>> {
        if self.state.filtered_options().is_empty() {
            self.refilter();
            if self.state.filtered_options().is_empty() {
                self.state.selection_mut().reset_highlight();
                return Vec::new();
            }
            let was_closed = self.state.selection_mut().highlight_first();
            self.reposition();
            return if was_closed { vec![Effect::DropdownOpened] } else { Vec::new() };
        }
        let was_closed = !self.state.is_open();
        let len = self.state.filtered_options().len();
        self.state.selection_mut().move_down(len);
        if was_closed {
            self.reposition();
            vec![Effect::DropdownOpened]
        } else {
            Vec::new()
        }
    }

    fn arrow_up(&mut self) -> Vec<Effect<T>> {
        let len = self.state.filtered_options().len();
        match self.state.selection_mut().move_up(len) {
            Step::Closed => {
                self.state.reduce_clear_options();
                self.reposition();
                debug!("dropdown closed by moving above the first row");
                vec![Effect::DropdownClosed]
            }
            Step::Highlighted(_) | Step::Unchanged => Vec::new(),
        }
    }

    fn commit(&mut self, row: OptionWrapper<T>) -> Vec<Effect<T>> {
        debug!(label = %row.actual_label, is_new = row.is_new, "committing option");
        self.state.input_mut().replace(row.actual_label.clone());
        self.state.apply_selected(Some(row.clone()));
        self.state.reduce_clear_options();
        let was_open = self.state.selection_mut().close();
        self.reposition();

        let mut effects = vec![Effect::Select(row.option)];
        if row.is_new && self.config.create_new {
            effects.push(Effect::Create(row.actual_label));
        }
        if was_open {
            effects.push(Effect::DropdownClosed);
        }
        effects
    }

    fn clear_selection(&mut self) -> Vec<Effect<T>> {
        debug!("clearing selection");
        self.cancel_search();
        self.state.input_mut().clear();
        self.state.apply_selected(None);
        self.state.reduce_clear_options();
        let was_open = self.state.selection_mut().close();
        self.reposition();

        let mut effects = vec![Effect::Select(None)];
        if was_open {
            effects.push(Effect::DropdownClosed);
        }
        effects
    }

    fn close(&mut self) -> Vec<Effect<T>> {
        self.state.reduce_clear_options();
        let was_open = self.state.selection_mut().close();
        self.reposition();
        if was_open {
            debug!("dropdown closed");
            vec![Effect::DropdownClosed]
        } else {
            Vec::new()
        }
    }

    fn refilter(&mut self) {
        let config = &self.config;
        let options = filter_options(
            &config.candidates,
            |candidate| config.label_of(candidate),
            self.state.input_value(),
            config.create_prompt(),
        );
        self.state.apply_options(options);
    }

    fn maybe_search(&mut self, query: String) {
        let Some(handler) = self.config.search.clone() else {
            return;
        };
        if query.chars().count() < self.config.min_search_chars {
            self.cancel_search();
            return;
        }
        if self.limiter.is_closed() {
            return;
        }
        debug!(%query, superseding = self.limiter.is_busy(), "scheduling search");
        self.latest_query = Some(query.clone());
        self.state.apply_search_pending(true);
        let events = self.search_tx.clone();
        // Completion is reported through `events`; the handle only tells
        // whether this call was superseded.
        drop(self.limiter.schedule(move || run_search(handler, query, events)));
    }

    fn cancel_search(&mut self) {
        self.limiter.cancel();
        self.latest_query = None;
        self.state.apply_search_pending(false);
    }
}

impl<T> Drop for Controller<T> {
    fn drop(&mut self) {
        self.limiter.shutdown();
        self.subscription = None;
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Controller<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("state", &self.state)
            .field("latest_query", &self.latest_query)
            .field("mounted", &self.subscription.is_some())
            .finish_non_exhaustive()
    }
}
