//! Terminal rendering of a typeahead controller.
//!
//! Draws the input line (placeholder, caret, search throbber, clear hint and
//! the last search error) and, while the controller is open, the dropdown
//! overlay on whichever side of the input the controller chose. The view
//! also remembers where it drew rows so mouse clicks can be mapped back to
//! option indices.

use ratatui::{
    Frame,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Clear, List, ListItem, ListState, Paragraph},
};
use typeahead_engine::{Controller, ControllerState};
use unicode_width::UnicodeWidthStr;

use crate::ui::layout::{MAX_VISIBLE_ROWS, TerminalLayout, bounds_to_rect};
use crate::ui::theme::{NordTheme, Theme, theme_helpers as th};

static FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const INPUT_HEIGHT: u16 = 3;

/// Vertical position of the input line in the terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputRow {
    Top,
    #[default]
    Center,
    Bottom,
}

impl InputRow {
    fn place(self, area: Rect) -> Rect {
        let height = INPUT_HEIGHT.min(area.height);
        let free = area.height - height;
        let y = match self {
            InputRow::Top => area.y,
            InputRow::Center => area.y + free / 2,
            InputRow::Bottom => area.y + free,
        };
        Rect::new(area.x, y, area.width, height)
    }
}

/// Rows painted in the last frame: inner list area and the index of the
/// first visible option.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct RenderedRows {
    area: Rect,
    first: usize,
}

#[derive(Debug)]
pub struct TypeaheadView {
    theme: Box<dyn Theme>,
    layout: TerminalLayout,
    input_row: InputRow,
    title: Option<String>,
    throbber_idx: usize,
    rendered_rows: Option<RenderedRows>,
}

impl Default for TypeaheadView {
    fn default() -> Self {
        Self::new(TerminalLayout::new())
    }
}

impl TypeaheadView {
    pub fn new(layout: TerminalLayout) -> Self {
        Self {
            theme: Box::new(NordTheme::new()),
            layout,
            input_row: InputRow::default(),
            title: None,
            throbber_idx: 0,
            rendered_rows: None,
        }
    }

    pub fn with_theme(mut self, theme: Box<dyn Theme>) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_input_row(mut self, input_row: InputRow) -> Self {
        self.input_row = input_row;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn layout(&self) -> &TerminalLayout {
        &self.layout
    }

    /// Advance the search throbber by one frame.
    pub fn tick(&mut self) {
        self.throbber_idx = self.throbber_idx.wrapping_add(1);
    }

    /// Whether the cell at (`column`, `row`) belongs to the input line.
    pub fn hits_input(&self, column: u16, row: u16) -> bool {
        self.layout
            .input_area()
            .is_some_and(|area| area.contains((column, row).into()))
    }

    /// Option index drawn at (`column`, `row`) in the last frame.
    pub fn row_at(&self, column: u16, row: u16) -> Option<usize> {
        let rows = self.rendered_rows?;
        if !rows.area.contains((column, row).into()) {
            return None;
        }
        Some(rows.first + usize::from(row - rows.area.y))
    }

    pub fn render<T>(&mut self, frame: &mut Frame, controller: &mut Controller<T>)
    where
        T: Clone + PartialEq,
    {
        let area = frame.area();
        let input_area = self.input_row.place(area);
        self.layout.record(input_area, area);
        controller.reposition();

        let state = controller.state();
        frame.render_widget(self.input_paragraph(state), input_area);
        if !state.is_disabled() {
            let caret = UnicodeWidthStr::width(state.text_input().before_cursor()) as u16;
            let max_x = input_area.right().saturating_sub(2);
            frame.set_cursor_position(((input_area.x + 1 + caret).min(max_x), input_area.y + 1));
        }

        self.rendered_rows = None;
        let Some(bounds) = controller.panel_bounds() else {
            return;
        };
        let panel = bounds_to_rect(bounds, area);
        if panel.height <= 2 {
            return;
        }
        self.render_panel(frame, panel, controller.state());
    }

    fn input_paragraph<'a, T>(&'a self, state: &'a ControllerState<T>) -> Paragraph<'a> {
        let theme = &*self.theme;
        let mut spans: Vec<Span<'a>> = Vec::new();
        if state.input_value().is_empty() {
            spans.push(Span::styled(state.placeholder(), theme.text_muted_style()));
        } else {
            spans.push(Span::styled(state.input_value(), theme.text_primary_style()));
        }
        if state.search_pending() {
            let sym = FRAMES[self.throbber_idx % FRAMES.len()];
            spans.push(Span::styled(format!(" {sym}"), theme.accent_emphasis_style()));
        }

        let mut block = th::block(theme, self.title.as_deref(), !state.is_disabled());
        if state.show_clear() {
            block = block.title(Line::from(Span::styled(" × ", theme.text_muted_style())).right_aligned());
        }
        if let Some(error) = state.search_error() {
            block = block.title_bottom(Line::from(Span::styled(format!(" ✖ {error} "), theme.status_error())));
        }
        Paragraph::new(Line::from(spans)).style(theme.text_primary_style()).block(block)
    }

    fn render_panel<T>(&mut self, frame: &mut Frame, panel: Rect, state: &ControllerState<T>) {
        let theme = &*self.theme;
        let options = state.filtered_options();
        let selected = state.selected_index();
        let first = match selected {
            Some(index) if index >= MAX_VISIBLE_ROWS => index + 1 - MAX_VISIBLE_ROWS,
            _ => 0,
        };
        let items: Vec<ListItem> = options
            .iter()
            .skip(first)
            .take(MAX_VISIBLE_ROWS)
            .map(|row| {
                let style = if row.is_new {
                    theme.create_row_style()
                } else {
                    theme.text_primary_style()
                };
                ListItem::new(Line::from(Span::styled(row.display_label().to_string(), style)))
            })
            .collect();

        let block = th::block(theme, None, true);
        let inner = block.inner(panel);
        let list = List::new(items)
            .block(block)
            .highlight_style(theme.selection_style().add_modifier(Modifier::BOLD))
            .style(th::panel_style(theme))
            .highlight_symbol("► ");
        let mut list_state = ListState::default();
        list_state.select(selected.map(|index| index - first));

        frame.render_widget(Clear, panel);
        frame.render_stateful_widget(list, panel, &mut list_state);
        self.rendered_rows = Some(RenderedRows {
            area: inner,
            first: first + list_state.offset(),
        });
    }
}
