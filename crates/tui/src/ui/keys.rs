//! Translation of crossterm key events into controller keys.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use typeahead_types::Key;

/// What the runtime should do with a terminal key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// Forward to the controller
    Forward(Key),
    /// Leave the picker without a selection
    Quit,
    Ignore,
}

pub fn map_key_event(event: KeyEvent) -> KeyAction {
    if event.kind == KeyEventKind::Release {
        return KeyAction::Ignore;
    }
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return match event.code {
            KeyCode::Char('c') | KeyCode::Char('d') => KeyAction::Quit,
            _ => KeyAction::Ignore,
        };
    }
    let key = match event.code {
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Tab | KeyCode::BackTab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Char(c) => Key::Char(c),
        _ => return KeyAction::Ignore,
    };
    KeyAction::Forward(key)
}
