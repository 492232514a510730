//! Runtime: terminal lifecycle and the event loop driving one picker.
//!
//! Responsibilities
//! - Own the terminal lifecycle (enter/leave alternate screen, raw mode,
//!   mouse capture).
//! - Read terminal input on a dedicated thread and forward it over a channel.
//! - Route keys and clicks into the controller, publish window level events
//!   to the hub, and collect the returned `Effect`s.
//! - Merge remote search results into the candidate list as they arrive.
//! - Render after every handled event; tick the throbber only while a search
//!   is pending.
//!
//! The loop ends after the first committed selection, on Ctrl+C, or on
//! Escape while the dropdown is closed.
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, MouseButton, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, prelude::*};
use tokio::{
    signal,
    sync::mpsc,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, warn};
use typeahead_engine::{Controller, WindowEventHub};
use typeahead_types::{Effect, Key, Point, WindowEvent};

use crate::ui::keys::{KeyAction, map_key_event};
use crate::ui::typeahead_view::TypeaheadView;

const THROBBER_INTERVAL: Duration = Duration::from_millis(100);
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Batches of candidates produced by a remote search.
pub type RemoteResults<T> = mpsc::UnboundedReceiver<Vec<T>>;

enum Flow<T> {
    Continue(Vec<Effect<T>>),
    Quit,
}

/// Spawn a dedicated input thread that blocks on terminal input and forwards
/// `crossterm` events over a Tokio channel. The thread exits once the
/// receiver is dropped.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);
    std::thread::spawn(move || {
        while !sender.is_closed() {
            match event::poll(INPUT_POLL_INTERVAL) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(error) => {
                    warn!("Failed to poll terminal events: {}", error);
                    break;
                }
            }
            match event::read() {
                Ok(Event::Mouse(mouse)) if mouse.kind == MouseEventKind::Moved => {}
                Ok(event) => {
                    if sender.blocking_send(event).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    warn!("Failed to read terminal event: {}", error);
                    break;
                }
            }
        }
    });
    receiver
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Append the entries of `incoming` not already present in `existing`.
pub fn merge_candidates<T: Clone + PartialEq>(existing: &[T], incoming: Vec<T>) -> Vec<T> {
    let mut merged = existing.to_vec();
    for candidate in incoming {
        if !merged.contains(&candidate) {
            merged.push(candidate);
        }
    }
    merged
}

fn handle_input_event<T: Clone + PartialEq>(
    controller: &mut Controller<T>,
    hub: &WindowEventHub,
    view: &TypeaheadView,
    input_event: Event,
) -> Flow<T> {
    match input_event {
        Event::Key(key_event) => match map_key_event(key_event) {
            KeyAction::Quit => Flow::Quit,
            KeyAction::Forward(Key::Esc) if !controller.state().is_open() => Flow::Quit,
            KeyAction::Forward(key) => Flow::Continue(controller.on_key(key)),
            KeyAction::Ignore => Flow::Continue(Vec::new()),
        },
        Event::Mouse(mouse_event) => {
            let (column, row) = (mouse_event.column, mouse_event.row);
            match mouse_event.kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    hub.publish(WindowEvent::PointerDown(Point::new(column as f32, row as f32)));
                    if view.hits_input(column, row) {
                        Flow::Continue(controller.on_focus())
                    } else if let Some(index) = view.row_at(column, row) {
                        Flow::Continue(controller.on_option_click(index))
                    } else {
                        Flow::Continue(Vec::new())
                    }
                }
                MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                    hub.publish(WindowEvent::Scroll);
                    Flow::Continue(Vec::new())
                }
                _ => Flow::Continue(Vec::new()),
            }
        }
        Event::Resize(width, height) => {
            hub.publish(WindowEvent::Resize {
                width: width as f32,
                height: height as f32,
            });
            Flow::Continue(Vec::new())
        }
        Event::Paste(text) => {
            let mut effects = Vec::new();
            for c in text.chars().filter(|c| !c.is_control()) {
                effects.extend(controller.on_key(Key::Char(c)));
            }
            Flow::Continue(effects)
        }
        Event::FocusGained | Event::FocusLost => Flow::Continue(Vec::new()),
    }
}

/// A selection was committed: a candidate was chosen or a new entry created.
/// Clearing (`Select(None)` alone) does not count.
fn is_commit<T>(effects: &[Effect<T>]) -> bool {
    effects
        .iter()
        .any(|effect| matches!(effect, Effect::Select(Some(_)) | Effect::Create(_)))
}

async fn event_loop<T>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    controller: &mut Controller<T>,
    hub: &WindowEventHub,
    view: &mut TypeaheadView,
    mut remote: Option<RemoteResults<T>>,
) -> Result<Vec<Effect<T>>>
where
    T: Clone + PartialEq,
{
    let mut input_receiver = spawn_input_thread();
    let mut ticker = time::interval(THROBBER_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut effects = Vec::new();
    terminal.draw(|frame| view.render(frame, controller))?;
    effects.extend(controller.on_focus());
    terminal.draw(|frame| view.render(frame, controller))?;

    loop {
        let searching = controller.state().search_pending();
        let mut needs_render = false;
        tokio::select! {
            maybe_event = input_receiver.recv() => {
                let Some(event) = maybe_event else {
                    // Input channel closed; shut down cleanly.
                    break;
                };
                match handle_input_event(controller, hub, view, event) {
                    Flow::Continue(new_effects) => effects.extend(new_effects),
                    Flow::Quit => break,
                }
                needs_render = true;
            }

            Some(search_event) = controller.next_search_event() => {
                debug!(query = %search_event.query(), "search finished");
                needs_render = true;
            }

            maybe_batch = async {
                match remote.as_mut() {
                    Some(receiver) => receiver.recv().await,
                    None => None,
                }
            }, if remote.is_some() => {
                match maybe_batch {
                    Some(batch) => {
                        debug!(count = batch.len(), "remote candidates received");
                        let merged = merge_candidates(&controller.config().candidates, batch);
                        effects.extend(controller.set_candidates(merged));
                        needs_render = true;
                    }
                    None => remote = None,
                }
            }

            _ = ticker.tick(), if searching => {
                view.tick();
                needs_render = true;
            }

            _ = signal::ctrl_c() => { break; }
        }

        effects.extend(controller.pump_window_events());
        if needs_render {
            terminal.draw(|frame| view.render(frame, controller))?;
        }
        if is_commit(&effects) {
            break;
        }
    }
    Ok(effects)
}

/// Run `controller` in the terminal until the user commits or quits.
///
/// Returns every effect the controller produced; a committed selection is
/// the `Effect::Select` among them. The controller is unmounted on return.
pub async fn run_picker<T>(
    mut controller: Controller<T>,
    hub: WindowEventHub,
    mut view: TypeaheadView,
    remote: Option<RemoteResults<T>>,
) -> Result<Vec<Effect<T>>>
where
    T: Clone + PartialEq,
{
    controller.set_layout(Arc::new(view.layout().clone()));
    let mut terminal = setup_terminal().context("failed to prepare the terminal")?;
    let outcome = event_loop(&mut terminal, &mut controller, &hub, &mut view, remote).await;
    controller.unmount();
    cleanup_terminal(&mut terminal).context("failed to restore the terminal")?;
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
    use typeahead_engine::ControllerConfig;

    fn controller(hub: &WindowEventHub) -> Controller<String> {
        let candidates = vec!["Apple".to_string(), "Banana".to_string()];
        Controller::mount(ControllerConfig::new(candidates, |s: &String| s.clone()), hub)
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn merge_appends_only_new_candidates() {
        let existing = vec!["Apple".to_string(), "Kiwi".to_string()];
        let merged = merge_candidates(&existing, vec!["Kiwi".to_string(), "Lime".to_string()]);
        assert_eq!(merged, vec!["Apple", "Kiwi", "Lime"]);
    }

    #[test]
    fn escape_quits_only_while_closed() {
        let hub = WindowEventHub::new();
        let view = TypeaheadView::default();
        let mut controller = controller(&hub);
        controller.on_focus();
        let flow = handle_input_event(&mut controller, &hub, &view, key(KeyCode::Esc));
        assert!(matches!(flow, Flow::Continue(ref effects) if effects == &vec![Effect::DropdownClosed]));
        let flow = handle_input_event(&mut controller, &hub, &view, key(KeyCode::Esc));
        assert!(matches!(flow, Flow::Quit));
    }

    #[test]
    fn typed_keys_reach_the_controller() {
        let hub = WindowEventHub::new();
        let view = TypeaheadView::default();
        let mut controller = controller(&hub);
        controller.on_focus();
        for c in "ban".chars() {
            handle_input_event(&mut controller, &hub, &view, key(KeyCode::Char(c)));
        }
        handle_input_event(&mut controller, &hub, &view, key(KeyCode::Down));
        let Flow::Continue(effects) = handle_input_event(&mut controller, &hub, &view, key(KeyCode::Enter)) else {
            panic!("enter should not quit");
        };
        assert!(is_commit(&effects));
        assert_eq!(effects[0], Effect::Select(Some("Banana".to_string())));
    }

    #[test]
    fn clicks_are_published_to_the_hub() {
        let hub = WindowEventHub::new();
        let view = TypeaheadView::default();
        let mut controller = controller(&hub);
        let mut listener = hub.subscribe();
        let click = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 4,
            row: 7,
            modifiers: KeyModifiers::NONE,
        });
        handle_input_event(&mut controller, &hub, &view, click);
        assert_eq!(listener.drain(), vec![WindowEvent::PointerDown(Point::new(4.0, 7.0))]);
    }

    #[test]
    fn clearing_is_not_a_commit() {
        assert!(!is_commit::<String>(&[Effect::Select(None), Effect::DropdownClosed]));
        assert!(is_commit::<String>(&[Effect::Select(None), Effect::Create("kiwi".into())]));
    }

    #[test]
    fn paste_inserts_text() {
        let hub = WindowEventHub::new();
        let view = TypeaheadView::default();
        let mut controller = controller(&hub);
        handle_input_event(&mut controller, &hub, &view, Event::Paste("app\n".to_string()));
        assert_eq!(controller.state().input_value(), "app");
    }
}
