//! Keyboard input processing.
//!
//! Terminal input is just another control-event producer: key presses either
//! mutate the shared [`UiOptions`] and request a redraw, or translate into a
//! [`ControlEvent`] for the controller. No rendering happens here.

use std::sync::{Arc, Mutex};

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::controller::ControlEvent;

use super::state::UiOptions;

/// Actions that can be triggered by user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ToggleFollow,
    PrevPage,
    NextPage,
    ScrollUp,
    ScrollDown,
    None,
}

/// Map a key event to an action. Release events are ignored so terminals
/// reporting both press and release do not double-fire.
pub fn key_action(key: KeyEvent) -> Action {
    if key.kind == KeyEventKind::Release {
        return Action::None;
    }

    match (key.modifiers, key.code) {
        // Quit: q or Ctrl+C
        (KeyModifiers::NONE, KeyCode::Char('q')) => return Action::Quit,
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Action::Quit,

        // Follow mode: f
        (KeyModifiers::NONE, KeyCode::Char('f')) => return Action::ToggleFollow,

        // Phase page navigation
        (KeyModifiers::NONE, KeyCode::Left) | (KeyModifiers::NONE, KeyCode::Char('h')) => {
            return Action::PrevPage
        }
        (KeyModifiers::NONE, KeyCode::Right) | (KeyModifiers::NONE, KeyCode::Char('l')) => {
            return Action::NextPage
        }

        _ => {}
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Action::ScrollUp,
        KeyCode::Down | KeyCode::Char('j') => Action::ScrollDown,
        _ => Action::None,
    }
}

/// Apply an action to the view options; the returned control event (if any)
/// goes into the merged channel. View mutations ride the tick path so the
/// next render picks them up.
pub fn apply_action(action: Action, opts: &mut UiOptions) -> Option<ControlEvent> {
    match action {
        Action::Quit => Some(ControlEvent::UserInterrupt),
        Action::ToggleFollow => {
            opts.toggle_follow();
            Some(ControlEvent::TimerTick)
        }
        Action::PrevPage => {
            opts.page_prev();
            Some(ControlEvent::TimerTick)
        }
        Action::NextPage => {
            opts.page_next();
            Some(ControlEvent::TimerTick)
        }
        Action::ScrollUp => {
            opts.scroll_up();
            Some(ControlEvent::TimerTick)
        }
        Action::ScrollDown => {
            opts.scroll_down();
            Some(ControlEvent::TimerTick)
        }
        Action::None => None,
    }
}

/// Feeds terminal input into the merged channel. Exits when the terminal
/// event stream ends or the receiver is gone.
pub fn spawn_input(
    tx: mpsc::Sender<ControlEvent>,
    opts: Arc<Mutex<UiOptions>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut stream = EventStream::new();
        while let Some(Ok(event)) = stream.next().await {
            let control = match event {
                Event::Key(key) => {
                    let action = key_action(key);
                    debug!(?action, "key input");
                    let mut opts = opts.lock().unwrap();
                    apply_action(action, &mut opts)
                }
                Event::Resize(w, h) => Some(ControlEvent::WindowResize(w, h)),
                _ => None,
            };
            if let Some(control) = control {
                if tx.send(control).await.is_err() {
                    return;
                }
            }
        }
    })
}
