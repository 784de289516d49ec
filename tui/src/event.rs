//! Input events for the capture session.
//!
//! Raw crossterm events are normalized into a small closed vocabulary before
//! the session sees them. Anything the session has no use for (mouse, focus,
//! key releases, unbound chords) is dropped at this boundary.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// One normalized input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Printable text to insert at the cursor. A single keystroke arrives as a
    /// one-char string; a bracketed paste arrives whole.
    Text {
        content: String,
        bracketed_paste: bool,
    },
    /// An editing or control key.
    Key(Key),
    /// The terminal was resized.
    Resize { cols: u16, rows: u16 },
    /// The event stream ended abnormally. No further events follow.
    Terminate,
}

/// Editing and control keys the session reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Interrupt,
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    DeleteWordBack,
    ClearLine,
}

/// Blocking supplier of session events.
///
/// Implementations deliver events strictly one at a time and must yield
/// [`SessionEvent::Terminate`] as the final event when the underlying stream
/// fails or closes.
pub trait EventSource {
    fn next_event(&mut self) -> SessionEvent;
}

/// Production source backed by crossterm's blocking event stream.
pub struct TerminalEvents;

impl EventSource for TerminalEvents {
    fn next_event(&mut self) -> SessionEvent {
        loop {
            match event::read() {
                Ok(raw) => {
                    if let Some(mapped) = map_event(raw) {
                        return mapped;
                    }
                }
                Err(e) => {
                    tracing::debug!(error = %e, "terminal event stream failed");
                    return SessionEvent::Terminate;
                }
            }
        }
    }
}

fn map_event(event: Event) -> Option<SessionEvent> {
    match event {
        // Press and repeat both act; releases are noise.
        Event::Key(key) if key.kind != KeyEventKind::Release => map_key(&key),
        Event::Paste(content) => Some(SessionEvent::Text {
            content,
            bracketed_paste: true,
        }),
        Event::Resize(cols, rows) => Some(SessionEvent::Resize { cols, rows }),
        _ => None,
    }
}

fn map_key(key: &KeyEvent) -> Option<SessionEvent> {
    match key.code {
        KeyCode::Enter => Some(SessionEvent::Key(Key::Enter)),
        KeyCode::Esc => Some(SessionEvent::Key(Key::Escape)),
        KeyCode::Backspace => Some(SessionEvent::Key(Key::Backspace)),
        KeyCode::Delete => Some(SessionEvent::Key(Key::Delete)),
        KeyCode::Left => Some(SessionEvent::Key(Key::Left)),
        KeyCode::Right => Some(SessionEvent::Key(Key::Right)),
        KeyCode::Home => Some(SessionEvent::Key(Key::Home)),
        KeyCode::End => Some(SessionEvent::Key(Key::End)),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(SessionEvent::Key(Key::Interrupt))
        }
        // Move to start (Ctrl+A)
        KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(SessionEvent::Key(Key::Home))
        }
        // Move to end (Ctrl+E)
        KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(SessionEvent::Key(Key::End))
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(SessionEvent::Key(Key::DeleteWordBack))
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(SessionEvent::Key(Key::ClearLine))
        }
        // Insert character (ignore \r - Enter covers it)
        KeyCode::Char(c)
            if c != '\r' && !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(SessionEvent::Text {
                content: c.to_string(),
                bracketed_paste: false,
            })
        }
        _ => None,
    }
}
