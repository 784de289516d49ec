//! Terminal overlay and line editing for askcmd.
//!
//! The overlay is drawn with raw escape sequences on whatever `Write` sink it
//! is given (stderr in production) so stdout stays clean for the suggested
//! command. No alternate screen: the prompt renders in place below the shell's
//! current cursor and is erased again when the session ends.

mod event;
mod line;
mod session;

pub use event::{EventSource, Key, SessionEvent, TerminalEvents};
pub use line::LineBuffer;
pub use session::InputSession;
