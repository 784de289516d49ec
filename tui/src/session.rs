//! Interactive capture session for one line of input.

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{self, Attribute, Color},
    terminal::{self, ClearType},
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use askcmd_types::{SessionOutcome, sanitize_line};

use crate::event::{EventSource, Key, SessionEvent};
use crate::line::LineBuffer;

const BANNER_TITLE: &str = "AI Command Suggestion";
const BANNER_INSTRUCTION: &str = "Describe what command you want:";
const PROMPT_PREFIX: &str = "> ";

/// One interactive prompt drawn in place below the current cursor.
///
/// The session prints a two-line banner, saves the cursor position as an
/// anchor, and redraws the prompt line from that anchor after every edit.
/// The sink is raw-mode terminal output (stderr in production), so lines end
/// with `\r\n` and all drawing goes through explicit escape sequences.
///
/// On drop the overlay below the banner is erased again, whether the session
/// committed, was cancelled, or failed with an I/O error.
pub struct InputSession<E, W: Write> {
    events: E,
    out: W,
    buffer: LineBuffer,
    screen_cols: u16,
    anchored: bool,
}

impl<E: EventSource, W: Write> InputSession<E, W> {
    #[must_use]
    pub fn new(events: E, out: W, screen_cols: u16) -> Self {
        Self {
            events,
            out,
            buffer: LineBuffer::new(),
            screen_cols: screen_cols.max(1),
            anchored: false,
        }
    }

    /// Runs the session to completion.
    ///
    /// Enter commits the buffer as typed; Escape, Ctrl+C and an abnormal end
    /// of the event stream all cancel. Only buffer-changing events trigger a
    /// redraw, so holding Left at the start of the line writes nothing.
    pub fn run(mut self) -> io::Result<SessionOutcome> {
        self.draw_banner()?;
        self.redraw()?;

        loop {
            match self.events.next_event() {
                SessionEvent::Text {
                    content,
                    bracketed_paste,
                } => {
                    if bracketed_paste {
                        tracing::debug!(bytes = content.len(), "paste received");
                    }
                    let clean = sanitize_line(&content);
                    if self.buffer.enter_text(&clean) {
                        self.redraw()?;
                    }
                }
                SessionEvent::Key(Key::Enter) => {
                    return Ok(SessionOutcome::Committed(self.buffer.take_text()));
                }
                SessionEvent::Key(Key::Escape | Key::Interrupt) => {
                    return Ok(SessionOutcome::Cancelled);
                }
                SessionEvent::Key(key) => {
                    if apply_edit(&mut self.buffer, key) {
                        self.redraw()?;
                    }
                }
                SessionEvent::Resize { cols, .. } => {
                    self.screen_cols = cols.max(1);
                    self.redraw()?;
                }
                SessionEvent::Terminate => return Ok(SessionOutcome::Cancelled),
            }
        }
    }

    fn draw_banner(&mut self) -> io::Result<()> {
        queue!(
            self.out,
            style::SetAttribute(Attribute::Bold),
            style::SetForegroundColor(Color::Cyan),
            style::Print(BANNER_TITLE),
            style::ResetColor,
            style::SetAttribute(Attribute::Reset),
            style::Print("\r\n"),
            style::Print(BANNER_INSTRUCTION),
            style::Print("\r\n\r\n"),
            cursor::SavePosition,
        )?;
        self.out.flush()?;
        self.anchored = true;
        Ok(())
    }

    /// Repaints the prompt line from the saved anchor.
    ///
    /// The anchor is restored and re-saved on every pass so the redraw always
    /// starts from the same cell, then everything below is cleared and drawn
    /// fresh in a single flush.
    fn redraw(&mut self) -> io::Result<()> {
        let view = visible_span(self.buffer.text(), self.buffer.cursor(), self.screen_cols);
        queue!(
            self.out,
            cursor::RestorePosition,
            cursor::SavePosition,
            terminal::Clear(ClearType::FromCursorDown),
            style::Print(PROMPT_PREFIX),
            style::Print(view.text),
            cursor::MoveToColumn(view.cursor_col),
        )?;
        self.out.flush()
    }
}

impl<E, W: Write> Drop for InputSession<E, W> {
    fn drop(&mut self) {
        if !self.anchored {
            return;
        }
        // Best-effort erase; the terminal may already be gone.
        let _ = queue!(
            self.out,
            cursor::RestorePosition,
            terminal::Clear(ClearType::FromCursorDown),
        );
        let _ = self.out.flush();
    }
}

fn apply_edit(buffer: &mut LineBuffer, key: Key) -> bool {
    match key {
        Key::Backspace => buffer.delete_char(),
        Key::Delete => buffer.delete_char_forward(),
        Key::Left => buffer.move_cursor_left(),
        Key::Right => buffer.move_cursor_right(),
        Key::Home => buffer.reset_cursor(),
        Key::End => buffer.move_cursor_end(),
        Key::DeleteWordBack => buffer.delete_word_backwards(),
        Key::ClearLine => buffer.clear(),
        Key::Enter | Key::Escape | Key::Interrupt => false,
    }
}

struct LineView<'a> {
    text: &'a str,
    cursor_col: u16,
}

/// Selects the slice of the buffer that fits on screen.
///
/// One column is reserved past the prompt so the cursor can sit after the
/// last grapheme without wrapping. When the buffer is wider than the window
/// the slice ends at the cursor, keeping it visible at the right edge. Wide
/// graphemes are never split across the window boundary.
fn visible_span(text: &str, cursor: usize, screen_cols: u16) -> LineView<'_> {
    let available = usize::from(screen_cols).saturating_sub(PROMPT_PREFIX.len() + 1);
    let clusters: Vec<(usize, &str)> = text.grapheme_indices(true).collect();
    let cursor = cursor.min(clusters.len());

    let mut used = 0usize;
    let mut start = cursor;
    while start > 0 {
        let width = clusters[start - 1].1.width();
        if used + width > available {
            break;
        }
        used += width;
        start -= 1;
    }
    let mut end = cursor;
    while end < clusters.len() {
        let width = clusters[end].1.width();
        if used + width > available {
            break;
        }
        used += width;
        end += 1;
    }

    let byte_start = clusters.get(start).map_or(text.len(), |&(i, _)| i);
    let byte_end = clusters.get(end).map_or(text.len(), |&(i, _)| i);
    let before_cursor: usize = clusters[start..cursor].iter().map(|&(_, g)| g.width()).sum();
    let cursor_col = (PROMPT_PREFIX.len() + before_cursor)
        .min(usize::from(screen_cols).saturating_sub(1)) as u16;

    LineView {
        text: &text[byte_start..byte_end],
        cursor_col,
    }
}
