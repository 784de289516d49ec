//! Sanitization of text that originates outside the program.
//!
//! Two kinds of outside text reach a terminal through this tool: pasted
//! input entering the edit buffer, and model output leaving on stdout.
//! Terminal emulators interpret escape sequences embedded in either one
//! (OSC 52 clipboard writes, OSC 8 hyperlinks, CSI cursor movement), so both
//! paths strip them before the bytes go anywhere visible.

use std::borrow::Cow;

const ESC: char = '\x1b';
const BEL: char = '\x07';

/// Sanitize multi-line text for safe terminal display.
///
/// Strips ANSI escape sequences, C0 controls other than `\n`/`\t`/`\r`,
/// C1 controls, and DEL. Returns `Cow::Borrowed` when the input is already
/// clean, the common case for well-behaved model output.
#[must_use]
pub fn sanitize_text(input: &str) -> Cow<'_, str> {
    scrub(input, Breaks::Keep)
}

/// Sanitize text destined for a single-line edit buffer.
///
/// Everything [`sanitize_text`] strips is stripped here too; additionally
/// each run of line breaks and tabs collapses into a single space, so a
/// pasted multi-line snippet lands in the buffer as one line.
#[must_use]
pub fn sanitize_line(input: &str) -> Cow<'_, str> {
    scrub(input, Breaks::CollapseToSpace)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Breaks {
    Keep,
    CollapseToSpace,
}

fn is_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\t')
}

fn is_stripped_control(c: char) -> bool {
    (c <= '\x1f' && !is_break(c)) || c == '\x7f' || ('\u{0080}'..='\u{009f}').contains(&c)
}

fn scrub(input: &str, breaks: Breaks) -> Cow<'_, str> {
    let clean = !input.chars().any(|c| {
        c == ESC
            || is_stripped_control(c)
            || (breaks == Breaks::CollapseToSpace && is_break(c))
    });
    if clean {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ESC {
            consume_escape(&mut chars);
        } else if c == '\u{009b}' {
            // C1 CSI equivalent carries parameters just like ESC [
            consume_csi_params(&mut chars);
        } else if is_break(c) {
            match breaks {
                Breaks::Keep => out.push(c),
                Breaks::CollapseToSpace => {
                    if !out.ends_with(' ') {
                        out.push(' ');
                    }
                }
            }
        } else if !is_stripped_control(c) {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

/// Consume one escape sequence, positioned just after ESC.
fn consume_escape<I: Iterator<Item = char>>(chars: &mut std::iter::Peekable<I>) {
    let Some(&next) = chars.peek() else {
        return;
    };

    match next {
        // CSI: ESC [ params... final-byte
        '[' => {
            chars.next();
            consume_csi_params(chars);
        }
        // OSC: ESC ] ... (BEL | ESC \)
        ']' => {
            chars.next();
            consume_until_osc_end(chars);
        }
        // DCS / PM / APC: ESC P|^|_ ... ESC \
        'P' | '^' | '_' => {
            chars.next();
            consume_until_st(chars);
        }
        // Charset and line-attribute selectors take one following byte
        '(' | ')' | '*' | '+' | '#' | ' ' => {
            chars.next();
            chars.next();
        }
        // Single-byte commands (cursor save/restore, reset, index, keypad)
        '7' | '8' | 'c' | 'D' | 'E' | 'H' | 'M' | 'N' | 'O' | 'Z' | '=' | '>' | '<' => {
            chars.next();
        }
        // Unrecognized: drop the ESC alone, process the next char normally
        _ => {}
    }
}

/// Consume CSI parameter and intermediate bytes through the final byte.
fn consume_csi_params<I: Iterator<Item = char>>(chars: &mut std::iter::Peekable<I>) {
    while let Some(&c) = chars.peek() {
        if ('\x40'..='\x7e').contains(&c) {
            chars.next();
            return;
        }
        if !('\x20'..='\x3f').contains(&c) {
            return;
        }
        chars.next();
    }
}

/// Consume an OSC body through BEL or ST.
fn consume_until_osc_end<I: Iterator<Item = char>>(chars: &mut std::iter::Peekable<I>) {
    while let Some(c) = chars.next() {
        if c == BEL {
            return;
        }
        if c == ESC && chars.peek() == Some(&'\\') {
            chars.next();
            return;
        }
    }
}

/// Consume a DCS/PM/APC body through ST (ESC \).
fn consume_until_st<I: Iterator<Item = char>>(chars: &mut std::iter::Peekable<I>) {
    while let Some(c) = chars.next() {
        if c == ESC && chars.peek() == Some(&'\\') {
            chars.next();
            return;
        }
    }
}
