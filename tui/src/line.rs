//! Line buffer state for the input overlay.

use unicode_segmentation::UnicodeSegmentation;

/// Single-line editor with Unicode grapheme cluster support.
///
/// The cursor is a grapheme index, never a byte offset. Every mutator reports
/// whether it changed the buffer so callers can skip redundant redraws.
#[derive(Debug, Default, Clone)]
pub struct LineBuffer {
    pub(crate) text: String,
    pub(crate) cursor: usize,
}

impl LineBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn take_text(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    pub fn enter_text(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let index = self.byte_index();
        self.text.insert_str(index, text);
        let inserted = text.graphemes(true).count();
        // Clamp: an inserted combining mark can merge into the preceding cluster.
        self.cursor = self.clamp_cursor(self.cursor.saturating_add(inserted));
        true
    }

    pub fn delete_char(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let start = self.byte_index_at(self.cursor - 1);
        let end = self.byte_index_at(self.cursor);
        self.text.replace_range(start..end, "");
        self.cursor -= 1;
        true
    }

    pub fn delete_char_forward(&mut self) -> bool {
        if self.cursor >= self.grapheme_count() {
            return false;
        }
        let start = self.byte_index_at(self.cursor);
        let end = self.byte_index_at(self.cursor + 1);
        self.text.replace_range(start..end, "");
        true
    }

    pub fn delete_word_backwards(&mut self) -> bool {
        let mut changed = false;
        while self.cursor > 0 && self.grapheme_is_whitespace(self.cursor - 1) {
            changed |= self.delete_char();
        }
        while self.cursor > 0 && !self.grapheme_is_whitespace(self.cursor - 1) {
            changed |= self.delete_char();
        }
        changed
    }

    pub fn clear(&mut self) -> bool {
        if self.text.is_empty() && self.cursor == 0 {
            return false;
        }
        self.text.clear();
        self.cursor = 0;
        true
    }

    pub fn move_cursor_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn move_cursor_right(&mut self) -> bool {
        if self.cursor >= self.grapheme_count() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn reset_cursor(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor = 0;
        true
    }

    pub fn move_cursor_end(&mut self) -> bool {
        let end = self.grapheme_count();
        if self.cursor == end {
            return false;
        }
        self.cursor = end;
        true
    }

    #[must_use]
    pub fn grapheme_count(&self) -> usize {
        self.text.graphemes(true).count()
    }

    fn grapheme_is_whitespace(&self, index: usize) -> bool {
        self.text
            .graphemes(true)
            .nth(index)
            .is_some_and(|grapheme| grapheme.chars().all(char::is_whitespace))
    }

    fn byte_index(&self) -> usize {
        self.byte_index_at(self.cursor)
    }

    fn byte_index_at(&self, grapheme_index: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .nth(grapheme_index)
            .map_or(self.text.len(), |(i, _)| i)
    }

    fn clamp_cursor(&self, new_cursor_pos: usize) -> usize {
        new_cursor_pos.min(self.grapheme_count())
    }
}
