//! Editable caption buffer with a hard length limit.
//!
//! The server rejects media descriptions longer than 1500 characters, so the
//! buffer mirrors that limit client-side: insertions that would push the
//! content past the limit are rejected at the point of entry rather than
//! flagged afterwards. Cursor movement understands multi-line text.

/// Maximum length of a media description, in characters.
/// Mirrors the server-side limit on media attachment descriptions.
pub const MAX_CAPTION_CHARS: usize = 1500;

/// The caption being edited: text plus a cursor (byte offset).
#[derive(Debug, Clone)]
pub struct CaptionBuffer {
    text: String,
    cursor: usize,
}

impl CaptionBuffer {
    /// Create a buffer seeded from an existing description, or empty if the
    /// attachment has none. Seeds longer than the limit are truncated.
    pub fn new(existing: Option<&str>) -> Self {
        let mut text = existing.unwrap_or_default().to_string();
        if text.chars().count() > MAX_CAPTION_CHARS {
            let end = text
                .char_indices()
                .nth(MAX_CAPTION_CHARS)
                .map(|(i, _)| i)
                .unwrap_or(text.len());
            text.truncate(end);
        }
        let cursor = text.len();
        Self { text, cursor }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of characters currently in the buffer.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Characters still available before the limit is reached.
    pub fn remaining(&self) -> usize {
        MAX_CAPTION_CHARS.saturating_sub(self.char_count())
    }

    /// Cursor position as a byte offset into the text.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn clamp_cursor(&mut self) {
        if self.cursor > self.text.len() {
            self.cursor = self.text.len();
        }
    }

    /// Insert a character at the cursor. Returns false if the buffer is full.
    pub fn insert_char(&mut self, c: char) -> bool {
        if self.remaining() == 0 {
            return false;
        }
        self.clamp_cursor();
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        true
    }

    /// Insert a newline at the cursor (captions are multi-line).
    pub fn insert_newline(&mut self) -> bool {
        self.insert_char('\n')
    }

    /// Insert a string at the cursor, truncating it so the buffer never
    /// exceeds the limit. Returns the number of characters actually inserted.
    pub fn insert_str(&mut self, s: &str) -> usize {
        let room = self.remaining();
        if room == 0 || s.is_empty() {
            return 0;
        }
        self.clamp_cursor();
        let take = s.chars().count().min(room);
        let end = s
            .char_indices()
            .nth(take)
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        let slice = &s[..end];
        self.text.insert_str(self.cursor, slice);
        self.cursor += slice.len();
        take
    }

    /// Delete the character before the cursor.
    pub fn delete_char(&mut self) {
        self.clamp_cursor();
        if self.cursor > 0 {
            let prev = self.text[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.text.remove(prev);
            self.cursor = prev;
        }
    }

    /// Delete the word before the cursor (Ctrl+W).
    pub fn delete_word(&mut self) {
        self.clamp_cursor();
        if self.cursor == 0 {
            return;
        }
        let mut end = self.cursor;
        while end > 0 && self.text.as_bytes().get(end - 1) == Some(&b' ') {
            end -= 1;
        }
        let mut start = end;
        while start > 0 && self.text.as_bytes().get(start - 1) != Some(&b' ') {
            start -= 1;
        }
        self.text.drain(start..self.cursor);
        self.cursor = start;
    }

    /// Line number and column of the cursor within the text.
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let before = &self.text[..self.cursor.min(self.text.len())];
        let line = before.matches('\n').count();
        let col = before
            .rfind('\n')
            .map(|p| self.cursor - p - 1)
            .unwrap_or(self.cursor);
        (line, col)
    }

    /// Move the cursor up one line, keeping the column where possible.
    pub fn cursor_up(&mut self) {
        let (line, col) = self.cursor_line_col();
        if line == 0 {
            return;
        }
        let lines: Vec<&str> = self.text.split('\n').collect();
        let prev_line = lines[line - 1];
        let prev_start: usize = lines[..line - 1].iter().map(|l| l.len() + 1).sum();
        self.cursor = prev_start + col.min(prev_line.len());
    }

    /// Move the cursor down one line, keeping the column where possible.
    pub fn cursor_down(&mut self) {
        let lines: Vec<&str> = self.text.split('\n').collect();
        let (line, col) = self.cursor_line_col();
        if line + 1 >= lines.len() {
            return;
        }
        let next_line = lines[line + 1];
        let next_start: usize = lines[..line + 1].iter().map(|l| l.len() + 1).sum();
        self.cursor = next_start + col.min(next_line.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_from_existing_text() {
        let buf = CaptionBuffer::new(Some("A cat"));
        assert_eq!(buf.as_str(), "A cat");
        assert_eq!(buf.cursor(), 5);
    }

    #[test]
    fn seeds_empty_when_absent() {
        let buf = CaptionBuffer::new(None);
        assert!(buf.is_empty());
        assert_eq!(buf.cursor(), 0);
    }

    #[test]
    fn oversized_seed_is_truncated() {
        let long = "x".repeat(MAX_CAPTION_CHARS + 100);
        let buf = CaptionBuffer::new(Some(long.as_str()));
        assert_eq!(buf.char_count(), MAX_CAPTION_CHARS);
    }

    #[test]
    fn insert_char_rejected_at_limit() {
        let full = "x".repeat(MAX_CAPTION_CHARS);
        let mut buf = CaptionBuffer::new(Some(full.as_str()));
        assert!(!buf.insert_char('y'));
        assert_eq!(buf.char_count(), MAX_CAPTION_CHARS);
    }

    #[test]
    fn insert_str_truncates_to_fit() {
        let seed = "x".repeat(MAX_CAPTION_CHARS - 10);
        let mut buf = CaptionBuffer::new(Some(seed.as_str()));
        let inserted = buf.insert_str(&"y".repeat(50));
        assert_eq!(inserted, 10);
        assert_eq!(buf.char_count(), MAX_CAPTION_CHARS);
    }

    #[test]
    fn insert_str_counts_chars_not_bytes() {
        let seed = "x".repeat(MAX_CAPTION_CHARS - 2);
        let mut buf = CaptionBuffer::new(Some(seed.as_str()));
        // Two multi-byte chars fit exactly.
        assert_eq!(buf.insert_str("éé"), 2);
        assert_eq!(buf.char_count(), MAX_CAPTION_CHARS);
        assert!(!buf.insert_char('z'));
    }

    #[test]
    fn typed_input_never_exceeds_limit() {
        let mut buf = CaptionBuffer::new(Some("A cat"));
        for _ in 0..1600 {
            buf.insert_char('a');
        }
        assert_eq!(buf.char_count(), MAX_CAPTION_CHARS);
    }

    #[test]
    fn delete_char_handles_multibyte() {
        let mut buf = CaptionBuffer::new(Some("café"));
        buf.delete_char();
        assert_eq!(buf.as_str(), "caf");
    }

    #[test]
    fn delete_word_removes_trailing_word() {
        let mut buf = CaptionBuffer::new(Some("a grey cat"));
        buf.delete_word();
        assert_eq!(buf.as_str(), "a grey ");
        buf.delete_word();
        assert_eq!(buf.as_str(), "a ");
    }

    #[test]
    fn cursor_moves_between_lines() {
        let mut buf = CaptionBuffer::new(Some("first\nsecond"));
        // Cursor starts at the end of "second".
        assert_eq!(buf.cursor_line_col(), (1, 6));
        buf.cursor_up();
        assert_eq!(buf.cursor_line_col(), (0, 5));
        buf.cursor_down();
        assert_eq!(buf.cursor_line_col(), (1, 5));
    }

    #[test]
    fn newline_counts_against_limit() {
        let full = "x".repeat(MAX_CAPTION_CHARS);
        let mut buf = CaptionBuffer::new(Some(full.as_str()));
        assert!(!buf.insert_newline());
    }
}
