//! Text input buffer with cursor management.
//!
//! Backs both the multi-line text area and the single-line letters field.
//! The cursor is a byte offset that always sits on a char boundary.

/// A text input buffer with cursor positioning.
#[derive(Debug, Default, Clone)]
pub struct InputBuffer {
    content: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_char(&mut self, c: char) {
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Insert a pasted string at the cursor.
    ///
    /// `\r\n` and bare `\r` are normalized to `\n`.
    pub fn insert_str(&mut self, s: &str) {
        let normalized = s.replace("\r\n", "\n").replace('\r', "\n");
        self.content.insert_str(self.cursor, &normalized);
        self.cursor += normalized.len();
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.prev_boundary();
            self.content.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.content.len() {
            let next = self.next_boundary();
            self.content.drain(self.cursor..next);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.prev_boundary();
    }

    pub fn move_right(&mut self) {
        self.cursor = self.next_boundary();
    }

    /// Move to the start of the current line.
    pub fn move_home(&mut self) {
        self.cursor = self.line_start();
    }

    /// Move to the end of the current line.
    pub fn move_end(&mut self) {
        self.cursor = self.content[self.cursor..]
            .find('\n')
            .map(|i| self.cursor + i)
            .unwrap_or(self.content.len());
    }

    /// Move up one line, keeping the column where possible.
    pub fn move_up(&mut self) {
        let (line, col) = self.line_col();
        if line > 0 {
            self.set_line_col(line - 1, col);
        }
    }

    /// Move down one line, keeping the column where possible.
    pub fn move_down(&mut self) {
        let (line, col) = self.line_col();
        if line + 1 < self.line_count() {
            self.set_line_col(line + 1, col);
        }
    }

    /// Replace the whole content, cursor at the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.content = text.into();
        self.cursor = self.content.len();
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    pub fn text(&self) -> &str {
        &self.content
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    pub fn line_count(&self) -> usize {
        self.content.split('\n').count()
    }

    /// Cursor as (line, column), both zero-based, column counted in chars.
    pub fn line_col(&self) -> (usize, usize) {
        let before = &self.content[..self.cursor];
        let line = before.matches('\n').count();
        let col = before[self.line_start()..].chars().count();
        (line, col)
    }

    fn set_line_col(&mut self, line: usize, col: usize) {
        let mut offset = 0;
        for (i, l) in self.content.split('\n').enumerate() {
            if i == line {
                let within = l
                    .char_indices()
                    .nth(col)
                    .map(|(b, _)| b)
                    .unwrap_or(l.len());
                self.cursor = offset + within;
                return;
            }
            offset += l.len() + 1;
        }
    }

    fn line_start(&self) -> usize {
        self.content[..self.cursor]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    fn prev_boundary(&self) -> usize {
        self.content[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.content[self.cursor..]
            .char_indices()
            .nth(1)
            .map(|(i, _)| self.cursor + i)
            .unwrap_or(self.content.len())
    }
}
