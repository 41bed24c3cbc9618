/// Multi-line text being typed into a form, with a cursor.
///
/// The cursor is a byte offset that always sits on a char boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    content: String,
    cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.content
    }

    #[cfg(test)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn into_string(self) -> String {
        self.content
    }

    pub fn insert(&mut self, c: char) {
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn newline(&mut self) {
        self.insert('\n');
    }

    pub fn backspace(&mut self) {
        if let Some(c) = self.content[..self.cursor].chars().next_back() {
            self.cursor -= c.len_utf8();
            self.content.remove(self.cursor);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.content.len() {
            self.content.remove(self.cursor);
        }
    }

    pub fn left(&mut self) {
        if let Some(c) = self.content[..self.cursor].chars().next_back() {
            self.cursor -= c.len_utf8();
        }
    }

    pub fn right(&mut self) {
        if let Some(c) = self.content[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    fn line_start(&self, pos: usize) -> usize {
        self.content[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0)
    }

    fn line_end(&self, pos: usize) -> usize {
        self.content[pos..]
            .find('\n')
            .map(|i| pos + i)
            .unwrap_or(self.content.len())
    }

    /// Moves to `column` chars into the line starting at `start`, clamped to its end.
    fn seek_column(&mut self, start: usize, column: usize) {
        let end = self.line_end(start);
        self.cursor = self.content[start..end]
            .char_indices()
            .nth(column)
            .map(|(i, _)| start + i)
            .unwrap_or(end);
    }

    fn column(&self) -> usize {
        self.content[self.line_start(self.cursor)..self.cursor]
            .chars()
            .count()
    }

    pub fn up(&mut self) {
        let start = self.line_start(self.cursor);
        if start == 0 {
            return;
        }
        let column = self.column();
        let prev_start = self.line_start(start - 1);
        self.seek_column(prev_start, column);
    }

    pub fn down(&mut self) {
        let end = self.line_end(self.cursor);
        if end == self.content.len() {
            return;
        }
        let column = self.column();
        self.seek_column(end + 1, column);
    }

    /// The text with a bar drawn at the cursor, for rendering.
    pub fn with_cursor(&self, visible: bool) -> String {
        let mut shown = self.content.clone();
        if visible {
            shown.insert(self.cursor, '|');
        }
        shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(s: &str) -> TextInput {
        let mut input = TextInput::new();
        for c in s.chars() {
            if c == '\n' {
                input.newline();
            } else {
                input.insert(c);
            }
        }
        input
    }

    #[test]
    fn editing_respects_multibyte_chars() {
        let mut input = typed("caffè ☀️");
        input.backspace();
        input.backspace();
        input.backspace();
        assert_eq!(input.as_str(), "caffè");
        input.left();
        input.insert('e');
        assert_eq!(input.as_str(), "caffeè");
        input.delete();
        assert_eq!(input.as_str(), "caffe");
        assert_eq!(input.cursor(), 5);
    }

    #[test]
    fn vertical_movement_keeps_column_clamped() {
        let mut input = typed("long first line\nab\nthird line");
        input.up();
        assert_eq!(input.cursor(), "long first line\nab".len());
        input.up();
        assert_eq!(input.cursor(), 2);
        input.up();
        assert_eq!(input.cursor(), 2);
        input.down();
        input.down();
        assert_eq!(input.cursor(), "long first line\nab\nth".len());
        input.down();
        assert_eq!(input.cursor(), "long first line\nab\nth".len());
    }

    #[test]
    fn cursor_bar_is_rendered_at_cursor() {
        let mut input = typed("abc");
        input.left();
        assert_eq!(input.with_cursor(true), "ab|c");
        assert_eq!(input.with_cursor(false), "abc");
    }

    #[test]
    fn edges_are_no_ops() {
        let mut input = TextInput::new();
        input.backspace();
        input.delete();
        input.left();
        input.right();
        assert!(input.is_empty());
        assert_eq!(input.cursor(), 0);
    }
}
