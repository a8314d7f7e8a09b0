/// Prompt buffer plus the recall history behind Up/Down.
///
/// `history_index` ranges over `0..=history.len()`; `history.len()` means
/// "past the newest entry", where a fresh line is being typed.
#[derive(Debug, Default)]
pub(crate) struct InputState {
    buffer: String,
    cursor: usize,
    history: Vec<String>,
    history_index: usize,
}

impl InputState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn text(&self) -> &str {
        &self.buffer
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    #[cfg(test)]
    pub(crate) fn history(&self) -> &[String] {
        &self.history
    }

    #[cfg(test)]
    pub(crate) fn history_index(&self) -> usize {
        self.history_index
    }

    pub(crate) fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    pub(crate) fn set_text(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.cursor = self.buffer.len();
    }

    /// Append a submitted line and park the index past the end.
    /// Every submitted line is kept, blank ones included.
    pub(crate) fn record(&mut self, line: &str) {
        self.history.push(line.to_string());
        self.history_index = self.history.len();
    }

    pub(crate) fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        self.history_index = self.history_index.saturating_sub(1);
        let line = self.history[self.history_index].clone();
        self.set_text(&line);
    }

    pub(crate) fn history_next(&mut self) {
        if self.history_index >= self.history.len() {
            return;
        }
        self.history_index += 1;
        match self.history.get(self.history_index).cloned() {
            Some(line) => self.set_text(&line),
            None => self.clear(),
        }
    }

    pub(crate) fn insert_char(&mut self, c: char) {
        if self.cursor >= self.buffer.len() {
            self.buffer.push(c);
        } else {
            self.buffer.insert(self.cursor, c);
        }
        self.cursor += c.len_utf8();
    }

    /// Pasted text lands on the single prompt line.
    pub(crate) fn insert_str(&mut self, s: &str) {
        for c in s.chars() {
            match c {
                '\r' | '\n' | '\t' => self.insert_char(' '),
                c => self.insert_char(c),
            }
        }
    }

    pub(crate) fn backspace(&mut self) {
        if self.cursor == 0 || self.buffer.is_empty() {
            return;
        }
        if let Some(prev_idx) = self.buffer[..self.cursor]
            .char_indices()
            .last()
            .map(|(i, _)| i)
        {
            self.buffer.drain(prev_idx..self.cursor);
            self.cursor = prev_idx;
        }
    }

    pub(crate) fn backspace_word(&mut self) {
        while self.cursor > 0 && self.buffer[..self.cursor].ends_with(' ') {
            self.backspace();
        }
        while self.cursor > 0 && !self.buffer[..self.cursor].ends_with(' ') {
            self.backspace();
        }
    }

    pub(crate) fn delete(&mut self) {
        let Some(ch) = self.buffer[self.cursor..].chars().next() else {
            return;
        };
        let end = self.cursor + ch.len_utf8();
        self.buffer.drain(self.cursor..end);
    }

    pub(crate) fn move_left(&mut self) {
        if let Some(prev_idx) = self.buffer[..self.cursor]
            .char_indices()
            .last()
            .map(|(i, _)| i)
        {
            self.cursor = prev_idx;
        }
    }

    pub(crate) fn move_right(&mut self) {
        if let Some(ch) = self.buffer[self.cursor..].chars().next() {
            self.cursor += ch.len_utf8();
        }
    }

    pub(crate) fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub(crate) fn move_end(&mut self) {
        self.cursor = self.buffer.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn with_history(lines: &[&str]) -> InputState {
        let mut input = InputState::new();
        for line in lines {
            input.record(line);
        }
        input
    }

    #[test]
    fn up_walks_back_and_clamps_at_oldest() {
        let mut input = with_history(&["a", "b", "c"]);
        let mut seen = Vec::new();
        for _ in 0..4 {
            input.history_prev();
            seen.push(input.text().to_string());
        }
        assert_eq!(seen, vec!["c", "b", "a", "a"]);
        assert_eq!(input.history_index(), 0);
    }

    #[test]
    fn down_past_newest_clears_then_stops() {
        let mut input = with_history(&["a", "b"]);
        input.history_prev();
        input.history_prev();
        input.history_next();
        assert_eq!(input.text(), "b");
        input.history_next();
        assert_eq!(input.text(), "");
        assert_eq!(input.history_index(), 2);

        input.insert_str("draft");
        input.history_next();
        assert_eq!(input.text(), "draft");
        assert_eq!(input.history_index(), 2);
    }

    #[test]
    fn up_on_empty_history_is_a_noop() {
        let mut input = InputState::new();
        input.insert_str("typing");
        input.history_prev();
        assert_eq!(input.text(), "typing");
        assert_eq!(input.history_index(), 0);
    }

    #[test]
    fn lines_are_recorded_verbatim() {
        let mut input = with_history(&["a", "", " b "]);
        assert_eq!(
            input.history(),
            &["a".to_string(), String::new(), " b ".to_string()]
        );
        assert_eq!(input.history_index(), 3);

        input.history_prev();
        assert_eq!(input.text(), " b ");
        input.history_prev();
        assert_eq!(input.text(), "");
    }

    #[test]
    fn recall_moves_cursor_to_end() {
        let mut input = with_history(&["hello"]);
        input.history_prev();
        assert_eq!(input.cursor(), 5);
    }

    #[test]
    fn editing_respects_char_boundaries() {
        let mut input = InputState::new();
        input.insert_str("héllo");
        input.move_left();
        input.move_left();
        input.move_left();
        input.move_left();
        input.backspace();
        assert_eq!(input.text(), "éllo");
        input.delete();
        assert_eq!(input.text(), "llo");
        input.move_end();
        input.insert_char('!');
        assert_eq!(input.text(), "llo!");
    }

    #[test]
    fn paste_newlines_become_spaces() {
        let mut input = InputState::new();
        input.insert_str("echo a\nb\r\n");
        assert_eq!(input.text(), "echo a b  ");
    }

    #[test]
    fn backspace_word_removes_last_word() {
        let mut input = InputState::new();
        input.insert_str("echo hello world  ");
        input.backspace_word();
        assert_eq!(input.text(), "echo hello ");
    }
}
