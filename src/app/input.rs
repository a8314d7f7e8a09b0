use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::*;
use crate::widget::InputState;

impl App {
    pub(super) fn handle_paste_event(&mut self, raw: &str) {
        if raw.is_empty() {
            return;
        }
        self.widget.edit(|input| input.insert_str(raw));
        self.reset_blink();
    }

    pub(super) fn handle_key(&mut self, key: KeyEvent) {
        self.reset_blink();

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('d') => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char('a') => {
                    self.widget.edit(InputState::move_home);
                    return;
                }
                KeyCode::Char('e') => {
                    self.widget.edit(InputState::move_end);
                    return;
                }
                KeyCode::Char('u') => {
                    self.widget.edit(InputState::clear);
                    return;
                }
                KeyCode::Char('w') => {
                    self.widget.edit(InputState::backspace_word);
                    return;
                }
                KeyCode::Char('p') => {
                    self.widget.history_prev();
                    return;
                }
                KeyCode::Char('n') => {
                    self.widget.history_next();
                    return;
                }
                _ => {}
            }
        }

        if key.modifiers.contains(KeyModifiers::ALT) && matches!(key.code, KeyCode::Backspace) {
            self.widget.edit(InputState::backspace_word);
            return;
        }

        match key.code {
            KeyCode::PageUp => self.view.scroll_up(SCROLL_STEP),
            KeyCode::PageDown => self.view.scroll_down(SCROLL_STEP),
            KeyCode::Up => self.widget.history_prev(),
            KeyCode::Down => self.widget.history_next(),
            KeyCode::Enter => self.widget.submit(&mut self.view),
            KeyCode::Backspace => self.widget.edit(InputState::backspace),
            KeyCode::Delete => self.widget.edit(InputState::delete),
            KeyCode::Left => self.widget.edit(InputState::move_left),
            KeyCode::Right => self.widget.edit(InputState::move_right),
            KeyCode::Home => self.widget.edit(InputState::move_home),
            KeyCode::End => self.widget.edit(InputState::move_end),
            KeyCode::Char(c) => self.widget.edit(|input| input.insert_char(c)),
            _ => {}
        }
    }
}
