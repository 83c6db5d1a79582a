use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::trace;

/// Single line text editor fed with raw key events.
#[derive(Debug, Default, Clone)]
pub struct Inputter {
    value: String,
    cursor: usize, // In chars, not bytes
    finished: bool,
    canceled: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputResult {
    pub input: String,
    pub finished: bool,
    pub canceled: bool,
    pub cursor: usize,
}

impl Inputter {
    pub fn with_value(value: &str) -> Self {
        let mut inputter = Self::default();
        inputter.set(value);
        inputter
    }

    pub fn read(&mut self, key: KeyEvent) -> InputResult {
        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => self.enter(),
            (KeyCode::Esc, _) => self.escape(),
            (KeyCode::Backspace, _) => self.backspace(),
            (KeyCode::Delete, _) => self.delete(),
            (KeyCode::Left, _) => self.left(),
            (KeyCode::Right, _) => self.right(),
            (KeyCode::Home, _) => self.home(),
            (KeyCode::End, _) => self.end(),
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                self.value.clear();
                self.cursor = 0;
                self.get()
            }
            (kc, km) => self.key(kc, km),
        }
    }

    /// Replaces the content and moves the cursor behind it.
    pub fn set(&mut self, s: &str) {
        self.value = s.to_string();
        self.cursor = self.value.chars().count();
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn get(&self) -> InputResult {
        InputResult {
            input: self.value.clone(),
            finished: self.finished,
            canceled: self.canceled,
            cursor: self.cursor,
        }
    }

    pub fn clear(&mut self) {
        self.canceled = false;
        self.finished = false;
        self.value.clear();
        self.cursor = 0;
    }

    fn enter(&mut self) -> InputResult {
        self.finished = true;
        self.get()
    }

    fn escape(&mut self) -> InputResult {
        self.clear();
        self.canceled = true;
        self.finished = true;
        self.get()
    }

    fn backspace(&mut self) -> InputResult {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_pos();
            self.value.remove(at);
        }
        self.get()
    }

    fn delete(&mut self) -> InputResult {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_pos();
            self.value.remove(at);
        }
        self.get()
    }

    fn left(&mut self) -> InputResult {
        self.cursor = self.cursor.saturating_sub(1);
        self.get()
    }

    fn right(&mut self) -> InputResult {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
        self.get()
    }

    fn home(&mut self) -> InputResult {
        self.cursor = 0;
        self.get()
    }

    fn end(&mut self) -> InputResult {
        self.cursor = self.value.chars().count();
        self.get()
    }

    fn key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> InputResult {
        // AltGr arrives as CONTROL | ALT and still types a character
        let altgr = KeyModifiers::CONTROL | KeyModifiers::ALT;
        if modifiers.intersects(altgr) && !modifiers.contains(altgr) {
            trace!("Ignoring {code:?} with {modifiers:?}");
            return self.get();
        }
        if let Some(chr) = code.as_char() {
            let at = self.byte_pos();
            self.value.insert(at, chr);
            self.cursor += 1;
        }
        self.get()
    }

    fn byte_pos(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(byte_idx, _)| byte_idx)
            .unwrap_or(self.value.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(inputter: &mut Inputter, code: KeyCode) -> InputResult {
        inputter.read(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(inputter: &mut Inputter, s: &str) -> InputResult {
        let mut last = inputter.get();
        for c in s.chars() {
            last = press(inputter, KeyCode::Char(c));
        }
        last
    }

    #[test]
    fn typing_appends() {
        let mut inputter = Inputter::default();
        let result = type_str(&mut inputter, "alpha");
        assert_eq!(result.input, "alpha");
        assert_eq!(result.cursor, 5);
        assert!(!result.finished);
    }

    #[test]
    fn editing_in_the_middle_handles_multibyte() {
        let mut inputter = Inputter::with_value("añb");
        press(&mut inputter, KeyCode::Left);
        press(&mut inputter, KeyCode::Backspace);
        assert_eq!(inputter.value(), "ab");
        type_str(&mut inputter, "é");
        assert_eq!(inputter.value(), "aéb");
        press(&mut inputter, KeyCode::Delete);
        assert_eq!(inputter.value(), "aé");
    }

    #[test]
    fn backspace_at_start_is_noop() {
        let mut inputter = Inputter::with_value("x");
        press(&mut inputter, KeyCode::Home);
        let result = press(&mut inputter, KeyCode::Backspace);
        assert_eq!(result.input, "x");
    }

    #[test]
    fn enter_finishes_and_escape_cancels() {
        let mut inputter = Inputter::default();
        type_str(&mut inputter, "abc");
        let result = press(&mut inputter, KeyCode::Enter);
        assert!(result.finished && !result.canceled);
        assert_eq!(result.input, "abc");

        let mut inputter = Inputter::with_value("abc");
        let result = press(&mut inputter, KeyCode::Esc);
        assert!(result.finished && result.canceled);
        assert!(result.input.is_empty());
    }

    #[test]
    fn control_keys_are_not_inserted() {
        let mut inputter = Inputter::with_value("abc");
        inputter.read(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL));
        assert_eq!(inputter.value(), "abc");
        inputter.read(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(inputter.value(), "");
        inputter.read(KeyEvent::new(KeyCode::Char('b'), KeyModifiers::ALT));
        assert_eq!(inputter.value(), "");
    }

    #[test]
    fn altgr_characters_are_inserted() {
        let mut inputter = Inputter::with_value("jane");
        inputter.read(KeyEvent::new(
            KeyCode::Char('@'),
            KeyModifiers::CONTROL | KeyModifiers::ALT,
        ));
        type_str(&mut inputter, "example.com");
        assert_eq!(inputter.value(), "jane@example.com");
    }
}
