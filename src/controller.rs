use std::time::Duration;
use tracing::trace;

use crate::domain::{CMSConfig, CMSError, Message, Screen};
use crate::model::Model;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyModifiers};

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &CMSConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    pub fn handle_event(&self, model: &Model) -> Result<Option<Message>, CMSError> {
        if event::poll(Duration::from_millis(self.event_poll_time))?
            && let Event::Key(key) = event::read()?
            && key.kind == event::KeyEventKind::Press
        {
            if model.raw_keyevents() {
                return Ok(Some(Message::RawKey(key)));
            }
            return Ok(self.handle_key(key));
        }
        Ok(None)
    }

    fn handle_key(&self, key: event::KeyEvent) -> Option<Message> {
        let message = match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Message::Quit),
            (KeyCode::Char('q'), _) => Some(Message::Quit),
            (KeyCode::Char('?'), _) => Some(Message::Help),
            (KeyCode::Esc, _) => Some(Message::Exit),
            (KeyCode::Tab, _) => Some(Message::NextScreen),
            (KeyCode::BackTab, _) => Some(Message::PrevScreen),
            (KeyCode::Char(c @ '1'..='6'), _) => {
                let idx = c as usize - '1' as usize;
                Screen::ALL.get(idx).map(|s| Message::GotoScreen(*s))
            }
            (KeyCode::Up, _) | (KeyCode::Char('k'), _) => Some(Message::MoveUp),
            (KeyCode::Down, _) | (KeyCode::Char('j'), _) => Some(Message::MoveDown),
            (KeyCode::Left, _) | (KeyCode::Char('h'), _) | (KeyCode::Char('p'), _) => {
                Some(Message::PrevPage)
            }
            (KeyCode::Right, _) | (KeyCode::Char('l'), _) | (KeyCode::Char('n'), _) => {
                Some(Message::NextPage)
            }
            (KeyCode::Char('['), _) => Some(Message::PrevTab),
            (KeyCode::Char(']'), _) => Some(Message::NextTab),
            (KeyCode::Char('/'), _) => Some(Message::Search),
            (KeyCode::Char('c'), _) => Some(Message::Create),
            (KeyCode::Char('d'), _) => Some(Message::Delete),
            (KeyCode::Char('y'), _) => Some(Message::CopyRow),
            (KeyCode::Char('b'), _) => Some(Message::ToggleSidebar),
            (KeyCode::Enter, _) => Some(Message::Enter),
            (KeyCode::Char(' '), _) => Some(Message::Toggle),
            (KeyCode::Char('s'), _) => Some(Message::Save),
            (KeyCode::Char('r'), _) => Some(Message::Regenerate),
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyEvent;

    fn map(code: KeyCode) -> Option<Message> {
        Controller::new(&CMSConfig::default()).handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn number_keys_jump_to_screens() {
        assert_eq!(map(KeyCode::Char('1')), Some(Message::GotoScreen(Screen::Dashboard)));
        assert_eq!(map(KeyCode::Char('6')), Some(Message::GotoScreen(Screen::Settings)));
        assert_eq!(map(KeyCode::Char('7')), None);
    }

    #[test]
    fn vim_and_arrow_keys_agree() {
        assert_eq!(map(KeyCode::Char('j')), map(KeyCode::Down));
        assert_eq!(map(KeyCode::Char('k')), map(KeyCode::Up));
        assert_eq!(map(KeyCode::Char('n')), map(KeyCode::Right));
        assert_eq!(map(KeyCode::Char('p')), map(KeyCode::Left));
    }

    #[test]
    fn ctrl_c_quits_but_c_creates() {
        let controller = Controller::new(&CMSConfig::default());
        assert_eq!(
            controller.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Message::Quit)
        );
        assert_eq!(map(KeyCode::Char('c')), Some(Message::Create));
    }
}
