pub mod menu;
pub mod training;

use crossterm::event::KeyCode;
use ratatui::Frame;

use crate::state::session::SessionState;

pub enum Action {
    None,
    Quit,
    Transition(Screen),
}

pub enum Screen {
    Menu(menu::MenuState),
    Training(training::TrainingScreen),
}

impl Screen {
    pub fn draw(&self, f: &mut Frame, session: &SessionState) {
        match self {
            Screen::Menu(s) => menu::draw(f, s, session),
            Screen::Training(s) => training::draw(f, s, session),
        }
    }

    pub fn handle_key(&mut self, key: KeyCode, session: &mut SessionState) -> Action {
        match self {
            Screen::Menu(s) => menu::handle_key(s, key, session),
            Screen::Training(s) => training::handle_key(s, key, session),
        }
    }
}
