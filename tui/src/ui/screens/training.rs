use crossterm::event::KeyCode;
use ratatui::Frame;

use crate::{
    state::session::{SessionState, LEARNING_RATE_STEP, SPEED_STEP},
    ui::draw,
};

use super::{menu::MenuState, Action, Screen};

pub struct TrainingScreen {
    pub show_logs: bool,
}

impl TrainingScreen {
    pub fn new() -> Self {
        Self { show_logs: true }
    }
}

pub fn handle_key(state: &mut TrainingScreen, key: KeyCode, session: &mut SessionState) -> Action {
    match key {
        KeyCode::Char(' ') => session.toggle(),
        KeyCode::Char('s') => session.step(),
        KeyCode::Char('r') => session.reset(),
        KeyCode::Char('+') | KeyCode::Char('=') => session.nudge_learning_rate(LEARNING_RATE_STEP),
        KeyCode::Char('-') => session.nudge_learning_rate(-LEARNING_RATE_STEP),
        KeyCode::Char(']') => session.nudge_speed(SPEED_STEP),
        KeyCode::Char('[') => session.nudge_speed(-SPEED_STEP),
        KeyCode::Char(c @ '1'..='4') => session.select_example(c as usize - '1' as usize),
        KeyCode::Tab => session.inspect_next(1),
        KeyCode::BackTab => session.inspect_next(-1),
        KeyCode::Char('l') => state.show_logs = !state.show_logs,
        KeyCode::Char('q') | KeyCode::Esc => {
            session.pause();
            return Action::Transition(Screen::Menu(MenuState::new()));
        }
        _ => {}
    }

    Action::None
}

pub fn draw(f: &mut Frame, state: &TrainingScreen, session: &SessionState) {
    draw::draw(f, session.view(), state.show_logs);
}
