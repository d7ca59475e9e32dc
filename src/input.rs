use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::app::{Command, Mode};
use crate::ui;

/// Translate a terminal event into a command for the current mode.
/// `area` is the full terminal area, used to hit-test mouse clicks.
pub fn map_event(event: &Event, mode: &Mode, area: Rect) -> Option<Command> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => map_key(key, mode),
        Event::Mouse(mouse) => map_mouse(mouse, mode, area),
        _ => None,
    }
}

fn map_key(key: &KeyEvent, mode: &Mode) -> Option<Command> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Command::Quit);
    }

    match mode {
        Mode::Settings { .. } => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Command::Adjust { increase: true }),
            KeyCode::Down | KeyCode::Char('j') => Some(Command::Adjust { increase: false }),
            KeyCode::Tab => Some(Command::NextField),
            KeyCode::BackTab => Some(Command::PrevField),
            KeyCode::Enter => Some(Command::Confirm),
            KeyCode::Esc => Some(Command::Cancel),
            _ => None,
        },
        Mode::Timer | Mode::PreRoll { .. } => match key.code {
            KeyCode::Char(' ') => Some(Command::ToggleRun),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Reset),
            KeyCode::Char('s') | KeyCode::Char('S') => Some(Command::OpenSettings),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
            _ => None,
        },
    }
}

fn map_mouse(mouse: &MouseEvent, mode: &Mode, area: Rect) -> Option<Command> {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return None;
    }

    match mode {
        Mode::Timer => ui::contains(ui::settings_button(area), mouse.column, mouse.row)
            .then_some(Command::OpenSettings),
        Mode::Settings { .. } => {
            ui::field_at(area, mouse.column, mouse.row).map(Command::SelectField)
        }
        Mode::PreRoll { .. } => None,
    }
}
