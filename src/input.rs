use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::components::Dir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Steer(Dir),
    PlayAgain,
    Quit,
}

/// Maps a key press to a game command. Releases are ignored.
pub fn command_for(key: &KeyEvent) -> Option<Command> {
    match key.kind {
        KeyEventKind::Press | KeyEventKind::Repeat => {}
        KeyEventKind::Release => return None,
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Up | KeyCode::Char('k') => Some(Command::Steer(Dir::Up)),
        KeyCode::Down | KeyCode::Char('j') => Some(Command::Steer(Dir::Down)),
        KeyCode::Left | KeyCode::Char('h') => Some(Command::Steer(Dir::Left)),
        KeyCode::Right | KeyCode::Char('l') => Some(Command::Steer(Dir::Right)),
        KeyCode::Char('r') | KeyCode::Enter => Some(Command::PlayAgain),
        _ => None,
    }
}
