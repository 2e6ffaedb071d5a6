//! Key mapping from terminal events to game actions.

use crate::types::{GameAction, Lane};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Lane addressed by a key: `1`-`4` or the home-row `a s d f`.
pub fn lane_for_key(code: KeyCode) -> Option<Lane> {
    let index = match code {
        KeyCode::Char('1') | KeyCode::Char('a') | KeyCode::Char('A') => 0,
        KeyCode::Char('2') | KeyCode::Char('s') | KeyCode::Char('S') => 1,
        KeyCode::Char('3') | KeyCode::Char('d') | KeyCode::Char('D') => 2,
        KeyCode::Char('4') | KeyCode::Char('f') | KeyCode::Char('F') => 3,
        _ => return None,
    };
    Lane::try_from(index).ok()
}

/// Map keyboard input to game actions.
pub fn handle_key_event(key: KeyEvent) -> Option<GameAction> {
    if let Some(lane) = lane_for_key(key.code) {
        return Some(GameAction::Play(lane));
    }
    match key.code {
        // Undo
        KeyCode::Char('u') | KeyCode::Char('U') | KeyCode::Backspace => Some(GameAction::Undo),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(GameAction::UndoInstant),

        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc => Some(GameAction::Pause),

        // Restart
        KeyCode::Char('r') | KeyCode::Char('R') => Some(GameAction::Restart),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
