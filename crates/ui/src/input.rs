//! Keyboard surface.
//!
//! WASD/arrows move, `1–4`/`A–D` answer, Space/Enter starts, `R` restarts.
//! `A` and `D` are ambiguous between strafing and answering, so the in-game
//! mapping is resolved against whether a question overlay is up — the same
//! way the answer keys only bind inside the question state. `Esc` never
//! reaches a game; the runner consumes it one layer above.

use crossterm::event::{KeyCode, KeyEvent};

use arcade_core::RunDirection;

/// Input meaningful to a running game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameInput {
    Move(RunDirection),
    /// Option index 0..=3.
    Answer(usize),
    Start,
    Restart,
}

/// Input meaningful on the game-list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuInput {
    Up,
    Down,
    Select,
    Leaderboard,
}

/// Map a key press inside a game. `question_open` switches the ambiguous
/// letter keys from movement to answering.
#[must_use]
pub fn map_game_key(key: KeyEvent, question_open: bool) -> Option<GameInput> {
    if question_open {
        if let Some(index) = answer_index(key.code) {
            return Some(GameInput::Answer(index));
        }
        return None;
    }

    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter => Some(GameInput::Start),
        KeyCode::Char('r' | 'R') => Some(GameInput::Restart),
        KeyCode::Up | KeyCode::Char('w' | 'W') => Some(GameInput::Move(RunDirection::Forward)),
        KeyCode::Down | KeyCode::Char('s' | 'S') => Some(GameInput::Move(RunDirection::Back)),
        KeyCode::Left | KeyCode::Char('a' | 'A') => Some(GameInput::Move(RunDirection::Left)),
        KeyCode::Right | KeyCode::Char('d' | 'D') => Some(GameInput::Move(RunDirection::Right)),
        _ => None,
    }
}

fn answer_index(code: KeyCode) -> Option<usize> {
    match code {
        KeyCode::Char('1' | 'a' | 'A') => Some(0),
        KeyCode::Char('2' | 'b' | 'B') => Some(1),
        KeyCode::Char('3' | 'c' | 'C') => Some(2),
        KeyCode::Char('4' | 'd' | 'D') => Some(3),
        _ => None,
    }
}

/// Map a key press on the game-list screen.
#[must_use]
pub fn map_menu_key(key: KeyEvent) -> Option<MenuInput> {
    match key.code {
        KeyCode::Up | KeyCode::Char('w' | 'W' | 'k') => Some(MenuInput::Up),
        KeyCode::Down | KeyCode::Char('s' | 'S' | 'j') => Some(MenuInput::Down),
        KeyCode::Enter | KeyCode::Char(' ') => Some(MenuInput::Select),
        KeyCode::Char('l' | 'L') => Some(MenuInput::Leaderboard),
        _ => None,
    }
}
