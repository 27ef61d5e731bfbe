//! The terminal frame loop.
//!
//! Runs at a fixed ~30fps tick: drain key events, drain backend completions,
//! advance the active screen, draw. `Esc` is consumed here and never reaches
//! a game: it backs out one screen at a time, and quits from the game list.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::prelude::CrosstermBackend;
use std::io;
use std::time::{Duration, Instant};
use tracing::debug;

use arcade_core::model::Difficulty;

use crate::backend::{BackendClient, BackendEvents};
use crate::game::{Game, RedLightGame};
use crate::input::{map_game_key, map_menu_key};
use crate::leaderboard::LeaderboardScreen;
use crate::menu::{GameMenu, MenuAction};

const TICK: Duration = Duration::from_millis(33);
const LEADERBOARD_LIMIT: u32 = 10;

enum Screen {
    Menu,
    Playing(RedLightGame),
    Board(LeaderboardScreen),
}

/// Restores the terminal on every exit path, panics included.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        crossterm::execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = crossterm::execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Owns the screens and drives them against the terminal and the backend
/// worker.
pub struct Runner {
    client: BackendClient,
    events: BackendEvents,
    player_name: String,
    difficulty: Difficulty,
    menu: GameMenu,
    screen: Screen,
}

impl Runner {
    #[must_use]
    pub fn new(
        client: BackendClient,
        events: BackendEvents,
        player_name: String,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            client,
            events,
            player_name,
            difficulty,
            menu: GameMenu::new(),
            screen: Screen::Menu,
        }
    }

    /// Blocks until the player quits.
    ///
    /// # Errors
    ///
    /// Returns the underlying terminal I/O error, after restoring the
    /// terminal state.
    pub fn run(&mut self) -> io::Result<()> {
        let _guard = TerminalGuard::enter()?;
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

        let mut last_tick = Instant::now();
        loop {
            let timeout = TICK.saturating_sub(last_tick.elapsed());
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && !self.handle_key(key) {
                        break;
                    }
                }
            }

            if last_tick.elapsed() >= TICK {
                let dt = last_tick.elapsed();
                last_tick = Instant::now();
                self.route_backend_events();
                self.advance(dt);
                terminal.draw(|frame| self.draw(frame))?;
            }
        }

        // Best effort; the worker may outlive us briefly to deliver it.
        self.client.finish();
        debug!("frame loop stopped");
        Ok(())
    }

    /// Returns `false` when the player quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Esc {
            return self.back_out();
        }
        match &mut self.screen {
            Screen::Menu => {
                if key.code == KeyCode::Char('q') {
                    return false;
                }
                if let Some(input) = map_menu_key(key) {
                    match self.menu.handle(input) {
                        Some(MenuAction::Play(_)) => {
                            self.screen = Screen::Playing(RedLightGame::new(
                                self.client.clone(),
                                self.player_name.clone(),
                                self.difficulty,
                            ));
                        }
                        Some(MenuAction::OpenLeaderboard) => self.open_leaderboard(),
                        None => {}
                    }
                }
            }
            Screen::Playing(game) => {
                if let Some(input) = map_game_key(key, game.question_open()) {
                    game.handle_input(input);
                }
            }
            Screen::Board(_) => {}
        }
        true
    }

    fn back_out(&mut self) -> bool {
        match self.screen {
            Screen::Menu => false,
            Screen::Playing(_) => {
                // Leaving the game ends the backend session.
                self.client.finish();
                self.screen = Screen::Menu;
                true
            }
            Screen::Board(_) => {
                self.screen = Screen::Menu;
                true
            }
        }
    }

    fn open_leaderboard(&mut self) {
        self.client
            .fetch_leaderboard(Some(self.menu.selected()), LEADERBOARD_LIMIT);
        self.screen = Screen::Board(LeaderboardScreen::new());
    }

    fn route_backend_events(&mut self) {
        while let Some(event) = self.events.poll() {
            match &mut self.screen {
                Screen::Playing(game) => game.on_backend_event(event),
                Screen::Board(board) => board.on_backend_event(&event),
                // Completions for a screen the player already left.
                Screen::Menu => {}
            }
        }
    }

    fn advance(&mut self, dt: Duration) {
        if let Screen::Playing(game) = &mut self.screen {
            game.update(dt);
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let area = frame.area();
        match &self.screen {
            Screen::Menu => self.menu.render(frame, area),
            Screen::Playing(game) => game.render(frame, area),
            Screen::Board(board) => board.render(frame, area),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendCommand, detached};
    use crossterm::event::{KeyEventState, KeyModifiers};
    use tokio::sync::mpsc::UnboundedReceiver;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn runner() -> (Runner, UnboundedReceiver<BackendCommand>) {
        let (client, events, commands, _event_tx) = detached();
        (
            Runner::new(client, events, "ada".into(), Difficulty::Medium),
            commands,
        )
    }

    #[test]
    fn esc_on_the_menu_quits() {
        let (mut runner, _commands) = runner();
        assert!(!runner.handle_key(key(KeyCode::Esc)));
    }

    #[test]
    fn selecting_the_game_enters_play_and_esc_backs_out_with_a_finish() {
        let (mut runner, mut commands) = runner();
        assert!(runner.handle_key(key(KeyCode::Enter)));
        assert!(matches!(runner.screen, Screen::Playing(_)));

        assert!(runner.handle_key(key(KeyCode::Esc)));
        assert!(matches!(runner.screen, Screen::Menu));
        assert!(matches!(
            commands.try_recv().unwrap(),
            BackendCommand::Finish
        ));
    }

    #[test]
    fn leaderboard_key_opens_the_board_and_requests_the_page() {
        let (mut runner, mut commands) = runner();
        assert!(runner.handle_key(key(KeyCode::Char('l'))));
        assert!(matches!(runner.screen, Screen::Board(_)));
        assert!(matches!(
            commands.try_recv().unwrap(),
            BackendCommand::FetchLeaderboard { limit: 10, .. }
        ));

        assert!(runner.handle_key(key(KeyCode::Esc)));
        assert!(matches!(runner.screen, Screen::Menu));
    }

    #[test]
    fn q_quits_only_from_the_menu() {
        let (mut runner, _commands) = runner();
        runner.handle_key(key(KeyCode::Enter)); // now playing
        assert!(runner.handle_key(key(KeyCode::Char('q'))));
        assert!(runner.handle_key(key(KeyCode::Esc))); // back to menu
        assert!(matches!(runner.screen, Screen::Menu));
        assert!(!runner.handle_key(key(KeyCode::Char('q'))));
    }
}
