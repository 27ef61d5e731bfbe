//! The high-score screen.

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::widgets::{Block, Cell, Paragraph, Row, Table};

use services::LeaderboardPage;

use crate::backend::BackendEvent;

#[derive(Debug)]
enum BoardState {
    Loading,
    Ready(LeaderboardPage),
    Unavailable,
}

/// Read-only view over the backend leaderboard. Created in the loading state;
/// the runner requests the page and routes the completion back in.
#[derive(Debug)]
pub struct LeaderboardScreen {
    state: BoardState,
}

impl LeaderboardScreen {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: BoardState::Loading,
        }
    }

    pub fn on_backend_event(&mut self, event: &BackendEvent) {
        if let BackendEvent::LeaderboardReady(page) = event {
            self.state = match page {
                Some(page) => BoardState::Ready(page.clone()),
                None => BoardState::Unavailable,
            };
        }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let block = Block::bordered().title(" Leaderboard — Esc to go back ");
        match &self.state {
            BoardState::Loading => {
                frame.render_widget(
                    Paragraph::new("Loading...").centered().block(block),
                    area,
                );
            }
            BoardState::Unavailable => {
                frame.render_widget(
                    Paragraph::new("Leaderboard unavailable — is the backend running?")
                        .centered()
                        .dim()
                        .block(block),
                    area,
                );
            }
            BoardState::Ready(page) if page.leaderboard.is_empty() => {
                frame.render_widget(
                    Paragraph::new("No scores yet. Be the first!")
                        .centered()
                        .block(block),
                    area,
                );
            }
            BoardState::Ready(page) => {
                let rows = page.leaderboard.iter().enumerate().map(|(i, entry)| {
                    Row::new(vec![
                        Cell::from(format!("{}", i + 1)),
                        Cell::from(entry.player_name.clone()),
                        Cell::from(format!("{}", entry.score)),
                        Cell::from(format!("{:.0}%", entry.accuracy)),
                        Cell::from(entry.completed_at.clone()),
                    ])
                });
                let table = Table::new(
                    rows,
                    [
                        Constraint::Length(4),
                        Constraint::Min(12),
                        Constraint::Length(8),
                        Constraint::Length(6),
                        Constraint::Min(12),
                    ],
                )
                .header(
                    Row::new(vec!["#", "Player", "Score", "Acc", "Completed"])
                        .style(Style::default().fg(Color::Yellow)),
                )
                .block(block);
                frame.render_widget(table, area);
            }
        }
    }
}

impl Default for LeaderboardScreen {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use services::LeaderboardEntry;

    fn page() -> LeaderboardPage {
        LeaderboardPage {
            leaderboard: vec![LeaderboardEntry {
                player_name: "ada".into(),
                game_type: "squid-game".into(),
                score: 1_040,
                questions_answered: 4,
                accuracy: 100.0,
                completed_at: "2024-05-01T00:10:00Z".into(),
            }],
            total_entries: 1,
        }
    }

    #[test]
    fn loads_then_shows_the_page() {
        let mut screen = LeaderboardScreen::new();
        assert!(matches!(screen.state, BoardState::Loading));
        screen.on_backend_event(&BackendEvent::LeaderboardReady(Some(page())));
        assert!(matches!(screen.state, BoardState::Ready(_)));
    }

    #[test]
    fn fetch_failure_marks_the_board_unavailable() {
        let mut screen = LeaderboardScreen::new();
        screen.on_backend_event(&BackendEvent::LeaderboardReady(None));
        assert!(matches!(screen.state, BoardState::Unavailable));
    }

    #[test]
    fn unrelated_events_leave_the_state_alone() {
        let mut screen = LeaderboardScreen::new();
        screen.on_backend_event(&BackendEvent::AnswerResolved(
            services::AnswerVerdict::Local {
                is_correct: true,
                points_earned: 10,
            },
        ));
        assert!(matches!(screen.state, BoardState::Loading));
    }
}
