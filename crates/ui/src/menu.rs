//! The game-list screen.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, ListState, Paragraph};

use arcade_core::model::GameKind;

use crate::input::MenuInput;

/// What the runner should do after a menu key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Play(GameKind),
    OpenLeaderboard,
}

/// Selectable list over the arcade catalogue. Placeholder titles stay in the
/// list but refuse selection.
#[derive(Debug)]
pub struct GameMenu {
    selected: usize,
    notice: Option<&'static str>,
}

impl GameMenu {
    #[must_use]
    pub fn new() -> Self {
        Self {
            selected: 0,
            notice: None,
        }
    }

    #[must_use]
    pub fn selected(&self) -> GameKind {
        GameKind::ALL[self.selected]
    }

    pub fn handle(&mut self, input: MenuInput) -> Option<MenuAction> {
        self.notice = None;
        match input {
            MenuInput::Up => {
                self.selected = self
                    .selected
                    .checked_sub(1)
                    .unwrap_or(GameKind::ALL.len() - 1);
                None
            }
            MenuInput::Down => {
                self.selected = (self.selected + 1) % GameKind::ALL.len();
                None
            }
            MenuInput::Select => {
                let kind = self.selected();
                if kind.playable() {
                    Some(MenuAction::Play(kind))
                } else {
                    self.notice = Some("Coming soon");
                    None
                }
            }
            MenuInput::Leaderboard => Some(MenuAction::OpenLeaderboard),
        }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let [header, list_area, footer] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new("ARCADE".fg(Color::Yellow).bold())
                .centered()
                .block(Block::bordered()),
            header,
        );

        let items: Vec<ListItem<'_>> = GameKind::ALL
            .iter()
            .map(|kind| {
                let mut spans = vec![Span::raw(kind.title())];
                if !kind.playable() {
                    spans.push(Span::styled(
                        "  (coming soon)",
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();
        let list = List::new(items)
            .block(Block::bordered().title(" Games "))
            .highlight_style(
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▸ ");
        let mut state = ListState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(list, list_area, &mut state);

        let footer_text = self.notice.map_or(
            "↑/↓ select  ·  Enter play  ·  L leaderboard  ·  Esc quit",
            |notice| notice,
        );
        frame.render_widget(Paragraph::new(footer_text).dim(), footer);
    }
}

impl Default for GameMenu {
    fn default() -> Self {
        Self::new()
    }
}
