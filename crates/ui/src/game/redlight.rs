//! Red Light, Green Light — the playable title.
//!
//! Composes the core phase machine, track, and scoreboard with the backend
//! handle. Movement is impulse-based: every movement key event advances the
//! player one step, and any movement event during a red light eliminates.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Gauge, Paragraph, Wrap};
use std::time::Duration;

use arcade_core::model::{Difficulty, GameKind, Question};
use arcade_core::{
    LightColor, Phase, PhaseConfig, PhaseMachine, RunDirection, RunnerTrack, Scoreboard,
};
use services::AnswerVerdict;

use crate::backend::{BackendClient, BackendEvent};
use crate::game::Game;
use crate::input::GameInput;

/// Bonus for crossing the finish line.
const FINISH_BONUS: u32 = 1_000;
/// Track-time covered by one movement key event.
const MOVE_IMPULSE: Duration = Duration::from_millis(250);
/// How long a correct answer's power mode doubles the stride.
const BOOST_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndReason {
    Eliminated,
    TimeUp,
    OutOfLives,
}

impl EndReason {
    fn message(self) -> &'static str {
        match self {
            EndReason::Eliminated => "You were caught moving!",
            EndReason::TimeUp => "The countdown ran out.",
            EndReason::OutOfLives => "Wrong answer — no lives left.",
        }
    }
}

#[derive(Debug)]
struct ActiveQuestion {
    question: Question,
    elapsed: Duration,
}

impl ActiveQuestion {
    fn time_left(&self) -> Duration {
        Duration::from_secs(u64::from(self.question.time_limit_secs()))
            .saturating_sub(self.elapsed)
    }
}

pub struct RedLightGame {
    backend: BackendClient,
    machine: PhaseMachine,
    track: RunnerTrack,
    board: Scoreboard,
    player_name: String,
    difficulty: Difficulty,
    question: Option<ActiveQuestion>,
    awaiting_question: bool,
    awaiting_verdict: bool,
    session_requested: bool,
    boost_left: Duration,
    end_reason: Option<EndReason>,
}

impl RedLightGame {
    #[must_use]
    pub fn new(backend: BackendClient, player_name: String, difficulty: Difficulty) -> Self {
        Self::with_config(backend, player_name, difficulty, PhaseConfig::default())
    }

    /// Constructor with explicit phase timings, used by tests.
    #[must_use]
    pub fn with_config(
        backend: BackendClient,
        player_name: String,
        difficulty: Difficulty,
        config: PhaseConfig,
    ) -> Self {
        Self {
            backend,
            machine: PhaseMachine::new(config),
            track: RunnerTrack::new(),
            board: Scoreboard::default(),
            player_name,
            difficulty,
            question: None,
            awaiting_question: false,
            awaiting_verdict: false,
            session_requested: false,
            boost_left: Duration::ZERO,
            end_reason: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    #[must_use]
    pub fn scoreboard(&self) -> &Scoreboard {
        &self.board
    }

    fn start_attempt(&mut self) {
        if self.machine.phase() != Phase::Waiting {
            return;
        }
        self.board.start();
        self.machine.start();
        // The backend session persists across restarts; request it once.
        if !self.session_requested {
            self.session_requested = true;
            self.backend.begin(
                &self.player_name,
                GameKind::SquidGame,
                self.difficulty,
            );
        }
    }

    fn restart_attempt(&mut self) {
        if !self.machine.phase().is_terminal() {
            return;
        }
        self.machine.restart();
        self.track.reset();
        self.board.reset();
        self.question = None;
        self.awaiting_question = false;
        self.awaiting_verdict = false;
        self.boost_left = Duration::ZERO;
        self.end_reason = None;
    }

    fn move_player(&mut self, direction: RunDirection) {
        match self.machine.phase() {
            Phase::Red => {
                if self.machine.record_movement().is_some() {
                    self.board.end_game();
                    self.end_reason = Some(EndReason::Eliminated);
                }
            }
            Phase::Green => {
                let steps = if self.boost_left > Duration::ZERO { 2 } else { 1 };
                for _ in 0..steps {
                    self.track.advance_player(direction, MOVE_IMPULSE);
                }
                self.after_progress();
            }
            // Movement means nothing before the start, during a question,
            // or after the attempt ended.
            _ => {}
        }
    }

    fn after_progress(&mut self) {
        if self.track.crossed_finish() {
            if self.machine.reach_finish().is_some() {
                self.board.award(FINISH_BONUS);
                self.board.end_game();
            }
            return;
        }
        if self.track.take_checkpoint().is_some() && self.machine.begin_question() {
            self.board.pause();
            self.awaiting_question = true;
            self.backend.fetch_question();
        }
    }

    fn answer(&mut self, index: usize) {
        if self.awaiting_verdict {
            return;
        }
        if self.question.take().is_some() {
            self.awaiting_verdict = true;
            self.backend.submit_answer(Some(index));
        }
    }

    fn apply_verdict(&mut self, verdict: &AnswerVerdict) {
        match *verdict {
            AnswerVerdict::Backend {
                is_correct,
                total_score,
                lives_remaining,
                power_mode,
                ..
            } => {
                self.board.set_score(total_score);
                if !is_correct {
                    self.board.set_lives(lives_remaining);
                }
                if power_mode {
                    self.boost_left = BOOST_DURATION;
                }
            }
            AnswerVerdict::Local {
                is_correct,
                points_earned,
            } => {
                if is_correct {
                    self.board.award(points_earned);
                    self.boost_left = BOOST_DURATION;
                } else {
                    self.board.lose_life();
                }
            }
        }

        let survived = !self.board.is_game_over();
        self.machine.resolve_question(survived);
        if survived {
            self.board.resume();
        } else {
            self.end_reason = Some(EndReason::OutOfLives);
        }
    }
}

impl Game for RedLightGame {
    fn handle_input(&mut self, input: GameInput) {
        match input {
            GameInput::Start => self.start_attempt(),
            GameInput::Restart => self.restart_attempt(),
            GameInput::Move(direction) => self.move_player(direction),
            GameInput::Answer(index) => self.answer(index),
        }
    }

    fn update(&mut self, dt: Duration) {
        if let Some(active) = &mut self.question {
            active.elapsed += dt;
            if active.time_left().is_zero() {
                // Timed out: auto-submit a wrong answer.
                self.question = None;
                self.awaiting_verdict = true;
                self.backend.submit_answer(None);
            }
            return;
        }

        for event in self.machine.tick(dt) {
            if event == arcade_core::PhaseEvent::TimeExpired {
                self.board.end_game();
                self.end_reason = Some(EndReason::TimeUp);
            }
        }

        if self.machine.phase() == Phase::Green {
            self.track.advance_rivals(dt);
            self.boost_left = self.boost_left.saturating_sub(dt);
        }
    }

    fn on_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::SessionStarted(start) => {
                if start.backed {
                    self.board.set_score(start.score);
                    self.board.set_lives(start.lives);
                }
            }
            BackendEvent::QuestionReady(question) => {
                // Only meaningful while the overlay is waiting for it; a
                // question arriving after the attempt ended is stale.
                if self.awaiting_question && self.machine.phase() == Phase::Question {
                    self.question = Some(ActiveQuestion {
                        question,
                        elapsed: Duration::ZERO,
                    });
                }
                self.awaiting_question = false;
            }
            BackendEvent::AnswerResolved(verdict) => {
                if self.awaiting_verdict {
                    self.awaiting_verdict = false;
                    self.apply_verdict(&verdict);
                }
            }
            BackendEvent::LeaderboardReady(_) => {}
        }
    }

    fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        match self.machine.phase() {
            Phase::Waiting => self.render_start(frame, area),
            Phase::GameOver | Phase::Won => self.render_end(frame, area),
            _ => {
                self.render_run(frame, area);
                if self.question.is_some() || self.awaiting_question || self.awaiting_verdict {
                    self.render_question(frame, area);
                }
            }
        }
    }

    fn question_open(&self) -> bool {
        self.question.is_some()
    }
}

//
// ─── RENDERING ─────────────────────────────────────────────────────────────────
//

impl RedLightGame {
    fn render_start(&self, frame: &mut Frame<'_>, area: Rect) {
        let lines = vec![
            Line::from("RED LIGHT".fg(Color::Red).bold()),
            Line::from("GREEN LIGHT".fg(Color::Green).bold()),
            Line::from(""),
            Line::from("Run (W/↑) while the light is GREEN."),
            Line::from("Freeze when it turns RED — movement eliminates you."),
            Line::from("Checkpoints ask quiz questions; wrong answers cost a life."),
            Line::from(format!(
                "Reach the finish line ({:.0}m) to win.",
                arcade_core::track::FINISH_LINE
            )),
            Line::from(""),
            Line::from("PRESS SPACE OR ENTER TO START".fg(Color::Green).bold()),
        ];
        let block = Block::bordered().title(" Red Light, Green Light ");
        let popup = centered_rect(area, 64, lines.len() as u16 + 2);
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines).centered().block(block),
            popup,
        );
    }

    fn render_run(&self, frame: &mut Frame<'_>, area: Rect) {
        let [hud, gauge, track, footer] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .areas(area);

        self.render_hud(frame, hud);

        frame.render_widget(
            Gauge::default()
                .ratio(f64::from(self.track.progress()))
                .gauge_style(Style::default().fg(Color::Yellow))
                .label(format!("{:.0}m", self.track.player().z)),
            gauge,
        );

        self.render_track(frame, track);

        frame.render_widget(
            Paragraph::new("W/↑ run  ·  A/D strafe  ·  Esc back to game list").dim(),
            footer,
        );
    }

    fn render_hud(&self, frame: &mut Frame<'_>, area: Rect) {
        let (light_text, light_color) = match self.machine.light() {
            Some(LightColor::Green) => ("GREEN LIGHT", Color::Green),
            Some(LightColor::Red) => ("RED LIGHT", Color::Red),
            None => ("QUESTION", Color::Yellow),
        };
        let line = Line::from(vec![
            Span::styled(
                light_text,
                Style::default()
                    .fg(light_color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "   Time: {:>3}   Score: {}   Lives: {}",
                self.machine.time_left().as_secs(),
                self.board.score(),
                self.board.lives(),
            )),
        ]);
        frame.render_widget(
            Paragraph::new(line).block(Block::bordered()),
            area,
        );
    }

    fn render_track(&self, frame: &mut Frame<'_>, area: Rect) {
        let width = area.width.max(3) as usize;
        let mut lines = vec![lane_line(width, self.track.player().z, '@', Color::Cyan)];
        for rival in self.track.rivals() {
            lines.push(lane_line(width, rival.position().z, 'R', Color::DarkGray));
        }
        let doll_color = match self.machine.light() {
            Some(LightColor::Red) => Color::Red,
            _ => Color::Green,
        };
        let block = Block::bordered()
            .title(" Track ")
            .title_style(Style::default().fg(doll_color));
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_question(&self, frame: &mut Frame<'_>, area: Rect) {
        let popup = centered_rect(area, 70, 14);
        frame.render_widget(Clear, popup);

        let Some(active) = &self.question else {
            frame.render_widget(
                Paragraph::new("Fetching question...")
                    .centered()
                    .block(Block::bordered()),
                popup,
            );
            return;
        };

        let question = &active.question;
        let mut lines = vec![
            Line::from(Span::styled(
                format!("{} QUESTION", question.category().label()),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(question.text().to_string()),
            Line::from(""),
        ];
        for (i, option) in question.options().iter().enumerate() {
            lines.push(Line::from(format!("  {}. {}", i + 1, option)));
        }
        lines.push(Line::from(""));
        let left = active.time_left().as_secs();
        let timer_color = if left < 5 { Color::Red } else { Color::Yellow };
        lines.push(Line::from(Span::styled(
            format!("Time: {left}s — press 1-4 or A-D"),
            Style::default().fg(timer_color),
        )));

        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .block(Block::bordered().title(format!(" {} pts ", question.points()))),
            popup,
        );
    }

    fn render_end(&self, frame: &mut Frame<'_>, area: Rect) {
        let won = self.machine.phase() == Phase::Won;
        let title = if won { "VICTORY!" } else { "ELIMINATED" };
        let color = if won { Color::Green } else { Color::Red };

        let mut lines = vec![Line::from(Span::styled(
            title,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))];
        if let Some(reason) = self.end_reason {
            lines.push(Line::from(reason.message()));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(format!("Score: {}", self.board.score())));
        lines.push(Line::from(""));
        lines.push(Line::from("Press R to restart — Esc for the game list".dim()));

        let popup = centered_rect(area, 50, lines.len() as u16 + 2);
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines).centered().block(Block::bordered()),
            popup,
        );
    }
}

fn lane_line(width: usize, z: f32, marker: char, color: Color) -> Line<'static> {
    let inner = width.saturating_sub(2).max(1);
    let fraction = (z / arcade_core::track::FINISH_LINE).clamp(0.0, 1.0);
    let column = ((inner - 1) as f32 * fraction).round() as usize;
    let mut cells: Vec<char> = std::iter::repeat_n('·', inner).collect();
    cells[column] = marker;
    let text: String = cells.into_iter().collect();
    Line::from(Span::styled(text, Style::default().fg(color)))
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
