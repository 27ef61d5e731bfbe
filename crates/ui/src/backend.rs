//! Channel plumbing between the frame loop and the backend worker.
//!
//! The frame loop never awaits: commands are fire-and-forget sends into an
//! unbounded channel, a tokio task drives the `SessionService`, and results
//! come back as events the loop drains once per frame. Processing commands
//! sequentially on one worker also serializes answer submissions, so a new
//! question can never race an unresolved answer.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use arcade_core::model::{Difficulty, GameKind, Question};
use services::{AnswerVerdict, LeaderboardPage, SessionService, SessionStart};

/// Work for the backend worker.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    Begin {
        player_name: String,
        game_type: GameKind,
        difficulty: Difficulty,
    },
    FetchQuestion,
    SubmitAnswer {
        selected: Option<usize>,
    },
    Finish,
    FetchLeaderboard {
        game_type: Option<GameKind>,
        limit: u32,
    },
}

/// Completion notifications drained by the frame loop.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    SessionStarted(SessionStart),
    QuestionReady(Question),
    AnswerResolved(AnswerVerdict),
    LeaderboardReady(Option<LeaderboardPage>),
}

/// Cheap handle for submitting backend work from anywhere in the UI.
#[derive(Debug, Clone)]
pub struct BackendClient {
    commands: UnboundedSender<BackendCommand>,
}

impl BackendClient {
    pub fn begin(&self, player_name: &str, game_type: GameKind, difficulty: Difficulty) {
        self.send(BackendCommand::Begin {
            player_name: player_name.to_string(),
            game_type,
            difficulty,
        });
    }

    pub fn fetch_question(&self) {
        self.send(BackendCommand::FetchQuestion);
    }

    pub fn submit_answer(&self, selected: Option<usize>) {
        self.send(BackendCommand::SubmitAnswer { selected });
    }

    pub fn finish(&self) {
        self.send(BackendCommand::Finish);
    }

    pub fn fetch_leaderboard(&self, game_type: Option<GameKind>, limit: u32) {
        self.send(BackendCommand::FetchLeaderboard { game_type, limit });
    }

    fn send(&self, command: BackendCommand) {
        // A closed worker means we are shutting down; dropping the command
        // is the correct degraded behavior.
        if self.commands.send(command).is_err() {
            debug!("backend worker gone, command dropped");
        }
    }
}

/// Receiving side owned by the frame loop.
#[derive(Debug)]
pub struct BackendEvents {
    events: UnboundedReceiver<BackendEvent>,
}

impl BackendEvents {
    /// Non-blocking drain step; call until `None` each frame.
    pub fn poll(&mut self) -> Option<BackendEvent> {
        self.events.try_recv().ok()
    }
}

/// Spawn the worker task onto the current tokio runtime.
#[must_use]
pub fn spawn_backend(service: SessionService) -> (BackendClient, BackendEvents) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    tokio::spawn(worker(service, command_rx, event_tx));
    (
        BackendClient {
            commands: command_tx,
        },
        BackendEvents { events: event_rx },
    )
}

/// Test seam: the channel pair without a worker, plus the raw ends so tests
/// can observe commands and inject events.
#[cfg(test)]
#[must_use]
pub(crate) fn detached() -> (
    BackendClient,
    BackendEvents,
    UnboundedReceiver<BackendCommand>,
    UnboundedSender<BackendEvent>,
) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    (
        BackendClient {
            commands: command_tx,
        },
        BackendEvents { events: event_rx },
        command_rx,
        event_tx,
    )
}

async fn worker(
    mut service: SessionService,
    mut commands: UnboundedReceiver<BackendCommand>,
    events: UnboundedSender<BackendEvent>,
) {
    while let Some(command) = commands.recv().await {
        let event = match command {
            BackendCommand::Begin {
                player_name,
                game_type,
                difficulty,
            } => Some(BackendEvent::SessionStarted(
                service.begin(&player_name, game_type, difficulty).await,
            )),
            BackendCommand::FetchQuestion => {
                Some(BackendEvent::QuestionReady(service.next_question().await))
            }
            BackendCommand::SubmitAnswer { selected } => {
                match service.submit_answer(selected).await {
                    Ok(verdict) => Some(BackendEvent::AnswerResolved(verdict)),
                    Err(err) => {
                        warn!(%err, "answer dropped");
                        None
                    }
                }
            }
            BackendCommand::Finish => {
                service.finish().await;
                None
            }
            BackendCommand::FetchLeaderboard { game_type, limit } => Some(
                BackendEvent::LeaderboardReady(service.leaderboard(game_type, limit).await),
            ),
        };
        if let Some(event) = event {
            if events.send(event).is_err() {
                // Frame loop is gone; stop working.
                break;
            }
        }
    }
    debug!("backend worker stopped");
}
