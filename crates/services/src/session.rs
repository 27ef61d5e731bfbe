//! Backend-synchronized play session with local fallback.
//!
//! Every operation degrades instead of failing: a dead backend means the
//! game keeps running on the builtin question bank and local scoring rules,
//! never a crash or a fatal error surfaced to the player.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use std::sync::Arc;
use tracing::{debug, warn};

use arcade_core::model::{Difficulty, GameKind, Question, builtin_bank};
use arcade_core::{Clock, SessionId};

use crate::api::{AnswerRequest, CreateSessionRequest, LeaderboardPage, QuizBackend};
use crate::error::SessionError;

/// Outcome of starting a play attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStart {
    /// Whether a backend session was established.
    pub backed: bool,
    pub score: u32,
    pub lives: u32,
}

/// Result of answering the pending question.
///
/// `Backend` carries the authoritative totals from the scoring service;
/// `Local` carries only the delta computed by the fallback rule, leaving the
/// running totals to the caller's scoreboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerVerdict {
    Backend {
        is_correct: bool,
        points_earned: u32,
        total_score: u32,
        lives_remaining: u32,
        power_mode: bool,
        session_active: bool,
    },
    Local {
        is_correct: bool,
        points_earned: u32,
    },
}

impl AnswerVerdict {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        match self {
            AnswerVerdict::Backend { is_correct, .. } | AnswerVerdict::Local { is_correct, .. } => {
                *is_correct
            }
        }
    }
}

struct PendingQuestion {
    question: Question,
    handed_out_at: DateTime<Utc>,
    from_backend: bool,
}

/// One play attempt against the scoring backend.
pub struct SessionService {
    backend: Arc<dyn QuizBackend>,
    clock: Clock,
    session: Option<SessionId>,
    pending: Option<PendingQuestion>,
    local_bank: Vec<Question>,
    next_local: usize,
}

impl SessionService {
    #[must_use]
    pub fn new(backend: Arc<dyn QuizBackend>, clock: Clock) -> Self {
        let mut local_bank = builtin_bank();
        local_bank.shuffle(&mut rand::rng());
        Self {
            backend,
            clock,
            session: None,
            pending: None,
            local_bank,
            next_local: 0,
        }
    }

    #[must_use]
    pub fn has_backend_session(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn session_id(&self) -> Option<&SessionId> {
        self.session.as_ref()
    }

    /// Create a backend session. On failure the attempt continues without
    /// one and the caller keeps its local defaults.
    pub async fn begin(
        &mut self,
        player_name: &str,
        game_type: GameKind,
        difficulty: Difficulty,
    ) -> SessionStart {
        let request = CreateSessionRequest {
            player_name: player_name.to_string(),
            game_type,
            difficulty,
        };
        match self.backend.create_session(&request).await {
            Ok(created) => {
                debug!(session = %created.session_id, "backend session created");
                self.session = Some(created.session_id.clone());
                SessionStart {
                    backed: true,
                    score: created.score,
                    lives: created.lives,
                }
            }
            Err(err) => {
                warn!(%err, "failed to create session, continuing without backend");
                self.session = None;
                SessionStart {
                    backed: false,
                    score: 0,
                    lives: arcade_core::model::DEFAULT_LIVES,
                }
            }
        }
    }

    /// Hand out the next question, preferring the backend and falling back
    /// to the builtin bank when no session exists or the fetch fails.
    pub async fn next_question(&mut self) -> Question {
        if let Some(session) = self.session.clone() {
            match self.backend.fetch_question(&session).await {
                Ok(payload) => match payload.into_question() {
                    Ok(question) => {
                        self.pending = Some(PendingQuestion {
                            question: question.clone(),
                            handed_out_at: self.clock.now(),
                            from_backend: true,
                        });
                        return question;
                    }
                    Err(err) => {
                        warn!(%err, "backend question unusable, using builtin bank");
                    }
                },
                Err(err) => {
                    warn!(%err, "failed to fetch question, using builtin bank");
                }
            }
        }
        self.local_question()
    }

    fn local_question(&mut self) -> Question {
        let question = self.local_bank[self.next_local % self.local_bank.len()].clone();
        self.next_local += 1;
        self.pending = Some(PendingQuestion {
            question: question.clone(),
            handed_out_at: self.clock.now(),
            from_backend: false,
        });
        question
    }

    /// Answer the pending question. `None` models a timeout. On a wire
    /// failure the same scoring rule is applied locally instead of
    /// propagating the error.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoPendingQuestion` when no question is open.
    pub async fn submit_answer(
        &mut self,
        selected: Option<usize>,
    ) -> Result<AnswerVerdict, SessionError> {
        let pending = self.pending.take().ok_or(SessionError::NoPendingQuestion)?;
        let time_taken = self.clock.elapsed_secs(pending.handed_out_at);

        if pending.from_backend {
            if let Some(session) = self.session.clone() {
                let request = AnswerRequest {
                    question_id: pending.question.id().clone(),
                    selected_answer: selected.map_or(-1, |i| i as i32),
                    time_taken,
                };
                match self.backend.submit_answer(&session, &request).await {
                    Ok(reply) => {
                        if !reply.session_active {
                            self.session = None;
                        }
                        return Ok(AnswerVerdict::Backend {
                            is_correct: reply.is_correct,
                            points_earned: reply.points_earned,
                            total_score: reply.total_score,
                            lives_remaining: reply.lives_remaining,
                            power_mode: reply.power_mode,
                            session_active: reply.session_active,
                        });
                    }
                    Err(err) => {
                        warn!(%err, "failed to submit answer, scoring locally");
                    }
                }
            }
        }

        Ok(Self::score_locally(&pending.question, selected))
    }

    fn score_locally(question: &Question, selected: Option<usize>) -> AnswerVerdict {
        let is_correct = question.is_correct(selected);
        AnswerVerdict::Local {
            is_correct,
            points_earned: if is_correct { question.points() } else { 0 },
        }
    }

    /// End the backend session. Best effort: failures are logged and
    /// swallowed because this runs on the teardown path.
    pub async fn finish(&mut self) {
        self.pending = None;
        let Some(session) = self.session.take() else {
            return;
        };
        match self.backend.end_session(&session).await {
            Ok(reply) => debug!(final_score = reply.final_score, "session ended"),
            Err(err) => warn!(%err, "failed to end session"),
        }
    }

    /// Fetch the leaderboard; works with or without a live session.
    ///
    /// Failures come back as `None` so the screen can show an empty board.
    pub async fn leaderboard(
        &self,
        game_type: Option<GameKind>,
        limit: u32,
    ) -> Option<LeaderboardPage> {
        match self.backend.leaderboard(game_type, limit).await {
            Ok(page) => Some(page),
            Err(err) => {
                warn!(%err, "failed to fetch leaderboard");
                None
            }
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{
        AnswerReply, EndReply, LeaderboardPage, QuestionPayload, SessionCreated, SessionStats,
    };
    use crate::error::ApiError;
    use arcade_core::time::fixed_clock;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    /// Backend double whose failure modes can be toggled per call family.
    #[derive(Default)]
    struct FlakyBackend {
        fail_create: AtomicBool,
        fail_question: AtomicBool,
        fail_answer: AtomicBool,
        answers_seen: AtomicU32,
    }

    fn wire_question() -> QuestionPayload {
        QuestionPayload {
            question: "2 + 2?".into(),
            options: vec!["3".into(), "4".into(), "5".into(), "6".into()],
            correct: 1,
            category: "math".into(),
            question_id: arcade_core::QuestionId::new("q1"),
            points: 10,
            time_limit: 30,
        }
    }

    fn stats(session: &SessionId) -> SessionStats {
        SessionStats {
            session_id: session.clone(),
            player_name: "ada".into(),
            game_type: "squid-game".into(),
            score: 10,
            lives_remaining: 3,
            questions_answered: 1,
            correct_answers: 1,
            wrong_answers: 0,
            accuracy: 100.0,
            average_time_per_question: 2.0,
            session_duration_seconds: Some(30.0),
            is_active: false,
        }
    }

    #[async_trait]
    impl QuizBackend for FlakyBackend {
        async fn create_session(
            &self,
            req: &CreateSessionRequest,
        ) -> Result<SessionCreated, ApiError> {
            if self.fail_create.load(Ordering::SeqCst) {
                return Err(ApiError::HttpStatus(reqwest::StatusCode::SERVICE_UNAVAILABLE));
            }
            Ok(SessionCreated {
                session_id: SessionId::new("s1"),
                player_name: req.player_name.clone(),
                game_type: req.game_type.wire_name().into(),
                score: 0,
                lives: 3,
                message: String::new(),
            })
        }

        async fn fetch_question(&self, _: &SessionId) -> Result<QuestionPayload, ApiError> {
            if self.fail_question.load(Ordering::SeqCst) {
                return Err(ApiError::HttpStatus(reqwest::StatusCode::SERVICE_UNAVAILABLE));
            }
            Ok(wire_question())
        }

        async fn submit_answer(
            &self,
            _: &SessionId,
            req: &AnswerRequest,
        ) -> Result<AnswerReply, ApiError> {
            self.answers_seen.fetch_add(1, Ordering::SeqCst);
            if self.fail_answer.load(Ordering::SeqCst) {
                return Err(ApiError::HttpStatus(reqwest::StatusCode::SERVICE_UNAVAILABLE));
            }
            let is_correct = req.selected_answer == 1;
            Ok(AnswerReply {
                is_correct,
                correct_answer: 1,
                explanation: String::new(),
                points_earned: if is_correct { 12 } else { 0 },
                total_score: if is_correct { 12 } else { 0 },
                lives_remaining: if is_correct { 3 } else { 2 },
                session_active: true,
                power_mode: is_correct,
            })
        }

        async fn end_session(&self, session: &SessionId) -> Result<EndReply, ApiError> {
            Ok(EndReply {
                message: String::new(),
                final_score: 12,
                stats: stats(session),
            })
        }

        async fn session_stats(&self, session: &SessionId) -> Result<SessionStats, ApiError> {
            Ok(stats(session))
        }

        async fn leaderboard(
            &self,
            _: Option<GameKind>,
            _: u32,
        ) -> Result<LeaderboardPage, ApiError> {
            Ok(LeaderboardPage {
                leaderboard: Vec::new(),
                total_entries: 0,
            })
        }
    }

    fn service(backend: Arc<FlakyBackend>) -> SessionService {
        SessionService::new(backend, fixed_clock())
    }

    #[tokio::test]
    async fn begin_reports_backend_session() {
        let mut svc = service(Arc::default());
        let start = svc.begin("ada", GameKind::SquidGame, Difficulty::Medium).await;
        assert!(start.backed);
        assert_eq!(start.lives, 3);
        assert!(svc.has_backend_session());
    }

    #[tokio::test]
    async fn begin_survives_a_dead_backend() {
        let backend = Arc::new(FlakyBackend::default());
        backend.fail_create.store(true, Ordering::SeqCst);
        let mut svc = service(backend);
        let start = svc.begin("ada", GameKind::SquidGame, Difficulty::Medium).await;
        assert!(!start.backed);
        assert_eq!(start.lives, arcade_core::model::DEFAULT_LIVES);
        assert!(!svc.has_backend_session());
    }

    #[tokio::test]
    async fn question_without_session_uses_builtin_bank() {
        let mut svc = service(Arc::default());
        // No begin(): fetching must still hand out a question.
        let question = svc.next_question().await;
        assert!(!question.text().is_empty());
        let verdict = svc.submit_answer(Some(question.correct_index())).await.unwrap();
        assert!(matches!(verdict, AnswerVerdict::Local { is_correct: true, .. }));
    }

    #[tokio::test]
    async fn question_fetch_failure_falls_back_locally() {
        let backend = Arc::new(FlakyBackend::default());
        let mut svc = service(Arc::clone(&backend));
        svc.begin("ada", GameKind::SquidGame, Difficulty::Medium).await;
        backend.fail_question.store(true, Ordering::SeqCst);
        let question = svc.next_question().await;
        // A local question never reaches the backend on submission.
        let verdict = svc.submit_answer(Some(question.correct_index())).await.unwrap();
        assert!(matches!(verdict, AnswerVerdict::Local { .. }));
        assert_eq!(backend.answers_seen.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn backend_answer_carries_authoritative_totals() {
        let mut svc = service(Arc::default());
        svc.begin("ada", GameKind::SquidGame, Difficulty::Medium).await;
        svc.next_question().await;
        let verdict = svc.submit_answer(Some(1)).await.unwrap();
        match verdict {
            AnswerVerdict::Backend {
                is_correct,
                total_score,
                lives_remaining,
                power_mode,
                ..
            } => {
                assert!(is_correct);
                assert_eq!(total_score, 12);
                assert_eq!(lives_remaining, 3);
                assert!(power_mode);
            }
            AnswerVerdict::Local { .. } => panic!("expected a backend verdict"),
        }
    }

    #[tokio::test]
    async fn answer_submit_failure_applies_local_rule() {
        let backend = Arc::new(FlakyBackend::default());
        let mut svc = service(Arc::clone(&backend));
        svc.begin("ada", GameKind::SquidGame, Difficulty::Medium).await;
        svc.next_question().await;
        backend.fail_answer.store(true, Ordering::SeqCst);

        let verdict = svc.submit_answer(Some(0)).await.unwrap();
        assert_eq!(
            verdict,
            AnswerVerdict::Local {
                is_correct: false,
                points_earned: 0
            }
        );
    }

    #[tokio::test]
    async fn timeout_counts_as_a_wrong_answer() {
        let mut svc = service(Arc::default());
        let q = svc.next_question().await;
        let verdict = svc.submit_answer(None).await.unwrap();
        assert!(!verdict.is_correct());
        drop(q);
    }

    #[tokio::test]
    async fn answering_with_nothing_pending_is_an_error() {
        let mut svc = service(Arc::default());
        assert_eq!(
            svc.submit_answer(Some(0)).await.unwrap_err(),
            SessionError::NoPendingQuestion
        );
    }

    #[tokio::test]
    async fn finish_clears_the_session() {
        let mut svc = service(Arc::default());
        svc.begin("ada", GameKind::SquidGame, Difficulty::Medium).await;
        svc.finish().await;
        assert!(!svc.has_backend_session());
        // A second finish with no session is a quiet no-op.
        svc.finish().await;
    }
}
