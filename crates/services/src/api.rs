//! Wire client for the arcade scoring backend.
//!
//! The backend is an external HTTP JSON service handing out quiz questions
//! and tracking score/lives per session. Everything here mirrors its payloads
//! field for field; game rules live in `arcade-core`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use arcade_core::model::{Category, Difficulty, GameKind, Question, QuestionId, SessionId};

use crate::error::ApiError;

//
// ─── WIRE TYPES ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionRequest {
    pub player_name: String,
    pub game_type: GameKind,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionCreated {
    pub session_id: SessionId,
    pub player_name: String,
    pub game_type: String,
    pub score: u32,
    pub lives: u32,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionPayload {
    pub question: String,
    pub options: Vec<String>,
    pub correct: usize,
    pub category: String,
    pub question_id: QuestionId,
    pub points: u32,
    pub time_limit: u32,
}

impl QuestionPayload {
    /// Validates the payload into a core `Question`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BadQuestion` when the backend sent an option list
    /// or correct index the game cannot use.
    pub fn into_question(self) -> Result<Question, ApiError> {
        Ok(Question::new(
            self.question_id,
            self.question,
            self.options,
            self.correct,
            Category::from_wire(&self.category),
            self.points,
            self.time_limit,
        )?)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerRequest {
    pub question_id: QuestionId,
    /// `-1` signals a timed-out question, matching the backend contract.
    pub selected_answer: i32,
    pub time_taken: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerReply {
    pub is_correct: bool,
    pub correct_answer: i32,
    #[serde(default)]
    pub explanation: String,
    pub points_earned: u32,
    pub total_score: u32,
    pub lives_remaining: u32,
    pub session_active: bool,
    #[serde(default)]
    pub power_mode: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionStats {
    pub session_id: SessionId,
    pub player_name: String,
    pub game_type: String,
    pub score: u32,
    pub lives_remaining: u32,
    pub questions_answered: u32,
    pub correct_answers: u32,
    pub wrong_answers: u32,
    pub accuracy: f32,
    pub average_time_per_question: f32,
    pub session_duration_seconds: Option<f64>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndReply {
    #[serde(default)]
    pub message: String,
    pub final_score: u32,
    pub stats: SessionStats,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardEntry {
    pub player_name: String,
    pub game_type: String,
    pub score: u32,
    pub questions_answered: u32,
    pub accuracy: f32,
    pub completed_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardPage {
    pub leaderboard: Vec<LeaderboardEntry>,
    pub total_entries: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub active_sessions: u32,
}

//
// ─── BACKEND SEAM ──────────────────────────────────────────────────────────────
//

/// The backend surface the session service depends on. Production uses
/// `ArcadeApi`; tests substitute mocks.
#[async_trait]
pub trait QuizBackend: Send + Sync {
    async fn create_session(&self, req: &CreateSessionRequest)
    -> Result<SessionCreated, ApiError>;

    async fn fetch_question(&self, session: &SessionId) -> Result<QuestionPayload, ApiError>;

    async fn submit_answer(
        &self,
        session: &SessionId,
        req: &AnswerRequest,
    ) -> Result<AnswerReply, ApiError>;

    async fn end_session(&self, session: &SessionId) -> Result<EndReply, ApiError>;

    async fn session_stats(&self, session: &SessionId) -> Result<SessionStats, ApiError>;

    async fn leaderboard(
        &self,
        game_type: Option<GameKind>,
        limit: u32,
    ) -> Result<LeaderboardPage, ApiError>;
}

//
// ─── HTTP CLIENT ───────────────────────────────────────────────────────────────
//

/// `reqwest`-backed client for the scoring backend.
#[derive(Debug, Clone)]
pub struct ArcadeApi {
    client: Client,
    base_url: Url,
}

impl ArcadeApi {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    /// Liveness probe; not part of the gameplay path.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or a non-2xx status.
    pub async fn health(&self) -> Result<Health, ApiError> {
        let response = self.client.get(self.endpoint("health")).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl QuizBackend for ArcadeApi {
    async fn create_session(
        &self,
        req: &CreateSessionRequest,
    ) -> Result<SessionCreated, ApiError> {
        let response = self
            .client
            .post(self.endpoint("api/sessions"))
            .json(req)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }

    async fn fetch_question(&self, session: &SessionId) -> Result<QuestionPayload, ApiError> {
        let response = self
            .client
            .get(self.endpoint(&format!("api/sessions/{session}/question")))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }

    async fn submit_answer(
        &self,
        session: &SessionId,
        req: &AnswerRequest,
    ) -> Result<AnswerReply, ApiError> {
        let response = self
            .client
            .post(self.endpoint(&format!("api/sessions/{session}/answer")))
            .json(req)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }

    async fn end_session(&self, session: &SessionId) -> Result<EndReply, ApiError> {
        let response = self
            .client
            .post(self.endpoint(&format!("api/sessions/{session}/end")))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }

    async fn session_stats(&self, session: &SessionId) -> Result<SessionStats, ApiError> {
        let response = self
            .client
            .get(self.endpoint(&format!("api/sessions/{session}/stats")))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }

    async fn leaderboard(
        &self,
        game_type: Option<GameKind>,
        limit: u32,
    ) -> Result<LeaderboardPage, ApiError> {
        let mut request = self
            .client
            .get(self.endpoint("api/leaderboard"))
            .query(&[("limit", limit.to_string())]);
        if let Some(kind) = game_type {
            request = request.query(&[("game_type", kind.wire_name())]);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_session_request_serializes_wire_names() {
        let req = CreateSessionRequest {
            player_name: "ada".into(),
            game_type: GameKind::SquidGame,
            difficulty: Difficulty::Medium,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["game_type"], "squid-game");
        assert_eq!(json["difficulty"], "medium");
    }

    #[test]
    fn question_payload_validates_into_core_question() {
        let payload: QuestionPayload = serde_json::from_str(
            r#"{
                "question": "What is 15% of 200?",
                "options": ["20", "25", "30", "35"],
                "correct": 2,
                "category": "math",
                "question_id": "math_easy_2",
                "points": 10,
                "time_limit": 30
            }"#,
        )
        .unwrap();
        let question = payload.into_question().unwrap();
        assert_eq!(question.category(), Category::Math);
        assert!(question.is_correct(Some(2)));
        assert_eq!(question.time_limit_secs(), 30);
    }

    #[test]
    fn malformed_question_payload_is_rejected() {
        let payload: QuestionPayload = serde_json::from_str(
            r#"{
                "question": "Broken",
                "options": ["a", "b"],
                "correct": 0,
                "category": "math",
                "question_id": "broken",
                "points": 10,
                "time_limit": 30
            }"#,
        )
        .unwrap();
        assert!(matches!(
            payload.into_question(),
            Err(ApiError::BadQuestion(_))
        ));
    }

    #[test]
    fn answer_reply_tolerates_missing_optional_fields() {
        let reply: AnswerReply = serde_json::from_str(
            r#"{
                "is_correct": true,
                "correct_answer": 1,
                "points_earned": 22,
                "total_score": 47,
                "lives_remaining": 3,
                "session_active": true
            }"#,
        )
        .unwrap();
        assert!(reply.is_correct);
        assert!(!reply.power_mode);
        assert_eq!(reply.total_score, 47);
    }

    #[test]
    fn leaderboard_page_deserializes() {
        let page: LeaderboardPage = serde_json::from_str(
            r#"{
                "leaderboard": [{
                    "player_name": "ada",
                    "game_type": "squid-game",
                    "score": 120,
                    "questions_answered": 9,
                    "accuracy": 88.89,
                    "completed_at": "2024-05-01T00:10:00Z"
                }],
                "total_entries": 1
            }"#,
        )
        .unwrap();
        assert_eq!(page.total_entries, 1);
        assert_eq!(page.leaderboard[0].score, 120);
    }

    #[test]
    fn endpoint_joins_without_doubled_slashes() {
        let api = ArcadeApi::new(Url::parse("http://localhost:8000/").unwrap());
        assert_eq!(
            api.endpoint("api/sessions"),
            "http://localhost:8000/api/sessions"
        );
    }
}
