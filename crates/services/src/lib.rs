#![forbid(unsafe_code)]

pub mod api;
pub mod error;
pub mod session;

pub use arcade_core::Clock;

pub use api::{
    AnswerReply, AnswerRequest, ArcadeApi, CreateSessionRequest, EndReply, Health,
    LeaderboardEntry, LeaderboardPage, QuestionPayload, QuizBackend, SessionCreated, SessionStats,
};
pub use error::{ApiError, SessionError};
pub use session::{AnswerVerdict, SessionService, SessionStart};
