#![forbid(unsafe_code)]

pub mod model;
pub mod phase;
pub mod time;
pub mod track;

pub use model::{
    Category, Difficulty, GameKind, Question, QuestionError, QuestionId, Scoreboard, SessionId,
};
pub use phase::{LightColor, Phase, PhaseConfig, PhaseEvent, PhaseMachine};
pub use time::Clock;
pub use track::{PaceRunner, Position, RunDirection, RunnerTrack};
