mod catalog;
mod ids;
mod question;
mod scoreboard;

pub use catalog::{Difficulty, GameKind};
pub use ids::{QuestionId, SessionId};
pub use question::{Category, Question, QuestionError, builtin_bank};
pub use scoreboard::{DEFAULT_LIVES, Scoreboard};
