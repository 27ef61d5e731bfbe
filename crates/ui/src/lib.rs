#![forbid(unsafe_code)]

pub mod backend;
pub mod game;
pub mod input;
pub mod leaderboard;
pub mod menu;
pub mod runner;

pub use backend::{BackendClient, BackendCommand, BackendEvent, BackendEvents, spawn_backend};
pub use game::{Game, RedLightGame};
pub use input::{GameInput, MenuInput};
pub use leaderboard::LeaderboardScreen;
pub use menu::{GameMenu, MenuAction};
pub use runner::Runner;
