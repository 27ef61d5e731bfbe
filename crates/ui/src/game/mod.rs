//! The playable game surface.

mod redlight;

pub use redlight::RedLightGame;

use ratatui::Frame;
use ratatui::layout::Rect;
use std::time::Duration;

use crate::backend::BackendEvent;
use crate::input::GameInput;

/// Contract every playable title implements: per-frame update and render,
/// keyboard input, and backend completions routed in by the runner.
pub trait Game {
    fn handle_input(&mut self, input: GameInput);

    fn update(&mut self, dt: Duration);

    fn render(&self, frame: &mut Frame<'_>, area: Rect);

    fn on_backend_event(&mut self, event: BackendEvent);

    /// Whether a question overlay is up, which changes the key mapping.
    fn question_open(&self) -> bool;
}
