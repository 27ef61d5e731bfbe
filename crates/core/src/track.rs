//! Player and pace-runner progress along the run.
//!
//! Positions are `{x, z}` scalar pairs: `z` is forward progress toward the
//! finish line, `x` lateral drift bounded to the track. Pace runners advance
//! linearly while the light is green and park at the finish.

use std::time::Duration;

/// Forward distance that wins the run.
pub const FINISH_LINE: f32 = 245.0;
/// Lateral bound either side of the centre line.
pub const TRACK_HALF_WIDTH: f32 = 40.0;
/// Player forward/strafe speed in track units per second.
pub const PLAYER_SPEED: f32 = 24.0;
/// Forward distance between quiz checkpoints.
pub const CHECKPOINT_INTERVAL: f32 = 60.0;

const RIVAL_SPEEDS: [f32; 2] = [18.0, 15.0];
const RIVAL_LANES: [f32; 2] = [-5.0, 5.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f32,
    pub z: f32,
}

impl Position {
    #[must_use]
    pub fn origin(x: f32) -> Self {
        Self { x, z: 0.0 }
    }
}

/// Direction of a single movement impulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunDirection {
    Forward,
    Back,
    Left,
    Right,
}

/// A computer-controlled rival that paces the player down the track.
#[derive(Debug, Clone, PartialEq)]
pub struct PaceRunner {
    position: Position,
    speed: f32,
}

impl PaceRunner {
    fn new(lane: f32, speed: f32) -> Self {
        Self {
            position: Position::origin(lane),
            speed,
        }
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn finished(&self) -> bool {
        self.position.z >= FINISH_LINE
    }

    fn advance(&mut self, dt: Duration) {
        if self.finished() {
            return;
        }
        self.position.z = (self.position.z + self.speed * dt.as_secs_f32()).min(FINISH_LINE);
    }
}

/// Track state for one attempt: the player position, the pace runners, and
/// the quiz checkpoints already consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerTrack {
    player: Position,
    rivals: [PaceRunner; 2],
    checkpoints_passed: u32,
}

impl RunnerTrack {
    #[must_use]
    pub fn new() -> Self {
        Self {
            player: Position::origin(0.0),
            rivals: [
                PaceRunner::new(RIVAL_LANES[0], RIVAL_SPEEDS[0]),
                PaceRunner::new(RIVAL_LANES[1], RIVAL_SPEEDS[1]),
            ],
            checkpoints_passed: 0,
        }
    }

    #[must_use]
    pub fn player(&self) -> Position {
        self.player
    }

    #[must_use]
    pub fn rivals(&self) -> &[PaceRunner; 2] {
        &self.rivals
    }

    /// Fraction of the run completed, in `0.0..=1.0`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        (self.player.z / FINISH_LINE).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn crossed_finish(&self) -> bool {
        self.player.z >= FINISH_LINE
    }

    /// Move the player one impulse in the given direction. Lateral movement
    /// is clamped to the track, backward movement stops at the start line.
    pub fn advance_player(&mut self, direction: RunDirection, dt: Duration) {
        let step = PLAYER_SPEED * dt.as_secs_f32();
        match direction {
            RunDirection::Forward => self.player.z += step,
            RunDirection::Back => self.player.z = (self.player.z - step).max(0.0),
            RunDirection::Left => {
                self.player.x = (self.player.x - step).max(-TRACK_HALF_WIDTH);
            }
            RunDirection::Right => {
                self.player.x = (self.player.x + step).min(TRACK_HALF_WIDTH);
            }
        }
    }

    /// Advance the pace runners; call only while the light is green.
    pub fn advance_rivals(&mut self, dt: Duration) {
        for rival in &mut self.rivals {
            rival.advance(dt);
        }
    }

    /// Returns the checkpoint number just crossed, at most once per
    /// checkpoint. Checkpoints sit every `CHECKPOINT_INTERVAL` units,
    /// strictly before the finish line.
    pub fn take_checkpoint(&mut self) -> Option<u32> {
        let next = self.checkpoints_passed + 1;
        let at = next as f32 * CHECKPOINT_INTERVAL;
        if at >= FINISH_LINE || self.player.z < at {
            return None;
        }
        self.checkpoints_passed = next;
        Some(next)
    }

    /// Reset every position and checkpoint for a fresh attempt.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for RunnerTrack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn forward_impulses_accumulate_to_the_finish() {
        let mut track = RunnerTrack::new();
        let frames = (FINISH_LINE / PLAYER_SPEED).ceil() as u32;
        for _ in 0..frames {
            track.advance_player(RunDirection::Forward, SECOND);
        }
        assert!(track.crossed_finish());
        assert!((track.progress() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn lateral_movement_is_clamped_to_the_track() {
        let mut track = RunnerTrack::new();
        for _ in 0..100 {
            track.advance_player(RunDirection::Left, SECOND);
        }
        assert_eq!(track.player().x, -TRACK_HALF_WIDTH);
        for _ in 0..200 {
            track.advance_player(RunDirection::Right, SECOND);
        }
        assert_eq!(track.player().x, TRACK_HALF_WIDTH);
    }

    #[test]
    fn backward_movement_stops_at_the_start_line() {
        let mut track = RunnerTrack::new();
        track.advance_player(RunDirection::Back, SECOND);
        assert_eq!(track.player().z, 0.0);
    }

    #[test]
    fn checkpoints_fire_once_each_and_not_at_the_finish() {
        let mut track = RunnerTrack::new();
        assert_eq!(track.take_checkpoint(), None);

        // Cross the first checkpoint.
        while track.player().z < CHECKPOINT_INTERVAL {
            track.advance_player(RunDirection::Forward, SECOND);
        }
        assert_eq!(track.take_checkpoint(), Some(1));
        assert_eq!(track.take_checkpoint(), None);

        // Run to the end: checkpoints 2..4 exist, 240 < 245 so 4 fires too.
        while !track.crossed_finish() {
            track.advance_player(RunDirection::Forward, SECOND);
        }
        assert_eq!(track.take_checkpoint(), Some(2));
        assert_eq!(track.take_checkpoint(), Some(3));
        assert_eq!(track.take_checkpoint(), Some(4));
        assert_eq!(track.take_checkpoint(), None);
    }

    #[test]
    fn rivals_advance_and_park_at_the_finish() {
        let mut track = RunnerTrack::new();
        track.advance_rivals(SECOND);
        let [first, second] = track.rivals().clone();
        assert!(first.position().z > second.position().z);

        for _ in 0..60 {
            track.advance_rivals(SECOND);
        }
        for rival in track.rivals() {
            assert!(rival.finished());
            assert_eq!(rival.position().z, FINISH_LINE);
        }
    }

    #[test]
    fn reset_restores_a_fresh_attempt() {
        let mut track = RunnerTrack::new();
        for _ in 0..5 {
            track.advance_player(RunDirection::Forward, SECOND);
            track.advance_rivals(SECOND);
        }
        track.take_checkpoint();
        track.reset();
        assert_eq!(track.player().z, 0.0);
        assert_eq!(track.rivals()[0].position().z, 0.0);
        assert_eq!(track.take_checkpoint(), None);
    }
}
