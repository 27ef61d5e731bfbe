//! The game-phase state machine for the red-light run.
//!
//! `Waiting → Green ⇄ Red → Question → {GameOver | Won}`, with the light
//! flip driven by one armed deadline instead of nested timers. The deadline
//! is the only scheduled event: it is re-armed on every flip, dropped on
//! restart and on every terminal transition, so a stale timer can never
//! switch the light twice.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// What the doll is showing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightColor {
    Green,
    Red,
}

/// Phase of a single play attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Waiting,
    Green,
    Red,
    Question,
    GameOver,
    Won,
}

impl Phase {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::GameOver | Phase::Won)
    }

    /// The light shown during this phase, if any. The question overlay keeps
    /// the light it interrupted hidden; movement is not evaluated there.
    #[must_use]
    pub fn light(&self) -> Option<LightColor> {
        match self {
            Phase::Green => Some(LightColor::Green),
            Phase::Red => Some(LightColor::Red),
            _ => None,
        }
    }
}

/// Dwell ranges and the attempt countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseConfig {
    pub green_dwell_min: Duration,
    pub green_dwell_max: Duration,
    pub red_dwell_min: Duration,
    pub red_dwell_max: Duration,
    pub countdown: Duration,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            green_dwell_min: Duration::from_secs(3),
            green_dwell_max: Duration::from_secs(5),
            red_dwell_min: Duration::from_secs(2),
            red_dwell_max: Duration::from_secs(4),
            countdown: Duration::from_secs(90),
        }
    }
}

impl PhaseConfig {
    /// Degenerate config with exact dwell durations, for deterministic tests.
    #[must_use]
    pub fn exact(green: Duration, red: Duration, countdown: Duration) -> Self {
        Self {
            green_dwell_min: green,
            green_dwell_max: green,
            red_dwell_min: red,
            red_dwell_max: red,
            countdown,
        }
    }
}

/// Observable consequences of advancing the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    LightChanged(LightColor),
    /// Movement was detected during a red light.
    Eliminated,
    /// The attempt countdown reached zero.
    TimeExpired,
    /// Forward progress crossed the finish threshold.
    Finished,
}

#[derive(Debug)]
pub struct PhaseMachine {
    phase: Phase,
    config: PhaseConfig,
    /// Time until the next light flip. `Some` only while the light is live.
    next_flip_in: Option<Duration>,
    time_left: Duration,
    rng: StdRng,
}

impl PhaseMachine {
    #[must_use]
    pub fn new(config: PhaseConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Constructor with an explicit RNG for reproducible dwell durations.
    #[must_use]
    pub fn with_rng(config: PhaseConfig, rng: StdRng) -> Self {
        Self {
            phase: Phase::Waiting,
            config,
            next_flip_in: None,
            time_left: config.countdown,
            rng,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn light(&self) -> Option<LightColor> {
        self.phase.light()
    }

    #[must_use]
    pub fn time_left(&self) -> Duration {
        self.time_left
    }

    /// Whether a light-flip deadline is currently armed.
    #[must_use]
    pub fn deadline_armed(&self) -> bool {
        self.next_flip_in.is_some()
    }

    /// Begin the attempt. Only valid from `Waiting`; anything else is a no-op.
    pub fn start(&mut self) {
        if self.phase != Phase::Waiting {
            return;
        }
        self.phase = Phase::Green;
        self.time_left = self.config.countdown;
        self.arm_green();
    }

    /// Advance the machine by one frame delta. Emits at most one light flip
    /// plus the countdown expiry.
    pub fn tick(&mut self, dt: Duration) -> Vec<PhaseEvent> {
        let mut events = Vec::new();
        if !matches!(self.phase, Phase::Green | Phase::Red) {
            return events;
        }

        // Countdown runs while the light is live.
        if dt >= self.time_left {
            self.time_left = Duration::ZERO;
            self.enter_terminal(Phase::GameOver);
            events.push(PhaseEvent::TimeExpired);
            return events;
        }
        self.time_left -= dt;

        if let Some(remaining) = self.next_flip_in {
            if dt >= remaining {
                match self.phase {
                    Phase::Green => {
                        self.phase = Phase::Red;
                        self.arm_red();
                        events.push(PhaseEvent::LightChanged(LightColor::Red));
                    }
                    Phase::Red => {
                        self.phase = Phase::Green;
                        self.arm_green();
                        events.push(PhaseEvent::LightChanged(LightColor::Green));
                    }
                    _ => {}
                }
            } else {
                self.next_flip_in = Some(remaining - dt);
            }
        }

        events
    }

    /// Report that the player moved this frame. During a red light this
    /// eliminates the player, exactly once; in every other phase it has no
    /// effect.
    pub fn record_movement(&mut self) -> Option<PhaseEvent> {
        if self.phase != Phase::Red {
            return None;
        }
        self.enter_terminal(Phase::GameOver);
        Some(PhaseEvent::Eliminated)
    }

    /// Report that forward progress crossed the finish threshold. Winning is
    /// only possible while running on a green light.
    pub fn reach_finish(&mut self) -> Option<PhaseEvent> {
        if self.phase != Phase::Green {
            return None;
        }
        self.enter_terminal(Phase::Won);
        Some(PhaseEvent::Finished)
    }

    /// Suspend the run for a quiz question. Valid from a live light; the
    /// flip deadline is dropped and re-armed fresh when the question
    /// resolves, so no dwell time leaks across the overlay.
    pub fn begin_question(&mut self) -> bool {
        if !matches!(self.phase, Phase::Green | Phase::Red) {
            return false;
        }
        self.phase = Phase::Question;
        self.next_flip_in = None;
        true
    }

    /// Resolve the pending question. Survivors resume on a fresh green
    /// light; a fatal answer ends the attempt.
    pub fn resolve_question(&mut self, survived: bool) {
        if self.phase != Phase::Question {
            return;
        }
        if survived {
            self.phase = Phase::Green;
            self.arm_green();
        } else {
            self.enter_terminal(Phase::GameOver);
        }
    }

    /// Return to `Waiting`, dropping any armed deadline and restoring the
    /// countdown. Valid from any phase.
    pub fn restart(&mut self) {
        self.phase = Phase::Waiting;
        self.next_flip_in = None;
        self.time_left = self.config.countdown;
    }

    fn enter_terminal(&mut self, phase: Phase) {
        debug_assert!(phase.is_terminal());
        self.phase = phase;
        self.next_flip_in = None;
    }

    fn arm_green(&mut self) {
        self.next_flip_in = Some(self.pick_dwell(
            self.config.green_dwell_min,
            self.config.green_dwell_max,
        ));
    }

    fn arm_red(&mut self) {
        self.next_flip_in =
            Some(self.pick_dwell(self.config.red_dwell_min, self.config.red_dwell_max));
    }

    fn pick_dwell(&mut self, min: Duration, max: Duration) -> Duration {
        let (lo, hi) = (min.as_millis() as u64, max.as_millis() as u64);
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        Duration::from_millis(self.rng.random_range(lo..=hi))
    }
}
