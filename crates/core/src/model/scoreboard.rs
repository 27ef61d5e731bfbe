/// Lives a player starts with unless the backend says otherwise.
pub const DEFAULT_LIVES: u32 = 3;

/// Mutable per-attempt scoring state owned by exactly one game instance.
/// Reset wholesale on restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scoreboard {
    score: u32,
    level: u32,
    lives: u32,
    initial_lives: u32,
    paused: bool,
    game_over: bool,
    started: bool,
}

impl Scoreboard {
    #[must_use]
    pub fn new(lives: u32) -> Self {
        Self {
            score: 0,
            level: 1,
            lives,
            initial_lives: lives,
            paused: false,
            game_over: false,
            started: false,
        }
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub fn lives(&self) -> u32 {
        self.lives
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn start(&mut self) {
        self.started = true;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Adds points for a locally scored correct answer or a finish bonus.
    pub fn award(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Overwrites the score with the backend's authoritative total.
    pub fn set_score(&mut self, total: u32) {
        self.score = total;
    }

    /// Removes one life. Flips `game_over` exactly when lives reach zero
    /// and returns whether that happened on this call.
    pub fn lose_life(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.game_over = true;
            return true;
        }
        false
    }

    /// Applies the backend's authoritative lives count.
    pub fn set_lives(&mut self, lives: u32) {
        self.lives = lives;
        if lives == 0 {
            self.game_over = true;
        }
    }

    /// Marks the attempt over without touching lives (elimination, timeout).
    pub fn end_game(&mut self) {
        self.game_over = true;
    }

    /// Restores the board to its pre-start state.
    pub fn reset(&mut self) {
        *self = Self::new(self.initial_lives);
    }
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self::new(DEFAULT_LIVES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn losing_last_life_ends_the_game_once() {
        let mut board = Scoreboard::new(2);
        assert!(!board.lose_life());
        assert!(!board.is_game_over());
        assert!(board.lose_life());
        assert!(board.is_game_over());
        // Already over; further losses report nothing and cannot underflow.
        assert!(!board.lose_life());
        assert_eq!(board.lives(), 0);
    }

    #[test]
    fn award_accumulates_and_set_score_overwrites() {
        let mut board = Scoreboard::default();
        board.award(10);
        board.award(15);
        assert_eq!(board.score(), 25);
        board.set_score(100);
        assert_eq!(board.score(), 100);
    }

    #[test]
    fn backend_lives_of_zero_end_the_game() {
        let mut board = Scoreboard::default();
        board.set_lives(0);
        assert!(board.is_game_over());
    }

    #[test]
    fn reset_restores_initial_constants() {
        let mut board = Scoreboard::new(3);
        board.start();
        board.award(40);
        board.lose_life();
        board.end_game();
        board.reset();
        assert_eq!(board.score(), 0);
        assert_eq!(board.lives(), 3);
        assert!(!board.is_game_over());
        assert!(!board.is_started());
        assert!(!board.is_paused());
    }
}
