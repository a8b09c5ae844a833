use log::info;

pub const START_LIVES: u32 = 3;
pub const START_LEVEL: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    /// Terminal: only an explicit restart creates a new session
    GameOver { message: String },
}

/// Score, level and lives of the one running game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub score: u32,
    pub level: u32,
    pub lives: u32,
    pub status: SessionStatus,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            score: 0,
            level: START_LEVEL,
            lives: START_LIVES,
            status: SessionStatus::Running,
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_over(&self) -> bool {
        matches!(self.status, SessionStatus::GameOver { .. })
    }

    pub fn message(&self) -> Option<&str> {
        match &self.status {
            SessionStatus::GameOver { message } => Some(message),
            SessionStatus::Running => None,
        }
    }

    /// Adds `points` and levels up when the new score is a multiple of
    /// `level_every`. Returns true on level-up.
    pub fn award(&mut self, points: u32, level_every: u32) -> bool {
        self.add_score(points);
        if level_every > 0 && self.score % level_every == 0 {
            self.level_up();
            return true;
        }
        false
    }

    pub fn add_score(&mut self, points: u32) {
        self.score += points;
    }

    pub fn level_up(&mut self) {
        self.level += 1;
        info!("level up: {} (score {})", self.level, self.score);
    }

    /// Takes one life; running out ends the session with the final score.
    pub fn lose_life(&mut self) {
        if self.is_over() {
            return;
        }
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            let message = format!("Final Score: {}", self.score);
            self.end(message);
        }
    }

    /// Ends the session; the first message wins.
    pub fn end(&mut self, message: impl Into<String>) {
        if self.is_over() {
            return;
        }
        let message = message.into();
        info!("game over: {message}");
        self.status = SessionStatus::GameOver { message };
    }
}
