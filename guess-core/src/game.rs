//! The guessing game state machine.
//!
//! A [`GameSession`] owns the hidden target, the guess history and the
//! outcome. It is the only authority on whether a game is won or lost;
//! the AI host's commentary is layered on afterwards and never feeds back.

use crate::difficulty::{Difficulty, DifficultyConfig};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Errors from constructing a game.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Target {target} is outside 1..={max} for {difficulty}")]
    TargetOutOfRange {
        target: i64,
        max: u32,
        difficulty: Difficulty,
    },
}

/// Rejected player input. Never reaches the state machine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GuessInputError {
    #[error("Nothing to guess - enter a whole number")]
    Empty,

    #[error("'{0}' is not a whole number")]
    NotANumber(String),
}

impl GuessInputError {
    /// Malformed input is always classified as invalid.
    pub fn status(&self) -> GuessStatus {
        GuessStatus::Invalid
    }
}

/// Parse raw player input into a guess value.
///
/// Only malformed input is rejected; values outside the difficulty's
/// range are passed through and classified normally.
pub fn parse_guess(input: &str) -> Result<i64, GuessInputError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(GuessInputError::Empty);
    }
    input
        .parse()
        .map_err(|_| GuessInputError::NotANumber(input.to_string()))
}

/// Unique identifier for a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Classification of a guess against the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuessStatus {
    TooLow,
    TooHigh,
    Correct,
    /// Malformed input; never stored in a [`GuessRecord`].
    Invalid,
}

impl GuessStatus {
    /// Compare a guess with the target.
    pub fn classify(value: i64, target: i64) -> Self {
        use std::cmp::Ordering;
        match value.cmp(&target) {
            Ordering::Equal => GuessStatus::Correct,
            Ordering::Greater => GuessStatus::TooHigh,
            Ordering::Less => GuessStatus::TooLow,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GuessStatus::TooLow => "TOO_LOW",
            GuessStatus::TooHigh => "TOO_HIGH",
            GuessStatus::Correct => "CORRECT",
            GuessStatus::Invalid => "INVALID",
        }
    }
}

impl fmt::Display for GuessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One submitted guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessRecord {
    pub value: i64,
    pub status: GuessStatus,
    /// Never earlier than the previous record's timestamp.
    pub timestamp: DateTime<Utc>,
}

/// Where a session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    InProgress,
    Won,
    Lost,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::InProgress)
    }
}

/// A single game from start to win or loss.
///
/// Only built by [`GameSession::start`] and friends, so the target is
/// always in range and `is_over`/`is_won` always follow from the history.
#[derive(Debug, Clone)]
pub struct GameSession {
    id: SessionId,
    difficulty: Difficulty,
    target: i64,
    history: Vec<GuessRecord>,
    is_over: bool,
    is_won: bool,
}

impl GameSession {
    /// Start a game with a uniformly random target in `1..=max`.
    pub fn start(difficulty: Difficulty) -> Self {
        Self::start_with_rng(difficulty, &mut rand::thread_rng())
    }

    /// Start a game drawing the target from the given RNG.
    pub fn start_with_rng<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> Self {
        let target = rng.gen_range(1..=difficulty.max()) as i64;
        Self::fresh(difficulty, target)
    }

    /// Start a game with a known target.
    pub fn with_target(difficulty: Difficulty, target: i64) -> Result<Self, GameError> {
        let max = difficulty.max();
        if target < 1 || target > max as i64 {
            return Err(GameError::TargetOutOfRange {
                target,
                max,
                difficulty,
            });
        }
        Ok(Self::fresh(difficulty, target))
    }

    fn fresh(difficulty: Difficulty, target: i64) -> Self {
        let session = Self {
            id: SessionId::new(),
            difficulty,
            target,
            history: Vec::new(),
            is_over: false,
            is_won: false,
        };
        info!(session = %session.id, %difficulty, "game started");
        session
    }

    /// Apply a guess and return the record it produced.
    ///
    /// Returns `None` without touching the session once the game is over.
    pub fn submit_guess(&mut self, value: i64) -> Option<GuessRecord> {
        if self.is_over {
            return None;
        }

        let status = GuessStatus::classify(value, self.target);
        let now = Utc::now();
        let timestamp = self
            .history
            .last()
            .map_or(now, |last| last.timestamp.max(now));

        let record = GuessRecord {
            value,
            status,
            timestamp,
        };
        self.history.push(record.clone());

        if status == GuessStatus::Correct {
            self.is_over = true;
            self.is_won = true;
        } else if self.history.len() >= self.config().attempts as usize {
            self.is_over = true;
        }

        if self.is_over {
            info!(
                session = %self.id,
                won = self.is_won,
                guesses = self.history.len(),
                "game over"
            );
        }

        Some(record)
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn config(&self) -> DifficultyConfig {
        self.difficulty.config()
    }

    /// The hidden number.
    pub fn target(&self) -> i64 {
        self.target
    }

    /// Guesses in the order they were made.
    pub fn history(&self) -> &[GuessRecord] {
        &self.history
    }

    pub fn last_guess(&self) -> Option<&GuessRecord> {
        self.history.last()
    }

    pub fn is_over(&self) -> bool {
        self.is_over
    }

    pub fn is_won(&self) -> bool {
        self.is_won
    }

    pub fn outcome(&self) -> Outcome {
        match (self.is_over, self.is_won) {
            (false, _) => Outcome::InProgress,
            (true, true) => Outcome::Won,
            (true, false) => Outcome::Lost,
        }
    }

    pub fn attempts_used(&self) -> usize {
        self.history.len()
    }

    pub fn attempts_remaining(&self) -> usize {
        (self.config().attempts as usize).saturating_sub(self.history.len())
    }
}
