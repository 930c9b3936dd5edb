//! Number guessing game with an AI game-show host.
//!
//! This crate provides:
//! - Difficulty presets and the guessing state machine
//! - A Gemini-backed host that comments on guesses and gives hints
//! - Graceful fallbacks whenever the host can't reach the generator
//! - A front-end facing `GameShow` that keeps host replies in sync with the game
//!
//! # Quick Start
//!
//! ```ignore
//! use guess_core::{Difficulty, GameShow, GeneratorConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = GeneratorConfig::from_env();
//!     let mut show = GameShow::new(&config).with_difficulty(Difficulty::Easy);
//!
//!     show.submit_guess(25).await;
//!     println!("{}", show.ai().message);
//! }
//! ```

pub mod ai_state;
pub mod commentary;
pub mod config;
pub mod difficulty;
pub mod game;
pub mod generator;
pub mod hint;
pub mod prompts;
pub mod show;
pub mod testing;

// Primary public API
pub use ai_state::{AiState, Emotion};
pub use commentary::{Commentary, CommentaryClient};
pub use config::GeneratorConfig;
pub use difficulty::{Difficulty, DifficultyConfig};
pub use game::{parse_guess, GameSession, GuessInputError, GuessRecord, GuessStatus, Outcome};
pub use generator::{GeminiGenerator, Generator, GeneratorError};
pub use hint::HintClient;
pub use show::{GameShow, GuessTicket, HintTicket};
pub use testing::{MockGenerator, TestHarness};
