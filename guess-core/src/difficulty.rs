//! Difficulty presets.
//!
//! Each difficulty fixes the guessable range `1..=max` and how many
//! guesses the player gets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a difficulty name is not recognized.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown difficulty: {0} (expected easy, medium, hard or insane)")]
pub struct UnknownDifficulty(pub String);

/// A named preset of range and attempt allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Insane,
}

/// Range and attempt allowance for a difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    /// Largest guessable value; the smallest is always 1.
    pub max: u32,
    /// Number of guesses before the game is lost.
    pub attempts: u32,
}

impl Difficulty {
    /// All difficulties, easiest first.
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Insane,
    ];

    pub fn config(self) -> DifficultyConfig {
        match self {
            Difficulty::Easy => DifficultyConfig { max: 50, attempts: 10 },
            Difficulty::Medium => DifficultyConfig { max: 100, attempts: 10 },
            Difficulty::Hard => DifficultyConfig { max: 500, attempts: 15 },
            Difficulty::Insane => DifficultyConfig { max: 1000, attempts: 20 },
        }
    }

    pub fn max(self) -> u32 {
        self.config().max
    }

    pub fn attempts(self) -> u32 {
        self.config().attempts
    }

    /// Upper-case identifier, as shown to the player and the generator.
    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
            Difficulty::Insane => "INSANE",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "insane" => Ok(Difficulty::Insane),
            _ => Err(UnknownDifficulty(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_values() {
        assert_eq!(Difficulty::Easy.config(), DifficultyConfig { max: 50, attempts: 10 });
        assert_eq!(Difficulty::Medium.config(), DifficultyConfig { max: 100, attempts: 10 });
        assert_eq!(Difficulty::Hard.config(), DifficultyConfig { max: 500, attempts: 15 });
        assert_eq!(Difficulty::Insane.config(), DifficultyConfig { max: 1000, attempts: 20 });
    }

    #[test]
    fn test_default_is_medium() {
        assert_eq!(Difficulty::default(), Difficulty::Medium);
    }

    #[test]
    fn test_parse_any_case() {
        assert_eq!("easy".parse(), Ok(Difficulty::Easy));
        assert_eq!("INSANE".parse(), Ok(Difficulty::Insane));
        assert_eq!(" Hard ".parse(), Ok(Difficulty::Hard));
        assert!("nightmare".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for d in Difficulty::ALL {
            assert_eq!(d.to_string().parse::<Difficulty>(), Ok(d));
        }
    }

    #[test]
    fn test_serde_uses_identifier() {
        assert_eq!(serde_json::to_string(&Difficulty::Hard).unwrap(), "\"HARD\"");
    }
}
