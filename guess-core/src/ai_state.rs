//! The host's on-screen state: what it is saying and how it looks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned for an emotion outside the fixed set.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown emotion: {0}")]
pub struct UnknownEmotion(pub String);

/// The host's expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    #[default]
    Neutral,
    Happy,
    Sarcastic,
    Surprised,
    Thinking,
}

impl Emotion {
    pub const ALL: [Emotion; 5] = [
        Emotion::Neutral,
        Emotion::Happy,
        Emotion::Sarcastic,
        Emotion::Surprised,
        Emotion::Thinking,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Neutral => "neutral",
            Emotion::Happy => "happy",
            Emotion::Sarcastic => "sarcastic",
            Emotion::Surprised => "surprised",
            Emotion::Thinking => "thinking",
        }
    }

    /// A small face for text front ends.
    pub fn face(self) -> &'static str {
        match self {
            Emotion::Neutral => "(-_-)",
            Emotion::Happy => "(^_^)",
            Emotion::Sarcastic => "(¬_¬)",
            Emotion::Surprised => "(O_O)",
            Emotion::Thinking => "(o_O)",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = UnknownEmotion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Emotion::ALL
            .into_iter()
            .find(|e| e.as_str() == lowered)
            .ok_or_else(|| UnknownEmotion(s.to_string()))
    }
}

/// The host's message overlay. Cosmetic only; never game truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiState {
    pub message: String,
    pub is_thinking: bool,
    pub emotion: Emotion,
}

impl AiState {
    pub fn new(message: impl Into<String>, emotion: Emotion) -> Self {
        Self {
            message: message.into(),
            is_thinking: false,
            emotion,
        }
    }

    /// The overlay shown before the first game.
    pub fn welcome() -> Self {
        Self::new(
            "Welcome! Pick a difficulty and start guessing.",
            Emotion::Neutral,
        )
    }

    /// The overlay shown at the start of each game.
    pub fn game_start(max: u32) -> Self {
        Self::new(
            format!("I'm thinking of a number between 1 and {max}. Good luck!"),
            Emotion::Happy,
        )
    }
}

impl Default for AiState {
    fn default() -> Self {
        Self::welcome()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emotion_parse() {
        assert_eq!("happy".parse(), Ok(Emotion::Happy));
        assert_eq!("Sarcastic".parse(), Ok(Emotion::Sarcastic));
        assert_eq!(
            "furious".parse::<Emotion>(),
            Err(UnknownEmotion("furious".to_string()))
        );
    }

    #[test]
    fn test_emotion_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Emotion::Thinking).unwrap(), "\"thinking\"");
        let e: Emotion = serde_json::from_str("\"surprised\"").unwrap();
        assert_eq!(e, Emotion::Surprised);
    }

    #[test]
    fn test_game_start_overlay() {
        let state = AiState::game_start(500);
        assert_eq!(state.message, "I'm thinking of a number between 1 and 500. Good luck!");
        assert_eq!(state.emotion, Emotion::Happy);
        assert!(!state.is_thinking);
    }
}
