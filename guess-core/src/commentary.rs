//! Commentary client: the host's reaction to each guess.
//!
//! Commentary never fails from the caller's point of view. A missing
//! credential, a transport error or an unreadable reply all turn into a
//! fixed fallback line, so the game keeps working when the generator
//! doesn't.

use crate::ai_state::Emotion;
use crate::difficulty::Difficulty;
use crate::game::{GuessRecord, GuessStatus};
use crate::generator::{extract_json, CommentaryRequest, Generator, GeneratorError};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

/// Shown when no credential is configured.
pub const NO_CREDENTIAL_TEXT: &str = "I need an API Key to speak! (Check GEMINI_API_KEY)";

/// Fallback after a correct guess.
pub const FALLBACK_CORRECT_TEXT: &str = "You got it! Well done!";

/// Fallback after any other guess.
pub const FALLBACK_TEXT: &str = "Interesting guess...";

/// A line from the host and the face it makes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commentary {
    pub text: String,
    pub emotion: Emotion,
}

impl Commentary {
    pub fn new(text: impl Into<String>, emotion: Emotion) -> Self {
        Self {
            text: text.into(),
            emotion,
        }
    }

    /// The deterministic reply used when the generator can't be used.
    pub fn fallback(status: GuessStatus) -> Self {
        let text = if status == GuessStatus::Correct {
            FALLBACK_CORRECT_TEXT
        } else {
            FALLBACK_TEXT
        };
        Self::new(text, Emotion::Neutral)
    }

    pub fn no_credential() -> Self {
        Self::new(NO_CREDENTIAL_TEXT, Emotion::Neutral)
    }

    /// Rewrite for a lost game so the answer is always revealed.
    pub fn into_loss_reveal(self, target: i64) -> Self {
        Self {
            text: format!("Game Over! The number was {target}. {}", self.text),
            emotion: Emotion::Sarcastic,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CommentaryReply {
    text: Option<String>,
    emotion: Option<String>,
}

/// Parse a generator reply into commentary.
///
/// The reply must be a JSON object with a non-empty `text` and an
/// `emotion` from the fixed set.
pub fn parse_commentary(reply: &str) -> Result<Commentary, GeneratorError> {
    let json = extract_json(reply);
    let parsed: CommentaryReply = serde_json::from_str(json)
        .map_err(|e| GeneratorError::Malformed(format!("{e}: {json}")))?;

    let text = parsed
        .text
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| GeneratorError::Malformed("missing text".to_string()))?;

    let emotion = parsed
        .emotion
        .ok_or_else(|| GeneratorError::Malformed("missing emotion".to_string()))?
        .parse::<Emotion>()
        .map_err(|e| GeneratorError::Malformed(e.to_string()))?;

    Ok(Commentary { text, emotion })
}

/// Produces the host's reaction after each guess.
#[derive(Clone, Default)]
pub struct CommentaryClient {
    generator: Option<Arc<dyn Generator>>,
}

impl CommentaryClient {
    /// A client backed by the given generator.
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self {
            generator: Some(generator),
        }
    }

    /// A client with no credential; it always answers with the fallback.
    pub fn offline() -> Self {
        Self { generator: None }
    }

    pub fn is_offline(&self) -> bool {
        self.generator.is_none()
    }

    /// React to a guess that has already been applied to `history`.
    pub async fn generate_commentary(
        &self,
        guess: i64,
        target: i64,
        status: GuessStatus,
        history: &[GuessRecord],
        difficulty: Difficulty,
    ) -> Commentary {
        let request = CommentaryRequest::new(guess, target, status, history, difficulty);
        self.comment(&request).await
    }

    /// React to a prepared request.
    pub async fn comment(&self, request: &CommentaryRequest) -> Commentary {
        let Some(ref generator) = self.generator else {
            return Commentary::no_credential();
        };

        match self.try_comment(generator.as_ref(), request).await {
            Ok(commentary) => commentary,
            Err(GeneratorError::NoCredential) => Commentary::no_credential(),
            Err(e) => {
                warn!(error = %e, "commentary generation failed, using fallback");
                Commentary::fallback(request.status)
            }
        }
    }

    async fn try_comment(
        &self,
        generator: &dyn Generator,
        request: &CommentaryRequest,
    ) -> Result<Commentary, GeneratorError> {
        let reply = generator.fetch_commentary(request).await?;
        parse_commentary(&reply)
    }
}
