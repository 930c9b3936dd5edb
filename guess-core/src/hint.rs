//! Hint client: cryptic clues on request.
//!
//! Hints are advisory. Whatever the generator says is shown as-is, and
//! any failure becomes a fixed line.

use crate::game::GuessRecord;
use crate::generator::{Generator, GeneratorError, HintRequest};
use std::sync::Arc;
use tracing::warn;

/// Shown when no credential is configured.
pub const NO_CREDENTIAL_HINT: &str = "I can't give hints without an API Key.";

/// Shown when the generator answers with nothing.
pub const EMPTY_HINT: &str = "Try guessing a number closer to the target!";

/// Shown when the request fails.
pub const FAILED_HINT: &str = "Focus on the feedback from your previous guesses.";

/// Produces hints about the target.
#[derive(Clone, Default)]
pub struct HintClient {
    generator: Option<Arc<dyn Generator>>,
}

impl HintClient {
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

    /// Ask for a clue about `target` given the guesses so far.
    pub async fn generate_hint(&self, target: i64, history: &[GuessRecord]) -> String {
        self.hint(&HintRequest::new(target, history)).await
    }

    pub async fn hint(&self, request: &HintRequest) -> String {
        let Some(ref generator) = self.generator else {
            return NO_CREDENTIAL_HINT.to_string();
        };

        match generator.fetch_hint(request).await {
            Ok(reply) if reply.trim().is_empty() => EMPTY_HINT.to_string(),
            Ok(reply) => reply.trim().to_string(),
            Err(GeneratorError::EmptyReply) => EMPTY_HINT.to_string(),
            Err(GeneratorError::NoCredential) => NO_CREDENTIAL_HINT.to_string(),
            Err(e) => {
                warn!(error = %e, "hint generation failed, using fallback");
                FAILED_HINT.to_string()
            }
        }
    }
}
