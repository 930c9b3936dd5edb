//! Testing utilities for the guessing game.
//!
//! This module provides tools for integration testing:
//! - `MockGenerator` for deterministic host replies without API calls
//! - `TestHarness` for scripted game scenarios with a fixed target
//! - Assertion helpers for verifying game state

use crate::ai_state::{AiState, Emotion};
use crate::difficulty::Difficulty;
use crate::game::{GameSession, GuessRecord, Outcome};
use crate::generator::{CommentaryRequest, Generator, GeneratorError, HintRequest};
use crate::show::GameShow;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Reply given once the commentary script runs out.
pub const UNSCRIPTED_COMMENTARY: &str =
    r#"{"text": "The host has no more scripted lines.", "emotion": "neutral"}"#;

/// Reply given once the hint script runs out.
pub const UNSCRIPTED_HINT: &str = "The host has no more scripted hints.";

/// A generator that returns scripted replies in order.
///
/// Every request is recorded so tests can check what was asked.
#[derive(Default)]
pub struct MockGenerator {
    commentary: Mutex<VecDeque<Result<String, GeneratorError>>>,
    hints: Mutex<VecDeque<Result<String, GeneratorError>>>,
    commentary_calls: Mutex<Vec<CommentaryRequest>>,
    hint_calls: Mutex<Vec<HintRequest>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw commentary reply.
    pub async fn push_commentary(&self, reply: impl Into<String>) {
        self.commentary.lock().await.push_back(Ok(reply.into()));
    }

    /// Queue a well-formed commentary reply.
    pub async fn push_line(&self, text: &str, emotion: Emotion) {
        let reply = serde_json::json!({ "text": text, "emotion": emotion }).to_string();
        self.push_commentary(reply).await;
    }

    /// Queue a commentary failure.
    pub async fn push_commentary_error(&self, error: GeneratorError) {
        self.commentary.lock().await.push_back(Err(error));
    }

    /// Queue a raw hint reply.
    pub async fn push_hint(&self, reply: impl Into<String>) {
        self.hints.lock().await.push_back(Ok(reply.into()));
    }

    /// Queue a hint failure.
    pub async fn push_hint_error(&self, error: GeneratorError) {
        self.hints.lock().await.push_back(Err(error));
    }

    /// Commentary requests received so far.
    pub async fn commentary_calls(&self) -> Vec<CommentaryRequest> {
        self.commentary_calls.lock().await.clone()
    }

    /// Hint requests received so far.
    pub async fn hint_calls(&self) -> Vec<HintRequest> {
        self.hint_calls.lock().await.clone()
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn fetch_commentary(&self, request: &CommentaryRequest) -> Result<String, GeneratorError> {
        self.commentary_calls.lock().await.push(request.clone());
        self.commentary
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(UNSCRIPTED_COMMENTARY.to_string()))
    }

    async fn fetch_hint(&self, request: &HintRequest) -> Result<String, GeneratorError> {
        self.hint_calls.lock().await.push(request.clone());
        self.hints
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(UNSCRIPTED_HINT.to_string()))
    }
}

/// Test harness for running game scenarios against a known target.
pub struct TestHarness {
    /// The scripted generator.
    pub generator: Arc<MockGenerator>,
    /// The show under test.
    pub show: GameShow,
}

impl TestHarness {
    /// Create a harness with a fixed target.
    ///
    /// Panics if `target` is outside the difficulty's range.
    pub fn new(difficulty: Difficulty, target: i64) -> Self {
        let generator = Arc::new(MockGenerator::new());
        let mut show = GameShow::with_generator(generator.clone());
        let session = GameSession::with_target(difficulty, target)
            .unwrap_or_else(|e| panic!("invalid test target: {e}"));
        show.load_session(session);
        Self { generator, show }
    }

    /// Create a harness whose host has no credential.
    pub fn offline(difficulty: Difficulty, target: i64) -> Self {
        let mut harness = Self::new(difficulty, target);
        harness.show = GameShow::offline();
        let session = GameSession::with_target(difficulty, target)
            .unwrap_or_else(|e| panic!("invalid test target: {e}"));
        harness.show.load_session(session);
        harness
    }

    /// Queue the host's next line.
    pub async fn expect_line(&mut self, text: &str, emotion: Emotion) -> &mut Self {
        self.generator.push_line(text, emotion).await;
        self
    }

    /// Queue the host's next hint.
    pub async fn expect_hint(&mut self, hint: &str) -> &mut Self {
        self.generator.push_hint(hint).await;
        self
    }

    /// Make a guess and let the host react.
    pub async fn guess(&mut self, value: i64) -> Option<GuessRecord> {
        self.show.submit_guess(value).await
    }

    /// Make the same guess several times.
    pub async fn guess_repeatedly(&mut self, value: i64, times: usize) {
        for _ in 0..times {
            self.guess(value).await;
        }
    }

    pub async fn hint(&mut self) -> Option<String> {
        self.show.request_hint().await
    }

    pub fn session(&self) -> &GameSession {
        self.show.session()
    }

    pub fn ai(&self) -> &AiState {
        self.show.ai()
    }

    pub fn history_len(&self) -> usize {
        self.session().history().len()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert the game is still being played.
#[track_caller]
pub fn assert_in_progress(harness: &TestHarness) {
    assert_eq!(
        harness.session().outcome(),
        Outcome::InProgress,
        "Expected game to be in progress"
    );
}

/// Assert the game was won.
#[track_caller]
pub fn assert_won(harness: &TestHarness) {
    let session = harness.session();
    assert!(session.is_over() && session.is_won(), "Expected game to be won");
}

/// Assert the game was lost.
#[track_caller]
pub fn assert_lost(harness: &TestHarness) {
    let session = harness.session();
    assert!(session.is_over() && !session.is_won(), "Expected game to be lost");
}

/// Assert the history has the expected length.
#[track_caller]
pub fn assert_history_len(harness: &TestHarness, expected: usize) {
    let actual = harness.history_len();
    assert_eq!(actual, expected, "Expected {expected} guesses, got {actual}");
}

/// Assert the host's message contains a fragment.
#[track_caller]
pub fn assert_host_says(harness: &TestHarness, fragment: &str) {
    let message = &harness.ai().message;
    assert!(
        message.contains(fragment),
        "Expected host message to contain '{fragment}', got '{message}'"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GuessStatus;

    #[tokio::test]
    async fn test_mock_replies_in_order() {
        let mock = MockGenerator::new();
        mock.push_commentary("one").await;
        mock.push_commentary_error(GeneratorError::EmptyReply).await;

        let request = CommentaryRequest {
            difficulty: Difficulty::Easy,
            target: 1,
            guess: 2,
            status: GuessStatus::TooHigh,
            guesses_used: 1,
            attempts_remaining: 9,
        };

        assert_eq!(mock.fetch_commentary(&request).await.unwrap(), "one");
        assert!(mock.fetch_commentary(&request).await.is_err());
        assert_eq!(
            mock.fetch_commentary(&request).await.unwrap(),
            UNSCRIPTED_COMMENTARY
        );
        assert_eq!(mock.commentary_calls().await.len(), 3);
    }

    #[tokio::test]
    async fn test_harness_scripted_lines() {
        let mut harness = TestHarness::new(Difficulty::Easy, 27);
        harness
            .expect_line("Too timid!", Emotion::Sarcastic)
            .await
            .expect_line("Nailed it!", Emotion::Happy)
            .await;

        harness.guess(10).await;
        assert_host_says(&harness, "Too timid!");
        assert_in_progress(&harness);

        harness.guess(27).await;
        assert_host_says(&harness, "Nailed it!");
        assert_eq!(harness.ai().emotion, Emotion::Happy);
        assert_won(&harness);
        assert_history_len(&harness, 2);
    }

    #[tokio::test]
    async fn test_harness_unscripted_line() {
        let mut harness = TestHarness::new(Difficulty::Easy, 27);
        harness.guess(1).await;
        assert_host_says(&harness, "no more scripted lines");
    }

    #[tokio::test]
    async fn test_offline_harness() {
        let mut harness = TestHarness::offline(Difficulty::Easy, 27);
        harness.guess_repeatedly(1, 10).await;
        assert_lost(&harness);
        assert_host_says(&harness, "The number was 27");
        assert!(harness.generator.commentary_calls().await.is_empty());
    }
}
