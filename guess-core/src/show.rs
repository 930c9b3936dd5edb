//! GameShow - the primary public API for a front end.
//!
//! A `GameShow` owns the live [`GameSession`], the host's [`AiState`] and
//! the two generator-backed clients. Each user action is split in three:
//!
//! 1. a synchronous step that changes game state and hands back a ticket,
//! 2. an async step that talks to the generator (touches no state),
//! 3. a synchronous step that applies the result to the overlay, but only
//!    if the ticket still matches the live game.
//!
//! Results for a game that has since been reset, or that were overtaken
//! by a newer request, are dropped in step 3.

use crate::ai_state::{AiState, Emotion};
use crate::commentary::{Commentary, CommentaryClient};
use crate::config::GeneratorConfig;
use crate::difficulty::Difficulty;
use crate::game::{GameSession, GuessRecord, Outcome, SessionId};
use crate::generator::{CommentaryRequest, GeminiGenerator, Generator, HintRequest};
use crate::hint::HintClient;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::{debug, warn};

/// Identifies the game state a generator request was issued against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTag {
    pub session: SessionId,
    /// History length when the request was issued.
    pub guess_count: usize,
    seq: u64,
}

/// A guess that has been applied and is waiting for commentary.
#[derive(Debug, Clone)]
pub struct GuessTicket {
    pub tag: RequestTag,
    pub record: GuessRecord,
    pub request: CommentaryRequest,
    /// The guess used up the last attempt without being correct.
    pub ends_in_loss: bool,
}

/// A hint request waiting for the generator.
#[derive(Debug, Clone)]
pub struct HintTicket {
    pub tag: RequestTag,
    pub request: HintRequest,
}

/// A number guessing game with an AI host.
pub struct GameShow {
    difficulty: Difficulty,
    session: GameSession,
    ai: AiState,
    commentary: CommentaryClient,
    hints: HintClient,
    rng: StdRng,
    latest_request: Option<RequestTag>,
    next_seq: u64,
}

impl GameShow {
    /// Create a show from generator config.
    ///
    /// Without a credential both clients run offline and answer with
    /// their fallbacks.
    pub fn new(config: &GeneratorConfig) -> Self {
        match GeminiGenerator::from_config(config) {
            Ok(generator) => Self::with_generator(Arc::new(generator)),
            Err(e) => {
                if config.has_credential() {
                    warn!(error = %e, "could not build generator, host will use fallbacks");
                }
                Self::offline()
            }
        }
    }

    /// Create a show backed by the given generator.
    pub fn with_generator(generator: Arc<dyn Generator>) -> Self {
        Self::with_clients(
            CommentaryClient::new(generator.clone()),
            HintClient::new(generator),
        )
    }

    /// Create a show whose host never calls out.
    pub fn offline() -> Self {
        Self::with_clients(CommentaryClient::offline(), HintClient::offline())
    }

    pub fn with_clients(commentary: CommentaryClient, hints: HintClient) -> Self {
        let mut rng = StdRng::from_entropy();
        let difficulty = Difficulty::default();
        let session = GameSession::start_with_rng(difficulty, &mut rng);
        Self {
            difficulty,
            ai: AiState::game_start(difficulty.max()),
            session,
            commentary,
            hints,
            rng,
            latest_request: None,
            next_seq: 0,
        }
    }

    /// Reseed target selection and start a new game.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.new_game();
        self
    }

    /// Start with a specific difficulty.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.set_difficulty(difficulty);
        self
    }

    // ========================================================================
    // Game lifecycle
    // ========================================================================

    /// Abandon the current game and start a fresh one.
    pub fn new_game(&mut self) {
        let session = GameSession::start_with_rng(self.difficulty, &mut self.rng);
        self.replace_session(session);
    }

    /// Switch difficulty. Always starts a new game.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.new_game();
    }

    /// Replace the live game with a prepared session.
    pub fn load_session(&mut self, session: GameSession) {
        self.difficulty = session.difficulty();
        self.replace_session(session);
    }

    fn replace_session(&mut self, session: GameSession) {
        self.ai = AiState::game_start(session.config().max);
        self.session = session;
        self.latest_request = None;
    }

    fn issue_tag(&mut self) -> RequestTag {
        let tag = RequestTag {
            session: self.session.id(),
            guess_count: self.session.attempts_used(),
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.latest_request = Some(tag);
        self.ai.is_thinking = true;
        tag
    }

    /// Whether a result tagged `tag` may still be shown.
    pub fn is_current(&self, tag: &RequestTag) -> bool {
        self.latest_request.as_ref() == Some(tag)
            && tag.session == self.session.id()
            && tag.guess_count == self.session.attempts_used()
    }

    // ========================================================================
    // Guessing
    // ========================================================================

    /// Apply a guess. Returns `None` and changes nothing once the game is over.
    pub fn guess(&mut self, value: i64) -> Option<GuessTicket> {
        let record = self.session.submit_guess(value)?;
        let request = CommentaryRequest::for_last_guess(&self.session)?;
        let ends_in_loss = self.session.outcome() == Outcome::Lost;
        let tag = self.issue_tag();

        Some(GuessTicket {
            tag,
            record,
            request,
            ends_in_loss,
        })
    }

    /// Fetch commentary for a ticket. Does not touch game state.
    pub async fn resolve_guess(&self, ticket: &GuessTicket) -> Commentary {
        self.commentary.comment(&ticket.request).await
    }

    /// Show commentary if its ticket is still current.
    ///
    /// A losing guess always reveals the target, whatever the generator said.
    pub fn apply_commentary(&mut self, ticket: &GuessTicket, commentary: Commentary) -> bool {
        if !self.is_current(&ticket.tag) {
            debug!(session = %ticket.tag.session, "discarding stale commentary");
            return false;
        }

        let commentary = if ticket.ends_in_loss {
            commentary.into_loss_reveal(ticket.request.target)
        } else {
            commentary
        };

        self.ai = AiState::new(commentary.text, commentary.emotion);
        self.latest_request = None;
        true
    }

    /// Guess, wait for commentary and show it.
    pub async fn submit_guess(&mut self, value: i64) -> Option<GuessRecord> {
        let ticket = self.guess(value)?;
        let commentary = self.resolve_guess(&ticket).await;
        self.apply_commentary(&ticket, commentary);
        Some(ticket.record)
    }

    // ========================================================================
    // Hints
    // ========================================================================

    /// Ask for a hint. Returns `None` once the game is over.
    pub fn hint(&mut self) -> Option<HintTicket> {
        if self.session.is_over() {
            return None;
        }
        let request = HintRequest::new(self.session.target(), self.session.history());
        let tag = self.issue_tag();
        Some(HintTicket { tag, request })
    }

    /// Fetch a hint for a ticket. Does not touch game state.
    pub async fn resolve_hint(&self, ticket: &HintTicket) -> String {
        self.hints.hint(&ticket.request).await
    }

    /// Show a hint if its ticket is still current.
    pub fn apply_hint(&mut self, ticket: &HintTicket, hint: String) -> bool {
        if !self.is_current(&ticket.tag) {
            debug!(session = %ticket.tag.session, "discarding stale hint");
            return false;
        }
        self.ai = AiState::new(format!("HINT: {hint}"), Emotion::Thinking);
        self.latest_request = None;
        true
    }

    /// Ask for a hint, wait for it and show it.
    pub async fn request_hint(&mut self) -> Option<String> {
        let ticket = self.hint()?;
        let hint = self.resolve_hint(&ticket).await;
        self.apply_hint(&ticket, hint.clone());
        Some(hint)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn ai(&self) -> &AiState {
        &self.ai
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn commentary_client(&self) -> &CommentaryClient {
        &self.commentary
    }

    pub fn hint_client(&self) -> &HintClient {
        &self.hints
    }

    pub fn attempts_remaining(&self) -> usize {
        self.session.attempts_remaining()
    }

    /// The target, once the game is over.
    pub fn revealed_target(&self) -> Option<i64> {
        self.session.is_over().then(|| self.session.target())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commentary::NO_CREDENTIAL_TEXT;
    use crate::hint::NO_CREDENTIAL_HINT;
    use crate::testing::MockGenerator;

    fn show_with_target(generator: Arc<MockGenerator>, d: Difficulty, target: i64) -> GameShow {
        let mut show = GameShow::with_generator(generator);
        show.load_session(GameSession::with_target(d, target).unwrap());
        show
    }

    #[test]
    fn test_starts_at_medium() {
        let show = GameShow::offline();
        assert_eq!(show.difficulty(), Difficulty::Medium);
        assert_eq!(show.ai().emotion, Emotion::Happy);
        assert!(show.ai().message.contains("between 1 and 100"));
        assert!(show.revealed_target().is_none());
    }

    #[test]
    fn test_set_difficulty_starts_new_game() {
        let mut show = GameShow::offline().with_seed(1);
        show.guess(1);
        let old = show.session().id();

        show.set_difficulty(Difficulty::Insane);
        assert_ne!(show.session().id(), old);
        assert!(show.session().history().is_empty());
        assert_eq!(show.session().difficulty(), Difficulty::Insane);
        assert!(show.ai().message.contains("between 1 and 1000"));
    }

    #[test]
    fn test_seeded_shows_pick_same_target() {
        let a = GameShow::offline().with_seed(99);
        let b = GameShow::offline().with_seed(99);
        assert_eq!(a.session().target(), b.session().target());
    }

    #[test]
    fn test_guess_marks_thinking() {
        let mut show = GameShow::offline();
        show.load_session(GameSession::with_target(Difficulty::Easy, 10).unwrap());
        let ticket = show.guess(5).unwrap();
        assert!(show.ai().is_thinking);
        assert_eq!(ticket.tag.guess_count, 1);
        assert!(!ticket.ends_in_loss);
    }

    #[tokio::test]
    async fn test_offline_commentary() {
        let mut show = GameShow::offline();
        show.load_session(GameSession::with_target(Difficulty::Easy, 10).unwrap());
        show.submit_guess(3).await;
        assert_eq!(show.ai().message, NO_CREDENTIAL_TEXT);
        assert_eq!(show.ai().emotion, Emotion::Neutral);
        assert!(!show.ai().is_thinking);
    }

    #[tokio::test]
    async fn test_stale_commentary_after_reset_is_discarded() {
        let mock = Arc::new(MockGenerator::new());
        mock.push_commentary(r#"{"text": "Old game!", "emotion": "happy"}"#).await;
        let mut show = show_with_target(mock, Difficulty::Easy, 20);

        let ticket = show.guess(10).unwrap();
        let commentary = show.resolve_guess(&ticket).await;
        show.new_game();

        assert!(!show.apply_commentary(&ticket, commentary));
        assert!(show.ai().message.starts_with("I'm thinking of a number"));
        assert!(!show.ai().is_thinking);
    }

    #[tokio::test]
    async fn test_superseded_request_is_discarded() {
        let mock = Arc::new(MockGenerator::new());
        mock.push_commentary(r#"{"text": "First", "emotion": "happy"}"#).await;
        mock.push_hint("Second").await;
        let mut show = show_with_target(mock, Difficulty::Easy, 20);

        let guess_ticket = show.guess(10).unwrap();
        let hint_ticket = show.hint().unwrap();

        let commentary = show.resolve_guess(&guess_ticket).await;
        let hint = show.resolve_hint(&hint_ticket).await;

        assert!(show.apply_hint(&hint_ticket, hint));
        assert!(!show.apply_commentary(&guess_ticket, commentary));
        assert_eq!(show.ai().message, "HINT: Second");
        assert_eq!(show.ai().emotion, Emotion::Thinking);
    }

    #[tokio::test]
    async fn test_loss_reveals_target() {
        let mock = Arc::new(MockGenerator::new());
        for _ in 0..10 {
            mock.push_commentary(r#"{"text": "Keep going!", "emotion": "happy"}"#)
                .await;
        }
        let mut show = show_with_target(mock, Difficulty::Medium, 50);

        for _ in 0..10 {
            show.submit_guess(1).await;
        }

        assert_eq!(show.session().outcome(), Outcome::Lost);
        assert_eq!(show.ai().emotion, Emotion::Sarcastic);
        assert_eq!(show.ai().message, "Game Over! The number was 50. Keep going!");
        assert_eq!(show.revealed_target(), Some(50));
    }

    #[tokio::test]
    async fn test_no_guess_or_hint_after_game_over() {
        let mock = Arc::new(MockGenerator::new());
        let mut show = show_with_target(mock.clone(), Difficulty::Easy, 7);

        show.submit_guess(7).await;
        assert!(show.session().is_won());

        assert!(show.guess(7).is_none());
        assert!(show.hint().is_none());
        assert!(show.request_hint().await.is_none());
        assert_eq!(show.session().history().len(), 1);
        assert!(mock.hint_calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_loaded_session_keeps_game_rules() {
        let mock = Arc::new(MockGenerator::new());
        let mut show = show_with_target(mock, Difficulty::Easy, 10);

        for _ in 0..9 {
            show.submit_guess(1).await;
        }
        assert_eq!(show.session().outcome(), Outcome::InProgress);

        show.submit_guess(1).await;
        assert_eq!(show.session().outcome(), Outcome::Lost);
        assert!(!show.session().is_won());
        assert_eq!(show.revealed_target(), Some(10));
        assert!(show.ai().message.starts_with("Game Over! The number was 10."));
        assert!(show.guess(1).is_none());
    }

    #[test]
    fn test_out_of_range_session_cannot_be_loaded() {
        assert!(GameSession::with_target(Difficulty::Easy, 0).is_err());
        assert!(GameSession::with_target(Difficulty::Easy, 51).is_err());
    }

    #[tokio::test]
    async fn test_offline_hint() {
        let mut show = GameShow::offline();
        let hint = show.request_hint().await.unwrap();
        assert_eq!(hint, NO_CREDENTIAL_HINT);
        assert_eq!(show.ai().message, format!("HINT: {NO_CREDENTIAL_HINT}"));
    }

    #[test]
    fn test_new_without_credential_is_offline() {
        let show = GameShow::new(&GeneratorConfig::offline());
        assert!(show.commentary_client().is_offline());
        assert!(show.hint_client().is_offline());

        let show = GameShow::new(&GeneratorConfig::offline().with_api_key("key"));
        assert!(!show.commentary_client().is_offline());
    }
}
