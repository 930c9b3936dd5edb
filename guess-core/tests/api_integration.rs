//! Integration tests that call the real Gemini API.
//!
//! These tests require GEMINI_API_KEY to be set (via .env file or environment).
//! Run with: `cargo test -p guess-core --test api_integration -- --ignored`
//!
//! These are marked #[ignore] by default to avoid API costs in CI and
//! failures when no key is available.

use guess_core::{Difficulty, GameSession, GameShow, GeneratorConfig, GuessStatus};

/// Load environment variables from .env file
fn setup() -> GeneratorConfig {
    let _ = dotenvy::dotenv();
    GeneratorConfig::from_env()
}

#[tokio::test]
#[ignore]
async fn test_live_commentary_is_parsed() {
    let config = setup();
    if !config.has_credential() {
        eprintln!("Skipping test: GEMINI_API_KEY not set");
        return;
    }

    let mut show = GameShow::new(&config);
    show.load_session(GameSession::with_target(Difficulty::Easy, 33).unwrap());

    let record = show.submit_guess(2).await.expect("game is open");
    assert_eq!(record.status, GuessStatus::TooLow);

    println!("Host: {} ({})", show.ai().message, show.ai().emotion);
    assert!(!show.ai().message.is_empty());
    assert!(!show.ai().is_thinking);
}

#[tokio::test]
#[ignore]
async fn test_live_hint() {
    let config = setup();
    if !config.has_credential() {
        eprintln!("Skipping test: GEMINI_API_KEY not set");
        return;
    }

    let mut show = GameShow::new(&config);
    show.load_session(GameSession::with_target(Difficulty::Medium, 81).unwrap());
    show.submit_guess(50).await;

    let hint = show.request_hint().await.expect("game is open");
    println!("Hint: {hint}");
    assert!(!hint.is_empty());
}
